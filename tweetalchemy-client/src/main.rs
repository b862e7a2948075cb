use std::io::Read;

use clap::{ArgAction, Parser};
use tracing::{error, info, warn};
use tweetalchemy_client::{
    api::{ApiClient, DEFAULT_SERVER},
    ui_state::{Phase, ViewState},
};
use tweetalchemy_core::{OptimizationOptions, Tone};

#[derive(Parser, Debug)]
#[command(name = "tweetalchemy", about = "Rewrite a tweet through a TweetAlchemy server")]
struct ClientArgs {
    /// Tweet text; read from stdin when omitted.
    text: Option<String>,

    #[arg(long, env = "TWEETALCHEMY_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    grammar: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    spacing: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    hashtags: bool,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    algo: bool,

    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    emojis: bool,

    /// none, professional, casual or hype.
    #[arg(long, default_value = "none")]
    tone: Tone,

    /// Put the unabridged result on the system clipboard.
    #[arg(long)]
    copy: bool,
}

impl ClientArgs {
    fn options(&self) -> OptimizationOptions {
        OptimizationOptions {
            grammar: self.grammar,
            spacing: self.spacing,
            hashtags: self.hashtags,
            algo: self.algo,
            emojis: self.emojis,
            tone: self.tone,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = ClientArgs::parse();
    let tweet = match args.text.clone() {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buffer) {
                error!("failed to read tweet from stdin: {}", err);
                std::process::exit(1);
            }
            buffer
        }
    };

    let client = match ApiClient::new(&args.server) {
        Ok(client) => client,
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
    };

    let mut view = ViewState::with_tweet(tweet, args.options());
    let Some(request) = view.begin_optimize() else {
        println!("{}", view.output_text());
        std::process::exit(1);
    };

    info!("sending tweet to {} (tone {})", client.endpoint(), args.tone);
    let outcome = client.optimize(&request).await.map(|reply| {
        if let Some(message) = &reply.error {
            warn!("optimizer reported: {}", message);
        }
        reply.optimized
    });
    if let Err(err) = &outcome {
        warn!("{}", err);
    }
    view.finish_optimize(outcome);

    println!("{}", view.output_text());

    if args.copy
        && let Some(text) = view.clipboard_text()
    {
        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
            Ok(()) => info!("copied result to clipboard"),
            Err(err) => {
                eprintln!("could not copy to clipboard: {err}");
            }
        }
    }

    if view.phase() == Phase::Failed {
        std::process::exit(1);
    }
}
