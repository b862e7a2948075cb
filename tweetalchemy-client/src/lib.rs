pub mod ui_state;

pub mod api {
    use serde::Deserialize;
    use thiserror::Error;
    use tracing::debug;
    use tweetalchemy_core::{OPTIMIZE_PATH, OptimizationRequest};
    use url::Url;

    pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

    #[derive(Debug, Error)]
    pub enum ApiError {
        #[error("request to optimizer failed: {0}")]
        Request(#[from] reqwest::Error),
        #[error("invalid server URL: {0}")]
        Url(#[from] url::ParseError),
    }

    /// Body of any `/api/optimize` reply; error replies carry only `error`.
    #[derive(Debug, Deserialize, Default)]
    pub struct OptimizeReply {
        #[serde(default)]
        pub original: Option<String>,
        #[serde(default)]
        pub optimized: Option<String>,
        #[serde(default)]
        pub error: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct ApiClient {
        http: reqwest::Client,
        endpoint: Url,
    }

    impl ApiClient {
        pub fn new(server: &str) -> Result<Self, ApiError> {
            let endpoint = optimize_url(&Url::parse(server.trim())?)?;
            Ok(Self {
                http: reqwest::Client::new(),
                endpoint,
            })
        }

        pub fn endpoint(&self) -> &Url {
            &self.endpoint
        }

        /// Non-200 replies are not errors here; they decode to a reply
        /// without `optimized`.
        pub async fn optimize(
            &self,
            request: &OptimizationRequest,
        ) -> Result<OptimizeReply, ApiError> {
            let response = self
                .http
                .post(self.endpoint.clone())
                .json(request)
                .send()
                .await?;
            debug!("optimizer replied {}", response.status());
            Ok(response.json::<OptimizeReply>().await?)
        }
    }

    /// Resolves the optimize route under the server URL, keeping any path
    /// prefix the server is mounted at.
    pub fn optimize_url(server: &Url) -> Result<Url, url::ParseError> {
        let mut base = server.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(OPTIMIZE_PATH.trim_start_matches('/'))
    }

}
