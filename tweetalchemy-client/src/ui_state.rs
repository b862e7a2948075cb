use tweetalchemy_core::{OptimizationOptions, OptimizationRequest, Tone, copy_text, display_text};

pub const MSG_EMPTY_INPUT: &str = "⚠️ Please enter a tweet first.";
pub const MSG_NOT_OPTIMIZED: &str = "⚠️ Could not optimize tweet.";
pub const MSG_FAILED: &str = "❌ Error optimizing tweet.";
pub const MSG_LOADING: &str = "⚡ Optimizing your tweet...";
pub const MSG_PLACEHOLDER: &str = "✨ Optimized tweet will appear here...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFlag {
    Grammar,
    Spacing,
    Hashtags,
    Algo,
    Emojis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Transient state of the optimizer view. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub tweet: String,
    pub options: OptimizationOptions,
    pub settings_open: bool,
    phase: Phase,
    display: String,
    copy: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            tweet: String::new(),
            options: OptimizationOptions::recommended(),
            settings_open: false,
            phase: Phase::Idle,
            display: String::new(),
            copy: String::new(),
        }
    }
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tweet(tweet: impl Into<String>, options: OptimizationOptions) -> Self {
        Self {
            tweet: tweet.into(),
            options,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    /// The trigger control is disabled while a call is outstanding.
    pub fn can_optimize(&self) -> bool {
        !self.is_loading()
    }

    pub fn toggle(&mut self, flag: OptionFlag) {
        let slot = match flag {
            OptionFlag::Grammar => &mut self.options.grammar,
            OptionFlag::Spacing => &mut self.options.spacing,
            OptionFlag::Hashtags => &mut self.options.hashtags,
            OptionFlag::Algo => &mut self.options.algo,
            OptionFlag::Emojis => &mut self.options.emojis,
        };
        *slot = !*slot;
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.options.tone = tone;
    }

    pub fn open_settings(&mut self) {
        self.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
    }

    /// Starts an optimize action, returning the request to dispatch.
    ///
    /// Returns `None` while loading, or when the tweet is blank (in which
    /// case the output shows a prompt to enter one).
    pub fn begin_optimize(&mut self) -> Option<OptimizationRequest> {
        if self.is_loading() {
            return None;
        }
        if self.tweet.trim().is_empty() {
            self.display = MSG_EMPTY_INPUT.to_owned();
            self.copy.clear();
            return None;
        }

        self.phase = Phase::Loading;
        Some(OptimizationRequest {
            text: self.tweet.clone(),
            options: self.options,
        })
    }

    /// `Ok(None)` is a response without an `optimized` field.
    pub fn finish_optimize<E>(&mut self, outcome: Result<Option<String>, E>) {
        match outcome {
            Ok(optimized) => {
                let raw = optimized
                    .filter(|text| !text.is_empty())
                    .unwrap_or_else(|| MSG_NOT_OPTIMIZED.to_owned());
                self.display = display_text(&raw);
                self.copy = copy_text(&raw);
                self.phase = Phase::Succeeded;
            }
            Err(_) => {
                self.display = MSG_FAILED.to_owned();
                self.copy.clear();
                self.phase = Phase::Failed;
            }
        }
    }

    /// Returns to idle once the outcome has been shown.
    pub fn acknowledge(&mut self) {
        if !self.is_loading() {
            self.phase = Phase::Idle;
        }
    }

    pub fn output_text(&self) -> &str {
        if self.is_loading() {
            MSG_LOADING
        } else if self.display.is_empty() {
            MSG_PLACEHOLDER
        } else {
            &self.display
        }
    }

    pub fn clipboard_text(&self) -> Option<&str> {
        (!self.copy.is_empty()).then_some(self.copy.as_str())
    }
}
