use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const OPTIMIZE_PATH: &str = "/api/optimize";
pub const SYSTEM_PROMPT: &str = "You are an assistant that rewrites tweets.";

pub const TASK_GRAMMAR: &str = "Fix grammar mistakes";
pub const TASK_SPACING: &str = "Fix spacing so the tweet is readable. \
Insert a blank line ONLY when necessary to separate distinct ideas. \
Do not over-space. Keep it tweet-friendly. \
At most 3 blank lines in total.";
pub const TASK_TONE_PROFESSIONAL: &str = "Rewrite in a professional, polished tone";
pub const TASK_TONE_CASUAL: &str = "Rewrite in a casual, fun, engaging tone";
pub const TASK_TONE_HYPE: &str = "Rewrite in a hype, marketing-friendly style with urgency";
pub const TASK_ADD_EMOJIS: &str = "Add 2-4 relevant emojis naturally (do not overuse)";
pub const TASK_NO_EMOJIS: &str = "Do NOT add any emojis";
pub const TASK_ADD_HASHTAGS: &str = "Add 3-5 relevant trending hashtags at the end";
pub const TASK_NO_HASHTAGS: &str = "Do NOT add any hashtags";
pub const TASK_ALGO: &str =
    "Optimize for Twitter algorithm (concise style, engaging hook, strong call-to-action)";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    None,
    Professional,
    Casual,
    Hype,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::None, Tone::Professional, Tone::Casual, Tone::Hype];

    /// Instruction for this tone, `None` for [`Tone::None`].
    pub fn instruction(self) -> Option<&'static str> {
        match self {
            Tone::None => None,
            Tone::Professional => Some(TASK_TONE_PROFESSIONAL),
            Tone::Casual => Some(TASK_TONE_CASUAL),
            Tone::Hype => Some(TASK_TONE_HYPE),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::None => "none",
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Hype => "hype",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tone::ALL
            .into_iter()
            .find(|tone| tone.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| CoreError::UnknownTone(value.to_owned()))
    }
}

/// Flags absent from a request body are treated as off.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct OptimizationOptions {
    pub grammar: bool,
    pub spacing: bool,
    pub hashtags: bool,
    pub algo: bool,
    pub emojis: bool,
    pub tone: Tone,
}

impl OptimizationOptions {
    /// Settings a fresh client view starts with.
    #[must_use]
    pub fn recommended() -> Self {
        Self {
            grammar: true,
            spacing: true,
            hashtags: true,
            algo: true,
            emojis: false,
            tone: Tone::None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptimizationRequest {
    pub text: String,
    #[serde(default)]
    pub options: OptimizationOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptimizationResult {
    pub original: String,
    pub optimized: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("No text provided")]
    MissingText,
    #[error("unknown tone {0:?} (expected none, professional, casual or hype)")]
    UnknownTone(String),
}

/// Returns the text when it holds something other than whitespace.
pub fn validate_text(text: Option<&str>) -> Result<&str, CoreError> {
    match text {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(CoreError::MissingText),
    }
}

/// Ordered instruction list: grammar, spacing, tone, emojis, hashtags, algo.
///
/// Emojis and hashtags always contribute an entry; when off they contribute
/// an explicit negative instruction.
pub fn build_tasks(options: &OptimizationOptions) -> Vec<&'static str> {
    let mut tasks = Vec::with_capacity(6);

    if options.grammar {
        tasks.push(TASK_GRAMMAR);
    }
    if options.spacing {
        tasks.push(TASK_SPACING);
    }
    if let Some(tone) = options.tone.instruction() {
        tasks.push(tone);
    }
    tasks.push(if options.emojis {
        TASK_ADD_EMOJIS
    } else {
        TASK_NO_EMOJIS
    });
    tasks.push(if options.hashtags {
        TASK_ADD_HASHTAGS
    } else {
        TASK_NO_HASHTAGS
    });
    if options.algo {
        tasks.push(TASK_ALGO);
    }

    tasks
}

pub fn build_prompt(text: &str, options: &OptimizationOptions) -> String {
    let tasks = build_tasks(options).join(", ");
    format!(
        "You are a tweet optimization assistant.\n\
         Given this tweet: \"{text}\"\n\
         Apply the following transformations: {tasks}.\n\
         Only return the final optimized tweet. Do not include explanations."
    )
}

/// Trimmed completion, or the original text when the model gave nothing usable.
pub fn normalize_completion(original: &str, completion: Option<&str>) -> String {
    match completion.map(str::trim) {
        Some(content) if !content.is_empty() => content.to_owned(),
        _ => original.to_owned(),
    }
}

pub fn optimization_result(original: &str, completion: Option<&str>) -> OptimizationResult {
    OptimizationResult {
        original: original.to_owned(),
        optimized: normalize_completion(original, completion),
    }
}

/// On-screen form: every run of two or more line breaks becomes one.
pub fn display_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_newline = false;
    for ch in raw.chars() {
        if ch == '\n' {
            if previous_newline {
                continue;
            }
            previous_newline = true;
        } else {
            previous_newline = false;
        }
        out.push(ch);
    }
    out
}

/// Clipboard form keeps the blank lines the model produced.
pub fn copy_text(raw: &str) -> String {
    raw.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_option_combinations() -> Vec<OptimizationOptions> {
        let mut out = Vec::new();
        for bits in 0_u8..32 {
            for tone in Tone::ALL {
                out.push(OptimizationOptions {
                    grammar: bits & 1 != 0,
                    spacing: bits & 2 != 0,
                    hashtags: bits & 4 != 0,
                    algo: bits & 8 != 0,
                    emojis: bits & 16 != 0,
                    tone,
                });
            }
        }
        out
    }

    #[test]
    fn one_entry_per_evaluated_flag() {
        for options in all_option_combinations() {
            let tasks = build_tasks(&options);
            let expected = usize::from(options.grammar)
                + usize::from(options.spacing)
                + usize::from(options.tone != Tone::None)
                + 2
                + usize::from(options.algo);
            assert_eq!(tasks.len(), expected, "options: {options:?}");

            let tone_entries = tasks
                .iter()
                .filter(|task| task.starts_with("Rewrite in a"))
                .count();
            assert!(tone_entries <= 1);

            let emoji_entries = tasks.iter().filter(|task| task.contains("emojis")).count();
            let hashtag_entries = tasks
                .iter()
                .filter(|task| task.contains("hashtags"))
                .count();
            assert_eq!(emoji_entries, 1);
            assert_eq!(hashtag_entries, 1);
        }
    }

    #[test]
    fn professional_grammar_hashtags_example() {
        let options = OptimizationOptions {
            grammar: true,
            spacing: false,
            hashtags: true,
            algo: false,
            emojis: false,
            tone: Tone::Professional,
        };
        let tasks = build_tasks(&options);
        assert_eq!(
            tasks,
            vec![
                TASK_GRAMMAR,
                TASK_TONE_PROFESSIONAL,
                TASK_NO_EMOJIS,
                TASK_ADD_HASHTAGS
            ]
        );
        assert!(!tasks.contains(&TASK_SPACING));
        assert!(!tasks.contains(&TASK_ALGO));

        let prompt = build_prompt("going to the store", &options);
        assert!(prompt.contains("Given this tweet: \"going to the store\""));
        assert!(prompt.contains(&format!(
            "Apply the following transformations: {}, {}, {}, {}.",
            TASK_GRAMMAR, TASK_TONE_PROFESSIONAL, TASK_NO_EMOJIS, TASK_ADD_HASHTAGS
        )));
        assert!(prompt.ends_with("Do not include explanations."));
    }

    #[test]
    fn all_flags_follow_fixed_order() {
        let options = OptimizationOptions {
            grammar: true,
            spacing: true,
            hashtags: true,
            algo: true,
            emojis: true,
            tone: Tone::Hype,
        };
        assert_eq!(
            build_tasks(&options),
            vec![
                TASK_GRAMMAR,
                TASK_SPACING,
                TASK_TONE_HYPE,
                TASK_ADD_EMOJIS,
                TASK_ADD_HASHTAGS,
                TASK_ALGO
            ]
        );
    }

    #[test]
    fn defaults_still_forbid_emojis_and_hashtags() {
        assert_eq!(
            build_tasks(&OptimizationOptions::default()),
            vec![TASK_NO_EMOJIS, TASK_NO_HASHTAGS]
        );
    }

    #[test]
    fn blank_completion_falls_back_to_original() {
        assert_eq!(normalize_completion("hello", None), "hello");
        assert_eq!(normalize_completion("hello", Some("")), "hello");
        assert_eq!(normalize_completion("hello", Some("  \n\t ")), "hello");
        assert_eq!(normalize_completion("hello", Some("  Hello!\n")), "Hello!");
    }

    #[test]
    fn result_keeps_original_verbatim() {
        let result = optimization_result("  raw  text ", Some("better"));
        assert_eq!(result.original, "  raw  text ");
        assert_eq!(result.optimized, "better");
    }

    #[test]
    fn validate_rejects_missing_and_blank_text() {
        assert_eq!(validate_text(None), Err(CoreError::MissingText));
        assert_eq!(validate_text(Some("")), Err(CoreError::MissingText));
        assert_eq!(validate_text(Some("   ")), Err(CoreError::MissingText));
        assert_eq!(validate_text(Some("hi")), Ok("hi"));
    }

    #[test]
    fn display_collapses_line_break_runs_and_copy_keeps_them() {
        let raw = "Big news\n\n\nWe shipped\n\n\n\n#rust\nend";
        let display = display_text(raw);
        assert_eq!(display, "Big news\nWe shipped\n#rust\nend");
        assert!(!display.contains("\n\n"));

        let copy = copy_text(raw);
        assert_eq!(copy, raw);
        assert!(copy.contains("\n\n\n\n"));
    }

    #[test]
    fn request_without_options_uses_defaults() {
        let request: OptimizationRequest = serde_json::from_str(r#"{"text":"hi"}"#).unwrap();
        assert_eq!(request.options, OptimizationOptions::default());

        let request: OptimizationRequest =
            serde_json::from_str(r#"{"text":"hi","options":{"grammar":true,"tone":"casual"}}"#)
                .unwrap();
        assert!(request.options.grammar);
        assert!(!request.options.hashtags);
        assert_eq!(request.options.tone, Tone::Casual);
    }

    #[test]
    fn unknown_tone_is_rejected() {
        let parsed = serde_json::from_str::<OptimizationOptions>(r#"{"tone":"friendly"}"#);
        assert!(parsed.is_err());
        assert_eq!(
            "friendly".parse::<Tone>(),
            Err(CoreError::UnknownTone("friendly".to_owned()))
        );
        assert_eq!("Professional".parse::<Tone>(), Ok(Tone::Professional));
    }
}
