//! Target language names and codes

/// (code, English name)
const LANGUAGES: &[(&str, &str)] = &[
    ("ar", "Arabic"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("de", "German"),
    ("el", "Greek"),
    ("en", "English"),
    ("es", "Spanish"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("id", "Indonesian"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("nl", "Dutch"),
    ("no", "Norwegian"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("ro", "Romanian"),
    ("ru", "Russian"),
    ("sv", "Swedish"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("vi", "Vietnamese"),
    ("zh", "Chinese"),
];

/// A resolved target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    /// Lowercase code used for glossary lookups
    pub code: String,
    /// Name used in prompts
    pub name: String,
}

impl Language {
    /// Resolve an ISO 639-1 code (`es`, `pt-BR`) or English name (`Spanish`).
    ///
    /// Unknown inputs are kept verbatim as the name, with the lowercased
    /// input as the code.
    pub fn resolve(input: &str) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or(lower.as_str());

        let found = LANGUAGES
            .iter()
            .find(|(code, name)| *code == primary || name.eq_ignore_ascii_case(&lower));

        match found {
            Some((code, name)) => Self {
                code: code.to_string(),
                name: name.to_string(),
            },
            None => Self {
                code: lower,
                name: trimmed.to_string(),
            },
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
