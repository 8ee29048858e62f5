//! The translation capability and its LLM-backed implementation

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::config::Config;
use crate::error::TranslateError;
use crate::glossary::Glossary;
use crate::language::Language;
use crate::openai::{ChatClient, ChatMessage, ChatOptions};

/// Translate a text into a target language.
///
/// Implementations may be non-deterministic and network-bound; the scorer
/// only relies on this signature, so tests substitute fixed stubs.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError>;
}

/// Translator backed by an OpenAI-compatible chat model
#[derive(Debug, Clone)]
pub struct LlmTranslator {
    client: ChatClient,
    model: String,
    options: ChatOptions,
    glossary: Glossary,
}

impl LlmTranslator {
    pub fn new(client: ChatClient, model: impl Into<String>, glossary: Glossary) -> Self {
        Self {
            client,
            model: model.into(),
            options: ChatOptions {
                temperature: Some(0.3),
            },
            glossary,
        }
    }

    /// Build a translator from configuration.
    ///
    /// A missing API key is reported as `Unavailable` so callers can tell
    /// it apart from a poor translation.
    pub fn from_config(config: &Config, glossary: Glossary) -> Result<Self, TranslateError> {
        let api_key = config.api_key().ok_or_else(|| {
            TranslateError::Unavailable(format!(
                "{} not found in environment variables",
                config.provider.api_key_env
            ))
        })?;

        tracing::info!(
            model = %config.provider.model,
            base_url = %config.provider.base_url,
            key_len = api_key.len(),
            "Initializing translator"
        );

        let client = ChatClient::new(
            &config.provider.base_url,
            api_key,
            Duration::from_secs(config.provider.timeout_secs),
        )?;

        Ok(Self::new(client, &config.provider.model, glossary)
            .with_temperature(config.provider.temperature))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn client(&self) -> &ChatClient {
        &self.client
    }

    pub fn messages(&self, text: &str, language: &Language) -> Vec<ChatMessage> {
        build_messages(&self.glossary, text, language)
    }
}

/// System and user messages for one translation request
pub fn build_messages(glossary: &Glossary, text: &str, language: &Language) -> Vec<ChatMessage> {
    let system = format!(
        "Translate the following text to {}. Return only the translated text.{}",
        language.name,
        glossary.prompt_context(language)
    );

    vec![ChatMessage::system(system), ChatMessage::user(text)]
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslateError> {
        if target_language.trim().is_empty() {
            return Err(TranslateError::InvalidInput("target language is empty".into()));
        }

        let language = Language::resolve(target_language);
        tracing::info!(language = %language, "Translating: {}", text);

        let messages = self.messages(text, &language);
        let reply = self
            .client
            .complete(&self.model, &messages, &self.options)
            .await?;

        Ok(clean_reply(&reply))
    }
}

/// Labels some models put in front of the translation
const REPLY_PREFIXES: [&str; 3] = ["translation:", "result:", "output:"];

/// Quote pairs a model may wrap the whole translation in
const QUOTE_PAIRS: [(char, char); 5] = [('"', '"'), ('\'', '\''), ('“', '”'), ('‘', '’'), ('«', '»')];

/// "The translation of 'x' in Spanish is 'y'."
static SENTENCE_REPLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\btranslation\b.*?\bis\s*["'“‘«]([^"'”’»]+)["'”’»]"#)
        .expect("sentence reply pattern is valid")
});

/// Strip the wrapping a chat model adds around a bare translation.
///
/// Removes a leading `Translation:`/`Result:`/`Output:` label, extracts the
/// quoted answer from "the translation ... is '...'" sentences, and drops
/// quotes around the whole reply. Anything else is returned trimmed.
pub fn clean_reply(reply: &str) -> String {
    let mut text = reply.trim();

    for prefix in REPLY_PREFIXES {
        if text.len() >= prefix.len()
            && text.is_char_boundary(prefix.len())
            && text[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            text = text[prefix.len()..].trim_start();
            break;
        }
    }

    if let Some(caps) = SENTENCE_REPLY.captures(text) {
        if let Some(inner) = caps.get(1) {
            let inner = inner.as_str().trim();
            tracing::debug!(reply, extracted = inner, "Extracted translation from sentence");
            return inner.to_string();
        }
    }

    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            if !inner.contains(open) && !inner.contains(close) {
                text = inner.trim();
                break;
            }
        }
    }

    text.to_string()
}

/// Stand-in used when no translator could be configured; every call
/// reports the configuration failure as `Unavailable`
#[derive(Debug, Clone)]
pub struct UnconfiguredTranslator {
    reason: String,
}

impl UnconfiguredTranslator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Translator for UnconfiguredTranslator {
    async fn translate(&self, _text: &str, _target_language: &str) -> Result<String, TranslateError> {
        Err(TranslateError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::Role;

    #[test]
    fn test_build_messages_without_glossary() {
        let messages = build_messages(&Glossary::default(), "Good morning!", &Language::resolve("ru"));

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[0].content,
            "Translate the following text to Russian. Return only the translated text."
        );
        assert_eq!(messages[1], ChatMessage::user("Good morning!"));
    }

    #[test]
    fn test_build_messages_with_glossary() {
        let glossary = Glossary::from_json(r#"{"payroll": {"es": "nómina"}}"#).unwrap();
        let messages = build_messages(&glossary, "cloud payroll", &Language::resolve("es"));

        assert!(messages[0].content.starts_with("Translate the following text to Spanish."));
        assert!(messages[0]
            .content
            .ends_with("\nUse these glossary terms exactly: payroll -> nómina"));
    }

    #[test]
    fn test_from_config_without_key_is_unavailable() {
        let mut config = Config::default_minimal();
        config.provider.api_key_env = "TRANSEVAL_TEST_KEY_THAT_IS_NEVER_SET".into();

        let err = LlmTranslator::from_config(&config, Glossary::default()).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("TRANSEVAL_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_clean_reply_keeps_plain_translation() {
        assert_eq!(clean_reply("  nube nómina\n"), "nube nómina");
        assert_eq!(clean_reply("l'entreprise"), "l'entreprise");
        assert_eq!(clean_reply(""), "");
    }

    #[test]
    fn test_clean_reply_strips_quotes() {
        assert_eq!(clean_reply("\"nube nómina\""), "nube nómina");
        assert_eq!(clean_reply("'Workday Lohnabrechnung'"), "Workday Lohnabrechnung");
        assert_eq!(clean_reply("«nube nómina»"), "nube nómina");
        assert_eq!(clean_reply("“Доброе утро!”"), "Доброе утро!");
    }

    #[test]
    fn test_clean_reply_strips_labels() {
        assert_eq!(clean_reply("Translation: nube nómina"), "nube nómina");
        assert_eq!(clean_reply("RESULT: \"nube nómina\""), "nube nómina");
        assert_eq!(clean_reply("Output:Workday Lohnabrechnung"), "Workday Lohnabrechnung");
    }

    #[test]
    fn test_clean_reply_extracts_from_sentence() {
        assert_eq!(
            clean_reply("The translation of 'cloud payroll' in Spanish is 'nube nómina'."),
            "nube nómina"
        );
        assert_eq!(clean_reply("Translation is \"Lohnabrechnung\""), "Lohnabrechnung");
    }

    #[tokio::test]
    async fn test_empty_language_is_invalid() {
        let client = ChatClient::new("http://127.0.0.1:9", "k", Duration::from_secs(1)).unwrap();
        let translator = LlmTranslator::new(client, "gpt-4o-mini", Glossary::default());

        let err = translator.translate("hello", "  ").await.unwrap_err();
        assert!(matches!(err, TranslateError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_quoted_reply_is_cleaned_before_scoring() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "\"nube nómina\"\n"}}]
            })))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri(), "k", Duration::from_secs(5)).unwrap();
        let translator = LlmTranslator::new(client, "gpt-4o-mini", Glossary::default());

        assert_eq!(translator.translate("cloud payroll", "es").await.unwrap(), "nube nómina");
    }

    #[tokio::test]
    async fn test_unconfigured_translator() {
        let translator = UnconfiguredTranslator::new("OPENAI_API_KEY not found");
        let err = translator.translate("hello", "es").await.unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("OPENAI_API_KEY not found"));
    }
}
