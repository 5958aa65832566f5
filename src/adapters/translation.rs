//! Machine translation through a LibreTranslate-compatible HTTP service
//!
//! The service is checked once at startup for the configured language pair.
//! A `Translator` only exists once that check succeeded.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::TranslateError;
use crate::app::config::ServiceConfig;

pub const SOURCE_LANG: &str = "zh";
pub const TARGET_LANG: &str = "en";

/// Language entry returned by `GET /languages`
#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub targets: Vec<String>,
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Whether `languages` offers `source` → `target`
///
/// Services that predate the `targets` field are assumed to translate
/// between every pair they list.
pub fn supports_pair(languages: &[Language], source: &str, target: &str) -> bool {
    let Some(from) = languages.iter().find(|l| matches_code(&l.code, source)) else {
        return false;
    };
    if from.targets.is_empty() {
        return languages.iter().any(|l| matches_code(&l.code, target));
    }
    from.targets.iter().any(|t| matches_code(t, target))
}

/// `zh` also matches script-tagged codes such as `zh-Hans`
fn matches_code(code: &str, wanted: &str) -> bool {
    code == wanted || code.split('-').next() == Some(wanted)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

pub struct Translator {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: Option<String>,
    source: String,
    target: String,
}

impl Translator {
    /// Probe the service and confirm it carries the language pair
    pub fn connect(config: &ServiceConfig) -> Result<Self, TranslateError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        let base_url = config.translate_url.trim_end_matches('/').to_string();
        let url = format!("{}/languages", base_url);
        info!("Checking translation service at {}", url);

        let resp = client.get(&url).send().map_err(|e| {
            TranslateError::Unavailable(format!(
                "request failed (is a translation service running at {}?): {}",
                base_url, e
            ))
        })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| TranslateError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(TranslateError::Service(format!(
                "{}: {}",
                status,
                error_message(&body)
            )));
        }

        let languages: Vec<Language> =
            serde_json::from_str(&body).map_err(|e| TranslateError::Service(e.to_string()))?;
        debug!("Service lists {} languages", languages.len());

        if !supports_pair(&languages, SOURCE_LANG, TARGET_LANG) {
            return Err(TranslateError::UnsupportedPair {
                source: SOURCE_LANG.to_string(),
                target: TARGET_LANG.to_string(),
            });
        }

        let source = match languages.iter().find(|l| matches_code(&l.code, SOURCE_LANG)) {
            Some(lang) => {
                debug!("Source language: {} ({})", lang.name, lang.code);
                lang.code.clone()
            }
            None => SOURCE_LANG.to_string(),
        };

        info!("Translation ready: {} -> {}", source, TARGET_LANG);
        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            source,
            target: TARGET_LANG.to_string(),
        })
    }

    pub fn translate(&self, text: &str) -> Result<String, TranslateError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let request = TranslateRequest {
            q: text,
            source: &self.source,
            target: &self.target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let resp = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&request)
            .send()
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().map_err(|e| TranslateError::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(TranslateError::Service(format!(
                "{}: {}",
                status,
                error_message(&body)
            )));
        }

        let parsed: TranslateResponse =
            serde_json::from_str(&body).map_err(|e| TranslateError::Service(e.to_string()))?;
        Ok(parsed.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages(json: &str) -> Vec<Language> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_supports_pair_with_targets() {
        let langs = languages(
            r#"[
                {"code": "en", "name": "English", "targets": ["zh"]},
                {"code": "zh", "name": "Chinese", "targets": ["en", "ja"]}
            ]"#,
        );
        assert!(supports_pair(&langs, "zh", "en"));
        assert!(!supports_pair(&langs, "zh", "de"));
        assert!(!supports_pair(&langs, "ja", "en"));
    }

    #[test]
    fn test_supports_pair_with_script_tag() {
        let langs = languages(
            r#"[
                {"code": "en", "name": "English", "targets": ["zh-Hans"]},
                {"code": "zh-Hans", "name": "Chinese (Simplified)", "targets": ["en"]}
            ]"#,
        );
        assert!(supports_pair(&langs, "zh", "en"));
    }

    #[test]
    fn test_supports_pair_without_targets_field() {
        let langs = languages(r#"[{"code": "en", "name": "English"}, {"code": "zh"}]"#);
        assert!(supports_pair(&langs, "zh", "en"));
        assert!(!supports_pair(&langs, "zh", "fr"));
    }

    #[test]
    fn test_request_serialization() {
        let request = TranslateRequest {
            q: "你好",
            source: "zh",
            target: "en",
            format: "text",
            api_key: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"q": "你好", "source": "zh", "target": "en", "format": "text"})
        );
    }

    #[test]
    fn test_response_parsing() {
        let parsed: TranslateResponse =
            serde_json::from_str(r#"{"translatedText": "Hello"}"#).unwrap();
        assert_eq!(parsed.translated_text, "Hello");
    }

    #[test]
    fn test_error_message_prefers_json_error() {
        assert_eq!(error_message(r#"{"error": "Invalid API key"}"#), "Invalid API key");
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_connect_to_unreachable_service() {
        let config = ServiceConfig {
            translate_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..ServiceConfig::default()
        };
        assert!(Translator::connect(&config).is_err());
    }
}
