//! Verse API and AI explanation client.
//!
//! One request per call: no retries, no backoff.

use crate::config::ApiConfig;
use crate::verse::{CoordError, Verse, VerseRef};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordError),
    #[error("Verse {0} not found")]
    NotFound(VerseRef),
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected response: {0}")]
    Decode(String),
    #[error("An API key is required for explanations")]
    MissingApiKey,
}

/// Anything that can produce a verse for a reference.
pub trait VerseSource {
    fn fetch(&self, r: VerseRef) -> impl Future<Output = Result<Verse, ClientError>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationKind {
    Verse,
    Thematic,
}

impl ExplanationKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::Verse => "/api/rigveda/ai-explanation",
            Self::Thematic => "/api/rigveda/thematic-significance",
        }
    }
}

#[derive(Deserialize)]
struct VerseEnvelope {
    data: Verse,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExplanationRequest<'a> {
    api_key: &'a str,
    mandala: u8,
    hymn: u16,
    verse: u16,
    sanskrit: &'a str,
    transliteration: &'a str,
    translation: Option<&'a str>,
    deity: Option<&'a str>,
}

#[derive(Deserialize)]
struct ExplanationResponse {
    content: Option<String>,
    explanation: Option<String>,
}

pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: builder.build()?,
        })
    }

    pub fn verse_url(&self, r: VerseRef) -> String {
        format!(
            "{}/api/rigveda/verse?mandala={}&hymn={}&verse={}",
            self.base_url, r.mandala, r.hymn, r.verse
        )
    }

    /// Ask the explanation endpoint about a verse.
    ///
    /// The key is only borrowed for the duration of the request.
    pub async fn explain(
        &self,
        kind: ExplanationKind,
        api_key: &str,
        verse: &Verse,
    ) -> Result<String, ClientError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }

        let body = ExplanationRequest {
            api_key,
            mandala: verse.mandala,
            hymn: verse.hymn,
            verse: verse.verse,
            sanskrit: &verse.sanskrit,
            transliteration: &verse.transliteration,
            translation: verse.translation("english"),
            deity: verse.deity.as_deref(),
        };

        let url = format!("{}{}", self.base_url, kind.path());
        tracing::debug!(%url, reference = %verse.reference(), "requesting explanation");
        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_explanation(status, &text)
    }
}

impl VerseSource for HttpClient {
    async fn fetch(&self, r: VerseRef) -> Result<Verse, ClientError> {
        let url = self.verse_url(r);
        tracing::debug!(%url, "fetching verse");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_verse(r, status, &text)
    }
}

fn decode_verse(r: VerseRef, status: StatusCode, body: &str) -> Result<Verse, ClientError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(r));
    }
    if !status.is_success() {
        return Err(upstream(status, body));
    }
    let envelope: VerseEnvelope =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    Ok(envelope.data)
}

fn decode_explanation(status: StatusCode, body: &str) -> Result<String, ClientError> {
    if !status.is_success() {
        return Err(upstream(status, body));
    }
    let response: ExplanationResponse =
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))?;
    response
        .content
        .or(response.explanation)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ClientError::Decode("response carried no explanation".to_string()))
}

fn upstream(status: StatusCode, body: &str) -> ClientError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .message
        .or(parsed.error)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    ClientError::Upstream {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verse::tests::sample_verse;

    fn r(m: i64, h: i64, v: i64) -> VerseRef {
        VerseRef::new(m, h, v).unwrap()
    }

    #[test]
    fn test_verse_url() {
        let client = HttpClient::new(&ApiConfig {
            base_url: "https://vedaweb.example/".into(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            client.verse_url(r(1, 1, 1)),
            "https://vedaweb.example/api/rigveda/verse?mandala=1&hymn=1&verse=1"
        );
    }

    #[test]
    fn test_decode_verse_success() {
        let body = format!(
            r#"{{ "data": {} }}"#,
            serde_json::to_string(&sample_verse()).unwrap()
        );
        let verse = decode_verse(r(1, 1, 1), StatusCode::OK, &body).unwrap();
        assert_eq!(verse.reference(), r(1, 1, 1));
        assert!(!verse.sanskrit.is_empty());
        assert!(!verse.transliteration.is_empty());
        assert!(!verse.translation("english").unwrap().is_empty());
    }

    #[test]
    fn test_decode_verse_not_found() {
        let err = decode_verse(r(2, 3, 40), StatusCode::NOT_FOUND, "{}").unwrap_err();
        assert!(matches!(err, ClientError::NotFound(v) if v == r(2, 3, 40)));
    }

    #[test]
    fn test_decode_upstream_message() {
        let err = decode_verse(
            r(1, 1, 1),
            StatusCode::BAD_REQUEST,
            r#"{ "error": "Mandala must be between 1 and 10" }"#,
        )
        .unwrap_err();
        match err {
            ClientError::Upstream { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Mandala must be between 1 and 10");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_upstream_without_json_body() {
        let err = decode_verse(r(1, 1, 1), StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(matches!(
            err,
            ClientError::Upstream { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn test_decode_malformed_success_body() {
        let err = decode_verse(r(1, 1, 1), StatusCode::OK, r#"{ "verse": 1 }"#).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn test_decode_explanation_variants() {
        assert_eq!(
            decode_explanation(StatusCode::OK, r#"{ "content": "Agni as messenger" }"#).unwrap(),
            "Agni as messenger"
        );
        assert_eq!(
            decode_explanation(StatusCode::OK, r#"{ "explanation": "Hymn to dawn" }"#).unwrap(),
            "Hymn to dawn"
        );
        assert!(decode_explanation(StatusCode::OK, r#"{ "content": "  " }"#).is_err());
        assert!(matches!(
            decode_explanation(StatusCode::UNAUTHORIZED, r#"{ "message": "bad key" }"#),
            Err(ClientError::Upstream { status: 401, .. })
        ));
    }

    #[tokio::test]
    async fn test_explain_requires_key_before_request() {
        let client = HttpClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
        })
        .unwrap();
        let err = client
            .explain(ExplanationKind::Verse, "   ", &sample_verse())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::MissingApiKey));
    }

    #[test]
    fn test_explanation_request_shape() {
        let verse = sample_verse();
        let body = ExplanationRequest {
            api_key: "k",
            mandala: verse.mandala,
            hymn: verse.hymn,
            verse: verse.verse,
            sanskrit: &verse.sanskrit,
            transliteration: &verse.transliteration,
            translation: verse.translation("english"),
            deity: verse.deity.as_deref(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["apiKey"], "k");
        assert_eq!(json["deity"], "Agni");
        assert_eq!(ExplanationKind::Thematic.path(), "/api/rigveda/thematic-significance");
    }
}
