//! Paste service used when message content is too long to send directly

use crate::error::PasteError;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

/// Uploads text and returns a URL where it can be read
#[async_trait]
pub trait PasteService: Send + Sync {
    async fn upload(&self, content: &str, syntax: Option<&str>) -> Result<String, PasteError>;
}

/// Client for a mystb.in compatible paste API
pub struct MystbinClient {
    http: Client,
    base_url: String,
}

impl MystbinClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PasteResponse {
    pastes: Vec<PasteFile>,
}

#[derive(Debug, Deserialize)]
struct PasteFile {
    id: String,
}

#[async_trait]
impl PasteService for MystbinClient {
    async fn upload(&self, content: &str, syntax: Option<&str>) -> Result<String, PasteError> {
        let mut meta = json!({ "index": 0 });
        if let Some(syntax) = syntax {
            meta["syntax"] = json!(syntax);
        }
        let meta = json!({ "meta": [meta] }).to_string();

        let form = Form::new()
            .text("data", content.to_string())
            .part("meta", Part::text(meta).mime_str("application/json")?);

        let response = self
            .http
            .post(format!("{}/api/pastes", self.base_url))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PasteError::Status(response.status().as_u16()));
        }

        let body: PasteResponse = response.json().await?;
        let id = body
            .pastes
            .into_iter()
            .next()
            .map(|paste| paste.id)
            .ok_or(PasteError::MissingId)?;

        ::log::debug!("Uploaded {} bytes to paste {}", content.len(), id);
        Ok(format!("{}/{}", self.base_url, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_upload_returns_paste_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/pastes"))
            .and(body_string_contains("fn main() {}"))
            .and(body_string_contains(r#""syntax":"rust""#))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"pastes": [{"id": "FishyPaste"}]}"#),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = MystbinClient::new(Client::new(), format!("{}/", mock_server.uri()));
        let url = client.upload("fn main() {}", Some("rust")).await.unwrap();

        assert_eq!(url, format!("{}/FishyPaste", mock_server.uri()));
    }

    #[tokio::test]
    async fn test_upload_reports_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/pastes"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = MystbinClient::new(Client::new(), mock_server.uri());
        let err = client.upload("text", None).await.unwrap_err();

        assert!(matches!(err, PasteError::Status(503)));
    }

    #[tokio::test]
    async fn test_upload_without_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/pastes"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"pastes": []}"#))
            .mount(&mock_server)
            .await;

        let client = MystbinClient::new(Client::new(), mock_server.uri());
        let err = client.upload("text", None).await.unwrap_err();

        assert!(matches!(err, PasteError::MissingId));
    }
}
