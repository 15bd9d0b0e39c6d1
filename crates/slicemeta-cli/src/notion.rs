//! Notion page creation client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::debug;

use slicemeta_core::models::ExportConfig;
use slicemeta_core::{ExportError, RecordSink};

/// Environment variable holding the Notion integration token.
pub const TOKEN_ENV: &str = "NOTION_TOKEN";

/// Creates one page per processed file in a Notion database.
pub struct NotionClient {
    client: reqwest::Client,
    api_url: String,
    version: String,
    token: String,
    database_id: String,
}

impl NotionClient {
    /// Build a client with the token from [`TOKEN_ENV`].
    pub fn from_env(database_id: &str, config: &ExportConfig) -> Result<Self, ExportError> {
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExportError::MissingCredential(TOKEN_ENV))?;

        Self::new(database_id, token, config)
    }

    pub fn new(
        database_id: &str,
        token: String,
        config: &ExportConfig,
    ) -> Result<Self, ExportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("slicemeta/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ExportError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.notion_api_url.clone(),
            version: config.notion_version.clone(),
            token,
            database_id: database_id.to_string(),
        })
    }
}

/// Request body for a new database page. The database needs a title
/// property called "Name".
pub fn page_payload(database_id: &str, title: &str, properties: Map<String, Value>) -> Value {
    let mut all = Map::new();
    all.insert(
        "Name".to_string(),
        json!({ "title": [{ "text": { "content": title } }] }),
    );
    all.extend(properties);

    json!({
        "parent": { "database_id": database_id },
        "properties": all,
    })
}

#[async_trait]
impl RecordSink for NotionClient {
    async fn create_record(
        &self,
        title: &str,
        properties: Map<String, Value>,
    ) -> Result<(), ExportError> {
        let payload = page_payload(&self.database_id, title, properties);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ExportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!("Created Notion page for {}", title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_payload() {
        let mut props = Map::new();
        props.insert("Time (s)".to_string(), json!({ "number": 60 }));

        let payload = page_payload("db123", "benchy.gcode", props);

        assert_eq!(
            payload,
            json!({
                "parent": { "database_id": "db123" },
                "properties": {
                    "Name": { "title": [{ "text": { "content": "benchy.gcode" } }] },
                    "Time (s)": { "number": 60 },
                },
            })
        );
    }

    #[test]
    fn test_client_keeps_config() {
        let config = ExportConfig::default();
        let client = NotionClient::new("db123", "secret".to_string(), &config).unwrap();

        assert_eq!(client.api_url, "https://api.notion.com/v1/pages");
        assert_eq!(client.version, "2022-06-28");
        assert_eq!(client.database_id, "db123");
    }
}
