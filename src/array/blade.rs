//! FlashBlade REST 1.x client.
//!
//! FlashBlades authenticate differently from FlashArrays: the API token is
//! sent in an `api-token` header to `/api/login`, and the `x-auth-token`
//! returned there accompanies every later request until `/api/logout`.
//! Only hardware queries exist on this platform.

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::client::{check_status, decode, http_client, join_segments, parse_base_url, ClientOptions};
use super::records::{AlertRecord, ArraySpace, HardwareRecord, PodMirrorStats, PodRecord, VolumeSpace};
use super::{ArrayApi, SourceError};

pub const DEFAULT_BLADE_API_VERSION: &str = "1.8";

const AUTH_HEADER: &str = "x-auth-token";

/// Paged list envelope of FlashBlade responses.
#[derive(Debug, Deserialize)]
struct Items<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// REST client bound to one blade and one API token.
pub struct FlashBladeClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
    api_version: String,
    api_token: String,
    auth_token: OnceCell<String>,
}

impl FlashBladeClient {
    /// Creates a client for `endpoint` (host name, IP address or full URL).
    pub fn new(endpoint: &str, api_token: &str, options: &ClientOptions) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(options)?,
            base_url: parse_base_url(&blade_base_url(endpoint))?,
            api_version: options.api_version.clone(),
            api_token: api_token.to_string(),
            auth_token: OnceCell::new(),
        })
    }

    async fn login(&self) -> Result<String, SourceError> {
        debug!("Opening FlashBlade session at {}", self.base_url);
        let response = self
            .client
            .post(join_segments(&self.base_url, &["login"])?)
            .header("api-token", &self.api_token)
            .send()
            .await?;
        let response = check_status(response).await?;
        response
            .headers()
            .get(AUTH_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| SourceError::Decode {
                endpoint: "login".to_string(),
                reason: format!("no {AUTH_HEADER} header in response"),
            })
    }

    async fn auth_token(&self) -> Result<&str, SourceError> {
        let token = self.auth_token.get_or_try_init(|| self.login()).await?;
        Ok(token.as_str())
    }
}

impl ArrayApi for FlashBladeClient {
    async fn list_open_alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        Err(SourceError::Unsupported("alert listing"))
    }

    async fn array_space(&self) -> Result<Option<ArraySpace>, SourceError> {
        Err(SourceError::Unsupported("array space"))
    }

    async fn volume_space(&self, _volume: &str) -> Result<Option<VolumeSpace>, SourceError> {
        Err(SourceError::Unsupported("volume space"))
    }

    async fn hardware(&self, component: Option<&str>) -> Result<Vec<HardwareRecord>, SourceError> {
        let token = self.auth_token().await?;
        let url = join_segments(&self.base_url, &[self.api_version.as_str(), "hardware"])?;
        let query: Vec<(&str, &str)> = component.map(|name| ("names", name)).into_iter().collect();
        debug!("GET {} {:?}", url.path(), query);

        let response = self
            .client
            .get(url)
            .header(AUTH_HEADER, token)
            .query(&query)
            .send()
            .await?;
        let response = check_status(response).await?;
        let page: Items<HardwareRecord> = decode("hardware", response.json().await?)?;
        Ok(page.items)
    }

    async fn pods(&self, _pod: Option<&str>) -> Result<Vec<PodRecord>, SourceError> {
        Err(SourceError::Unsupported("pod listing"))
    }

    async fn pod_mirror_stats(&self, _pod: Option<&str>) -> Result<Vec<PodMirrorStats>, SourceError> {
        Err(SourceError::Unsupported("pod statistics"))
    }

    async fn close(&self) -> Result<(), SourceError> {
        let Some(token) = self.auth_token.get() else {
            return Ok(());
        };
        let response = self
            .client
            .post(join_segments(&self.base_url, &["logout"])?)
            .header(AUTH_HEADER, token)
            .send()
            .await?;
        if let Err(e) = check_status(response).await {
            warn!("Failed to close FlashBlade session: {}", e);
            return Err(e);
        }
        debug!("FlashBlade session closed");
        Ok(())
    }
}

/// Builds `https://<endpoint>/api` unless a scheme is given.
fn blade_base_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        format!("{endpoint}/api")
    } else {
        format!("https://{endpoint}/api")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_blade_base_url() {
        assert_eq!(blade_base_url("fb01"), "https://fb01/api");
        assert_eq!(blade_base_url("http://127.0.0.1:9000/"), "http://127.0.0.1:9000/api");
    }

    #[test]
    fn test_items_envelope() {
        let page: Items<HardwareRecord> = serde_json::from_value(json!({
            "pagination_info": {"total_item_count": 1},
            "items": [{"name": "CH1.FB1", "status": "healthy", "serial": "X"}]
        }))
        .unwrap();
        assert_eq!(page.items[0].status, "healthy");

        let empty: Items<HardwareRecord> = serde_json::from_value(json!({})).unwrap();
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn test_array_queries_are_unsupported() {
        let blade = FlashBladeClient::new("fb01", "token", &ClientOptions::default()).unwrap();
        assert!(matches!(
            blade.list_open_alerts().await,
            Err(SourceError::Unsupported(_))
        ));
        assert!(blade.close().await.is_ok());
    }
}
