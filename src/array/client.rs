//! FlashArray REST 1.x client.
//!
//! A session is opened lazily on the first query by posting the API token to
//! `auth/session`; the session cookie is kept by the client's cookie store and
//! released again by [`ArrayApi::close`].

use serde::de::DeserializeOwned;
use serde_json::Value;
use reqwest::Url;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::records::{AlertRecord, ArraySpace, HardwareRecord, PodMirrorStats, PodRecord, VolumeSpace};
use super::{ArrayApi, SourceError};

pub const DEFAULT_API_VERSION: &str = "1.16";

/// Connection settings for [`FlashArrayClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_version: String,
    /// Verify the array's TLS certificate. Arrays usually ship self-signed
    /// certificates, so this is off unless configured.
    pub verify_tls: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            verify_tls: false,
        }
    }
}

/// REST client bound to one array and one API token.
pub struct FlashArrayClient {
    client: reqwest::Client,
    base_url: Url,
    api_token: String,
    session: OnceCell<()>,
}

impl FlashArrayClient {
    /// Creates a client for `endpoint` (host name, IP address or full URL).
    pub fn new(endpoint: &str, api_token: &str, options: &ClientOptions) -> Result<Self, SourceError> {
        Ok(Self {
            client: http_client(options)?,
            base_url: parse_base_url(&api_base_url(endpoint, &options.api_version))?,
            api_token: api_token.to_string(),
            session: OnceCell::new(),
        })
    }

    fn url(&self, segments: &[&str]) -> Result<Url, SourceError> {
        join_segments(&self.base_url, segments)
    }

    async fn login(&self) -> Result<(), SourceError> {
        debug!("Opening REST session at {}", self.base_url);
        let response = self
            .client
            .post(self.url(&["auth", "session"])?)
            .json(&serde_json::json!({ "api_token": self.api_token }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn ensure_session(&self) -> Result<(), SourceError> {
        self.session.get_or_try_init(|| self.login()).await?;
        Ok(())
    }

    async fn get(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Value, SourceError> {
        self.ensure_session().await?;
        let url = self.url(segments)?;
        debug!("GET {} {:?}", url.path(), query);
        let response = self.client.get(url).query(query).send().await?;
        let response = check_status(response).await?;
        Ok(response.json::<Value>().await?)
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, SourceError> {
        let value = self.get(segments, query).await?;
        decode(&segments.join("/"), into_list(value))
    }

    async fn get_record<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Option<T>, SourceError> {
        let value = self.get(segments, query).await?;
        match first_record(value) {
            Some(record) => decode(&segments.join("/"), record).map(Some),
            None => Ok(None),
        }
    }
}

impl ArrayApi for FlashArrayClient {
    async fn list_open_alerts(&self) -> Result<Vec<AlertRecord>, SourceError> {
        self.get_list(&["message"], &[("open", "true")]).await
    }

    async fn array_space(&self) -> Result<Option<ArraySpace>, SourceError> {
        self.get_record(&["array"], &[("space", "true")]).await
    }

    async fn volume_space(&self, volume: &str) -> Result<Option<VolumeSpace>, SourceError> {
        self.get_record(&["volume", volume], &[("space", "true")]).await
    }

    async fn hardware(&self, component: Option<&str>) -> Result<Vec<HardwareRecord>, SourceError> {
        match component {
            Some(name) => self.get_list(&["hardware", name], &[]).await,
            None => self.get_list(&["hardware"], &[]).await,
        }
    }

    async fn pods(&self, pod: Option<&str>) -> Result<Vec<PodRecord>, SourceError> {
        match pod {
            Some(name) => self.get_list(&["pod", name], &[]).await,
            None => self.get_list(&["pod"], &[]).await,
        }
    }

    async fn pod_mirror_stats(&self, pod: Option<&str>) -> Result<Vec<PodMirrorStats>, SourceError> {
        let query = [("action", "monitor"), ("mirrored", "true")];
        match pod {
            Some(name) => self.get_list(&["pod", name], &query).await,
            None => self.get_list(&["pod"], &query).await,
        }
    }

    async fn close(&self) -> Result<(), SourceError> {
        if self.session.get().is_none() {
            return Ok(());
        }
        let response = self
            .client
            .delete(self.url(&["auth", "session"])?)
            .send()
            .await?;
        if let Err(e) = check_status(response).await {
            warn!("Failed to invalidate REST session: {}", e);
            return Err(e);
        }
        debug!("REST session closed");
        Ok(())
    }
}

/// HTTP client shared by the array and blade clients.
pub(super) fn http_client(options: &ClientOptions) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .cookie_store(true)
        .danger_accept_invalid_certs(!options.verify_tls)
        .user_agent(concat!("purefa-check/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

pub(super) fn parse_base_url(url: &str) -> Result<Url, SourceError> {
    Url::parse(url).map_err(|e| SourceError::Endpoint(format!("{url}: {e}")))
}

/// Appends `segments` to `base`, percent-encoding each one so a name can
/// never add path components of its own.
pub(super) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, SourceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| SourceError::Endpoint(format!("{base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Builds `https://<endpoint>/api/<version>` unless a scheme is given.
fn api_base_url(endpoint: &str, api_version: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        format!("{endpoint}/api/{api_version}")
    } else {
        format!("https://{endpoint}/api/{api_version}")
    }
}

pub(super) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, SourceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SourceError::Status {
        status: status.as_u16(),
        body,
    })
}

pub(super) fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> Result<T, SourceError> {
    serde_json::from_value(value).map_err(|e| SourceError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

/// Wraps a single object into a list; `null` becomes an empty list.
fn into_list(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        Value::Null => Value::Array(Vec::new()),
        Value::Object(ref map) if map.is_empty() => Value::Array(Vec::new()),
        other => Value::Array(vec![other]),
    }
}

/// First record of a response, `None` for an empty object or list.
fn first_record(value: Value) -> Option<Value> {
    match value {
        Value::Array(items) => items.into_iter().next().and_then(first_record),
        Value::Object(map) if map.is_empty() => None,
        Value::Null => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_api_base_url() {
        assert_eq!(
            api_base_url("fa01.example.com", "1.16"),
            "https://fa01.example.com/api/1.16"
        );
        assert_eq!(
            api_base_url("http://127.0.0.1:8080/", "1.17"),
            "http://127.0.0.1:8080/api/1.17"
        );
    }

    #[test]
    fn test_names_are_single_segments() {
        let base = parse_base_url("http://127.0.0.1:8080/api/1.16").unwrap();
        assert_eq!(
            join_segments(&base, &["volume", "a/b c?x#y"]).unwrap().path(),
            "/api/1.16/volume/a%2Fb%20c%3Fx%23y"
        );
        assert_eq!(
            join_segments(&base, &["auth", "session"]).unwrap().as_str(),
            "http://127.0.0.1:8080/api/1.16/auth/session"
        );
    }

    #[test]
    fn test_first_record() {
        assert_eq!(first_record(json!([])), None);
        assert_eq!(first_record(json!({})), None);
        assert_eq!(first_record(json!([{}])), None);
        assert_eq!(
            first_record(json!([{"total": 1}, {"total": 2}])),
            Some(json!({"total": 1}))
        );
    }

    #[test]
    fn test_into_list() {
        assert_eq!(into_list(json!({"name": "a"})), json!([{"name": "a"}]));
        assert_eq!(into_list(json!(null)), json!([]));
        assert_eq!(into_list(json!([1, 2])), json!([1, 2]));
    }
}
