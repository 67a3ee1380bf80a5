//! Hosted database client handle.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ServiceConfig;
use crate::error::{ClientError, ClientResult, DbAuthError};

/// Factory producing a client handle from validated credentials.
///
/// Implementations are invoked at most once per process by [`init_client`].
pub trait ClientFactory {
    type Client;

    fn create(&self, config: &ServiceConfig) -> ClientResult<Self::Client>;
}

/// Build the process-wide client handle.
///
/// The factory is never invoked when credentials failed to resolve.
pub fn init_client<F: ClientFactory>(
    config: Result<ServiceConfig, DbAuthError>,
    factory: &F,
) -> ClientResult<(ServiceConfig, F::Client)> {
    let config = config?;
    let client = factory.create(&config)?;
    Ok((config, client))
}

/// Factory for [`ServiceClient`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SupabaseFactory;

impl ClientFactory for SupabaseFactory {
    type Client = ServiceClient;

    fn create(&self, config: &ServiceConfig) -> ClientResult<ServiceClient> {
        ServiceClient::new(config)
    }
}

/// Authenticated handle to the remote service.
///
/// Cloning is cheap and shares the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base: Url,
}

impl ServiceClient {
    /// Create a new client handle.
    ///
    /// # Arguments
    /// * `config` - Validated service URL and key
    pub fn new(config: &ServiceConfig) -> ClientResult<Self> {
        Self::build(config, Client::builder())
    }

    fn build(config: &ServiceConfig, builder: reqwest::ClientBuilder) -> ClientResult<Self> {
        let base = parse_base_url(config.url())?;

        let mut headers = HeaderMap::new();
        let mut api_key =
            HeaderValue::from_str(config.key()).map_err(|_| ClientError::InvalidKey)?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.key()))
            .map_err(|_| ClientError::InvalidKey)?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = builder.default_headers(headers).build()?;

        info!("Initialized service client for {}", base);

        Ok(Self { client, base })
    }

    /// Base URL of the service, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// REST endpoint for a table.
    ///
    /// The name always lands in a single path segment; `/`, `?` and `#` in it
    /// are percent-encoded.
    pub fn rest_endpoint(&self, table: &str) -> ClientResult<Url> {
        self.endpoint(&["rest", "v1"], table)
    }

    /// Auth endpoint for a name such as `health` or `token`.
    pub fn auth_endpoint(&self, name: &str) -> ClientResult<Url> {
        self.endpoint(&["auth", "v1"], name)
    }

    fn endpoint(&self, prefix: &[&str], name: &str) -> ClientResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl {
                url: self.base.to_string(),
                reason: "cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(prefix)
            .push(name.trim_start_matches('/'));
        Ok(url)
    }

    /// Select rows from a table.
    ///
    /// # Arguments
    /// * `table` - Table or view name
    /// * `columns` - PostgREST column list, e.g. `*` or `id,name`
    /// * `limit` - Optional row limit
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        columns: &str,
        limit: Option<u32>,
    ) -> ClientResult<Vec<T>> {
        let mut url = self.rest_endpoint(table)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", columns);
            if let Some(limit) = limit {
                query.append_pair("limit", &limit.to_string());
            }
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read error body from {}: {}", table, e);
                    format!("<unreadable body: {}>", e)
                }
            };
            return Err(ClientError::Status { status, body });
        }

        let rows: Vec<T> = response.json().await?;
        debug!("Selected {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    /// Check whether the auth service reports itself healthy.
    pub async fn health(&self) -> ClientResult<bool> {
        let url = self.auth_endpoint("health")?;
        let response = self.client.get(url).send().await?;
        debug!("Auth health responded with {}", response.status());
        Ok(response.status().is_success())
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme {}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn config(url: &str) -> ServiceConfig {
        ServiceConfig::new(url, "anon-key").unwrap()
    }

    /// Answer exactly one request with a canned raw HTTP response.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    fn local_client(url: &str) -> ServiceClient {
        ServiceClient::build(&config(url), Client::builder().no_proxy()).unwrap()
    }

    #[test]
    fn test_endpoints() {
        let client = ServiceClient::new(&config("https://project.supabase.co/")).unwrap();
        assert_eq!(client.base_url(), "https://project.supabase.co");
        assert_eq!(
            client.rest_endpoint("profiles").unwrap().as_str(),
            "https://project.supabase.co/rest/v1/profiles"
        );
        assert_eq!(
            client.auth_endpoint("/health").unwrap().as_str(),
            "https://project.supabase.co/auth/v1/health"
        );
    }

    #[test]
    fn test_endpoint_names_stay_in_one_segment() {
        let client = ServiceClient::new(&config("https://project.supabase.co")).unwrap();

        let url = client.rest_endpoint("t?x=1").unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.path(), "/rest/v1/t%3Fx=1");

        let url = client.rest_endpoint("../../auth/v1/token").unwrap();
        assert!(url.path().starts_with("/rest/v1/"));
        assert_eq!(url.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn test_endpoints_keep_base_path() {
        let client = ServiceClient::new(&config("https://gateway.example/supabase/")).unwrap();
        assert_eq!(client.base_url(), "https://gateway.example/supabase");
        assert_eq!(
            client.rest_endpoint("profiles").unwrap().as_str(),
            "https://gateway.example/supabase/rest/v1/profiles"
        );
    }

    #[test]
    fn test_rejects_bad_url() {
        assert!(matches!(
            ServiceClient::new(&config("not a url")),
            Err(ClientError::InvalidUrl { .. })
        ));
        assert!(matches!(
            ServiceClient::new(&config("ftp://project.supabase.co")),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_rejects_key_with_control_characters() {
        let config = ServiceConfig::new("https://project.supabase.co", "bad\nkey").unwrap();
        assert!(matches!(
            ServiceClient::new(&config),
            Err(ClientError::InvalidKey)
        ));
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_service() {
        let client = ServiceClient::new(&config("http://127.0.0.1:1")).unwrap();
        assert!(!matches!(client.health().await, Ok(true)));
    }

    #[tokio::test]
    async fn test_select_parses_rows() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 19\r\n\r\n[{\"id\":1},{\"id\":2}]",
        )
        .await;
        let rows: Vec<serde_json::Value> =
            local_client(&url).select("items", "id", Some(2)).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["id"], 2);
    }

    #[tokio::test]
    async fn test_select_keeps_error_body() {
        let url = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 4\r\n\r\nnope").await;
        match local_client(&url).select::<serde_json::Value>("missing", "*", None).await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(body, "nope");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_select_reports_unreadable_error_body() {
        // Declares more bytes than it sends, then closes the connection.
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\nshort",
        )
        .await;
        match local_client(&url).select::<serde_json::Value>("items", "*", None).await {
            Err(ClientError::Status { status, body }) => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                assert!(body.starts_with("<unreadable body:"), "body: {}", body);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
