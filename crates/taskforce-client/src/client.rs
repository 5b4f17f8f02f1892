//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use crate::api::{FilesApi, TasksApi, ThreadsApi};
use crate::error::{Error, Result};

/// Default API endpoint.
const DEFAULT_BASE_URL: &str = "https://taskforceai.chat/api/developer";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for streaming requests.
const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_secs(300);

/// Header identifying the SDK to the server.
const SDK_LANGUAGE_HEADER: &str = "x-sdk-language";

/// Hook invoked with the status code and headers of every response received,
/// including error responses.
pub type ResponseHook = Arc<dyn Fn(u16, &HeaderMap) + Send + Sync>;

/// TaskForce AI API client.
///
/// Provides typed access to the task lifecycle endpoints plus the thread and
/// file resources.
///
/// # Example
///
/// ```no_run
/// use taskforce_client::TaskForceClient;
///
/// # async fn example() -> taskforce_client::Result<()> {
/// let client = TaskForceClient::builder()
///     .api_key("secret")
///     .build()?;
///
/// let task_id = client.tasks().submit("summarize the quarterly report", None).await?;
/// let status = client
///     .tasks()
///     .wait_for_completion(&task_id, Default::default())
///     .await?;
/// println!("{:?}", status.result);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TaskForceClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Streaming timeout.
    pub(crate) stream_timeout: Duration,
    /// Default submissions onto the mock backend.
    pub(crate) mock_mode: bool,
    /// Optional response-inspection hook.
    pub(crate) response_hook: Option<ResponseHook>,
}

impl TaskForceClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client against the default endpoint using the
    /// `TASKFORCE_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TASKFORCE_API_KEY").map_err(|_| {
            Error::Config("TASKFORCE_API_KEY environment variable not set".to_string())
        })?;
        Self::builder().api_key(api_key).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub(crate) fn mock_mode(&self) -> bool {
        self.inner.mock_mode
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the task lifecycle API.
    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.clone())
    }

    /// Access the threads API.
    pub fn threads(&self) -> ThreadsApi {
        ThreadsApi::new(self.clone())
    }

    /// Access the files API.
    pub fn files(&self) -> FilesApi {
        FilesApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Send a request and run the response hook over the result.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        if let Some(hook) = &self.inner.response_hook {
            hook(response.status().as_u16(), response.headers());
        }
        Ok(response)
    }

    /// Make a GET request; the server must answer 200.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.get_response(path).await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Api { status });
        }
        self.decode(response).await
    }

    /// Make a GET request with query parameters; the server must answer 200.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .execute(
                self.inner
                    .http
                    .get(url)
                    .query(query)
                    .timeout(self.inner.timeout),
            )
            .await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Api { status });
        }
        self.decode(response).await
    }

    /// Make a GET request, returning the raw response for endpoint-specific
    /// status handling.
    pub(crate) async fn get_response(&self, path: &str) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        self.execute(self.inner.http.get(url).timeout(self.inner.timeout))
            .await
    }

    /// Make a POST request and decode the response; any 2xx is accepted.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let response = self.post_response(path, body).await?;
        if !response.status().is_success() {
            return Err(Error::Api {
                status: response.status().as_u16(),
            });
        }
        self.decode(response).await
    }

    /// Make a POST request, returning the raw response for endpoint-specific
    /// status handling.
    pub(crate) async fn post_response<B>(&self, path: &str, body: &B) -> Result<reqwest::Response>
    where
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        self.execute(
            self.inner
                .http
                .post(url)
                .json(body)
                .timeout(self.inner.timeout),
        )
        .await
    }

    /// POST a multipart form and decode the response; any 2xx is accepted.
    pub(crate) async fn post_multipart<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T> {
        let url = self.url(path)?;
        let response = self
            .execute(
                self.inner
                    .http
                    .post(url)
                    .multipart(form)
                    .timeout(self.inner.timeout),
            )
            .await?;
        if !response.status().is_success() {
            return Err(Error::Api {
                status: response.status().as_u16(),
            });
        }
        self.decode(response).await
    }

    /// Make a DELETE request; any 2xx is accepted.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        let response = self
            .execute(self.inner.http.delete(url).timeout(self.inner.timeout))
            .await?;
        if !response.status().is_success() {
            return Err(Error::Api {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }

    /// Open a long-lived event-stream request; returns the response on 200.
    pub(crate) async fn get_stream(&self, path: &str) -> Result<reqwest::Response> {
        let url = self.url(path)?;
        let response = self
            .execute(
                self.inner
                    .http
                    .get(url)
                    .header(ACCEPT, "text/event-stream")
                    .timeout(self.inner.stream_timeout),
            )
            .await?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(Error::Api { status });
        }
        Ok(response)
    }

    /// Decode a JSON body, classifying parse failures separately from
    /// transport failures.
    pub(crate) async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Builder for creating a [`TaskForceClient`].
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    stream_timeout: Duration,
    user_agent: Option<String>,
    mock_mode: bool,
    response_hook: Option<ResponseHook>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            stream_timeout: DEFAULT_STREAM_TIMEOUT,
            user_agent: None,
            mock_mode: false,
            response_hook: None,
        }
    }

    /// Set the base URL for the API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the streaming request timeout.
    pub fn stream_timeout(mut self, timeout: Duration) -> Self {
        self.stream_timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Route submissions to the mock execution backend unless the caller
    /// overrides it per submission.
    pub fn mock_mode(mut self, enabled: bool) -> Self {
        self.mock_mode = enabled;
        self
    }

    /// Attach a hook observing the status code and headers of every response.
    pub fn response_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(u16, &HeaderMap) + Send + Sync + 'static,
    {
        self.response_hook = Some(Arc::new(hook));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<TaskForceClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        // Build default headers
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(SDK_LANGUAGE_HEADER, HeaderValue::from_static("rust"));

        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| Error::Config("Invalid API key".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("taskforce-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(TaskForceClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                stream_timeout: self.stream_timeout,
                mock_mode: self.mock_mode,
                response_hook: self.response_hook,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("stream_timeout", &self.stream_timeout)
            .field("user_agent", &self.user_agent)
            .field("mock_mode", &self.mock_mode)
            .field("response_hook", &self.response_hook.is_some())
            .finish()
    }
}
