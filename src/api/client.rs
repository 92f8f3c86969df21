use crate::api::models::{
    GenerateRequest, GenerateResponse, HealthStatus, ProgressStatus, Style, UploadResponse,
};
use crate::error::ApiError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("storyboard-client/", env!("CARGO_PKG_VERSION"));

/// Per-call overrides merged over the client's defaults
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<String>,
    /// Replace default headers with the same name
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// POST with `payload` serialized as the JSON body
    pub fn json<T: Serialize + ?Sized>(payload: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method: Method::POST,
            body: Some(serde_json::to_string(payload)?),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// HTTP client for the storyboard service
#[derive(Debug, Clone)]
pub struct StoryboardClient {
    client: Client,
    pub base_url: String,
    timeout_secs: u64,
}

impl StoryboardClient {
    // Create a client with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ApiError::new(
                    "client_init",
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(StoryboardClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Absolute URLs pass through; anything else is a path on `base_url`
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub fn build_request(
        &self,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<RequestBuilder, ApiError> {
        let mut headers = Self::default_headers();
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::new(endpoint, format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ApiError::new(endpoint, format!("Invalid header value: {}", e)))?;
            headers.insert(name, value);
        }

        let mut request = self
            .client
            .request(options.method.clone(), self.resolve_url(endpoint))
            .headers(headers);

        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        Ok(request)
    }

    /// Issue a request and return the decoded JSON body.
    ///
    /// Every failure is logged before it is returned.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let request = self
            .build_request(endpoint, &options)
            .map_err(Self::log_failure)?;
        self.send(endpoint, request).await
    }

    /// Like [`request`](Self::request) but decodes into `T`
    pub async fn request_as<T>(&self, endpoint: &str, options: RequestOptions) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let value = self.request(endpoint, options).await?;
        serde_json::from_value(value)
            .map_err(|e| Self::log_failure(ApiError::new(endpoint, e.to_string())))
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(endpoint, RequestOptions::method(Method::GET))
            .await
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        payload: &T,
    ) -> Result<Value, ApiError> {
        let options = RequestOptions::json(payload)
            .map_err(|e| Self::log_failure(ApiError::new(endpoint, e.to_string())))?;
        self.request(endpoint, options).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request_as(endpoint, RequestOptions::method(Method::GET))
            .await
    }

    pub async fn post_json<P, T>(&self, endpoint: &str, payload: &P) -> Result<T, ApiError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::json(payload)
            .map_err(|e| Self::log_failure(ApiError::new(endpoint, e.to_string())))?;
        self.request_as(endpoint, options).await
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.get_json("/health").await
    }

    /// Send a screenplay as the multipart `file` field.
    ///
    /// No client-side checks happen here; see
    /// [`validate_file`](crate::utils::validation::validate_file).
    pub async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse, ApiError> {
        const ENDPOINT: &str = "/upload";

        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let request = self.client.post(self.resolve_url(ENDPOINT)).multipart(form);

        let value = self.send(ENDPOINT, request).await?;
        serde_json::from_value(value)
            .map_err(|e| Self::log_failure(ApiError::new(ENDPOINT, e.to_string())))
    }

    pub async fn start_generation(
        &self,
        project_id: &str,
        style: Style,
    ) -> Result<GenerateResponse, ApiError> {
        let payload = GenerateRequest {
            project_id: project_id.to_string(),
            style,
        };
        self.post_json("/generate", &payload).await
    }

    pub fn status_endpoint(project_id: &str) -> String {
        format!("/status/{}", project_id)
    }

    pub async fn status(&self, project_id: &str) -> Result<ProgressStatus, ApiError> {
        self.get_json(&Self::status_endpoint(project_id)).await
    }

    async fn send(&self, endpoint: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| Self::log_failure(ApiError::new(endpoint, e.to_string())))?;

        self.handle_response(response, endpoint)
            .await
            .map_err(Self::log_failure)
    }

    pub async fn handle_response(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<Value, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::new(endpoint, e.to_string()).with_status(status.as_u16()))?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&body)
                .map_err(|e| ApiError::new(endpoint, e.to_string()).with_status(status.as_u16()))
        } else {
            let parsed = serde_json::from_str::<Value>(&body).ok();
            let message = parsed
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            let code = parsed.as_ref().and_then(error_code);

            Err(ApiError::new(endpoint, message)
                .with_status(status.as_u16())
                .with_code(code))
        }
    }

    fn log_failure(error: ApiError) -> ApiError {
        match error.status {
            Some(status) => log::error!(
                "API Error: {} (HTTP {} from {})",
                error.message,
                status,
                error.endpoint
            ),
            None => log::error!("API Error: {} ({})", error.message, error.endpoint),
        }
        error
    }
}

/// `error` wins over `message`; empty strings count as absent
fn error_message(body: &Value) -> Option<String> {
    ["error", "message"].iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

fn error_code(body: &Value) -> Option<String> {
    match body.get("code")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
