use serde_json::Value;

/// Minimal HTTP request representation used by the backend adapters.
///
/// Keeping the adapters generic over [`SendRequest`] allows tests to
/// script responses and inspect the requests that would go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    #[must_use]
    pub fn get(url: &str) -> Self {
        Self {
            method: Method::Get,
            url: url.to_string(),
            headers: vec![],
            body: None,
        }
    }

    #[must_use]
    pub fn post(url: &str, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.to_string(),
            headers: vec![],
            body: Some(body),
        }
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("sending request failed: {0}")]
pub struct SendError(pub String);

#[allow(async_fn_in_trait)]
pub trait SendRequest {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError>;
}

#[derive(Default, Clone)]
pub struct ReqwestSendRequest {
    client: reqwest::Client,
}

impl SendRequest for ReqwestSendRequest {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SendError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|err| SendError(err.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| SendError(err.to_string()))?;
        Ok(HttpResponse { status, body })
    }
}
