use crate::api::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

const USER_AGENT: &str = "kodi.tv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Everything needed to issue a single backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub scheme: &'static str,
    pub host: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub payload: Option<Value>,
    pub headers: Vec<(&'static str, String)>,
}

impl Request {
    pub fn new(method: Method, host: &'static str, path: impl Into<String>) -> Self {
        Self {
            method,
            scheme: "https",
            host,
            path: path.into(),
            query: Vec::new(),
            payload: None,
            headers: Vec::new(),
        }
    }

    pub fn get(host: &'static str, path: impl Into<String>) -> Self {
        Self::new(Method::Get, host, path)
    }

    pub fn post(host: &'static str, path: impl Into<String>) -> Self {
        Self::new(Method::Post, host, path)
    }

    pub fn delete(host: &'static str, path: impl Into<String>) -> Self {
        Self::new(Method::Delete, host, path)
    }

    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme, self.host, self.path)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Executes request descriptors. Connection handling, TLS and body decoding
/// belong to the implementation; callers only see status and JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let url = request.url();
        tracing::debug!(method = %request.method, %url, "Sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        if let Some(payload) = &request.payload {
            builder = builder.json(payload);
        }

        let res = builder.send().await?;
        let status = res.status().as_u16();
        let text = res.text().await?;
        tracing::debug!(status, bytes = text.len(), "Received response");

        // Logout and ticket deletion answer with an empty body.
        let body = match text.trim() {
            "" => Value::Null,
            raw => serde_json::from_str(raw)?,
        };

        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_url_and_collects_parts() {
        let req = Request::post("ottapi.prod.telia.net", "/web/se/logingateway/rest/v1/login")
            .query("country", "SE")
            .header("tv-client-boot-id", "boot")
            .payload(json!({ "deviceType": "WEB" }));

        assert_eq!(req.method, Method::Post);
        assert_eq!(
            req.url(),
            "https://ottapi.prod.telia.net/web/se/logingateway/rest/v1/login"
        );
        assert_eq!(req.query_value("country"), Some("SE"));
        assert_eq!(req.header_value("TV-Client-Boot-Id"), Some("boot"));
        assert_eq!(req.payload, Some(json!({ "deviceType": "WEB" })));
    }

    #[test]
    fn only_200_counts_as_ok() {
        let ok = Response { status: 200, body: Value::Null };
        let created = Response { status: 201, body: Value::Null };
        assert!(ok.is_ok());
        assert!(!created.is_ok());
    }
}
