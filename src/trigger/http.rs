//! HTTP trigger for a cell's `auxTrigger` text
//!
//! Trigger text reads `[METHOD] URL [BODY]`, e.g.
//! `POST http://10.0.0.5/json/state {"on":true}`. Only http and https URLs
//! are sent.

use std::time::Duration;

use derive_more::Display;
use reqwest::{Client, Url};
use tokio::runtime::{Builder, Runtime};

use crate::core::config::PadConfig;
use crate::core::error::{PadError, Result};
use crate::trigger::HttpTrigger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HttpMethod {
    #[display(fmt = "GET")]
    Get,
    #[display(fmt = "POST")]
    Post,
    #[display(fmt = "PUT")]
    Put,
    #[display(fmt = "PATCH")]
    Patch,
    #[display(fmt = "DELETE")]
    Delete,
}

impl HttpMethod {
    fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "PATCH" => Some(Self::Patch),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Parsed trigger text
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequestSpec {
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<String>,
}

impl HttpRequestSpec {
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let (first, rest) = split_token(text);
        if first.is_empty() {
            return Err(PadError::Trigger("empty trigger text".into()));
        }

        let (method, url_text, rest) = match HttpMethod::from_token(first) {
            Some(method) => {
                let (url_text, rest) = split_token(rest);
                (method, url_text, rest)
            }
            None => (HttpMethod::Get, first, rest),
        };

        let url = Url::parse(url_text)
            .map_err(|e| PadError::Trigger(format!("invalid URL '{}': {}", url_text, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(PadError::Trigger(format!(
                "unsupported scheme '{}' in trigger",
                url.scheme()
            )));
        }

        let body = Some(rest.trim()).filter(|b| !b.is_empty()).map(String::from);
        Ok(Self { method, url, body })
    }

    fn body_is_json(&self) -> bool {
        self.body
            .as_deref()
            .is_some_and(|b| serde_json::from_str::<serde_json::Value>(b).is_ok())
    }
}

fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    }
}

/// Sends trigger requests with reqwest on a private current-thread runtime
pub struct ReqwestTrigger {
    client: Client,
    runtime: Runtime,
    timeout: Duration,
}

impl ReqwestTrigger {
    pub fn new(timeout: Duration) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PadError::Trigger(e.to_string()))?;
        Ok(Self {
            client,
            runtime,
            timeout,
        })
    }

    pub fn from_config(config: &PadConfig) -> Result<Self> {
        Self::new(Duration::from_millis(config.http_timeout_ms))
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, spec: &HttpRequestSpec) -> Result<u16> {
        let mut request = self
            .client
            .request(spec.method.as_reqwest(), spec.url.clone());
        if let Some(body) = &spec.body {
            if spec.body_is_json() {
                request = request.header("content-type", "application/json");
            }
            request = request.body(body.clone());
        }

        let response = request
            .send()
            .await
            .map_err(|e| PadError::Trigger(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PadError::Trigger(format!(
                "{} {} returned {}: {}",
                spec.method, spec.url, status, error_text
            )));
        }
        Ok(status.as_u16())
    }
}

impl HttpTrigger for ReqwestTrigger {
    fn execute(&mut self, text: &str) -> Result<()> {
        let spec = HttpRequestSpec::parse(text)?;
        let status = self.runtime.block_on(self.send(&spec))?;
        tracing::info!("{} {} -> {}", spec.method, spec.url, status);
        Ok(())
    }
}

/// Dry-run trigger: parses and records requests without sending them
#[derive(Debug, Default, Clone)]
pub struct LoggedTrigger {
    sent: Vec<HttpRequestSpec>,
}

impl LoggedTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> &[HttpRequestSpec] {
        &self.sent
    }
}

impl HttpTrigger for LoggedTrigger {
    fn execute(&mut self, text: &str) -> Result<()> {
        let spec = HttpRequestSpec::parse(text)?;
        tracing::info!("(dry run) {} {}", spec.method, spec.url);
        self.sent.push(spec);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_url_defaults_to_get() {
        let spec = HttpRequestSpec::parse("http://10.0.0.5/win&T=2").unwrap();
        assert_eq!(spec.method, HttpMethod::Get);
        assert_eq!(spec.url.host_str(), Some("10.0.0.5"));
        assert!(spec.body.is_none());
    }

    #[test]
    fn test_parse_method_and_body() {
        let spec = HttpRequestSpec::parse("post https://wled.local/json/state  {\"on\": true}").unwrap();
        assert_eq!(spec.method, HttpMethod::Post);
        assert_eq!(spec.body.as_deref(), Some("{\"on\": true}"));
        assert!(spec.body_is_json());
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        assert!(matches!(
            HttpRequestSpec::parse("file:///etc/passwd"),
            Err(PadError::Trigger(_))
        ));
        assert!(matches!(
            HttpRequestSpec::parse("GET not a url"),
            Err(PadError::Trigger(_))
        ));
        assert!(HttpRequestSpec::parse("   ").is_err());
    }

    #[test]
    fn test_logged_trigger_records() {
        let mut trigger = LoggedTrigger::new();
        trigger.execute("DELETE http://host/x").unwrap();
        assert!(trigger.execute("ftp://host").is_err());
        assert_eq!(trigger.sent().len(), 1);
        assert_eq!(trigger.sent()[0].method, HttpMethod::Delete);
    }

    #[test]
    fn test_reqwest_trigger_rejects_bad_text_without_sending() {
        let mut trigger = ReqwestTrigger::new(Duration::from_millis(100)).unwrap();
        assert_eq!(trigger.timeout(), Duration::from_millis(100));
        assert!(trigger.execute("gopher://old.net").is_err());
    }
}
