//! Classification Service Client
//!
//! HTTP client for the remote URL classification service.

use std::future::Future;

use super::types::{ScanRequest, ServiceReply, TransportError};
use crate::constants::API_KEY_HEADER;
use crate::logic::config::ScanConfig;
use crate::logic::scan::ScanError;

/// Anything that can answer a classification request.
///
/// Implementations only move bytes; status mapping and schema validation
/// happen in [`super::response::parse_reply`].
pub trait ClassificationService: Send + Sync {
    fn classify(
        &self,
        request: &ScanRequest,
    ) -> impl Future<Output = Result<ServiceReply, TransportError>> + Send;
}

/// reqwest-backed classification client
pub struct HttpClassifier {
    base_url: String,
    predict_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    http_client: reqwest::Client,
}

impl HttpClassifier {
    /// Create new client
    pub fn new(config: &ScanConfig) -> Result<Self, TransportError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| TransportError::Setup(e.to_string()))?;

        Ok(Self {
            base_url: config.service_url.clone(),
            predict_url: config.predict_url(),
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
            http_client,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Probe the service root; returns the banner text on success
    pub async fn health_check(&self) -> Result<String, ScanError> {
        let response = self
            .http_client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| ScanError::from(self.transport_error(e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScanError::from(self.transport_error(e)))?;

        if status.is_success() {
            Ok(body.trim().to_string())
        } else {
            Err(ScanError::Service {
                status: status.as_u16(),
                message: format!("health check failed: {}", body.trim()),
            })
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout_secs)
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

impl ClassificationService for HttpClassifier {
    fn classify(
        &self,
        request: &ScanRequest,
    ) -> impl Future<Output = Result<ServiceReply, TransportError>> + Send {
        let request = request.clone();

        async move {
            log::debug!("POST {} for {}", self.predict_url, request.url());

            let mut builder = self.http_client.post(&self.predict_url).json(&request);
            if let Some(key) = &self.api_key {
                builder = builder.header(API_KEY_HEADER, key);
            }

            let response = builder.send().await.map_err(|e| self.transport_error(e))?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| self.transport_error(e))?;

            if !(200..300).contains(&status) {
                log::warn!("Classification service answered {} for {}", status, request.url());
            }

            Ok(ServiceReply::new(status, body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Captured request: (request head, body)
    type Captured = tokio::sync::oneshot::Receiver<(String, String)>;

    /// Serve exactly one HTTP request with a canned response
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, Captured) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            // read the head
            let head_end = loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                if n == 0 {
                    break buf.len();
                }
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let lower = l.to_ascii_lowercase();
                    lower
                        .strip_prefix("content-length:")
                        .and_then(|v| v.trim().parse::<usize>().ok())
                })
                .unwrap_or(0);

            while buf.len() < head_end + content_length {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let request_body = String::from_utf8_lossy(&buf[head_end..]).to_string();

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send((head, request_body));
        });

        (format!("http://{}", addr), rx)
    }

    #[tokio::test]
    async fn test_posts_url_and_api_key() {
        let (base, captured) = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"prediction":"Legitimate","confidence":0.88,"top_contributions":[]}"#,
        )
        .await;
        let config = ScanConfig::default()
            .with_service_url(base)
            .with_api_key(Some("secret-key".to_string()));
        let client = HttpClassifier::new(&config).unwrap();

        let request = ScanRequest::new("  https://example.com  ").unwrap();
        let reply = client.classify(&request).await.unwrap();

        assert_eq!(reply.status, 200);
        assert!(reply.body.contains("Legitimate"));

        let (head, body) = captured.await.unwrap();
        assert!(head.starts_with("POST /predict "));
        assert!(head.to_ascii_lowercase().contains("x-api-key: secret-key"));
        assert_eq!(body, r#"{"url":"https://example.com"}"#);
    }

    #[tokio::test]
    async fn test_non_success_status_is_a_reply() {
        let (base, _captured) =
            serve_once("HTTP/1.1 429 Too Many Requests", r#"{"error":"rate limited"}"#).await;
        let client = HttpClassifier::new(&ScanConfig::default().with_service_url(base)).unwrap();

        let reply = client
            .classify(&ScanRequest::new("http://a.test").unwrap())
            .await
            .unwrap();

        assert_eq!(reply.status, 429);
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then close it
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ScanConfig::default().with_service_url(format!("http://{}", addr));
        let client = HttpClassifier::new(&config).unwrap();

        let result = client
            .classify(&ScanRequest::new("http://a.test").unwrap())
            .await;

        assert!(matches!(result, Err(TransportError::Network(_))));
    }

    #[tokio::test]
    async fn test_silent_service_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // accept and hold the connection without ever answering
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        });

        let mut config = ScanConfig::default().with_service_url(format!("http://{}", addr));
        config.timeout_secs = 1;
        let client = HttpClassifier::new(&config).unwrap();

        let result = client
            .classify(&ScanRequest::new("http://a.test").unwrap())
            .await;

        assert!(matches!(result, Err(TransportError::Timeout(1))));
    }

    #[tokio::test]
    async fn test_health_check_returns_banner() {
        let (base, captured) =
            serve_once("HTTP/1.1 200 OK", "Phishing Detection API is running!").await;
        let client = HttpClassifier::new(&ScanConfig::default().with_service_url(base)).unwrap();

        let banner = client.health_check().await.unwrap();

        assert_eq!(banner, "Phishing Detection API is running!");
        let (head, _) = captured.await.unwrap();
        assert!(head.starts_with("GET / "));
    }
}
