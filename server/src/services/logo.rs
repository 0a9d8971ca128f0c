//! Logo download over HTTP.

use std::time::Duration;

use qr_engine::{EngineError, LogoFetcher};
use reqwest::blocking::Client;

/// Blocking HTTP(S) logo fetcher. A client is built per fetch so the
/// fetcher can be constructed inside the async runtime and only used from
/// blocking threads.
#[derive(Debug, Clone, Default)]
pub struct HttpLogoFetcher {
    timeout: Option<Duration>,
}

impl HttpLogoFetcher {
    /// `timeout_secs == 0` means no timeout.
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        }
    }

}

impl LogoFetcher for HttpLogoFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, EngineError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| EngineError::FetchFailed(e.to_string()))?;

        let resp = client
            .get(url)
            .send()
            .map_err(|e| EngineError::FetchFailed(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(url, status = status.as_u16(), "Logo fetch returned error status");
            return Err(EngineError::FetchFailed(format!("{url}: HTTP {status}")));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| EngineError::FetchFailed(format!("{url}: {e}")))?;
        tracing::debug!(url, bytes = bytes.len(), "Fetched logo");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// Answer exactly one HTTP request with `status` and `body`.
    fn serve_once(status: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });
        format!("http://{addr}/logo.png")
    }

    #[test]
    fn zero_timeout_means_none() {
        assert_eq!(HttpLogoFetcher::new(0).timeout, None);
        assert_eq!(HttpLogoFetcher::new(3).timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn success_returns_body() {
        let url = serve_once("200 OK", b"logo-bytes".to_vec());
        let bytes = HttpLogoFetcher::new(5).fetch(&url).unwrap();
        assert_eq!(bytes, b"logo-bytes");
    }

    #[test]
    fn not_found_is_fetch_failure() {
        let url = serve_once("404 Not Found", Vec::new());
        let err = HttpLogoFetcher::new(5).fetch(&url).unwrap_err();
        match err {
            EngineError::FetchFailed(msg) => assert!(msg.contains("404"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_url_is_fetch_failure() {
        let err = HttpLogoFetcher::new(1).fetch("not a url").unwrap_err();
        assert!(matches!(err, EngineError::FetchFailed(_)));
    }
}
