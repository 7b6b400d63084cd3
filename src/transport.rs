//! HTTP transport used by the unAPI client.
//!
//! The client only needs a single blocking `GET` per call. [`Transport`]
//! abstracts it so that clients can be tested without network access;
//! [`HttpTransport`] implements it with `reqwest` (feature `http`).

use crate::error::Result;
use std::fmt;

/// `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("unapi-rs/", env!("CARGO_PKG_VERSION"));

/// Status, final URL and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// URL the response was served from
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is `200 OK`.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// A blocking HTTP `GET`.
pub trait Transport: fmt::Debug {
    /// Fetch `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained. Non-200 responses
    /// are not errors at this level.
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

#[cfg(feature = "http")]
pub use self::http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::{HttpResponse, Transport, USER_AGENT};
    use crate::error::{Result, UnapiError};

    /// [`Transport`] backed by a blocking `reqwest` client.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::blocking::Client,
    }

    impl HttpTransport {
        /// Create a transport sending [`USER_AGENT`].
        ///
        /// # Errors
        ///
        /// Returns an error if the HTTP client cannot be initialized.
        pub fn new() -> Result<Self> {
            let client = reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .build()
                .map_err(|e| UnapiError::Http(e.to_string()))?;
            Ok(HttpTransport { client })
        }
    }

    impl Transport for HttpTransport {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            let response = self
                .client
                .get(url)
                .send()
                .map_err(|e| UnapiError::Http(e.to_string()))?;
            let status = response.status().as_u16();
            let url = response.url().to_string();
            let body = response
                .text()
                .map_err(|e| UnapiError::Http(e.to_string()))?;
            Ok(HttpResponse { url, status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("unapi-rs/"));
        assert!(USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_is_ok() {
        let mut response = HttpResponse {
            url: "http://localhost".to_string(),
            status: 200,
            body: String::new(),
        };
        assert!(response.is_ok());
        response.status = 404;
        assert!(!response.is_ok());
    }
}
