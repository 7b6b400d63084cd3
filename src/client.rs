//! unAPI client.
//!
//! A [`Client`] talks to one endpoint, database and identifier type. Records
//! are addressed as `{url}/?id={db}:{var}:{idn}&format={schema}`; the schema
//! must be one of those listed by the endpoint, and its MIME type hint
//! decides how the response body is decoded.
//!
//! # Examples
//!
//! ```ignore
//! use unapi::client::{Client, Response};
//! use unapi::config::ClientConfig;
//!
//! let client = Client::new(ClientConfig::default())?;
//! if let Response::Json(value) = client.request("1234567890", "picajson")? {
//!     println!("{value}");
//! }
//! ```

use crate::config::ClientConfig;
use crate::error::{Result, UnapiError};
use crate::formats::{parse_formats, FormatInfo, ResponseKind};
use crate::schema::{Encoding, SchemaRecord};
use crate::transport::{HttpResponse, Transport};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, error, info};

/// Decoded body of a record response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Body of a JSON schema
    Json(Value),
    /// Body of an XML schema
    Xml(String),
    /// Body of any other schema
    Text(String),
}

/// Client for one unAPI endpoint.
#[derive(Debug, Clone)]
pub struct Client<T: Transport> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "http")]
impl Client<crate::transport::HttpTransport> {
    /// Create a client using the HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(
            config,
            crate::transport::HttpTransport::new()?,
        ))
    }
}

impl<T: Transport> Client<T> {
    /// Create a client using the given transport.
    #[must_use]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Client { config, transport }
    }

    /// Connection settings.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The transport requests are sent through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Schemas served by the endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list cannot be parsed.
    pub fn formats(&self) -> Result<IndexMap<String, FormatInfo>> {
        let response = self.fetch(&self.config.url)?;
        parse_formats(&response.body)
    }

    /// URL of record `idn` in `schema`.
    #[must_use]
    pub fn address(&self, idn: &str, schema: &str) -> String {
        format!(
            "{}/?id={}:{}:{}&format={}",
            self.config.url, self.config.db, self.config.var, idn, schema
        )
    }

    /// Fetch record `idn` in `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`UnapiError::UnsupportedSchema`] if the endpoint does not list
    /// `schema`, and an error if a request fails or a JSON body is invalid.
    pub fn request(&self, idn: &str, schema: &str) -> Result<Response> {
        info!(
            "Request record {idn} in schema '{schema}' from DB '{}'.",
            self.config.db
        );
        let formats = self.formats()?;
        let Some(format) = formats.get(schema) else {
            error!("Schema '{schema}' is unsupported!");
            return Err(UnapiError::UnsupportedSchema(schema.to_string()));
        };

        let response = self.fetch(&self.address(idn, schema))?;
        match format.response_kind() {
            ResponseKind::Json => Ok(Response::Json(serde_json::from_str(&response.body)?)),
            ResponseKind::Xml => Ok(Response::Xml(response.body)),
            ResponseKind::Text => Ok(Response::Text(response.body)),
        }
    }

    /// Fetch record `idn` and wrap it in the accessor for `encoding`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a record.
    pub fn request_record(&self, idn: &str, encoding: Encoding) -> Result<SchemaRecord> {
        match self.request(idn, encoding.schema_name())? {
            Response::Json(value) => SchemaRecord::from_value(encoding, value),
            Response::Xml(_) | Response::Text(_) => Err(UnapiError::InvalidRecord(format!(
                "Schema '{encoding}' is not served as JSON"
            ))),
        }
    }

    fn fetch(&self, url: &str) -> Result<HttpResponse> {
        debug!(url, "GET");
        let response = self.transport.get(url).map_err(|e| {
            error!("HTTP request to {url} failed!");
            error!("Reason: {e}");
            e
        })?;
        if !response.is_ok() {
            error!("HTTP request to {} failed!", response.url);
            error!("HTTP response code is {}.", response.status);
            return Err(UnapiError::Status {
                url: response.url,
                status: response.status,
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct StaticTransport {
        pages: HashMap<String, (u16, String)>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticTransport {
        fn page(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages
                .insert(url.to_string(), (status, body.to_string()));
            self
        }
    }

    impl Transport for StaticTransport {
        fn get(&self, url: &str) -> Result<HttpResponse> {
            self.requested.lock().unwrap().push(url.to_string());
            let (status, body) = self
                .pages
                .get(url)
                .cloned()
                .ok_or_else(|| UnapiError::Http(format!("connection refused: {url}")))?;
            Ok(HttpResponse {
                url: url.to_string(),
                status,
                body,
            })
        }
    }

    const FORMATS: &str = r#"<formats>
  <format name="picajson" type="application/json"/>
  <format name="marcxml" type="application/xml"/>
  <format name="pp" type="text/plain"/>
</formats>"#;

    fn client(transport: StaticTransport) -> Client<StaticTransport> {
        let config = ClientConfig::default().with_url("http://unapi.test");
        Client::with_transport(config, transport.page("http://unapi.test", 200, FORMATS))
    }

    #[test]
    fn test_address() {
        let client = client(StaticTransport::default());
        assert_eq!(
            client.address("123", "picajson"),
            "http://unapi.test/?id=swb:ppn:123&format=picajson"
        );
    }

    #[test]
    fn test_request_json() {
        let client = client(StaticTransport::default().page(
            "http://unapi.test/?id=swb:ppn:123&format=picajson",
            200,
            r#"[["003@", null, "0", "123"]]"#,
        ));
        let response = client.request("123", "picajson").unwrap();
        assert!(matches!(response, Response::Json(Value::Array(ref rows)) if rows.len() == 1));
        assert_eq!(client.transport.requested.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_request_xml_and_text_are_kept_raw() {
        let client = client(
            StaticTransport::default()
                .page(
                    "http://unapi.test/?id=swb:ppn:123&format=marcxml",
                    200,
                    "<record/>",
                )
                .page("http://unapi.test/?id=swb:ppn:123&format=pp", 200, "003@ 123"),
        );
        assert_eq!(
            client.request("123", "marcxml").unwrap(),
            Response::Xml("<record/>".to_string())
        );
        assert_eq!(
            client.request("123", "pp").unwrap(),
            Response::Text("003@ 123".to_string())
        );
    }

    #[test]
    fn test_unsupported_schema_is_not_fetched() {
        let client = client(StaticTransport::default());
        let err = client.request("123", "dc").unwrap_err();
        assert!(matches!(err, UnapiError::UnsupportedSchema(ref s) if s == "dc"));
        assert_eq!(client.transport.requested.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_status_error() {
        let client = client(StaticTransport::default().page(
            "http://unapi.test/?id=swb:ppn:404&format=picajson",
            404,
            "",
        ));
        let err = client.request("404", "picajson").unwrap_err();
        assert!(matches!(err, UnapiError::Status { status: 404, .. }));
    }

    #[test]
    fn test_request_record() {
        let client = client(StaticTransport::default().page(
            "http://unapi.test/?id=swb:ppn:123&format=picajson",
            200,
            r#"[["003@", null, "0", "123"]]"#,
        ));
        let record = client.request_record("123", Encoding::PicaJson).unwrap();
        assert_eq!(record.ppn(), Some("123".to_string()));
    }
}
