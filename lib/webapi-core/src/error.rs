//! Error types for webapi.

use derive_more::{Display, Error, From};

/// Main error type for webapi operations.
///
/// Transport failures ([`Error::Connection`], [`Error::Tls`], [`Error::Timeout`])
/// are produced by the [`HttpClient`](crate::HttpClient) implementation and are
/// handed back to the caller exactly as the client reported them.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// No decoder is registered for the response content type.
    #[display("unsupported content type: {content_type}")]
    #[from(skip)]
    UnsupportedContentType {
        /// Normalised MIME type of the response.
        content_type: String,
    },

    /// A decoder needs a codec that was not compiled in.
    #[display("{capability} support is not installed; enable the `{feature}` feature of webapi")]
    #[from(skip)]
    MissingOptionalDependency {
        /// Human readable name of the missing capability (e.g. `YAML`).
        capability: &'static str,
        /// Cargo feature providing it.
        feature: &'static str,
    },

    /// The decoder for a content type rejected the response body.
    #[display("failed to decode {content_type} body: {message}")]
    #[from(skip)]
    Decode {
        /// MIME type the decoder was registered for.
        content_type: String,
        /// Codec error message.
        message: String,
    },

    /// An envelope reported an unsuccessful call.
    #[display("request not successful{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    #[from(skip)]
    Unsuccessful {
        /// Message extracted from the envelope, if any.
        #[error(not(source))]
        message: Option<String>,
    },

    /// An envelope key path is absent from the decoded response.
    #[display("envelope path '{path}' not found in response")]
    #[from(skip)]
    EnvelopeMissing {
        /// The dotted key path.
        path: String,
    },

    /// HTTP-level errors (non-2xx status codes on a validated interface).
    #[display("HTTP error {status}: {message}")]
    #[from(skip)]
    Http {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
        /// Response body, if available.
        #[error(not(source))]
        body: Option<bytes::Bytes>,
    },

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Deserialization of decoded data into a typed value failed.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },

    /// Form URL-encoded serialization error.
    #[display("form serialization error: {_0}")]
    #[from]
    FormSerialization(serde_urlencoded::ser::Error),

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unsupported content type error.
    #[must_use]
    pub fn unsupported_content_type(content_type: impl Into<String>) -> Self {
        Self::UnsupportedContentType {
            content_type: content_type.into(),
        }
    }

    /// Create a missing optional dependency error.
    #[must_use]
    pub const fn missing_dependency(capability: &'static str, feature: &'static str) -> Self {
        Self::MissingOptionalDependency {
            capability,
            feature,
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(content_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            content_type: content_type.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error with body.
    #[must_use]
    pub fn http_with_body(status: u16, message: impl Into<String>, body: bytes::Bytes) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: Some(body),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the error was raised by the transport layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Tls(_) | Self::Timeout)
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if no decoder matched the response content type.
    #[must_use]
    pub const fn is_unsupported_content_type(&self) -> bool {
        matches!(self, Self::UnsupportedContentType { .. })
    }

    /// Returns the HTTP status code if this is an HTTP error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if this is a client error (4xx).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|s| (400..500).contains(&s))
    }

    /// Returns `true` if this is a server error (5xx).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|s| (500..600).contains(&s))
    }

    /// Returns the response body if this is an HTTP error with a body.
    #[must_use]
    pub fn body(&self) -> Option<&bytes::Bytes> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::unsupported_content_type("application/x-unknown");
        assert_eq!(
            err.to_string(),
            "unsupported content type: application/x-unknown"
        );

        let err = Error::missing_dependency("YAML", "yaml");
        assert_eq!(
            err.to_string(),
            "YAML support is not installed; enable the `yaml` feature of webapi"
        );

        let err = Error::decode("application/json", "EOF while parsing");
        assert_eq!(
            err.to_string(),
            "failed to decode application/json body: EOF while parsing"
        );

        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");
    }

    #[test]
    fn unsuccessful_display() {
        let err = Error::Unsuccessful { message: None };
        assert_eq!(err.to_string(), "request not successful");

        let err = Error::Unsuccessful {
            message: Some("Goofed.".to_string()),
        };
        assert_eq!(err.to_string(), "request not successful: Goofed.");
    }

    #[test]
    fn error_status() {
        let err = Error::http_with_body(404, "Not Found", bytes::Bytes::new());
        assert_eq!(err.status(), Some(404));
        assert!(err.is_client_error());
        assert!(!err.is_server_error());

        let err = Error::http_with_body(514, "", bytes::Bytes::new());
        assert!(err.is_server_error());

        assert_eq!(Error::Timeout.status(), None);
    }

    #[test]
    fn transport_errors() {
        assert!(Error::Timeout.is_transport());
        assert!(Error::connection("refused").is_transport());
        assert!(Error::tls("bad certificate").is_transport());
        assert!(!Error::unsupported_content_type("text/plain").is_transport());
    }

    #[test]
    fn error_body() {
        let body = bytes::Bytes::from(r#"{"error": "not found"}"#);
        let err = Error::http_with_body(404, "Not Found", body.clone());
        assert_eq!(err.body(), Some(&body));

        assert!(Error::Timeout.body().is_none());
    }
}
