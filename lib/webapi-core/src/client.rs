//! The HTTP transport seam.
//!
//! A `webapi::Interface` never talks to the network itself: it prepares a
//! [`Request`] and hands it to an [`HttpClient`]. The `webapi` crate ships a hyper-based implementation;
//! tests and custom stacks can provide their own.

use std::future::Future;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations own connection pooling, TLS and timeouts. Errors they
/// return reach the caller unchanged.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use webapi_core::{HttpClient, Request, Response, Result};
///
/// /// Answers every request with an empty JSON object.
/// struct Canned;
///
/// impl HttpClient for Canned {
///     async fn execute(&self, _request: Request<Bytes>) -> Result<Response<Bytes>> {
///         let headers = [("content-type".to_string(), "application/json".to_string())];
///         Ok(Response::new(200, headers.into(), Bytes::from_static(b"{}")))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid request
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}
