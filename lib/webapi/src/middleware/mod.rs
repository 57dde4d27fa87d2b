//! Tower middleware for [`HyperClient`](crate::HyperClient).
//!
//! Every layer here works on `Request<Bytes>` / `Response<Bytes>`, so it can
//! be stacked with [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer)
//! or through the helper methods on the builder:
//!
//! | Layer | Builder helper |
//! |-------|----------------|
//! | [`LoggingLayer`] | `.with_logging()`, `.with_debug_logging()`, `.with_defaults()` |
//! | [`RetryLayer`] + [`RetryPolicy`] | `.with_retry(n)` |
//! | [`DefaultHeadersLayer`] | `.with_header(name, value)` |
//! | [`ConcurrencyLimitLayer`] | `.with_concurrency_limit(n)` |
//!
//! # Example
//!
//! ```no_run
//! use webapi::HyperClient;
//! use webapi::middleware::DefaultHeadersLayer;
//!
//! let client = HyperClient::builder()
//!     .layer(DefaultHeadersLayer::new().header("X-Api-Version", "2"))
//!     .with_retry(3)
//!     .build();
//! # drop(client);
//! ```

mod default_headers;
mod logging;
mod retry;

pub use default_headers::{DefaultHeaders, DefaultHeadersLayer};
pub use logging::{LogLevel, Logging, LoggingLayer};
pub use retry::RetryPolicy;

pub use tower::{Layer, ServiceBuilder};

pub use tower::limit::ConcurrencyLimitLayer;
pub use tower::retry::RetryLayer;
