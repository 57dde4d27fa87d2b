//! Core types for the webapi HTTP API client.
//!
//! This crate provides the transport-agnostic pieces used by `webapi`:
//! - [`Method`] - HTTP method enum
//! - [`Request`], [`RequestBuilder`] and [`Params`] - outgoing requests
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] - the transport seam
//! - [`DecoderRegistry`], [`Decoder`] and [`Decoded`] - content-type driven body decoding
//! - [`Element`] - owned XML/HTML element tree
//! - [`Envelope`] - status/payload unwrapping for enveloped APIs
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)
//!
//! # Cargo features
//!
//! | Feature | Default | Decoder |
//! |---------|---------|---------|
//! | `xml` | yes | `application/xml`, `text/xml` |
//! | `msgpack` | yes | `application/msgpack` and aliases |
//! | `yaml` | no | `application/yaml` and aliases |
//! | `html` | no | `text/html`, `application/xhtml+xml` |

mod client;
pub mod codec;
mod decoded;
mod envelope;
mod error;
mod method;
mod mime;
mod params;
pub mod prelude;
mod registry;
mod request;
mod response;

pub use client::HttpClient;
pub use decoded::{Decoded, Element, Node};
pub use envelope::{Envelope, is_truthy, traverse};
pub use error::{Error, Result};
pub use method::Method;
pub use mime::{ContentType, accepts, essence};
pub use params::Params;
pub use registry::{Decoder, DecoderRegistry};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
