//! Path-building HTTP API client.
//!
//! An [`Interface`] points at a location in a web API. Member access grows
//! the path one segment at a time, verbs send the request, and the response
//! body is decoded by a [`DecoderRegistry`] entry chosen from its
//! `Content-Type`.
//!
//! # Example
//!
//! ```no_run
//! use webapi::prelude::*;
//!
//! #[derive(Debug, Deserialize)]
//! struct Slideshow {
//!     title: String,
//! }
//!
//! # async fn run() -> webapi::Result<()> {
//! let api = Interface::builder("https://httpbin.org")
//!     .accept("application/json")
//!     .validated(true)
//!     .envelope(Envelope::new().content("slideshow"))
//!     .build()?;
//!
//! let show: Slideshow = api.member("json").invoke_as(Method::Get, ()).await?;
//! println!("{}", show.title);
//! # Ok(())
//! # }
//! ```
//!
//! The transport is any [`HttpClient`]; [`HyperClient`] is the default and
//! accepts tower middleware from [`middleware`]. A synchronous variant lives
//! in [`blocking`].

pub mod blocking;
mod client;
mod config;
mod connector;
mod interface;
pub mod middleware;
pub mod prelude;

pub use client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_USER_AGENT};
pub use interface::{Interface, InterfaceBuilder, IntoUri};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use webapi_core::{
    ContentType, Decoded, Decoder, DecoderRegistry, Element, Envelope, Error, HttpClient, Method,
    Node, Params, Request, RequestBuilder, Response, Result, accepts, codec, essence, is_truthy,
    traverse,
};

// Re-export http types for status codes and headers
pub use webapi_core::{StatusCode, header};

pub use url;
