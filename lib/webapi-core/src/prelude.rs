//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types
//! for easy glob importing:
//!
//! ```ignore
//! use webapi_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Decoded, Decoder, DecoderRegistry, Element, Envelope, Error, HttpClient, Method,
    Params, Request, RequestBuilder, Response, Result,
};
