//! Prelude module for convenient imports.
//!
//! ```
//! use webapi::prelude::*;
//! ```

pub use crate::{
    ClientConfig, ContentType, Decoded, DecoderRegistry, Element, Envelope, Error, HttpClient,
    HyperClient, Interface, Method, Params, Response, Result, StatusCode,
};
pub use serde::{Deserialize, Serialize};
