//! Content-type keyed decoder registry.
//!
//! The registry maps a MIME essence (`application/json`) to the [`Decoder`]
//! used for response bodies of that type. Keys match exactly after
//! normalisation; there is no wildcard matching.
//!
//! Registration needs `&mut self`. Once built, a registry is shared as an
//! `Arc<DecoderRegistry>` and lookups are plain reads.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use webapi_core::{Decoded, DecoderRegistry};
//!
//! let mut registry = DecoderRegistry::default();
//! registry.register("text/plain", |body: &Bytes| -> webapi_core::Result<Decoded> {
//!     Ok(Decoded::Data(String::from_utf8_lossy(body).into()))
//! });
//!
//! let decoded = registry.decode("text/plain; charset=utf-8", &Bytes::from("hi")).expect("decode");
//! assert_eq!(decoded.as_data(), Some(&serde_json::json!("hi")));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::{ContentType, Decoded, Error, Result, codec, essence};

/// Turns a response body into a [`Decoded`] value.
///
/// Implemented for every `Fn(&Bytes) -> Result<Decoded>`.
pub trait Decoder: Send + Sync {
    /// Decode the body.
    fn decode(&self, body: &Bytes) -> Result<Decoded>;
}

impl<F> Decoder for F
where
    F: Fn(&Bytes) -> Result<Decoded> + Send + Sync,
{
    fn decode(&self, body: &Bytes) -> Result<Decoded> {
        self(body)
    }
}

/// Mapping from MIME type to [`Decoder`].
#[derive(Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn Decoder>>,
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("mime_types", &self.mime_types())
            .finish()
    }
}

impl Default for DecoderRegistry {
    /// Registry with the built-in decoders.
    ///
    /// | MIME types | Body becomes |
    /// |---|---|
    /// | `application/x-www-form-urlencoded`, `multipart/form-data` | [`Decoded::Raw`] |
    /// | `application/json`, `text/json` | [`Decoded::Data`] |
    /// | `application/xml`, `text/xml` | [`Decoded::Document`] (`xml` feature) |
    /// | `text/html`, `application/xhtml+xml` | [`Decoded::Document`] (`html` feature) |
    /// | `application/yaml`, `application/x-yaml`, `text/yaml`, `text/x-yaml` | [`Decoded::Data`] (`yaml` feature) |
    /// | `application/msgpack`, `application/x-msgpack`, `application/vnd.msgpack` | [`Decoded::Data`] (`msgpack` feature) |
    fn default() -> Self {
        Self::new()
            .with(ContentType::FormUrlEncoded.as_str(), codec::passthrough)
            .with(ContentType::MultipartFormData.as_str(), codec::passthrough)
            .with(ContentType::Json.as_str(), codec::json)
            .with("text/json", codec::json)
            .with(ContentType::Xml.as_str(), codec::xml)
            .with("text/xml", codec::xml)
            .with(ContentType::Html.as_str(), codec::html)
            .with("application/xhtml+xml", codec::html)
            .with(ContentType::Yaml.as_str(), codec::yaml)
            .with("application/x-yaml", codec::yaml)
            .with("text/yaml", codec::yaml)
            .with("text/x-yaml", codec::yaml)
            .with(ContentType::MessagePack.as_str(), codec::msgpack)
            .with("application/x-msgpack", codec::msgpack)
            .with("application/vnd.msgpack", codec::msgpack)
    }
}

impl DecoderRegistry {
    /// Registry without any decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Install or replace the decoder for a MIME type.
    ///
    /// The most recent registration for a type wins.
    pub fn register(&mut self, mime_type: &str, decoder: impl Decoder + 'static) -> &mut Self {
        let key = essence(mime_type);
        if self.decoders.insert(key.clone(), Arc::new(decoder)).is_some() {
            debug!(mime_type = %key, "replaced registered decoder");
        }
        self
    }

    /// Install or replace a decoder, builder style.
    #[must_use]
    pub fn with(mut self, mime_type: &str, decoder: impl Decoder + 'static) -> Self {
        self.register(mime_type, decoder);
        self
    }

    /// Remove the decoder for a MIME type, returning whether one was registered.
    pub fn unregister(&mut self, mime_type: &str) -> bool {
        self.decoders.remove(&essence(mime_type)).is_some()
    }

    /// Decoder registered for a MIME type (parameters are ignored).
    pub fn lookup(&self, mime_type: &str) -> Result<&dyn Decoder> {
        let key = essence(mime_type);
        self.decoders
            .get(&key)
            .map(|decoder| &**decoder)
            .ok_or_else(|| Error::unsupported_content_type(key))
    }

    /// Look up the decoder for a MIME type and run it on `body`.
    pub fn decode(&self, mime_type: &str, body: &Bytes) -> Result<Decoded> {
        self.lookup(mime_type)?.decode(body)
    }

    /// Whether a decoder is registered for a MIME type.
    #[must_use]
    pub fn contains(&self, mime_type: &str) -> bool {
        self.decoders.contains_key(&essence(mime_type))
    }

    /// Registered MIME types, sorted.
    #[must_use]
    pub fn mime_types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.decoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Number of registered MIME types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    /// No decoder registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }
}
