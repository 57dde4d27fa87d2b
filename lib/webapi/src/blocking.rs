//! Synchronous [`Interface`].
//!
//! Wraps the async [`crate::Interface`] and drives it on a current-thread
//! tokio runtime shared by the whole interface tree. Calling a verb from
//! inside an async runtime panics; use the async interface there.
//!
//! # Example
//!
//! ```no_run
//! use webapi::blocking::Interface;
//!
//! # fn run() -> webapi::Result<()> {
//! let api = Interface::new("https://httpbin.org")?;
//! let body = api.member("json").get(())?;
//! println!("{:?}", body.as_data());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use tokio::runtime::Runtime;
use url::Url;

use crate::interface::IntoUri;
use crate::{
    Decoded, DecoderRegistry, Error, HttpClient, HyperClient, Method, Params, Response, Result,
};

/// Blocking counterpart of [`crate::Interface`].
pub struct Interface<C = HyperClient> {
    inner: crate::Interface<C>,
    runtime: Arc<Runtime>,
}

impl Interface {
    /// Interface over `uri` with a default client and decoder registry.
    pub fn new(uri: impl IntoUri) -> Result<Self> {
        Self::from_async(crate::Interface::new(uri)?)
    }
}

impl<C> Interface<C> {
    /// Drive `interface` synchronously.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Connection`] when the runtime cannot start.
    pub fn from_async(interface: crate::Interface<C>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Error::connection(format!("cannot start I/O runtime: {e}")))?;

        Ok(Self {
            inner: interface,
            runtime: Arc::new(runtime),
        })
    }

    fn derive(&self, inner: crate::Interface<C>) -> Self {
        Self {
            inner,
            runtime: Arc::clone(&self.runtime),
        }
    }

    /// See [`crate::Interface::member`].
    #[must_use]
    pub fn member(&self, name: impl AsRef<str>) -> Self {
        self.derive(self.inner.member(name))
    }

    /// See [`crate::Interface::index`].
    #[must_use]
    pub fn index(&self, key: impl fmt::Display) -> Self {
        self.derive(self.inner.index(key))
    }

    /// See [`crate::Interface::root`].
    #[must_use]
    pub fn root(&self) -> Self {
        self.derive(self.inner.root())
    }

    /// See [`crate::Interface::url`].
    #[must_use]
    pub fn url(&self) -> Url {
        self.inner.url()
    }

    /// See [`crate::Interface::resolve`].
    #[must_use]
    pub fn resolve(&self) -> String {
        self.inner.resolve()
    }

    /// See [`crate::Interface::segments`].
    #[must_use]
    pub fn segments(&self) -> &[String] {
        self.inner.segments()
    }

    /// See [`crate::Interface::registry`].
    #[must_use]
    pub fn registry(&self) -> &DecoderRegistry {
        self.inner.registry()
    }

    /// The wrapped async interface.
    #[must_use]
    pub const fn as_async(&self) -> &crate::Interface<C> {
        &self.inner
    }
}

impl<C: HttpClient> Interface<C> {
    /// See [`crate::Interface::invoke_raw`].
    pub fn invoke_raw(&self, method: Method, params: impl Into<Params>) -> Result<Response<Bytes>> {
        self.runtime.block_on(self.inner.invoke_raw(method, params))
    }

    /// See [`crate::Interface::invoke`].
    pub fn invoke(&self, method: Method, params: impl Into<Params>) -> Result<Decoded> {
        self.runtime.block_on(self.inner.invoke(method, params))
    }

    /// See [`crate::Interface::invoke_as`].
    pub fn invoke_as<T: DeserializeOwned>(
        &self,
        method: Method,
        params: impl Into<Params>,
    ) -> Result<T> {
        self.runtime.block_on(self.inner.invoke_as(method, params))
    }

    /// `GET` with `params` as the query string.
    pub fn get(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Get, params)
    }

    /// `POST` with `params` as a form body.
    pub fn post(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Post, params)
    }

    /// `PUT` with `params` as a form body.
    pub fn put(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Put, params)
    }

    /// `PATCH` with `params` as a form body.
    pub fn patch(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Patch, params)
    }

    /// `DELETE` with `params` as the query string.
    pub fn delete(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Delete, params)
    }

    /// `HEAD`, returning the raw response.
    pub fn head(&self, params: impl Into<Params>) -> Result<Response<Bytes>> {
        self.invoke_raw(Method::Head, params)
    }

    /// `OPTIONS`, returning the raw response.
    pub fn options(&self, params: impl Into<Params>) -> Result<Response<Bytes>> {
        self.invoke_raw(Method::Options, params)
    }
}

impl<C> Clone for Interface<C> {
    fn clone(&self) -> Self {
        self.derive(self.inner.clone())
    }
}

impl<C> PartialEq for Interface<C> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<C> Eq for Interface<C> {}

impl<C> fmt::Display for Interface<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl<C> fmt::Debug for Interface<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}
