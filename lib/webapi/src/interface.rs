//! The path-building API proxy.
//!
//! An [`Interface`] is an immutable pointer into a web API: a base URI plus
//! the path segments accumulated so far. [`Interface::member`] and
//! [`Interface::index`] return new interfaces one segment deeper; verbs
//! ([`Interface::get`], [`Interface::post`], ...) send a request to the
//! resolved URI and decode the response by its content type.
//!
//! # Example
//!
//! ```no_run
//! use webapi::{Interface, Method, Params};
//!
//! # async fn run() -> webapi::Result<()> {
//! let api = Interface::new("https://httpbin.org")?;
//! let status = api.member("status").index(514);
//! assert_eq!(status.resolve(), "https://httpbin.org/status/514");
//!
//! let raw = status.invoke_raw(Method::Get, ()).await?;
//! assert_eq!(raw.status(), 514);
//!
//! let echoed = api.member("get").get(Params::from([("q", "rust")])).await?;
//! println!("{:?}", echoed.as_data());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::{
    ContentType, Decoded, DecoderRegistry, Envelope, Error, HttpClient, HyperClient, Method,
    Params, Request, Response, Result, accepts,
};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Values accepted as the root of an [`Interface`].
pub trait IntoUri {
    /// Parse into an absolute URL.
    fn into_uri(self) -> Result<Url>;
}

impl IntoUri for Url {
    fn into_uri(self) -> Result<Url> {
        Ok(self)
    }
}

impl IntoUri for &Url {
    fn into_uri(self) -> Result<Url> {
        Ok(self.clone())
    }
}

impl IntoUri for &str {
    fn into_uri(self) -> Result<Url> {
        Ok(Url::parse(self)?)
    }
}

impl IntoUri for String {
    fn into_uri(self) -> Result<Url> {
        self.as_str().into_uri()
    }
}

impl IntoUri for &String {
    fn into_uri(self) -> Result<Url> {
        self.as_str().into_uri()
    }
}

/// Context handed from an interface to every interface derived from it.
struct Shared<C> {
    client: C,
    registry: Arc<DecoderRegistry>,
    headers: Vec<(String, String)>,
    accept: Option<String>,
    validated: bool,
    envelope: Option<Envelope>,
}

/// Immutable proxy for a web API location.
///
/// Cloning is cheap: the client, decoder registry and default headers are
/// shared by reference with every derived interface.
pub struct Interface<C = HyperClient> {
    base: Url,
    segments: Vec<String>,
    shared: Arc<Shared<C>>,
}

impl Interface {
    /// Interface over `uri` with a default [`HyperClient`] and decoder registry.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidUrl`] when `uri` does not parse, or
    /// [`Error::InvalidRequest`] when it cannot carry a path (`mailto:`).
    pub fn new(uri: impl IntoUri) -> Result<Self> {
        Self::builder(uri).build()
    }

    /// Builder over `uri`, starting from a default [`HyperClient`].
    pub fn builder(uri: impl IntoUri) -> InterfaceBuilder {
        InterfaceBuilder::new(uri, HyperClient::new())
    }
}

impl<C> Interface<C> {
    /// New interface with `name` appended as one path segment.
    #[must_use]
    pub fn member(&self, name: impl AsRef<str>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(name.as_ref().to_owned());
        Self {
            base: self.base.clone(),
            segments,
            shared: Arc::clone(&self.shared),
        }
    }

    /// Same as [`member`](Self::member) with `key` rendered through `Display`.
    #[must_use]
    pub fn index(&self, key: impl fmt::Display) -> Self {
        self.member(key.to_string())
    }

    /// Base URL followed by every segment, in access order.
    ///
    /// A `.` or `..` segment cannot be kept by URL parsing and shows here in
    /// its normalised form; invoking such an interface fails with
    /// [`Error::InvalidRequest`].
    #[must_use]
    pub fn url(&self) -> Url {
        let mut url = self.base.clone();
        if self.segments.is_empty() {
            return url;
        }

        let mut path = url.path().trim_end_matches('/').to_owned();
        for segment in &self.segments {
            path.push('/');
            path.extend(utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET));
        }
        url.set_path(&path);
        url
    }

    /// The resolved URI as a string.
    #[must_use]
    pub fn resolve(&self) -> String {
        self.url().into()
    }

    /// The root URL this interface was built from.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Segments accumulated since the root, unescaped.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The root interface, sharing this one's context.
    #[must_use]
    pub fn root(&self) -> Self {
        Self {
            base: self.base.clone(),
            segments: Vec::new(),
            shared: Arc::clone(&self.shared),
        }
    }

    /// The shared HTTP client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.shared.client
    }

    /// The shared decoder registry.
    #[must_use]
    pub fn registry(&self) -> &DecoderRegistry {
        &self.shared.registry
    }

    /// Headers sent with every request.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.shared.headers
    }

    fn prepare(&self, method: Method, params: Params) -> Result<Request<Bytes>> {
        if let Some(segment) = self.segments.iter().find(|segment| is_dot_segment(segment)) {
            return Err(Error::invalid_request(format!(
                "path segment '{segment}' would be removed from {}",
                self.base
            )));
        }

        let builder = Request::<Bytes>::builder(method, self.url())
            .headers(self.shared.headers.iter().cloned());
        let builder = if method.carries_body() {
            builder.form(&params)?
        } else {
            builder.query_pairs(params)
        };
        Ok(builder.build())
    }

    fn process(&self, response: Response<Bytes>) -> Result<Decoded> {
        let shared = &self.shared;

        if shared.validated && !response.is_success() {
            let status = response.status();
            let message = response.reason().unwrap_or("unexpected status").to_owned();
            return Err(Error::http_with_body(status, message, response.into_body()));
        }

        let Some(mime) = response.content_type() else {
            if response.body().is_empty() {
                return Ok(Decoded::Raw(Bytes::new()));
            }
            return self.decode(ContentType::OctetStream.as_str(), response.body());
        };
        self.decode(&mime, response.body())
    }

    fn decode(&self, mime: &str, body: &Bytes) -> Result<Decoded> {
        let shared = &self.shared;

        if let Some(accept) = shared.accept.as_deref() {
            if !accepts(accept, mime) {
                warn!(%accept, content_type = %mime, "response content type does not match Accept");
            }
        }

        let decoded = shared.registry.decode(mime, body)?;
        match &shared.envelope {
            Some(envelope) => envelope.open_decoded(decoded),
            None => Ok(decoded),
        }
    }
}

impl<C: HttpClient> Interface<C> {
    /// Send `method` to the resolved URI and return the response untouched.
    ///
    /// No status check and no decoding. Transport errors from the client are
    /// returned as they are.
    pub async fn invoke_raw(
        &self,
        method: Method,
        params: impl Into<Params>,
    ) -> Result<Response<Bytes>> {
        let request = self.prepare(method, params.into())?;
        debug!(%method, url = %request.url(), "invoking");
        self.shared.client.execute(request).await
    }

    /// Send `method` and decode the response body by its content type.
    ///
    /// # Errors
    ///
    /// - transport errors from the client;
    /// - [`Error::Http`] for a non-2xx status on a validated interface;
    /// - [`Error::UnsupportedContentType`] when no decoder is registered;
    /// - decoder and envelope errors.
    pub async fn invoke(&self, method: Method, params: impl Into<Params>) -> Result<Decoded> {
        let response = self.invoke_raw(method, params).await?;
        self.process(response)
    }

    /// [`invoke`](Self::invoke), then deserialize the decoded data into `T`.
    pub async fn invoke_as<T: DeserializeOwned>(
        &self,
        method: Method,
        params: impl Into<Params>,
    ) -> Result<T> {
        self.invoke(method, params).await?.deserialize()
    }

    /// `GET` with `params` as the query string.
    pub async fn get(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Get, params).await
    }

    /// `POST` with `params` as a form body.
    pub async fn post(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Post, params).await
    }

    /// `PUT` with `params` as a form body.
    pub async fn put(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Put, params).await
    }

    /// `PATCH` with `params` as a form body.
    pub async fn patch(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Patch, params).await
    }

    /// `DELETE` with `params` as the query string.
    pub async fn delete(&self, params: impl Into<Params>) -> Result<Decoded> {
        self.invoke(Method::Delete, params).await
    }

    /// `HEAD`, returning the raw response.
    pub async fn head(&self, params: impl Into<Params>) -> Result<Response<Bytes>> {
        self.invoke_raw(Method::Head, params).await
    }

    /// `OPTIONS`, returning the raw response.
    pub async fn options(&self, params: impl Into<Params>) -> Result<Response<Bytes>> {
        self.invoke_raw(Method::Options, params).await
    }
}

impl<C> Clone for Interface<C> {
    fn clone(&self) -> Self {
        Self {
            base: self.base.clone(),
            segments: self.segments.clone(),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C> PartialEq for Interface<C> {
    fn eq(&self, other: &Self) -> bool {
        self.url() == other.url()
    }
}

impl<C> Eq for Interface<C> {}

impl<C> fmt::Display for Interface<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interface('{}')", self.url())
    }
}

impl<C> fmt::Debug for Interface<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Builder for [`Interface`].
///
/// # Example
///
/// ```
/// use webapi::{Envelope, Interface};
///
/// let api = Interface::builder("https://api.example.com/v1")
///     .accept("application/json")
///     .language("en")
///     .header("X-Api-Key", "secret")
///     .validated(true)
///     .envelope(Envelope::new().success("ok").content("data"))
///     .build()
///     .expect("valid URL");
///
/// let users = api.member("users");
/// assert_eq!(users.resolve(), "https://api.example.com/v1/users");
/// assert_eq!(users.headers().len(), 3);
/// ```
pub struct InterfaceBuilder<C = HyperClient> {
    base: Result<Url>,
    client: C,
    registry: DecoderRegistry,
    headers: Vec<(String, String)>,
    accept: Option<String>,
    validated: bool,
    envelope: Option<Envelope>,
}

impl<C> fmt::Debug for InterfaceBuilder<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceBuilder")
            .field("base", &self.base)
            .field("registry", &self.registry)
            .field("headers", &self.headers)
            .field("validated", &self.validated)
            .field("envelope", &self.envelope)
            .finish_non_exhaustive()
    }
}

impl<C> InterfaceBuilder<C> {
    /// Builder over `uri` sending requests through `client`.
    pub fn new(uri: impl IntoUri, client: C) -> Self {
        Self {
            base: uri.into_uri(),
            client,
            registry: DecoderRegistry::default(),
            headers: Vec::new(),
            accept: None,
            validated: false,
            envelope: None,
        }
    }

    /// Replace the HTTP client.
    pub fn client<D: HttpClient>(self, client: D) -> InterfaceBuilder<D> {
        InterfaceBuilder {
            base: self.base,
            client,
            registry: self.registry,
            headers: self.headers,
            accept: self.accept,
            validated: self.validated,
            envelope: self.envelope,
        }
    }

    /// Set the `Accept` header. Responses of another type are still decoded
    /// but logged at `warn`.
    #[must_use]
    pub fn accept(mut self, mime: impl Into<String>) -> Self {
        let mime = mime.into();
        set_header(&mut self.headers, "Accept", mime.clone());
        self.accept = Some(mime);
        self
    }

    /// Set the `Accept-Language` header.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        set_header(&mut self.headers, "Accept-Language", language.into());
        self
    }

    /// Send `name: value` with every request. A later value for the same
    /// name replaces the earlier one.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name.eq_ignore_ascii_case("accept") {
            return self.accept(value);
        }
        set_header(&mut self.headers, &name, value.into());
        self
    }

    /// Replace the decoder registry.
    #[must_use]
    pub fn registry(mut self, registry: DecoderRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Register one more decoder on the current registry.
    #[must_use]
    pub fn decoder(mut self, mime_type: &str, decoder: impl crate::Decoder + 'static) -> Self {
        self.registry.register(mime_type, decoder);
        self
    }

    /// Fail with [`Error::Http`] on non-2xx responses before decoding.
    #[must_use]
    pub const fn validated(mut self, validated: bool) -> Self {
        self.validated = validated;
        self
    }

    /// Unwrap decoded data through `envelope`.
    #[must_use]
    pub fn envelope(mut self, envelope: Envelope) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Build the root interface.
    ///
    /// # Errors
    ///
    /// Fails when the base URI is invalid or cannot carry a path.
    pub fn build(self) -> Result<Interface<C>> {
        let base = self.base?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_request(format!(
                "'{base}' cannot be used as an API root"
            )));
        }

        Ok(Interface {
            base,
            segments: Vec::new(),
            shared: Arc::new(Shared {
                client: self.client,
                registry: Arc::new(self.registry),
                headers: self.headers,
                accept: self.accept,
                validated: self.validated,
                envelope: self.envelope,
            }),
        })
    }
}

/// Segments URL parsing would drop or resolve against their parent.
fn is_dot_segment(segment: &str) -> bool {
    matches!(segment, "." | "..")
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    headers.push((name.to_owned(), value));
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    fn api(uri: &str) -> Interface {
        Interface::new(uri).expect("valid URL")
    }

    #[test]
    fn resolves_segments_in_access_order() {
        let status = api("https://httpbin.org").member("status").index(514);
        check!(status.resolve() == "https://httpbin.org/status/514");
        check!(status.segments() == ["status", "514"]);
    }

    #[test]
    fn root_resolves_to_base() {
        check!(api("https://httpbin.org/anything/").resolve() == "https://httpbin.org/anything/");
    }

    #[test]
    fn trailing_slash_is_trimmed_before_joining() {
        let users = api("https://api.example.com/v1/").member("users");
        check!(users.resolve() == "https://api.example.com/v1/users");
    }

    #[test]
    fn base_query_is_kept() {
        let users = api("https://api.example.com/v1?key=abc").member("users");
        check!(users.resolve() == "https://api.example.com/v1/users?key=abc");
    }

    #[test]
    fn child_leaves_parent_untouched() {
        let parent = api("https://httpbin.org").member("anything");
        let before = parent.resolve();
        let _child = parent.member("deeper").index(1);
        check!(parent.resolve() == before);
    }

    #[test]
    fn same_path_compares_equal() {
        let root = api("https://httpbin.org");
        check!(root.member("a").member("b") == root.member("a").member("b"));
        check!(root.member("a") != root.member("b"));
    }

    #[test]
    fn segment_is_escaped() {
        let file = api("https://example.com").member("a b/c?d#e%f");
        check!(file.resolve() == "https://example.com/a%20b%2Fc%3Fd%23e%25f");
        check!(file.url().path_segments().map(Iterator::count) == Some(1));
    }

    #[test]
    fn dot_segments_are_refused_before_sending() {
        let admin = api("https://api.example.com/v1")
            .member("users")
            .member("..")
            .member("..")
            .member("admin");
        check!(admin.segments() == ["users", "..", "..", "admin"]);

        let_assert!(Err(Error::InvalidRequest(message)) = admin.prepare(Method::Get, Params::default()));
        check!(message.contains("'..'"));

        let here = api("https://api.example.com/v1").member(".");
        let_assert!(Err(Error::InvalidRequest(_)) = here.prepare(Method::Delete, Params::default()));
    }

    #[test]
    fn dots_inside_a_segment_are_kept() {
        let file = api("https://example.com/files").member("...").member("v1.2").member("%2e%2e");
        check!(file.resolve() == "https://example.com/files/.../v1.2/%252e%252e");
        check!(file.url().path_segments().map(Iterator::count) == Some(4));
        check!(file.prepare(Method::Get, Params::default()).is_ok());
    }

    #[test]
    fn display_and_debug() {
        let users = api("https://example.com").member("users");
        check!(users.to_string() == "Interface('https://example.com/users')");
        check!(format!("{users:?}") == "Interface('https://example.com/users')");
    }

    #[test]
    fn root_drops_segments() {
        let deep = api("https://example.com/api").member("x").member("y");
        check!(deep.root().resolve() == "https://example.com/api");
    }

    #[test]
    fn invalid_uri_is_rejected() {
        let_assert!(Err(Error::InvalidUrl(_)) = Interface::new("not a url"));
        let_assert!(Err(Error::InvalidRequest(_)) = Interface::new("mailto:someone@example.com"));
    }

    #[test]
    fn later_header_replaces_earlier() {
        let api = Interface::builder("https://example.com")
            .header("x-token", "one")
            .header("X-Token", "two")
            .header("accept", "text/xml")
            .accept("application/json")
            .build()
            .expect("valid URL");

        check!(
            api.headers()
                == [
                    ("X-Token".to_owned(), "two".to_owned()),
                    ("Accept".to_owned(), "application/json".to_owned()),
                ]
        );
    }

    #[test]
    fn body_verbs_send_form_and_others_query() {
        let api = api("https://example.com").member("items");
        let params = Params::from([("name", "a b"), ("n", "1")]);

        let get = api.prepare(Method::Get, params.clone()).expect("request");
        check!(get.url().as_str() == "https://example.com/items?name=a+b&n=1");
        check!(get.body().is_none());

        let post = api.prepare(Method::Post, params).expect("request");
        check!(post.url().as_str() == "https://example.com/items");
        check!(post.header("content-type") == Some("application/x-www-form-urlencoded"));
        check!(post.body().map(|b| &b[..]) == Some(&b"name=a+b&n=1"[..]));
    }
}
