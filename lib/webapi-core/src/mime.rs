//! MIME type names and `Content-Type` / `Accept` helpers.

/// Well-known content types handled by the default decoder registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Form URL-encoded content type (`application/x-www-form-urlencoded`).
    FormUrlEncoded,
    /// Multipart form content type (`multipart/form-data`).
    MultipartFormData,
    /// XML content type (`application/xml`).
    Xml,
    /// HTML content type (`text/html`).
    Html,
    /// YAML content type (`application/yaml`).
    Yaml,
    /// MessagePack content type (`application/msgpack`).
    MessagePack,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::FormUrlEncoded => "application/x-www-form-urlencoded",
            Self::MultipartFormData => "multipart/form-data",
            Self::Xml => "application/xml",
            Self::Html => "text/html",
            Self::Yaml => "application/yaml",
            Self::MessagePack => "application/msgpack",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reduce a `Content-Type` value to its lower-cased MIME essence.
///
/// ```
/// use webapi_core::essence;
///
/// assert_eq!(essence("Application/JSON; charset=utf-8"), "application/json");
/// ```
#[must_use]
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether an `Accept` header value admits the given MIME essence.
///
/// Ranges may be exact (`application/json`), a type wildcard (`text/*`) or
/// `*/*`. Quality parameters are ignored, except that `q=0` excludes a range.
#[must_use]
pub fn accepts(accept: &str, mime: &str) -> bool {
    let mime = essence(mime);
    let main_type = mime.split('/').next().unwrap_or_default();

    accept
        .split(',')
        .filter(|range| !is_refused(range))
        .map(essence)
        .any(|range| match range.split_once('/') {
            Some(("*", "*")) => true,
            Some((kind, "*")) => kind == main_type,
            _ => range == mime,
        })
}

fn is_refused(range: &str) -> bool {
    range.split(';').skip(1).any(|param| {
        param
            .split_once('=')
            .is_some_and(|(name, value)| {
                name.trim() == "q" && value.trim().parse::<f32>().is_ok_and(|q| q <= 0.0)
            })
    })
}
