//! Call parameters.
//!
//! [`Params`] are sent in the query string for bodiless verbs and as a
//! form-encoded body for `POST`, `PUT` and `PATCH`.

use bytes::Bytes;
use serde::Serialize;

use crate::Result;

/// Ordered name/value pairs passed to an endpoint invocation.
///
/// # Example
///
/// ```
/// use webapi_core::Params;
///
/// let params = Params::from([("q", "rust"), ("page", "2")]);
/// assert_eq!(params.len(), 2);
///
/// #[derive(serde::Serialize)]
/// struct Search {
///     q: String,
///     page: u32,
/// }
///
/// let params = Params::serialize(&Search { q: "rust".into(), page: 2 }).expect("serialize");
/// assert_eq!(params.get("page"), Some("2"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    /// Empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build parameters from any struct or map that serializes as a flat form.
    ///
    /// Sequences become repeated pairs (`tags=a&tags=b`) and `None` fields are
    /// skipped. Values are converted to their string form and nothing else.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        let encoded = serde_html_form::to_string(value)?;
        Ok(url::form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect())
    }

    /// Append a pair.
    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    /// Append a pair, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    /// First value recorded for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No pairs at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn to_form(&self) -> Result<Bytes> {
        serde_urlencoded::to_string(&self.0)
            .map(|s| Bytes::from(s.into_bytes()))
            .map_err(Into::into)
    }
}

impl From<()> for Params {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V: ToString> From<Vec<(K, V)>> for Params {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        )
    }
}

impl IntoIterator for Params {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
