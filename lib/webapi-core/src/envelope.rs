//! Response envelopes.
//!
//! Many APIs wrap their payload with status metadata:
//!
//! ```json
//! {"success": true, "data": {...}}
//! {"state": {"failure": true, "message": "Goofed."}}
//! {"error": "Something went wrong."}
//! ```
//!
//! An [`Envelope`] names where success/failure flags, the message and the
//! payload live (as dotted key paths), checks the flags and returns the payload.

use serde_json::Value;

use crate::{Decoded, Error, Result};

/// Key paths locating status metadata and payload inside decoded data.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use webapi_core::Envelope;
///
/// let envelope = Envelope::new()
///     .success("ok")
///     .message("error.message")
///     .content("result.items");
///
/// let items = envelope
///     .open(json!({"ok": true, "result": {"items": [1, 2]}}))
///     .expect("successful");
/// assert_eq!(items, json!([1, 2]));
///
/// let err = envelope
///     .open(json!({"ok": false, "error": {"message": "quota exceeded"}}))
///     .expect_err("unsuccessful");
/// assert_eq!(err.to_string(), "request not successful: quota exceeded");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    success: Option<String>,
    failure: Option<String>,
    message: Option<String>,
    content: Option<String>,
}

impl Envelope {
    /// Envelope that checks nothing and returns the whole value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path to a flag that must be truthy for the call to count as successful.
    #[must_use]
    pub fn success(mut self, path: impl Into<String>) -> Self {
        self.success = Some(path.into());
        self
    }

    /// Path to a flag (or message) whose truthiness means failure.
    #[must_use]
    pub fn failure(mut self, path: impl Into<String>) -> Self {
        self.failure = Some(path.into());
        self
    }

    /// Path to a human readable summary of the transaction.
    #[must_use]
    pub fn message(mut self, path: impl Into<String>) -> Self {
        self.message = Some(path.into());
        self
    }

    /// Path to the payload.
    #[must_use]
    pub fn content(mut self, path: impl Into<String>) -> Self {
        self.content = Some(path.into());
        self
    }

    /// Check the flags, then extract the payload.
    pub fn open(&self, value: Value) -> Result<Value> {
        let succeeded = self
            .success
            .as_deref()
            .is_none_or(|path| traverse(&value, path).is_some_and(is_truthy));
        let failed = self
            .failure
            .as_deref()
            .is_some_and(|path| traverse(&value, path).is_some_and(is_truthy));

        if !succeeded || failed {
            let message = self
                .message
                .as_deref()
                .and_then(|path| traverse(&value, path))
                .map(|found| match found {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                });
            return Err(Error::Unsuccessful { message });
        }

        match self.content.as_deref() {
            None => Ok(value),
            Some(path) => traverse(&value, path)
                .cloned()
                .ok_or_else(|| Error::EnvelopeMissing {
                    path: path.to_owned(),
                }),
        }
    }

    /// Apply [`Envelope::open`] to structured data; documents and raw bodies
    /// pass through unchanged.
    pub fn open_decoded(&self, decoded: Decoded) -> Result<Decoded> {
        match decoded {
            Decoded::Data(value) => self.open(value).map(Decoded::Data),
            other => Ok(other),
        }
    }
}

/// Follow a dotted key path (`state.items.0.id`) through objects and arrays.
///
/// An empty path designates the value itself.
#[must_use]
pub fn traverse<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
}

/// `null`, `false`, zero, and empty strings, arrays or objects are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
