//! Retry policy for tower's `RetryLayer`.

use std::future;

use bytes::Bytes;
use tower::retry::Policy;

use crate::{Error, Request, Response};

/// Retries idempotent requests that failed transiently.
///
/// Retried outcomes: 5xx and 429 responses, connection errors and timeouts.
/// `POST` and `PATCH` are never replayed.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    remaining: u32,
}

impl RetryPolicy {
    /// Policy allowing at most `max_retries` extra attempts.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            remaining: max_retries,
        }
    }

    /// Attempts left.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    fn should_retry_response(response: &Response<Bytes>) -> bool {
        let status = response.status();
        status >= 500 || status == 429
    }

    fn should_retry_error(error: &Error) -> bool {
        error.is_connection() || error.is_timeout()
    }
}

impl Policy<Request<Bytes>, Response<Bytes>, Error> for RetryPolicy {
    type Future = future::Ready<()>;

    fn retry(
        &mut self,
        request: &mut Request<Bytes>,
        result: &mut Result<Response<Bytes>, Error>,
    ) -> Option<Self::Future> {
        if self.remaining == 0 || !request.method().is_idempotent() {
            return None;
        }

        let should_retry = match result {
            Ok(response) => Self::should_retry_response(response),
            Err(error) => Self::should_retry_error(error),
        };

        if should_retry {
            self.remaining -= 1;
            tracing::debug!(
                method = %request.method(),
                url = %request.url(),
                remaining = self.remaining,
                "retrying request"
            );
            Some(future::ready(()))
        } else {
            None
        }
    }

    fn clone_request(&mut self, request: &Request<Bytes>) -> Option<Request<Bytes>> {
        Some(request.clone())
    }
}
