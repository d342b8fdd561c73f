//! Cancellable asynchronous requests.
//!
//! A [`Request`] pairs a boxed future with an optional cancel hook. Cancelling
//! runs the hook (so the host can abort the underlying I/O) and drops the
//! future, which guarantees its completion is never observed.
//!
//! # Example
//!
//! ```ignore
//! let mut request = source.request("cat");
//! match request.poll(&mut cx) {
//!     Poll::Ready(Ok(data)) => { /* apply */ }
//!     Poll::Ready(Err(err)) => { /* no results */ }
//!     Poll::Pending => {}
//! }
//! // Superseded by a newer query:
//! request.cancel();
//! ```

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_lite::FutureExt;

/// Errors a request can complete with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// The host reported a failure.
    Failed {
        /// Description of the failure.
        message: String,
    },
    /// The host aborted the request on its own.
    Aborted,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Failed { message } => write!(f, "Request failed: {}", message),
            RequestError::Aborted => write!(f, "Request aborted"),
        }
    }
}

impl std::error::Error for RequestError {}

/// Boxed future produced by a [`RequestSource`].
pub type RequestFuture<T> = Pin<Box<dyn Future<Output = Result<T, RequestError>> + Send>>;

type CancelHook = Box<dyn FnOnce() + Send>;

/// An in-flight request that can be polled to completion or cancelled.
pub struct Request<T> {
    future: RequestFuture<T>,
    on_cancel: Option<CancelHook>,
}

impl<T> Request<T> {
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, RequestError>> + Send + 'static,
    {
        Self {
            future: Box::pin(future),
            on_cancel: None,
        }
    }

    /// Attach a hook run when the request is cancelled.
    pub fn with_cancel<F>(mut self, on_cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    /// Poll the underlying future once.
    pub fn poll(&mut self, cx: &mut Context<'_>) -> Poll<Result<T, RequestError>> {
        self.future.poll(cx)
    }

    /// Abort the request. The future is dropped without being polled again.
    pub fn cancel(mut self) {
        if let Some(hook) = self.on_cancel.take() {
            hook();
        }
    }
}

impl<T> Future for Request<T> {
    type Output = Result<T, RequestError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.poll(cx)
    }
}

impl<T> fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("cancellable", &self.on_cancel.is_some())
            .finish()
    }
}

/// Asynchronous I/O capability keyed by a query string.
pub trait RequestSource<T>: Send {
    fn request(&self, query: &str) -> Request<T>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_request_resolves() {
        let request = Request::new(async { Ok::<_, RequestError>(42) });
        assert_eq!(pollster::block_on(request), Ok(42));
    }

    #[test]
    fn test_request_failure() {
        let request: Request<u32> = Request::new(async {
            Err(RequestError::Failed {
                message: "offline".into(),
            })
        });
        let err = pollster::block_on(request).unwrap_err();
        assert_eq!(err.to_string(), "Request failed: offline");
    }

    #[test]
    fn test_cancel_runs_hook() {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();
        let request = Request::new(futures_lite::future::pending::<Result<u32, RequestError>>())
            .with_cancel(move || flag.store(true, Ordering::SeqCst));

        request.cancel();
        assert!(cancelled.load(Ordering::SeqCst));
    }
}
