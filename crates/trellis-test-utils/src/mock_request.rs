//! Mock request source whose responses are delivered manually.
//!
//! Every call to [`RequestSource::request`] opens a slot. The test fills it with
//! [`MockRequestSource::respond`] and the matching future resolves the next
//! time it is polled. Cancelled requests are recorded, and responding to them
//! has no observable effect because their futures have already been dropped.

use std::sync::Arc;
use std::task::{Poll, Waker};

use futures_lite::future;
use parking_lot::Mutex;
use trellis_core::{Request, RequestError, RequestSource};

struct Slot<T> {
    result: Option<Result<T, RequestError>>,
    waker: Option<Waker>,
    finished: bool,
    cancelled: bool,
}

struct Entry<T> {
    query: String,
    slot: Arc<Mutex<Slot<T>>>,
}

struct SourceState<T> {
    entries: Vec<Entry<T>>,
    cancelled: Vec<String>,
}

/// Shared handle to a manually driven request source.
///
/// Clones share state, so a test can keep one handle while a widget owns another.
pub struct MockRequestSource<T> {
    state: Arc<Mutex<SourceState<T>>>,
}

impl<T> Clone for MockRequestSource<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Send + 'static> MockRequestSource<T> {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SourceState {
                entries: Vec::new(),
                cancelled: Vec::new(),
            })),
        }
    }

    /// Queries in the order they were requested.
    pub fn issued(&self) -> Vec<String> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|e| e.query.clone())
            .collect()
    }

    /// Queries whose requests were cancelled, in cancellation order.
    pub fn cancelled(&self) -> Vec<String> {
        self.state.lock().cancelled.clone()
    }

    /// Requests that are neither finished nor cancelled.
    pub fn in_flight(&self) -> Vec<String> {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|e| {
                let slot = e.slot.lock();
                !slot.finished && !slot.cancelled
            })
            .map(|e| e.query.clone())
            .collect()
    }

    /// Deliver a result to the most recent request for `query`.
    ///
    /// Returns `false` when no request for `query` was ever issued.
    pub fn respond(&self, query: &str, result: Result<T, RequestError>) -> bool {
        let slot = {
            let state = self.state.lock();
            match state.entries.iter().rev().find(|e| e.query == query) {
                Some(entry) => entry.slot.clone(),
                None => return false,
            }
        };
        let waker = {
            let mut slot = slot.lock();
            slot.result = Some(result);
            slot.waker.take()
        };
        if let Some(waker) = waker {
            waker.wake();
        }
        true
    }
}

impl<T: Send + 'static> Default for MockRequestSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static> RequestSource<T> for MockRequestSource<T> {
    fn request(&self, query: &str) -> Request<T> {
        let slot = Arc::new(Mutex::new(Slot {
            result: None,
            waker: None,
            finished: false,
            cancelled: false,
        }));
        self.state.lock().entries.push(Entry {
            query: query.to_string(),
            slot: slot.clone(),
        });

        let poll_slot = slot.clone();
        let fut = future::poll_fn(move |cx| {
            let mut slot = poll_slot.lock();
            match slot.result.take() {
                Some(result) => {
                    slot.finished = true;
                    Poll::Ready(result)
                }
                None => {
                    slot.waker = Some(cx.waker().clone());
                    Poll::Pending
                }
            }
        });

        let state = self.state.clone();
        let cancelled_query = query.to_string();
        Request::new(fut).with_cancel(move || {
            slot.lock().cancelled = true;
            state.lock().cancelled.push(cancelled_query);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::task::Context;

    #[test]
    fn test_respond_resolves_request() {
        let source = MockRequestSource::<u32>::new();
        let mut request = source.request("cat");
        let mut cx = Context::from_waker(Waker::noop());

        assert!(request.poll(&mut cx).is_pending());
        assert!(source.respond("cat", Ok(7)));
        assert_eq!(request.poll(&mut cx), Poll::Ready(Ok(7)));
        assert!(source.in_flight().is_empty());
    }

    #[test]
    fn test_cancel_recorded() {
        let source = MockRequestSource::<u32>::new();
        let request = source.request("cat");
        assert_eq!(source.in_flight(), vec!["cat".to_string()]);

        request.cancel();
        assert_eq!(source.cancelled(), vec!["cat".to_string()]);
        assert!(source.in_flight().is_empty());
    }

    #[test]
    fn test_respond_unknown_query() {
        let source = MockRequestSource::<u32>::new();
        assert!(!source.respond("dog", Ok(1)));
    }
}
