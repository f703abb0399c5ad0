//! Cancellation of in-flight fetches tied to a component's lifetime.
//!
//! Hooks create one [`FetchScope`] per mounted component, run every request
//! through it and cancel it on teardown, so a response that arrives after
//! unmount is dropped instead of updating dead state.

use futures::future::{AbortHandle, Abortable};
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use super::rest::ApiError;

#[derive(Default)]
struct ScopeState {
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
    cancelled: bool,
}

/// Group of requests that are cancelled together
#[derive(Clone, Default)]
pub struct FetchScope {
    state: Arc<Mutex<ScopeState>>,
}

impl FetchScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `request` unless the scope is cancelled first. A cancelled request
    /// resolves to [`ApiError::Cancelled`], converted into the request's own
    /// error type.
    pub async fn run<F, T, E>(&self, request: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<ApiError>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.cancelled {
                return Err(ApiError::Cancelled.into());
            }
            let id = state.next_id;
            state.next_id += 1;
            state.in_flight.insert(id, handle);
            id
        };

        let outcome = Abortable::new(request, registration).await;

        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&id);

        match outcome {
            Ok(result) => result,
            Err(_aborted) => Err(ApiError::Cancelled.into()),
        }
    }

    /// Abort everything in flight and refuse new requests
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.cancelled = true;
        let pending = state.in_flight.len();
        for (_, handle) in state.in_flight.drain() {
            handle.abort();
        }
        if pending > 0 {
            debug!("Cancelled {} in-flight request(s)", pending);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).cancelled
    }

    pub fn in_flight(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).in_flight.len()
    }
}
