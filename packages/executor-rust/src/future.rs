//! Listener-based future/promise pair.
//!
//! A [`Promise`] is the write end, a [`TaskFuture`] the clonable read end
//! of one completion cell. Listeners registered on the future run exactly
//! once with the completion outcome: immediately on the registering thread
//! if the future is already complete, otherwise on the completing thread,
//! in registration order. The future also implements [`std::future::Future`]
//! so callers can `.await` it.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

use parking_lot::Mutex;

use crate::error::{ExecutorError, TaskError};

/// Completion outcome shared by every observer of one future.
///
/// `Arc`-shared so any number of listeners can inspect the result without
/// requiring `T: Clone`.
pub type Outcome<T> = Arc<Result<T, TaskError>>;

type Listener<T> = Box<dyn FnOnce(Outcome<T>) + Send>;

enum State<T> {
    Pending {
        listeners: Vec<Listener<T>>,
        wakers: Vec<Waker>,
    },
    Complete(Outcome<T>),
}

struct Shared<T> {
    state: Mutex<State<T>>,
}

// ---------------------------------------------------------------------------
// TaskFuture
// ---------------------------------------------------------------------------

/// Read end of a completion cell.
pub struct TaskFuture<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for TaskFuture<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for TaskFuture<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.shared.state.lock() {
            State::Pending { .. } => "pending",
            State::Complete(outcome) => match outcome.as_ref() {
                Ok(_) => "succeeded",
                Err(TaskError::Cancelled) => "cancelled",
                Err(_) => "failed",
            },
        };
        f.debug_struct("TaskFuture").field("state", &state).finish()
    }
}

impl<T> TaskFuture<T> {
    fn new_pending() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Pending {
                    listeners: Vec::new(),
                    wakers: Vec::new(),
                }),
            }),
        }
    }

    /// A future that is already complete with `value`.
    #[must_use]
    pub fn succeeded(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Complete(Arc::new(Ok(value)))),
            }),
        }
    }

    /// A future that is already complete with `cause`.
    #[must_use]
    pub fn failed(cause: TaskError) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Complete(Arc::new(Err(cause)))),
            }),
        }
    }

    /// Registers a completion listener.
    ///
    /// Runs immediately (on the calling thread) if the future is already
    /// complete; otherwise it is queued and runs on the completing thread.
    pub fn add_listener<L>(&self, listener: L)
    where
        L: FnOnce(Outcome<T>) + Send + 'static,
    {
        let immediate = {
            let mut state = self.shared.state.lock();
            match &mut *state {
                State::Pending { listeners, .. } => {
                    listeners.push(Box::new(listener));
                    None
                }
                State::Complete(outcome) => Some((listener, Arc::clone(outcome))),
            }
        };
        if let Some((listener, outcome)) = immediate {
            listener(outcome);
        }
    }

    /// Whether the future has completed (successfully or not).
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(&*self.shared.state.lock(), State::Complete(_))
    }

    /// Whether the future completed through cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            &*self.shared.state.lock(),
            State::Complete(outcome) if matches!(outcome.as_ref(), Err(TaskError::Cancelled))
        )
    }

    /// Cancels the future if it is still pending.
    ///
    /// Returns `true` if this call completed the future with
    /// [`TaskError::Cancelled`], `false` if it was already complete.
    pub fn cancel(&self) -> bool {
        self.complete(Err(TaskError::Cancelled)).is_ok()
    }

    /// The completion outcome, if complete.
    #[must_use]
    pub fn result_now(&self) -> Option<Outcome<T>> {
        match &*self.shared.state.lock() {
            State::Complete(outcome) => Some(Arc::clone(outcome)),
            State::Pending { .. } => None,
        }
    }

    /// Completes the cell, draining listeners and wakers.
    ///
    /// Listeners run outside the state lock, on the calling thread.
    fn complete(&self, outcome: Result<T, TaskError>) -> Result<(), ExecutorError> {
        let (listeners, wakers, outcome) = {
            let mut state = self.shared.state.lock();
            match &mut *state {
                State::Complete(_) => return Err(ExecutorError::AlreadyComplete),
                State::Pending { listeners, wakers } => {
                    let listeners = std::mem::take(listeners);
                    let wakers = std::mem::take(wakers);
                    let outcome = Arc::new(outcome);
                    *state = State::Complete(Arc::clone(&outcome));
                    (listeners, wakers, outcome)
                }
            }
        };
        for listener in listeners {
            listener(Arc::clone(&outcome));
        }
        for waker in wakers {
            waker.wake();
        }
        Ok(())
    }
}

impl<T> std::future::Future for TaskFuture<T> {
    type Output = Outcome<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let mut state = this.shared.state.lock();
        match &mut *state {
            State::Complete(outcome) => Poll::Ready(Arc::clone(outcome)),
            State::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Promise
// ---------------------------------------------------------------------------

/// Write end of a completion cell.
pub struct Promise<T> {
    future: TaskFuture<T>,
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            future: self.future.clone(),
        }
    }
}

impl<T> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Promise").field("future", &self.future).finish()
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Promise<T> {
    /// Creates a pending promise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            future: TaskFuture::new_pending(),
        }
    }

    /// The read end of this promise.
    #[must_use]
    pub fn future(&self) -> TaskFuture<T> {
        self.future.clone()
    }

    /// Completes with `value`.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_success(&self, value: T) -> Result<(), ExecutorError> {
        self.future.complete(Ok(value))
    }

    /// Completes with `cause`.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_failure(&self, cause: TaskError) -> Result<(), ExecutorError> {
        self.future.complete(Err(cause))
    }

    /// Completes with `value` unless already complete; returns whether this
    /// call won the completion.
    pub fn try_success(&self, value: T) -> bool {
        self.future.complete(Ok(value)).is_ok()
    }

    /// Completes with `cause` unless already complete; returns whether this
    /// call won the completion.
    pub fn try_failure(&self, cause: TaskError) -> bool {
        self.future.complete(Err(cause)).is_ok()
    }
}

// ---------------------------------------------------------------------------
// ProgressivePromise
// ---------------------------------------------------------------------------

struct ProgressState {
    listeners: Vec<Box<dyn FnMut(u64, u64) + Send>>,
    last: Option<(u64, u64)>,
}

/// A [`Promise`] that additionally reports progress `(current, total)`.
pub struct ProgressivePromise<T> {
    promise: Promise<T>,
    progress: Arc<Mutex<ProgressState>>,
}

impl<T> Clone for ProgressivePromise<T> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
            progress: Arc::clone(&self.progress),
        }
    }
}

impl<T> std::fmt::Debug for ProgressivePromise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressivePromise")
            .field("future", &self.promise.future)
            .field("last_progress", &self.progress.lock().last)
            .finish()
    }
}

impl<T> Default for ProgressivePromise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProgressivePromise<T> {
    /// Creates a pending progressive promise.
    #[must_use]
    pub fn new() -> Self {
        Self {
            promise: Promise::new(),
            progress: Arc::new(Mutex::new(ProgressState {
                listeners: Vec::new(),
                last: None,
            })),
        }
    }

    /// The read end of this promise.
    #[must_use]
    pub fn future(&self) -> TaskFuture<T> {
        self.promise.future()
    }

    /// Reports progress to every registered progress listener.
    ///
    /// Listeners run on the calling thread, outside the internal lock.
    pub fn set_progress(&self, current: u64, total: u64) {
        let mut invoking = {
            let mut state = self.progress.lock();
            state.last = Some((current, total));
            std::mem::take(&mut state.listeners)
        };
        for listener in &mut invoking {
            listener(current, total);
        }
        // Merge back, keeping listeners registered during the callbacks.
        let mut state = self.progress.lock();
        invoking.append(&mut state.listeners);
        state.listeners = invoking;
    }

    /// Registers a progress listener, invoked on every subsequent progress
    /// update. A listener registered after progress has been reported first
    /// observes the most recent `(current, total)`.
    pub fn add_progress_listener<L>(&self, listener: L)
    where
        L: FnMut(u64, u64) + Send + 'static,
    {
        let listener = Arc::new(Mutex::new(listener));
        let entry = Arc::clone(&listener);
        // Registration and the replay snapshot happen under one acquisition,
        // so an update landing in between can be neither skipped nor
        // delivered ahead of the older value it replays.
        let replay = {
            let mut state = self.progress.lock();
            state
                .listeners
                .push(Box::new(move |current, total| (*entry.lock())(current, total)));
            state.last.map(|progress| (progress, listener.lock()))
        };
        if let Some(((current, total), mut replaying)) = replay {
            (*replaying)(current, total);
        }
    }

    /// Completes with `value`.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_success(&self, value: T) -> Result<(), ExecutorError> {
        self.promise.set_success(value)
    }

    /// Completes with `cause`.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::AlreadyComplete`] if the promise was completed.
    pub fn set_failure(&self, cause: TaskError) -> Result<(), ExecutorError> {
        self.promise.set_failure(cause)
    }

    /// Completes with `value` unless already complete.
    pub fn try_success(&self, value: T) -> bool {
        self.promise.try_success(value)
    }

    /// Completes with `cause` unless already complete.
    pub fn try_failure(&self, cause: TaskError) -> bool {
        self.promise.try_failure(cause)
    }
}
