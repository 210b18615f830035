//! Single-consumer event loop and loop group.
//!
//! One tokio task drains one unbounded queue, so tasks submitted to a loop
//! run in FIFO order with no two tasks of the same loop ever running
//! concurrently. Delayed and periodic scheduling is driven by timer tasks
//! that hand the actual execution back to the loop, preserving the
//! single-consumer ordering.
//!
//! Handles are cheap to clone; the consumer stops when every handle is
//! dropped or when [`EventLoop::shutdown_gracefully`] is called.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, watch};

use crate::error::{ExecutorError, TaskError};
use crate::future::{ProgressivePromise, Promise, TaskFuture};

type LoopTask = Box<dyn FnOnce() + Send>;

static NEXT_LOOP_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    // Id of the loop currently executing a task on this thread; 0 = none.
    static RUNNING_LOOP: Cell<u64> = const { Cell::new(0) };
}

// ---------------------------------------------------------------------------
// EventLoop
// ---------------------------------------------------------------------------

/// Clonable handle to a single-consumer task loop.
#[derive(Clone)]
pub struct EventLoop {
    shared: Arc<LoopShared>,
}

struct LoopShared {
    id: u64,
    name: String,
    tx: mpsc::UnboundedSender<LoopTask>,
    shutting_down: AtomicBool,
    shutdown: watch::Sender<bool>,
    termination: Promise<()>,
    parent: OnceLock<EventLoopGroup>,
}

impl std::fmt::Debug for EventLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("id", &self.shared.id)
            .field("name", &self.shared.name)
            .field("shutting_down", &self.is_shutting_down())
            .finish()
    }
}

impl EventLoop {
    /// Starts a new loop. Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let id = NEXT_LOOP_ID.fetch_add(1, Ordering::Relaxed);
        let (tx, mut rx) = mpsc::unbounded_channel::<LoopTask>();
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let termination = Promise::new();

        let loop_termination = termination.clone();
        let loop_name = name.clone();
        tokio::spawn(async move {
            tracing::debug!(loop_id = id, name = %loop_name, "event loop started");
            loop {
                tokio::select! {
                    task = rx.recv() => {
                        match task {
                            Some(task) => run_task(id, task),
                            None => break, // Every handle dropped.
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
            // Closing the queue first makes a send racing the shutdown
            // signal fail, so `enqueue` reports `Rejected` instead of
            // accepting a task the drain below can no longer see.
            rx.close();
            // Graceful part: tasks accepted before the queue closed are
            // still executed, and the backlog is finite.
            while let Ok(task) = rx.try_recv() {
                run_task(id, task);
            }
            let _ = loop_termination.try_success(());
            tracing::debug!(loop_id = id, name = %loop_name, "event loop terminated");
        });

        Self {
            shared: Arc::new(LoopShared {
                id,
                name,
                tx,
                shutting_down: AtomicBool::new(false),
                shutdown: shutdown_tx,
                termination,
                parent: OnceLock::new(),
            }),
        }
    }

    /// Submits a fire-and-forget task.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn execute<F>(&self, task: F) -> Result<(), ExecutorError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(task))
    }

    /// Submits a task and returns a future for its result.
    ///
    /// A panicking task completes the future with [`TaskError::Panicked`];
    /// the loop itself survives.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn submit<F, R>(&self, task: F) -> Result<TaskFuture<R>, ExecutorError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + Sync + 'static,
    {
        let promise = Promise::new();
        let future = promise.future();
        self.enqueue(completion_task(promise, task))?;
        Ok(future)
    }

    /// Runs `task` on the loop after `delay`.
    ///
    /// Cancelling the returned future before the task has started
    /// guarantees the task closure is never invoked.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn schedule<F, R>(&self, task: F, delay: Duration) -> Result<TaskFuture<R>, ExecutorError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + Sync + 'static,
    {
        if self.is_shutting_down() {
            return Err(ExecutorError::Rejected);
        }
        let promise = Promise::new();
        let future = promise.future();

        let this = self.clone();
        let cancel_watch = future.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                // The future resolving during the delay means it was
                // cancelled; never hand the task to the loop.
                _ = cancel_watch.clone() => return,
            }
            if this.enqueue(completion_task(promise.clone(), task)).is_err() {
                let _ = promise.try_failure(TaskError::Failed(
                    "event loop shut down before the scheduled task ran".into(),
                ));
            }
        });
        Ok(future)
    }

    /// Runs `task` on the loop repeatedly at a fixed interval, starting
    /// after `initial_delay`.
    ///
    /// The returned future completes only through [`TaskFuture::cancel`],
    /// a panicking tick, or loop shutdown.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::InvalidArgument`] for a zero `period`;
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn schedule_at_fixed_rate<F>(
        &self,
        task: F,
        initial_delay: Duration,
        period: Duration,
    ) -> Result<TaskFuture<()>, ExecutorError>
    where
        F: FnMut() + Send + 'static,
    {
        if period.is_zero() {
            return Err(ExecutorError::InvalidArgument("period must be non-zero"));
        }
        self.spawn_periodic(task, initial_delay, period, false)
    }

    /// Like [`schedule_at_fixed_rate`](Self::schedule_at_fixed_rate), but
    /// each delay starts only after the previous run has finished on the
    /// loop, so runs never pile up behind a slow task.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::InvalidArgument`] for a zero `delay`;
    /// [`ExecutorError::Rejected`] if the loop is shutting down.
    pub fn schedule_with_fixed_delay<F>(
        &self,
        task: F,
        initial_delay: Duration,
        delay: Duration,
    ) -> Result<TaskFuture<()>, ExecutorError>
    where
        F: FnMut() + Send + 'static,
    {
        if delay.is_zero() {
            return Err(ExecutorError::InvalidArgument("delay must be non-zero"));
        }
        self.spawn_periodic(task, initial_delay, delay, true)
    }

    fn spawn_periodic<F>(
        &self,
        task: F,
        initial_delay: Duration,
        interval: Duration,
        fixed_delay: bool,
    ) -> Result<TaskFuture<()>, ExecutorError>
    where
        F: FnMut() + Send + 'static,
    {
        if self.is_shutting_down() {
            return Err(ExecutorError::Rejected);
        }
        let promise = Promise::new();
        let future = promise.future();

        let this = self.clone();
        let job = Arc::new(Mutex::new(task));
        let state = future.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(initial_delay) => {}
                _ = state.clone() => return,
            }
            loop {
                if state.is_done() {
                    return;
                }
                let tick_done = Promise::new();
                let tick_future = tick_done.future();
                let job = Arc::clone(&job);
                let guard = state.clone();
                let tick_promise = promise.clone();
                let enqueued = this.enqueue(Box::new(move || {
                    if guard.is_done() {
                        let _ = tick_done.try_success(());
                        return;
                    }
                    let run = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        (*job.lock())();
                    }));
                    if let Err(panic) = run {
                        // A panicking tick terminates the whole periodic
                        // schedule, matching one-shot task semantics.
                        let _ = tick_promise.try_failure(TaskError::Panicked(panic_message(&*panic)));
                    }
                    let _ = tick_done.try_success(());
                }));
                if enqueued.is_err() {
                    let _ = promise.try_failure(TaskError::Failed(
                        "event loop shut down during periodic schedule".into(),
                    ));
                    return;
                }
                if fixed_delay {
                    tick_future.await;
                }
                tokio::select! {
                    () = tokio::time::sleep(interval) => {}
                    _ = state.clone() => return,
                }
            }
        });
        Ok(future)
    }

    fn enqueue(&self, task: LoopTask) -> Result<(), ExecutorError> {
        if self.is_shutting_down() {
            return Err(ExecutorError::Rejected);
        }
        self.shared
            .tx
            .send(task)
            .map_err(|_| ExecutorError::Rejected)
    }

    /// A pending promise. Listeners attached to its future run on whatever
    /// thread completes it.
    #[must_use]
    pub fn new_promise<T>(&self) -> Promise<T> {
        Promise::new()
    }

    /// A pending promise with progress reporting.
    #[must_use]
    pub fn new_progressive_promise<T>(&self) -> ProgressivePromise<T> {
        ProgressivePromise::new()
    }

    /// An already-succeeded future.
    #[must_use]
    pub fn new_succeeded_future<T>(&self, value: T) -> TaskFuture<T> {
        TaskFuture::succeeded(value)
    }

    /// An already-failed future.
    #[must_use]
    pub fn new_failed_future<T>(&self, cause: TaskError) -> TaskFuture<T> {
        TaskFuture::failed(cause)
    }

    /// Whether the calling code is running as a task on this loop.
    #[must_use]
    pub fn in_event_loop(&self) -> bool {
        RUNNING_LOOP.with(Cell::get) == self.shared.id
    }

    /// Whether the loop has begun shutting down.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.shared.shutting_down.load(Ordering::SeqCst)
    }

    /// Starts graceful shutdown: new submissions are rejected, tasks
    /// already queued still run, then the termination future completes.
    ///
    /// Idempotent; always returns the termination future.
    pub fn shutdown_gracefully(&self) -> TaskFuture<()> {
        let already = self.shared.shutting_down.swap(true, Ordering::SeqCst);
        if !already {
            tracing::info!(
                loop_id = self.shared.id,
                name = %self.shared.name,
                "event loop shutting down"
            );
            let _ = self.shared.shutdown.send(true);
        }
        self.termination_future()
    }

    /// Completes once the consumer has drained its backlog and stopped.
    #[must_use]
    pub fn termination_future(&self) -> TaskFuture<()> {
        self.shared.termination.future()
    }

    /// The group this loop belongs to, if it was created through one.
    #[must_use]
    pub fn parent(&self) -> Option<EventLoopGroup> {
        self.shared.parent.get().cloned()
    }

    /// The loop's name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Process-unique numeric identifier of this loop.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }
}

/// Builds the queue entry for a result-bearing task: skips execution if the
/// future was cancelled first, catches panics into the failure channel.
fn completion_task<F, R>(promise: Promise<R>, task: F) -> LoopTask
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + Sync + 'static,
{
    let guard = promise.future();
    Box::new(move || {
        if guard.is_cancelled() {
            return;
        }
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)) {
            Ok(value) => {
                let _ = promise.try_success(value);
            }
            Err(panic) => {
                let _ = promise.try_failure(TaskError::Panicked(panic_message(&*panic)));
            }
        }
    })
}

fn run_task(loop_id: u64, task: LoopTask) {
    RUNNING_LOOP.with(|current| current.set(loop_id));
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(task));
    RUNNING_LOOP.with(|current| current.set(0));
    if result.is_err() {
        // Result-bearing tasks route their panic into the future; this
        // catch keeps a panicking fire-and-forget task from killing the loop.
        tracing::warn!(loop_id, "task panicked on event loop");
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ---------------------------------------------------------------------------
// EventLoopGroup
// ---------------------------------------------------------------------------

/// Fixed set of event loops with round-robin assignment.
#[derive(Clone)]
pub struct EventLoopGroup {
    inner: Arc<GroupInner>,
}

struct GroupInner {
    name: String,
    loops: Vec<EventLoop>,
    next: AtomicUsize,
}

impl std::fmt::Debug for EventLoopGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoopGroup")
            .field("name", &self.inner.name)
            .field("size", &self.inner.loops.len())
            .finish()
    }
}

impl EventLoopGroup {
    /// Starts `size` loops named `{name}-{index}`.
    ///
    /// # Errors
    ///
    /// [`ExecutorError::InvalidArgument`] if `size` is zero.
    pub fn new(name: impl Into<String>, size: usize) -> Result<Self, ExecutorError> {
        if size == 0 {
            return Err(ExecutorError::InvalidArgument("group size must be non-zero"));
        }
        let name = name.into();
        let loops: Vec<EventLoop> = (0..size)
            .map(|index| EventLoop::new(format!("{name}-{index}")))
            .collect();
        let group = Self {
            inner: Arc::new(GroupInner {
                name,
                loops,
                next: AtomicUsize::new(0),
            }),
        };
        for event_loop in &group.inner.loops {
            let _ = event_loop.shared.parent.set(group.clone());
        }
        Ok(group)
    }

    /// The next loop, round-robin.
    #[must_use]
    pub fn next(&self) -> EventLoop {
        let index = self.inner.next.fetch_add(1, Ordering::Relaxed) % self.inner.loops.len();
        self.inner.loops[index].clone()
    }

    /// All member loops.
    #[must_use]
    pub fn loops(&self) -> &[EventLoop] {
        &self.inner.loops
    }

    /// The group's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether every member loop is shutting down.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.inner.loops.iter().all(EventLoop::is_shutting_down)
    }

    /// Shuts down every member loop; the returned future completes when all
    /// of them have terminated.
    pub fn shutdown_gracefully(&self) -> TaskFuture<()> {
        let promise = Promise::new();
        let future = promise.future();
        let remaining = Arc::new(AtomicUsize::new(self.inner.loops.len()));
        for event_loop in &self.inner.loops {
            let promise = promise.clone();
            let remaining = Arc::clone(&remaining);
            event_loop.shutdown_gracefully().add_listener(move |_| {
                if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
                    let _ = promise.try_success(());
                }
            });
        }
        future
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicU32;

    use super::*;

    #[tokio::test]
    async fn submit_runs_task_and_completes_future() {
        let event_loop = EventLoop::new("test");
        let future = event_loop.submit(|| 6 * 7).unwrap();
        assert_eq!(*future.await, Ok(42));
    }

    #[tokio::test]
    async fn tasks_run_in_submission_order() {
        let event_loop = EventLoop::new("fifo");
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut last = None;
        for i in 0..8 {
            let order = Arc::clone(&order);
            last = Some(event_loop.submit(move || order.lock().push(i)).unwrap());
        }
        last.unwrap().await;

        assert_eq!(*order.lock(), (0..8).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn in_event_loop_is_true_only_inside_tasks() {
        let event_loop = EventLoop::new("membership");
        assert!(!event_loop.in_event_loop());

        let handle = event_loop.clone();
        let inside = event_loop.submit(move || handle.in_event_loop()).unwrap();
        assert_eq!(*inside.await, Ok(true));
        assert!(!event_loop.in_event_loop());
    }

    #[tokio::test]
    async fn other_loops_tasks_are_not_in_this_loop() {
        let a = EventLoop::new("a");
        let b = EventLoop::new("b");

        let handle = a.clone();
        let seen_from_b = b.submit(move || handle.in_event_loop()).unwrap();
        assert_eq!(*seen_from_b.await, Ok(false));
    }

    #[tokio::test]
    async fn panicking_task_fails_its_future_and_loop_survives() {
        let event_loop = EventLoop::new("panics");

        let failed = event_loop.submit(|| panic!("task exploded")).unwrap();
        assert_eq!(
            *failed.await,
            Err(TaskError::Panicked("task exploded".into()))
        );

        let after = event_loop.submit(|| "still alive").unwrap();
        assert_eq!(*after.await, Ok("still alive"));
    }

    #[tokio::test]
    async fn execute_runs_fire_and_forget_tasks() {
        let event_loop = EventLoop::new("execute");
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        event_loop
            .execute(move || flag.store(true, Ordering::SeqCst))
            .unwrap();
        // Fence: the loop is FIFO, so awaiting a later submit proves the
        // earlier execute ran.
        event_loop.submit(|| ()).unwrap().await;

        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_runs_after_the_delay() {
        let event_loop = EventLoop::new("delayed");
        let future = event_loop
            .schedule(|| "later", Duration::from_millis(250))
            .unwrap();
        assert_eq!(*future.await, Ok("later"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_scheduled_task_never_runs() {
        let event_loop = EventLoop::new("cancel");
        let ran = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&ran);
        let future = event_loop
            .schedule(
                move || flag.store(true, Ordering::SeqCst),
                Duration::from_millis(100),
            )
            .unwrap();
        assert!(future.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        event_loop.submit(|| ()).unwrap().await;

        assert!(!ran.load(Ordering::SeqCst));
        assert!(future.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_rate_ticks_repeatedly_until_cancelled() {
        let event_loop = EventLoop::new("rate");
        let ticks = Arc::new(AtomicU32::new(0));

        let counter = Arc::clone(&ticks);
        let future = event_loop
            .schedule_at_fixed_rate(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
                Duration::from_millis(10),
                Duration::from_millis(50),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(ticks.load(Ordering::SeqCst) >= 2);

        future.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let settled = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), settled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn fixed_delay_waits_for_the_previous_run_to_finish() {
        let event_loop = EventLoop::new("no-overlap");
        let started = Arc::new(AtomicU32::new(0));
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();

        let counter = Arc::clone(&started);
        let future = event_loop
            .schedule_with_fixed_delay(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    // Hold the run open until the test releases it.
                    let _ = release_rx.recv();
                },
                Duration::from_millis(1),
                Duration::from_millis(1),
            )
            .unwrap();

        while started.load(Ordering::SeqCst) < 1 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        // The delay has elapsed many times over, but with the first run
        // still in progress the next one must not have started.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(started.load(Ordering::SeqCst), 1);

        release_tx.send(()).unwrap();
        while started.load(Ordering::SeqCst) < 2 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }

        future.cancel();
        drop(release_tx);
        tokio::time::sleep(Duration::from_millis(50)).await;
        let settled = started.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(started.load(Ordering::SeqCst), settled);
    }

    #[test]
    fn zero_period_is_rejected_synchronously() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();
        let event_loop = EventLoop::new("validate");

        assert_eq!(
            event_loop
                .schedule_at_fixed_rate(|| (), Duration::ZERO, Duration::ZERO)
                .unwrap_err(),
            ExecutorError::InvalidArgument("period must be non-zero")
        );
        assert_eq!(
            event_loop
                .schedule_with_fixed_delay(|| (), Duration::ZERO, Duration::ZERO)
                .unwrap_err(),
            ExecutorError::InvalidArgument("delay must be non-zero")
        );
    }

    #[tokio::test]
    async fn shutdown_drains_queued_tasks_then_terminates() {
        let event_loop = EventLoop::new("shutdown");
        let ran = Arc::new(AtomicU32::new(0));

        for _ in 0..5 {
            let counter = Arc::clone(&ran);
            event_loop
                .execute(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap();
        }

        let termination = event_loop.shutdown_gracefully();
        assert!(event_loop.is_shutting_down());
        assert_eq!(
            event_loop.submit(|| ()).unwrap_err(),
            ExecutorError::Rejected
        );

        termination.await;
        assert_eq!(ran.load(Ordering::SeqCst), 5);

        // Idempotent: a second call returns the same, completed future.
        assert!(event_loop.shutdown_gracefully().is_done());
    }

    #[tokio::test]
    async fn shutdown_never_strands_an_accepted_task() {
        let event_loop = EventLoop::new("race");

        let mut producers = Vec::new();
        for _ in 0..4 {
            let handle = event_loop.clone();
            producers.push(std::thread::spawn(move || {
                let mut accepted = Vec::new();
                for _ in 0..64 {
                    if let Ok(future) = handle.submit(|| ()) {
                        accepted.push(future);
                    }
                }
                accepted
            }));
        }

        tokio::time::sleep(Duration::from_millis(1)).await;
        event_loop.shutdown_gracefully().await;

        // Termination means the backlog was drained, so any submission
        // that returned `Ok` must have run by now.
        for producer in producers {
            for future in producer.join().unwrap() {
                assert!(future.is_done());
            }
        }
    }

    #[tokio::test]
    async fn group_round_robin_cycles_through_loops() {
        let group = EventLoopGroup::new("workers", 3).unwrap();
        let first = group.next();
        let second = group.next();
        let third = group.next();
        let fourth = group.next();

        assert_ne!(first.id(), second.id());
        assert_ne!(second.id(), third.id());
        assert_eq!(first.id(), fourth.id());
        assert_eq!(first.parent().unwrap().name(), "workers");
    }

    #[tokio::test]
    async fn group_shutdown_terminates_every_loop() {
        let group = EventLoopGroup::new("doomed", 2).unwrap();
        assert!(!group.is_shutting_down());

        group.shutdown_gracefully().await;
        assert!(group.is_shutting_down());
        for event_loop in group.loops() {
            assert!(event_loop.termination_future().is_done());
        }
    }

    #[test]
    fn zero_size_group_is_rejected() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();
        assert_eq!(
            EventLoopGroup::new("empty", 0).unwrap_err(),
            ExecutorError::InvalidArgument("group size must be non-zero")
        );
    }
}
