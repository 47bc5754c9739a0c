use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{trace, warn};

use crate::util::{name_of, WaitGuard};
use crate::{LimitedBuf, WaitGroup};

use super::io::{IoCtx, Reply};
use super::*;

/// Unit of work submitted to a [`Spawn`] implementation.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Callback that receives asynchronous responses as `(conn, pdu)`.
pub type RspFn = Arc<dyn Fn(u16, &[u8]) + Send + Sync>;

/// Error returned when a task cannot be started.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpawnError {
    #[error("task executor is shut down")]
    Shutdown,
    #[error("failed to start thread: {0}")]
    Thread(#[from] std::io::Error),
}

/// Task executor used for asynchronous handler dispatch. A task that is
/// dropped without being run is not lost. If it is dropped before `spawn`
/// returns, the request is handled synchronously by the caller. Otherwise, it
/// runs on the thread that drops it and the response is delivered through the
/// normal asynchronous callback.
pub trait Spawn: Send + Sync {
    /// Starts `task` in the background.
    fn spawn(&self, task: Task) -> std::result::Result<(), SpawnError>;
}

/// Executor that runs each task on a new OS thread.
#[derive(Clone, Debug, Default)]
pub struct ThreadSpawner {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl ThreadSpawner {
    /// Creates a thread spawner with default thread parameters.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name of spawned threads.
    #[inline]
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the stack size of spawned threads.
    #[inline]
    #[must_use]
    pub fn stack_size(mut self, n: usize) -> Self {
        self.stack_size = Some(n);
        self
    }
}

impl Spawn for ThreadSpawner {
    fn spawn(&self, task: Task) -> std::result::Result<(), SpawnError> {
        let mut b = thread::Builder::new();
        if let Some(name) = &self.name {
            b = b.name(name.clone());
        }
        if let Some(n) = self.stack_size {
            b = b.stack_size(n);
        }
        b.spawn(task)?;
        Ok(())
    }
}

/// Executor that runs each task on the blocking thread pool of a tokio
/// runtime.
#[derive(Clone, Debug)]
pub struct TokioSpawner(tokio::runtime::Handle);

impl TokioSpawner {
    /// Creates a spawner for the specified runtime.
    #[inline(always)]
    #[must_use]
    pub const fn new(rt: tokio::runtime::Handle) -> Self {
        Self(rt)
    }

    /// Creates a spawner for the current runtime, if any.
    #[inline]
    #[must_use]
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self)
    }
}

impl Spawn for TokioSpawner {
    #[inline]
    fn spawn(&self, task: Task) -> std::result::Result<(), SpawnError> {
        // A runtime that is shut down drops the task without running it, which
        // is handled by the dispatcher. Completion is tracked by the WaitGroup.
        drop(self.0.spawn_blocking(task));
        Ok(())
    }
}

/// Asynchronous dispatch configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AsyncConfig {
    /// Maximum number of handler invocations in flight. Requests beyond this
    /// limit are handled synchronously.
    pub max_in_flight: usize,
}

impl Default for AsyncConfig {
    #[inline]
    fn default() -> Self {
        Self { max_in_flight: 8 }
    }
}

/// Handler invocation that owns a copy of the request payload.
#[derive(Debug)]
pub(super) struct Job {
    pub ctx: IoCtx,
    pub io: Io,
    pub value: LimitedBuf,
}

impl Job {
    /// Runs the handler synchronously, writing any response into `b`.
    #[inline]
    pub fn run(&self, b: &mut LimitedBuf) -> Reply {
        self.io.call(self.ctx, &self.value, b)
    }
}

/// Job state shared between the dispatcher and the spawned task.
#[derive(Debug)]
struct Pending {
    job: Job,
    _permit: OwnedSemaphorePermit,
    _guard: WaitGuard,
}

/// Ownership of a submitted job.
#[derive(Debug)]
struct Slot {
    pending: Option<Pending>,
    /// Whether `spawn` returned and the task became responsible for the job.
    detached: bool,
}

/// Task side of a submitted job. If the task is dropped without running
/// after being detached, the job runs on the dropping thread.
struct Runner {
    slot: Arc<Mutex<Slot>>,
    on_rsp: RspFn,
}

impl Runner {
    fn run(&self) {
        let Some(p) = self.slot.lock().pending.take() else { return };
        let mut b = LimitedBuf::default();
        let conn = p.job.ctx.conn;
        if p.job.run(&mut b) == Reply::Send {
            trace!("Async response for {conn:#06X}: {:02X?}", b.as_ref());
            (self.on_rsp)(conn, &b);
        }
        // Permit and WaitGroup registration are released after the callback
        // returns.
        drop(p);
    }
}

impl Drop for Runner {
    fn drop(&mut self) {
        let orphaned = {
            let s = self.slot.lock();
            s.detached && s.pending.is_some()
        };
        if orphaned {
            warn!("GATT handler task dropped without running, running it now");
            self.run();
        }
    }
}

/// Dispatcher of handler invocations to background tasks.
pub(super) struct AsyncDispatch {
    spawner: Arc<dyn Spawn>,
    on_rsp: RspFn,
    permits: Arc<Semaphore>,
    wg: Arc<WaitGroup>,
}

impl AsyncDispatch {
    /// Creates a new dispatcher.
    pub fn new(
        spawner: Arc<dyn Spawn>,
        cfg: AsyncConfig,
        on_rsp: RspFn,
        wg: Arc<WaitGroup>,
    ) -> Self {
        Self {
            spawner,
            on_rsp,
            permits: Arc::new(Semaphore::new(cfg.max_in_flight.min(Semaphore::MAX_PERMITS))),
            wg,
        }
    }

    /// Starts `job` in the background. The job is returned if it could not be
    /// started, in which case the caller must run it synchronously. Each job
    /// produces at most one response, either through the caller or through
    /// the response callback.
    pub fn submit(&self, job: Job) -> std::result::Result<(), Job> {
        let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() else {
            warn!("GATT handler limit reached, running {:?} synchronously", job.ctx.req);
            return Err(job);
        };
        let slot = Arc::new(Mutex::new(Slot {
            pending: Some(Pending {
                job,
                _permit: permit,
                _guard: self.wg.add(),
            }),
            detached: false,
        }));
        let r = Runner {
            slot: Arc::clone(&slot),
            on_rsp: Arc::clone(&self.on_rsp),
        };
        let res = self.spawner.spawn(Box::new(move || r.run()));
        let mut s = slot.lock();
        match res {
            // The task is alive and will either run or be dropped later
            Ok(()) if Arc::strong_count(&slot) > 1 => {
                s.detached = true;
                return Ok(());
            }
            Ok(()) if s.pending.is_some() => {
                warn!("GATT handler task dropped by executor, running synchronously");
            }
            Ok(()) => {}
            Err(e) => warn!("Failed to spawn GATT handler ({e}), running synchronously"),
        }
        s.pending.take().map_or(Ok(()), |p| Err(p.job))
    }
}

impl Debug for AsyncDispatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        (f.debug_struct(name_of!(AsyncDispatch)))
            .field("available", &self.permits.available_permits())
            .field("in_flight", &self.wg.len())
            .finish_non_exhaustive()
    }
}
