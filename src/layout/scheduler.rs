use std::{
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use tokio::{task::JoinHandle, time::sleep};
use tracing::debug;

use crate::layout::{
    error::LayoutError,
    run::{Run, RunReport},
    surface::Surface,
};

pub type SharedSurface<S> = Arc<Mutex<S>>;

/// Handle to the tick chain of one scheduled run.
#[derive(Debug)]
pub struct RunHandle {
    task: JoinHandle<Option<RunReport>>,
    cancelled: Arc<AtomicBool>,
}

impl RunHandle {
    /// Stops the run. A tick already waiting on the surface lock sees the
    /// flag once it gets the lock and steps no further.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// `None` when the run was cancelled before it finished.
    pub async fn finish(self) -> Option<RunReport> {
        self.task.await.ok().flatten()
    }
}

/// A drawing surface with at most one active layout run.
#[derive(Debug)]
pub struct Board<S> {
    surface: SharedSurface<S>,
    active: Option<RunHandle>,
}

impl<S> Board<S>
where
    S: Surface + Send + 'static,
{
    pub fn new(surface: S) -> Self {
        Self {
            surface: Arc::new(Mutex::new(surface)),
            active: None,
        }
    }

    #[must_use]
    pub fn surface(&self) -> SharedSurface<S> {
        Arc::clone(&self.surface)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancels whatever run is pending, then begins `run` and schedules its
    /// ticks. Must be called from within a tokio runtime.
    pub fn start(&mut self, mut run: Run) -> Result<(), LayoutError> {
        self.cancel();
        {
            let mut surface = self.surface.lock().unwrap_or_else(PoisonError::into_inner);
            run.begin(&mut *surface)?;
        }
        let surface = Arc::clone(&self.surface);
        let wait = run.options().wait;
        let cancelled = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn(drive(run, surface, wait, Arc::clone(&cancelled)));
        self.active = Some(RunHandle { task, cancelled });
        Ok(())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.active.take() {
            debug!("cancelling pending layout run");
            handle.cancel();
        }
    }

    /// Waits for the active run, if any.
    pub async fn finish(&mut self) -> Option<RunReport> {
        self.active.take()?.finish().await
    }
}

async fn drive<S>(
    mut run: Run,
    surface: SharedSurface<S>,
    wait: Duration,
    cancelled: Arc<AtomicBool>,
) -> Option<RunReport>
where
    S: Surface + Send + 'static,
{
    loop {
        let state = {
            let mut guard = surface.lock().unwrap_or_else(PoisonError::into_inner);
            if cancelled.load(Ordering::SeqCst) {
                debug!(index = run.index(), "cancelled run left the surface");
                return None;
            }
            run.step(&mut *guard)
        };
        if state.is_terminal() {
            break;
        }
        if wait.is_zero() {
            tokio::task::yield_now().await;
        } else {
            sleep(wait).await;
        }
    }
    Some(run.into_report())
}
