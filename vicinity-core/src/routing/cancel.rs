use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cooperative cancellation shared by all tasks of one analysis run.
///
/// Trips either when [`Cancellation::cancel`] is called on any clone or
/// when the optional deadline passes.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
            || self
                .deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Guard that cancels every clone once it is dropped.
    ///
    /// Holding it in the task that waits for the analysis stops the work
    /// as soon as that task is abandoned.
    pub fn drop_guard(&self) -> CancelOnDrop {
        CancelOnDrop {
            cancellation: self.clone(),
        }
    }
}

#[derive(Debug)]
pub struct CancelOnDrop {
    cancellation: Cancellation,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
