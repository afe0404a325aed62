//! Restartable task supervision.
//!
//! The engine's workers run as named tasks under a [`Supervisor`]. Each task
//! is spawned from a factory so a finished or crashed run can be replaced
//! according to its [`RestartPolicy`]. A single watch channel fans the stop
//! signal out to every run, including runs started after the signal was sent.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// What to do when a supervised task's run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    /// Run once and leave it at that.
    Never,
    /// Replace finished or crashed runs, at most `max_restarts` times.
    OnExit {
        /// Restart budget; once exhausted the task is abandoned.
        max_restarts: u32,
    },
}

/// Supervises named tasks and fans a shutdown signal out to them.
#[derive(Debug)]
pub struct Supervisor {
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl Supervisor {
    /// Creates a supervisor with no tasks.
    #[must_use]
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            shutdown,
            tasks: Vec::new(),
        }
    }

    /// Returns a receiver observing the supervisor's stop signal.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown.subscribe()
    }

    /// Number of supervised tasks.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Spawns a named task built from `factory`.
    ///
    /// The factory is invoked once per run and receives a fresh stop-signal
    /// receiver each time. A run that panics is caught and counted as an
    /// exit; the policy then decides whether a replacement run starts.
    pub fn spawn<F, Fut>(&mut self, name: impl Into<String>, policy: RestartPolicy, mut factory: F)
    where
        F: FnMut(watch::Receiver<bool>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let shutdown = self.shutdown.subscribe();
        let handle = tokio::spawn(async move {
            let mut restarts = 0u32;
            loop {
                // A separate spawn isolates a panicking run from this loop.
                let run = tokio::spawn(factory(shutdown.clone()));
                let crashed = run.await.is_err();
                if *shutdown.borrow() {
                    debug!(task = %name, "supervised task stopped");
                    break;
                }
                match policy {
                    RestartPolicy::Never => {
                        if crashed {
                            warn!(task = %name, "supervised task crashed and will not be restarted");
                        }
                        break;
                    }
                    RestartPolicy::OnExit { max_restarts } => {
                        if restarts >= max_restarts {
                            warn!(task = %name, restarts, "supervised task exhausted its restart budget");
                            break;
                        }
                        restarts += 1;
                        warn!(task = %name, restarts, crashed, "restarting supervised task");
                    }
                }
            }
        });
        self.tasks.push(handle);
    }

    /// Signals every task to stop and waits for all of them to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        for task in self.tasks {
            let _ = task.await;
        }
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}
