//! Periodic scheduling seam
//!
//! The engine exposes a pure `run_full_analysis` entry point and knows
//! nothing about how or when it is triggered. The hosting process registers
//! the engine with a [`Scheduler`]; [`TokioScheduler`] is the provided
//! implementation, driving registered tasks on a fixed cadence.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::engine::InsightsEngine;

/// A unit of periodic work
#[async_trait]
pub trait AnalysisTask: Send + Sync {
    /// Run the task once
    async fn run(&self);

    /// Name used in logs
    fn name(&self) -> &str {
        "analysis"
    }
}

#[async_trait]
impl AnalysisTask for InsightsEngine {
    async fn run(&self) {
        self.run_full_analysis().await;
    }

    fn name(&self) -> &str {
        "full-analysis"
    }
}

/// Registers periodic tasks with the hosting process
pub trait Scheduler {
    /// Run `task` every `interval`, starting one interval from now
    fn register_periodic(&self, interval: Duration, task: Arc<dyn AnalysisTask>);
}

/// Tokio-backed scheduler.
///
/// Each registered task gets its own interval loop on the current runtime.
/// Ticks that land while a run is still in flight are delayed rather than
/// bursted. Dropping the scheduler aborts every loop.
#[derive(Default)]
pub struct TokioScheduler {
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioScheduler {
    /// Create a scheduler with no registered tasks
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort every registered loop
    pub fn shutdown(&self) {
        let mut handles = match self.handles.lock() {
            Ok(handles) => handles,
            Err(poisoned) => poisoned.into_inner(),
        };
        for handle in handles.drain(..) {
            handle.abort();
        }
        info!("scheduler shut down");
    }
}

impl Scheduler for TokioScheduler {
    fn register_periodic(&self, interval: Duration, task: Arc<dyn AnalysisTask>) {
        debug!(task = task.name(), ?interval, "registering periodic task");

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the task
            // first fires one interval from registration.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                task.run().await;
            }
        });

        if let Ok(mut handles) = self.handles.lock() {
            handles.push(handle);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTask {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl AnalysisTask for CountingTask {
        async fn run(&self) {
            self.runs.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_periodic_task_fires_repeatedly() {
        let scheduler = TokioScheduler::new();
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
        });

        scheduler.register_periodic(Duration::from_millis(20), task.clone());
        tokio::time::sleep(Duration::from_millis(130)).await;
        scheduler.shutdown();

        let runs = task.runs.load(Ordering::SeqCst);
        assert!(runs >= 3, "expected several runs, got {runs}");
    }

    #[tokio::test]
    async fn test_task_does_not_fire_before_first_interval() {
        let scheduler = TokioScheduler::new();
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
        });

        scheduler.register_periodic(Duration::from_secs(3600), task.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.shutdown();

        assert_eq!(task.runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_firing() {
        let scheduler = TokioScheduler::new();
        let task = Arc::new(CountingTask {
            runs: AtomicUsize::new(0),
        });

        scheduler.register_periodic(Duration::from_millis(10), task.clone());
        tokio::time::sleep(Duration::from_millis(45)).await;
        scheduler.shutdown();

        let after_shutdown = task.runs.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(task.runs.load(Ordering::SeqCst), after_shutdown);
    }
}
