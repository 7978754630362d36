//! The device port contract: a command/state channel plus four
//! independent worker loops (spec §4.7).
//!
//! Grounded on the teacher's background-task pattern (`model_spec::refresher::ResolverRefresher`):
//! a periodic `tokio::time::interval` loop spawned with `tokio::spawn`,
//! cancelled via `JoinHandle::abort`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;

use super::command::{DeviceCommand, DeviceState, DeviceStats};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("device port closed")]
    Closed,
}

/// The four independent audio worker loops a device port runs (spec
/// §4.7). Each is cancellable on its own; the first error on a loop
/// terminates only that loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerLoop {
    ReadMic,
    WriteSpeaker,
    ReadTransport,
    WriteTransport,
}

/// The contract the core offers to external audio I/O: a command sink
/// plus periodic state/stats publication (spec §4.7).
#[async_trait]
pub trait DevicePort: Send + Sync {
    async fn send_command(&self, command: DeviceCommand) -> Result<(), PortError>;
    async fn publish_state(&self, state: DeviceState) -> Result<(), PortError>;
    async fn publish_stats(&self, stats: DeviceStats) -> Result<(), PortError>;
}

/// Drives periodic publication for a [`DevicePort`] and owns its four
/// worker-loop handles. Batch mode suppresses intermediate publishes
/// until `end_batch` (spec §4.7 "batch mode suppresses intermediate
/// publishes until `EndBatch`").
pub struct PortRunner<P: DevicePort> {
    port: Arc<P>,
    batching: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
    workers: std::collections::HashMap<WorkerLoop, JoinHandle<Result<(), PortError>>>,
}

impl<P: DevicePort + 'static> PortRunner<P> {
    pub fn new(port: Arc<P>) -> Self {
        PortRunner {
            port,
            batching: Arc::new(AtomicBool::new(false)),
            ticker: None,
            workers: std::collections::HashMap::new(),
        }
    }

    pub fn begin_batch(&self) {
        self.batching.store(true, Ordering::SeqCst);
    }

    /// Resumes normal publication and immediately flushes current state
    /// and stats once.
    pub async fn end_batch(&self, state: DeviceState, stats: DeviceStats) -> Result<(), PortError> {
        self.batching.store(false, Ordering::SeqCst);
        self.port.publish_state(state).await?;
        self.port.publish_stats(stats).await
    }

    fn is_batching(&self) -> bool {
        self.batching.load(Ordering::SeqCst)
    }

    /// Publishes state/stats unless a batch is open.
    pub async fn publish(&self, state: DeviceState, stats: DeviceStats) -> Result<(), PortError> {
        if self.is_batching() {
            return Ok(());
        }
        self.port.publish_state(state).await?;
        self.port.publish_stats(stats).await
    }

    /// Spawns the periodic publish ticker, sampling `sample` on every
    /// tick. Replaces any previously spawned ticker.
    pub fn spawn_ticker<F>(&mut self, interval: Duration, sample: F)
    where
        F: Fn() -> (DeviceState, DeviceStats) + Send + Sync + 'static,
    {
        let port = self.port.clone();
        let batching = self.batching.clone();
        self.ticker = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                if batching.load(Ordering::SeqCst) {
                    continue;
                }
                let (state, stats) = sample();
                if let Err(err) = port.publish_state(state).await {
                    tracing::warn!(?err, "device port: periodic state publish failed");
                    continue;
                }
                if let Err(err) = port.publish_stats(stats).await {
                    tracing::warn!(?err, "device port: periodic stats publish failed");
                }
            }
        }));
    }

    /// Spawns one of the four worker loops. `body` runs until it returns
    /// (error or success); an error is logged but does not affect the
    /// other loops (spec §4.7 "the first error on any loop terminates
    /// that loop only").
    pub fn spawn_worker<F, Fut>(&mut self, which: WorkerLoop, body: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = Result<(), PortError>> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let result = body().await;
            if let Err(ref err) = result {
                tracing::warn!(?which, ?err, "device port: worker loop terminated");
            }
            result
        });
        self.workers.insert(which, handle);
    }

    /// Cancels one worker loop without affecting the others or the
    /// ticker.
    pub fn cancel_worker(&mut self, which: WorkerLoop) {
        if let Some(handle) = self.workers.remove(&which) {
            handle.abort();
        }
    }

    /// Cancels the ticker and every worker loop (spec §4.7 "the port
    /// remains partly functional until `Close`").
    pub fn close(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        for (_, handle) in self.workers.drain() {
            handle.abort();
        }
    }
}

impl<P: DevicePort> Drop for PortRunner<P> {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        for (_, handle) in self.workers.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPort {
        states: Mutex<Vec<DeviceState>>,
        publishes: AtomicUsize,
    }

    #[async_trait]
    impl DevicePort for RecordingPort {
        async fn send_command(&self, _command: DeviceCommand) -> Result<(), PortError> {
            Ok(())
        }
        async fn publish_state(&self, state: DeviceState) -> Result<(), PortError> {
            self.states.lock().unwrap().push(state);
            self.publishes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        async fn publish_stats(&self, _stats: DeviceStats) -> Result<(), PortError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn batch_mode_suppresses_intermediate_publishes() {
        let port = Arc::new(RecordingPort::default());
        let runner = PortRunner::new(port.clone());
        runner.begin_batch();
        runner.publish(DeviceState::default(), DeviceStats::default()).await.unwrap();
        runner.publish(DeviceState::default(), DeviceStats::default()).await.unwrap();
        assert_eq!(port.publishes.load(Ordering::SeqCst), 0);

        runner.end_batch(DeviceState::default(), DeviceStats::default()).await.unwrap();
        assert_eq!(port.publishes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancelling_one_worker_leaves_others_running() {
        let port = Arc::new(RecordingPort::default());
        let mut runner = PortRunner::new(port.clone());
        let ran = Arc::new(AtomicBool::new(false));
        let ran2 = ran.clone();
        runner.spawn_worker(WorkerLoop::ReadMic, || async move {
            loop {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });
        runner.spawn_worker(WorkerLoop::WriteSpeaker, move || async move {
            ran2.store(true, Ordering::SeqCst);
            Ok(())
        });
        tokio::time::sleep(Duration::from_millis(20)).await;
        runner.cancel_worker(WorkerLoop::ReadMic);
        assert!(!runner.workers.contains_key(&WorkerLoop::ReadMic));
        assert!(ran.load(Ordering::SeqCst));
    }
}
