use std::sync::Arc;
use std::time::Duration;

use autozip_core::PollGeneration;
use autozip_logging::{autozip_debug, autozip_warn};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, PackApi, PollEvent};

/// Period between two status requests.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

pub trait PollSink: Send + Sync {
    fn emit(&self, event: PollEvent);
}

/// Forwards poll results into the engine event channel.
pub struct ChannelPollSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelPollSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl PollSink for ChannelPollSink {
    fn emit(&self, event: PollEvent) {
        let _ = self.tx.send(EngineEvent::Poll(event));
    }
}

struct PollTask {
    generation: PollGeneration,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owner of the single status-polling loop.
///
/// Starting a new loop cancels the previous one, so at most one loop is
/// ever running. Dropping the poller cancels the loop as well.
pub struct StatusPoller {
    interval: Duration,
    task: Option<PollTask>,
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            task: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(
        &mut self,
        runtime: &Handle,
        api: Arc<dyn PackApi>,
        generation: PollGeneration,
        sink: Arc<dyn PollSink>,
    ) {
        if self.stop() {
            autozip_debug!("Replaced running poller with generation {}", generation);
        }

        let cancel = CancellationToken::new();
        let handle = runtime.spawn(poll_loop(
            api,
            self.interval,
            generation,
            sink,
            cancel.clone(),
        ));
        self.task = Some(PollTask {
            generation,
            cancel,
            handle,
        });
    }

    /// Cancels the running loop. Returns whether one was still running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.cancel.cancel();
                !task.handle.is_finished()
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.task
            .as_ref()
            .is_some_and(|task| !task.handle.is_finished())
    }

    /// Generation of the loop currently running, if any.
    pub fn generation(&self) -> Option<PollGeneration> {
        self.task
            .as_ref()
            .filter(|task| !task.handle.is_finished())
            .map(|task| task.generation)
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(
    api: Arc<dyn PackApi>,
    period: Duration,
    generation: PollGeneration,
    sink: Arc<dyn PollSink>,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = api.status() => result,
        };

        match result {
            Ok(reply) => {
                let status = reply.into_status();
                let terminal = status.state.is_terminal();
                sink.emit(PollEvent::Status { generation, status });
                if terminal {
                    autozip_debug!("Poller {} reached a terminal status", generation);
                    break;
                }
            }
            Err(error) => {
                autozip_warn!("Status poll {} failed: {}", generation, error);
                sink.emit(PollEvent::Failed { generation, error });
                break;
            }
        }
    }
}
