use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use autozip_core::PollGeneration;
use autozip_logging::{autozip_debug, autozip_info, autozip_warn};
use thiserror::Error;

use crate::poller::{ChannelPollSink, PollSink, StatusPoller};
use crate::{ApiError, ApiSettings, EngineEvent, PackApi, ReqwestPackApi, DEFAULT_POLL_INTERVAL};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub server_url: String,
    pub api: ApiSettings,
    pub poll_interval: Duration,
}

impl EngineConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api: ApiSettings::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

enum EngineCommand {
    SubmitPack { output_path: String },
    StartPoller { generation: PollGeneration },
    StopPoller,
    Shutdown,
    WakeAfter { after: Duration, token: u64 },
}

/// Front-end side of the background engine thread.
///
/// Commands are queued over a channel; results come back as
/// [`EngineEvent`]s on the receiver returned by [`EngineHandle::spawn`].
/// Dropping the handle ends the thread and cancels any polling.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(config: &EngineConfig) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let api = ReqwestPackApi::new(&config.server_url, &config.api)?;
        autozip_info!("Using packaging server at {}", api.base_url());
        Self::spawn(Arc::new(api), config.poll_interval)
    }

    pub fn spawn(
        api: Arc<dyn PackApi>,
        poll_interval: Duration,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;

        thread::spawn(move || {
            let handle = runtime.handle().clone();
            let sink: Arc<dyn PollSink> = Arc::new(ChannelPollSink::new(event_tx.clone()));
            let mut poller = StatusPoller::new(poll_interval);

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::SubmitPack { output_path } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        handle.spawn(async move {
                            let _ = event_tx.send(submit_pack(api.as_ref(), &output_path).await);
                        });
                    }
                    EngineCommand::StartPoller { generation } => {
                        autozip_debug!("Starting poller generation {}", generation);
                        poller.start(&handle, api.clone(), generation, sink.clone());
                    }
                    EngineCommand::StopPoller => {
                        poller.stop();
                    }
                    EngineCommand::Shutdown => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        handle.spawn(async move {
                            let event = match api.shutdown().await {
                                Ok(()) => EngineEvent::ShutdownSent,
                                Err(err) => {
                                    autozip_warn!("Shutdown request failed: {}", err);
                                    EngineEvent::ShutdownFailed(err)
                                }
                            };
                            let _ = event_tx.send(event);
                        });
                    }
                    EngineCommand::WakeAfter { after, token } => {
                        let event_tx = event_tx.clone();
                        handle.spawn(async move {
                            tokio::time::sleep(after).await;
                            let _ = event_tx.send(EngineEvent::Wake { token });
                        });
                    }
                }
            }

            poller.stop();
            runtime.shutdown_timeout(Duration::from_millis(200));
            autozip_debug!("Engine thread finished");
        });

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn submit_pack(&self, output_path: impl Into<String>) {
        self.send(EngineCommand::SubmitPack {
            output_path: output_path.into(),
        });
    }

    pub fn start_poller(&self, generation: PollGeneration) {
        self.send(EngineCommand::StartPoller { generation });
    }

    pub fn stop_poller(&self) {
        self.send(EngineCommand::StopPoller);
    }

    pub fn shutdown_server(&self) {
        self.send(EngineCommand::Shutdown);
    }

    /// Emits [`EngineEvent::Wake`] with `token` once `after` has elapsed.
    pub fn wake_after(&self, after: Duration, token: u64) {
        self.send(EngineCommand::WakeAfter { after, token });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            autozip_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn submit_pack(api: &dyn PackApi, output_path: &str) -> EngineEvent {
    autozip_info!("Submitting pack request for {:?}", output_path);
    match api.pack(output_path).await {
        Ok(reply) if reply.success => EngineEvent::PackAccepted,
        Ok(reply) => {
            autozip_warn!("Pack request rejected: {:?}", reply.message);
            EngineEvent::PackRejected {
                message: reply.message,
            }
        }
        Err(err) => {
            autozip_warn!("Pack request failed: {}", err);
            EngineEvent::PackFailed(err)
        }
    }
}
