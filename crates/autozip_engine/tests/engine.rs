use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use autozip_core::JobState;
use autozip_engine::{
    ApiError, EngineEvent, EngineHandle, FailureKind, PackApi, PackReply, PollEvent, StatusReply,
    WireJobState,
};

const WAIT: Duration = Duration::from_secs(5);

struct FakeApi {
    pack_reply: Mutex<Result<PackReply, ApiError>>,
    shutdown_ok: bool,
    packed: Mutex<Vec<String>>,
    status_calls: AtomicUsize,
}

impl FakeApi {
    fn new(pack_reply: Result<PackReply, ApiError>, shutdown_ok: bool) -> Arc<Self> {
        Arc::new(Self {
            pack_reply: Mutex::new(pack_reply),
            shutdown_ok,
            packed: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait::async_trait]
impl PackApi for FakeApi {
    async fn pack(&self, output_path: &str) -> Result<PackReply, ApiError> {
        self.packed.lock().unwrap().push(output_path.to_string());
        self.pack_reply.lock().unwrap().clone()
    }

    async fn status(&self) -> Result<StatusReply, ApiError> {
        let n = self.status_calls.fetch_add(1, Ordering::SeqCst);
        let (status, progress) = if n < 1 {
            (WireJobState::Packing, 50)
        } else {
            (WireJobState::Success, 100)
        };
        Ok(StatusReply {
            status,
            progress,
            message: String::new(),
        })
    }

    async fn shutdown(&self) -> Result<(), ApiError> {
        if self.shutdown_ok {
            Ok(())
        } else {
            Err(ApiError {
                kind: FailureKind::Network,
                message: "connection reset".to_string(),
            })
        }
    }
}

fn accepted() -> Result<PackReply, ApiError> {
    Ok(PackReply {
        success: true,
        message: None,
    })
}

fn next(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(WAIT).expect("engine event")
}

#[test]
fn accepted_pack_is_reported() {
    let api = FakeApi::new(accepted(), true);
    let (engine, rx) = EngineHandle::spawn(api.clone(), Duration::from_millis(10)).unwrap();

    engine.submit_pack("D:\\out");

    assert!(matches!(next(&rx), EngineEvent::PackAccepted));
    assert_eq!(*api.packed.lock().unwrap(), vec!["D:\\out".to_string()]);
}

#[test]
fn rejected_pack_keeps_server_message() {
    let api = FakeApi::new(
        Ok(PackReply {
            success: false,
            message: Some("busy".to_string()),
        }),
        true,
    );
    let (engine, rx) = EngineHandle::spawn(api, Duration::from_millis(10)).unwrap();

    engine.submit_pack("D:\\out");

    match next(&rx) {
        EngineEvent::PackRejected { message } => assert_eq!(message.as_deref(), Some("busy")),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn transport_failure_is_reported() {
    let api = FakeApi::new(
        Err(ApiError {
            kind: FailureKind::Timeout,
            message: "timed out".to_string(),
        }),
        true,
    );
    let (engine, rx) = EngineHandle::spawn(api, Duration::from_millis(10)).unwrap();

    engine.submit_pack("D:\\out");

    match next(&rx) {
        EngineEvent::PackFailed(err) => assert_eq!(err.kind, FailureKind::Timeout),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn poller_events_carry_generation_until_terminal() {
    let api = FakeApi::new(accepted(), true);
    let (engine, rx) = EngineHandle::spawn(api.clone(), Duration::from_millis(10)).unwrap();

    engine.start_poller(7);

    let mut states = Vec::new();
    for _ in 0..2 {
        match next(&rx) {
            EngineEvent::Poll(PollEvent::Status { generation, status }) => {
                assert_eq!(generation, 7);
                states.push(status.state);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(states, vec![JobState::Packing, JobState::Success]);

    std::thread::sleep(Duration::from_millis(100));
    assert_eq!(api.status_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn shutdown_outcomes_are_reported() {
    let (engine, rx) =
        EngineHandle::spawn(FakeApi::new(accepted(), true), Duration::from_millis(10)).unwrap();
    engine.shutdown_server();
    assert!(matches!(next(&rx), EngineEvent::ShutdownSent));

    let (engine, rx) =
        EngineHandle::spawn(FakeApi::new(accepted(), false), Duration::from_millis(10)).unwrap();
    engine.shutdown_server();
    assert!(matches!(next(&rx), EngineEvent::ShutdownFailed(_)));
}

#[test]
fn wake_tokens_arrive_in_deadline_order() {
    let (engine, rx) =
        EngineHandle::spawn(FakeApi::new(accepted(), true), Duration::from_millis(10)).unwrap();

    engine.wake_after(Duration::from_millis(150), 2);
    engine.wake_after(Duration::from_millis(10), 1);

    assert!(matches!(next(&rx), EngineEvent::Wake { token: 1 }));
    assert!(matches!(next(&rx), EngineEvent::Wake { token: 2 }));
}

#[test]
fn dropping_the_handle_closes_the_event_channel() {
    let (engine, rx) =
        EngineHandle::spawn(FakeApi::new(accepted(), true), Duration::from_millis(10)).unwrap();
    drop(engine);
    assert!(matches!(
        rx.recv_timeout(WAIT),
        Err(mpsc::RecvTimeoutError::Disconnected)
    ));
}
