use crate::config::ConsoleConfig;
use crate::message_bus::ConsoleHandle;
use crate::request_handler::RequestHandler;
use controller::into_request;
use controller::request::Request;
use controller::{Controller, ControllerError, DataService, IdentityProvider, Intent, Snapshot};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{Instrument, info, info_span};

pub type IntentRequest = Request<Intent, Result<(), ControllerError>>;

/// Asks for the current state without changing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GetSnapshot;

pub type SnapshotRequest = Request<GetSnapshot, Snapshot>;

#[derive(Debug)]
pub enum ConsoleRequest {
    Intent(IntentRequest),
    Snapshot(SnapshotRequest),
}

into_request!(Intent, IntentRequest, ConsoleRequest);
into_request!(Snapshot, SnapshotRequest, ConsoleRequest);

/// Runs the console on a dedicated thread with its own single-threaded
/// runtime. The console stops once every handle has been dropped.
pub fn start(
    config: ConsoleConfig,
    service: Arc<dyn DataService>,
    provider: Arc<dyn IdentityProvider>,
) -> std::io::Result<ConsoleHandle> {
    info!("Starting");
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let controller = Controller::new(&config.controller, service, provider);
    let (handle, receiver, snapshot_tx) = wire(&config, &controller);

    std::thread::Builder::new()
        .name("console".into())
        .spawn(move || {
            rt.block_on(
                RequestHandler::new(receiver, controller, snapshot_tx)
                    .run()
                    .instrument(info_span!("request_handler")),
            );
        })?;

    Ok(handle)
}

/// Runs the console as a task on the current runtime.
pub fn start_test(
    config: ConsoleConfig,
    service: Arc<dyn DataService>,
    provider: Arc<dyn IdentityProvider>,
) -> ConsoleHandle {
    info!("Starting");
    let controller = Controller::new(&config.controller, service, provider);
    let (handle, receiver, snapshot_tx) = wire(&config, &controller);

    tokio::spawn(async move {
        RequestHandler::new(receiver, controller, snapshot_tx)
            .run()
            .instrument(info_span!("request_handler"))
            .await
    });

    handle
}

fn wire(
    config: &ConsoleConfig,
    controller: &Controller,
) -> (
    ConsoleHandle,
    flume::Receiver<ConsoleRequest>,
    watch::Sender<Snapshot>,
) {
    let (sender, receiver) = flume::bounded(config.request_capacity);
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());
    let handle = ConsoleHandle::new(sender, snapshot_rx, controller.subscribe_notifications());
    (handle, receiver, snapshot_tx)
}
