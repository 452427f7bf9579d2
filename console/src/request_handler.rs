use crate::console::{ConsoleRequest, IntentRequest};
use controller::operation::{Completion, PendingOperation};
use controller::request::Request;
use controller::{Controller, ControllerError, Dispatched, Settled, Snapshot};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// The operation currently in flight and the request waiting on it.
struct InFlight {
    pending: PendingOperation,
    request: IntentRequest,
}

/// Serializes intents into the controller and drives the single in-flight
/// operation, publishing a fresh snapshot whenever state may have changed.
///
/// Only one operation is ever in flight; the controller answers any other
/// remote intent with `Busy` while it is.
pub(super) struct RequestHandler {
    receiver: flume::Receiver<ConsoleRequest>,
    controller: Controller,
    snapshot_tx: watch::Sender<Snapshot>,
    in_flight: Option<InFlight>,
}

impl RequestHandler {
    pub(super) fn new(
        receiver: flume::Receiver<ConsoleRequest>,
        controller: Controller,
        snapshot_tx: watch::Sender<Snapshot>,
    ) -> RequestHandler {
        Self {
            receiver,
            controller,
            snapshot_tx,
            in_flight: None,
        }
    }

    #[instrument(skip(self))]
    pub(super) async fn run(mut self) {
        if let Some(principal) = self.controller.initialize().await {
            info!(%principal, "Resumed session");
        }
        self.publish();

        let mut notification_rx = self.controller.subscribe_notifications();

        loop {
            tokio::select! {
                recv_result = self.receiver.recv_async() => match recv_result {
                    Ok(req) => self.handle_recv(req).await,
                    Err(_) => {
                        info!("All clients have been dropped");
                        break;
                    }
                },
                completion = next_completion(&mut self.in_flight) => {
                    self.handle_completion(completion);
                },
                Ok(()) = notification_rx.changed() => {}
            }
            self.publish();
        }

        if let Some(in_flight) = self.in_flight.take() {
            let _ = in_flight.request.reply(Err(ControllerError::Stopped));
        }
    }

    #[instrument(skip(self))]
    async fn handle_recv(&mut self, req: ConsoleRequest) {
        debug!("Received: {:?}", req);
        match req {
            ConsoleRequest::Snapshot(Request { reply_to, .. }) => {
                let _ = reply_to.send(self.controller.snapshot());
            }
            ConsoleRequest::Intent(Request { payload, reply_to }) => {
                match self.controller.dispatch(payload.clone()).await {
                    Ok(Dispatched::Done) => {
                        let _ = reply_to.send(Ok(()));
                    }
                    Ok(Dispatched::Pending(pending)) => {
                        let request = Request { payload, reply_to };
                        if let Some(previous) = self.in_flight.replace(InFlight { pending, request }) {
                            // Unreachable while the busy flag gates dispatch
                            warn!(request = ?previous.request, "Replaced an operation still in flight");
                            let _ = previous.request.reply(Err(ControllerError::Discarded));
                        }
                    }
                    Err(e) => {
                        let _ = reply_to.send(Err(e));
                    }
                }
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        match self.controller.settle(completion) {
            Settled::FollowUp(pending) => {
                self.in_flight = Some(InFlight {
                    pending,
                    request: in_flight.request,
                });
            }
            Settled::Done(result) => {
                debug!(intent = ?in_flight.request.payload, ?result, "Answering");
                let _ = in_flight.request.reply(result);
            }
        }
    }

    fn publish(&self) {
        let next = self.controller.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

async fn next_completion(in_flight: &mut Option<InFlight>) -> Completion {
    match in_flight {
        Some(in_flight) => (&mut in_flight.pending).await,
        None => std::future::pending().await,
    }
}
