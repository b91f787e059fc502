use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use backoffice_core::Effect;
use backoffice_logging::{bo_debug, bo_error, bo_warn};
use tokio_util::sync::CancellationToken;

use crate::bulk::dispatch_via_client;
use crate::client::{ApiClient, ClientSettings, ReqwestApiClient};
use crate::endpoints::{execute_action, fetch_list};
use crate::{ApiError, EngineEvent};

/// Executes core effects on a background tokio runtime and reports back
/// through [`EngineEvent`]s.
pub struct EngineHandle {
    effect_tx: mpsc::Sender<Effect>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = ReqwestApiClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn ApiClient>) -> Self {
        let (effect_tx, effect_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    bo_error!("Could not start the engine runtime: {}", err);
                    return;
                }
            };
            // Only the latest list fetch may report back.
            let mut list_fetch: Option<CancellationToken> = None;
            while let Ok(effect) = effect_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                if let Effect::FetchList { .. } = effect {
                    let token = CancellationToken::new();
                    if let Some(previous) = list_fetch.replace(token.clone()) {
                        previous.cancel();
                    }
                    runtime.spawn(async move {
                        match token.run_until_cancelled(run_effect(client, effect)).await {
                            Some(event) => {
                                let _ = event_tx.send(event);
                            }
                            None => bo_debug!("Superseded list fetch cancelled"),
                        }
                    });
                } else {
                    runtime.spawn(async move {
                        let _ = event_tx.send(run_effect(client, effect).await);
                    });
                }
            }
        });

        Self {
            effect_tx,
            event_rx,
        }
    }

    pub fn submit(&self, effect: Effect) {
        if self.effect_tx.send(effect).is_err() {
            bo_warn!("Engine thread is gone; effect dropped");
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Blocks up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn run_effect(client: Arc<dyn ApiClient>, effect: Effect) -> EngineEvent {
    match effect {
        Effect::FetchList {
            resource,
            generation,
        } => {
            bo_debug!("Fetching {} (gen {})", resource, generation);
            let result = fetch_list(client.as_ref(), resource).await;
            EngineEvent::ListFetched {
                resource,
                generation,
                result,
            }
        }
        Effect::RunRowAction {
            ticket,
            resource,
            action,
            item,
        } => {
            let result = execute_action(client.as_ref(), resource, action, &item.id).await;
            EngineEvent::RowActionDone {
                ticket,
                id: item.id,
                action,
                result,
            }
        }
        Effect::RunBulkAction {
            ticket,
            resource,
            action,
            targets,
        } => {
            let outcome = dispatch_via_client(client.as_ref(), resource, action, targets).await;
            EngineEvent::BulkSettled {
                ticket,
                action,
                outcome,
            }
        }
    }
}
