use std::sync::Arc;
use std::time::Duration;

use backoffice_core::{Effect, Msg};
use backoffice_engine::{ApiClient, ApiError, ClientSettings, EngineEvent, EngineHandle};
use backoffice_logging::{bo_info, bo_warn};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    #[cfg(test)]
    pub fn with_client(client: Arc<dyn ApiClient>) -> Self {
        Self {
            engine: EngineHandle::with_client(client),
        }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match &effect {
                Effect::FetchList {
                    resource,
                    generation,
                } => bo_info!("FetchList resource={} gen={}", resource, generation),
                Effect::RunRowAction {
                    ticket,
                    resource,
                    action,
                    item,
                } => bo_info!(
                    "RunRowAction ticket={} resource={} action={} id={}",
                    ticket,
                    resource,
                    action,
                    item.id
                ),
                Effect::RunBulkAction {
                    ticket,
                    resource,
                    action,
                    targets,
                } => bo_info!(
                    "RunBulkAction ticket={} resource={} action={} targets={}",
                    ticket,
                    resource,
                    action,
                    targets.len()
                ),
            }
            self.engine.submit(effect);
        }
    }

    /// Waits up to `timeout` for the engine's next answer.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(event_to_msg)
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ListFetched {
            resource,
            generation,
            result,
        } => match result {
            Ok(records) => Msg::ListLoaded {
                generation,
                records,
            },
            Err(err) => {
                bo_warn!("Loading {} failed: {}", resource, err);
                Msg::ListFailed {
                    generation,
                    message: err.user_message(),
                }
            }
        },
        EngineEvent::RowActionDone {
            ticket,
            id,
            action,
            result,
        } => match result {
            Ok(()) => Msg::RowActionSucceeded { ticket, id, action },
            Err(err) => {
                bo_warn!("{} on {} failed: {}", action, id, err);
                Msg::RowActionFailed {
                    ticket,
                    id,
                    action,
                    message: err.user_message(),
                }
            }
        },
        EngineEvent::BulkSettled {
            ticket,
            action,
            outcome,
        } => Msg::BulkActionSettled {
            ticket,
            action,
            outcome,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_core::{ActionKind, Resource};
    use pretty_assertions::assert_eq;

    #[test]
    fn failures_carry_user_messages() {
        let msg = event_to_msg(EngineEvent::ListFetched {
            resource: Resource::Roles,
            generation: 4,
            result: Err(ApiError::Timeout),
        });
        assert_eq!(
            msg,
            Msg::ListFailed {
                generation: 4,
                message: "The server took too long to answer".to_string()
            }
        );

        let msg = event_to_msg(EngineEvent::RowActionDone {
            ticket: 7,
            id: "r-1".to_string(),
            action: ActionKind::Delete,
            result: Err(ApiError::Status {
                status: 409,
                message: Some("Rôle utilisé".to_string()),
            }),
        });
        assert_eq!(
            msg,
            Msg::RowActionFailed {
                ticket: 7,
                id: "r-1".to_string(),
                action: ActionKind::Delete,
                message: "Rôle utilisé".to_string()
            }
        );
    }
}
