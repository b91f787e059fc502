use std::fmt::Display;
use std::future::Future;

use backoffice_core::{ActionKind, BulkFailure, BulkOutcome, CanonicalItem, Resource};
use backoffice_logging::{bo_info, bo_warn};
use futures_util::future::join_all;

use crate::client::ApiClient;
use crate::endpoints::execute_action;

/// Runs `executor` once per target, all concurrently, and waits for every call
/// to settle. Partial failure never aborts the batch; results keep target order.
pub async fn dispatch<F, Fut, E>(
    action: ActionKind,
    targets: Vec<CanonicalItem>,
    executor: F,
) -> BulkOutcome
where
    F: Fn(CanonicalItem) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let calls = targets.into_iter().map(|item| {
        let call = executor(item.clone());
        async move { (item, call.await) }
    });

    let mut outcome = BulkOutcome::default();
    for (item, result) in join_all(calls).await {
        match result {
            Ok(()) => outcome.succeeded.push(item),
            Err(err) => {
                let error = err.to_string();
                bo_warn!("{} failed for {}: {}", action, item.id, error);
                outcome.failed.push(BulkFailure { item, error });
            }
        }
    }
    bo_info!("Bulk {} settled: {}", action, outcome.summary(action));
    outcome
}

/// [`dispatch`] against the REST API, recording user-facing error messages.
pub async fn dispatch_via_client(
    client: &dyn ApiClient,
    resource: Resource,
    action: ActionKind,
    targets: Vec<CanonicalItem>,
) -> BulkOutcome {
    dispatch(action, targets, |item| async move {
        execute_action(client, resource, action, &item.id)
            .await
            .map_err(|err| err.user_message())
    })
    .await
}
