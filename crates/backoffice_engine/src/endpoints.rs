use backoffice_core::{unwrap_records, ActionKind, Resource};
use backoffice_logging::bo_info;
use serde_json::Value;

use crate::client::{ApiClient, Method};
use crate::ApiError;

pub const ROLES_PATH: &str = "/admin/roles";
pub const ANNONCES_PATH: &str = "/admin/annonces";
pub const DONS_PATH: &str = "/admin/dons";
pub const FAVORIS_PATH: &str = "/favoris";

pub fn list_path(resource: Resource) -> &'static str {
    match resource {
        Resource::Roles => ROLES_PATH,
        Resource::Annonces => ANNONCES_PATH,
        Resource::Dons => DONS_PATH,
        Resource::Favoris => FAVORIS_PATH,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// HTTP call performing `action` on one record, or `None` when the resource
/// has no such action.
pub fn action_request(resource: Resource, action: ActionKind, id: &str) -> Option<ActionRequest> {
    if !resource.supports(action) {
        return None;
    }
    let base = list_path(resource);
    let (method, path) = match action {
        ActionKind::Delete => (Method::Delete, format!("{base}/{id}")),
        ActionKind::Activate => (Method::Put, format!("{base}/{id}/restore")),
        ActionKind::Deactivate => (Method::Put, format!("{base}/{id}/deactivate")),
        ActionKind::Publish => (Method::Put, format!("{base}/{id}/publier")),
        ActionKind::Unpublish => (Method::Put, format!("{base}/{id}/depublier")),
        ActionKind::Block => (Method::Put, format!("{base}/{id}/bloquer")),
        ActionKind::Unblock => (Method::Put, format!("{base}/{id}/debloquer")),
    };
    Some(ActionRequest {
        method,
        path,
        body: None,
    })
}

/// Loads the raw records of a list page, whatever envelope the API wraps them in.
pub async fn fetch_list(client: &dyn ApiClient, resource: Resource) -> Result<Vec<Value>, ApiError> {
    let payload = client.get(list_path(resource)).await?;
    let records = unwrap_records(&payload).to_vec();
    bo_info!("Fetched {} {} records", records.len(), resource);
    Ok(records)
}

pub async fn execute_action(
    client: &dyn ApiClient,
    resource: Resource,
    action: ActionKind,
    id: &str,
) -> Result<(), ApiError> {
    let request =
        action_request(resource, action, id).ok_or(ApiError::Unsupported { resource, action })?;
    client
        .request(request.method, &request.path, request.body)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn role_lifecycle_routes() {
        let restore = action_request(Resource::Roles, ActionKind::Activate, "r-1").unwrap();
        assert_eq!(restore.method, Method::Put);
        assert_eq!(restore.path, "/admin/roles/r-1/restore");

        let deactivate = action_request(Resource::Roles, ActionKind::Deactivate, "r-1").unwrap();
        assert_eq!(deactivate.path, "/admin/roles/r-1/deactivate");

        let delete = action_request(Resource::Roles, ActionKind::Delete, "r-1").unwrap();
        assert_eq!(delete.method, Method::Delete);
        assert_eq!(delete.path, "/admin/roles/r-1");
    }

    #[test]
    fn moderation_routes() {
        let cases = [
            (ActionKind::Publish, "/admin/dons/d-2/publier"),
            (ActionKind::Unpublish, "/admin/dons/d-2/depublier"),
            (ActionKind::Block, "/admin/dons/d-2/bloquer"),
            (ActionKind::Unblock, "/admin/dons/d-2/debloquer"),
        ];
        for (action, path) in cases {
            let request = action_request(Resource::Dons, action, "d-2").unwrap();
            assert_eq!(request.method, Method::Put, "{action}");
            assert_eq!(request.path, path);
            assert_eq!(request.body, None);
        }
    }

    #[test]
    fn unsupported_actions_have_no_route() {
        assert_eq!(action_request(Resource::Favoris, ActionKind::Publish, "f"), None);
        assert_eq!(action_request(Resource::Roles, ActionKind::Block, "r"), None);
        assert_eq!(action_request(Resource::Annonces, ActionKind::Activate, "a"), None);
        assert_eq!(
            action_request(Resource::Favoris, ActionKind::Delete, "f")
                .unwrap()
                .path,
            "/favoris/f"
        );
    }
}
