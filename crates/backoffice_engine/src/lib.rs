//! Back-office engine: REST access and effect execution.
mod bulk;
mod client;
mod endpoints;
mod engine;
mod types;

pub use bulk::{dispatch, dispatch_via_client};
pub use client::{ApiClient, ClientSettings, Method, ReqwestApiClient};
pub use endpoints::{action_request, execute_action, fetch_list, list_path, ActionRequest};
pub use engine::EngineHandle;
pub use types::{ApiError, EngineEvent};
