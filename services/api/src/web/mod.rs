pub mod admin;
pub mod auth;
pub mod intern;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;
pub mod supervisor;

// Re-exported for the binary that builds the router.
pub use middleware::require_auth;
pub use rest::{get_complaint_handler, get_task_handler, get_user_handler, me_handler};
