//! crates/interntrack_core/src/service/mod.rs
//!
//! The use-case layer. Every operation takes the resolved `Actor`, checks the role up front,
//! loads the target, applies the ownership policy and then delegates the write (together with
//! its activity entry) to the `DatabaseService` port.

mod admin;
mod attendance;
mod complaints;
mod identity;
mod tasks;

pub use attendance::CheckIn;
pub use identity::UserDirectory;

use std::sync::Arc;

use crate::ports::{DatabaseService, PortError, PortResult};

/// Row caps applied to the list views.
pub const ACTIVITY_LIMIT: i64 = 200;
pub const COMPLAINT_LIMIT: i64 = 200;
pub const ATTENDANCE_LIMIT: i64 = 300;
pub const INTERN_ATTENDANCE_LIMIT: i64 = 60;
pub const REPORT_LIMIT: i64 = 300;
pub const PROGRESS_LIMIT: i64 = 300;

/// Entry point for every internship operation.
#[derive(Clone)]
pub struct InternshipService {
    db: Arc<dyn DatabaseService>,
}

impl InternshipService {
    pub fn new(db: Arc<dyn DatabaseService>) -> Self {
        Self { db }
    }
}

/// Trims `value` and rejects it when nothing is left.
fn required_text(value: &str, message: &str) -> PortResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(PortError::Validation(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}
