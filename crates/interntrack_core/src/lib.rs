pub mod domain;
pub mod geofence;
pub mod policy;
pub mod ports;
pub mod report;
pub mod service;

#[cfg(test)]
mod memory;

pub use domain::{
    ActivityLog, Actor, Analytics, Attendance, Complaint, ComplaintStatus, MonthlyTaskRow,
    NewActivity, NewAttendance, NewComplaint, NewTask, NewTaskReport, NewUser, Role, StarRating,
    Task, TaskReport, TaskStatus, User, UserCredentials,
};
pub use geofence::{GeofenceOutcome, OfficeConfig};
pub use ports::{DatabaseService, PortError, PortResult};
pub use service::{CheckIn, InternshipService, UserDirectory};
