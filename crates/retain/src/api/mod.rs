//! Typed callers for the prediction API.
//!
//! Each caller borrows a [`Session`](crate::Session) and maps one area of the
//! API onto typed methods. All of them go through the session client, so they
//! share its credential handling and recovery.

mod auth;
mod notifications;
mod predictions;
mod students;
mod support;
pub mod types;

pub use auth::AuthApi;
pub use notifications::NotificationsApi;
pub use predictions::PredictionsApi;
pub use students::StudentsApi;
pub use support::SupportApi;
pub use types::{
    ClassAverage, HealthStatus, Notification, NotificationKind, PredictionInput,
    PredictionResult, RegisterResponse, RegisteredUser, Registration, Role, Student,
    SupportTicket, TicketStatus, UploadSummary,
};
