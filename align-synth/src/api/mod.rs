//! HTTP API handlers for align-synth

pub mod caller;
pub mod dashboard;
pub mod health;
pub mod interviews;
pub mod summary;

pub use caller::{Caller, CallerIdentity, CALLER_EMAIL_HEADER, CALLER_HEADER, CALLER_NAME_HEADER};
pub use dashboard::dashboard_routes;
pub use health::health_routes;
pub use interviews::interview_routes;
pub use summary::summary_routes;
