pub mod job;
pub mod plan;
pub mod toast;
pub mod user;
