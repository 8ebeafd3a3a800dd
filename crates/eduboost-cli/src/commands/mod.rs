pub mod analyze;
pub mod cohort;
mod common;
pub mod feedback;
pub mod goals;
pub mod init;
pub mod modules;
pub mod plan;
pub mod predict;
pub mod progress;
pub mod validate;
