pub mod config;
pub mod logging;

pub mod api;
pub mod credentials;
pub mod job_view;
pub mod schedule;
pub mod signer;
pub mod stats;
pub mod submit;
