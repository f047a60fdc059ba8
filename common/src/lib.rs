pub mod constants;
pub mod error;
pub mod schemas;
pub mod telemetry;
