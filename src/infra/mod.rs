pub mod error;
pub mod http;
pub mod images;
pub mod memory;
pub mod telemetry;
