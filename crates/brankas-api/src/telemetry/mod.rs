mod init;

pub use init::{build_subscriber, init_telemetry, DEFAULT_FILTER};
