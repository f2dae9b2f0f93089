//! Staging of uploaded payloads on local disk
//!
//! Every accepted upload is written to a uniquely named file under the staging
//! directory before its metadata is persisted. Staging is best effort: the
//! upload pipeline logs a staging failure and carries on.

pub mod local;
pub mod traits;

pub use local::LocalStager;
pub use traits::{Stager, StagingError, StagingResult};
