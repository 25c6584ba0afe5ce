//! Domain model (job, state, markers, ETA, errors).

pub mod errors;
pub mod eta;
pub mod job;
pub mod marker;
pub mod state;

pub use self::errors::{SourceError, StatusError};
pub use self::eta::Eta;
pub use self::job::{Job, JobStatus, JobView, Progress, StatusReport};
pub use self::marker::{HeaderMarker, TailMarker};
pub use self::state::JobState;
