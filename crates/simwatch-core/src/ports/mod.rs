//! Ports - 抽象化レイヤー
//!
//! 外部の世界（時刻、ジョブ一覧）への境界。実装は `impls` にある。

pub mod clock;
pub mod job_source;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::job_source::{JobEntry, JobSource};
