//! simwatch-core
//!
//! Status inference for long-running simulation jobs, read from each case's
//! control file and solver log.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（job, state, marker, eta, errors）
//! - **control**: control file の読み取り（endTime, application）
//! - **log**: ログのヘッダーと末尾の走査
//! - **engine**: StatusEngine（状態・進捗・ETA の推定）
//! - **ports**: 抽象化レイヤー（Clock, JobSource）
//! - **impls**: 実装（StaticSource, QueueSource）
//! - **app**: Watchlist, Poller, 表示
//! - **observability**: 状態ごとの集計

pub mod app;
pub mod control;
pub mod domain;
pub mod engine;
pub mod impls;
pub mod log;
pub mod observability;
pub mod ports;

pub use crate::domain::{Job, JobState, JobStatus, StatusError};
pub use crate::engine::{ScanLimits, StatusEngine};
