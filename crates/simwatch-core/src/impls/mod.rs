//! Impls - ports の実装
//!
//! # 実装
//! - **StaticSource**: コマンドラインで指定されたケース
//! - **QueueSource**: キューシステムの一覧コマンド

pub mod queue_source;
pub mod static_source;

pub use self::queue_source::QueueSource;
pub use self::static_source::StaticSource;
