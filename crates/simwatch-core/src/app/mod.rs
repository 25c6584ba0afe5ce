//! App - アプリケーション層
//!
//! ports と engine を組み合わせてポーリングと表示を行う。
//!
//! # 主要コンポーネント
//! - **Watchlist**: 監視対象ジョブの集合（周期をまたいでキャッシュを保持）
//! - **Poller**: 全ジョブの並行更新
//! - **report**: 表 / JSON の描画

pub mod poller;
pub mod report;
pub mod watchlist;

pub use self::poller::Poller;
pub use self::report::{render_json, render_table};
pub use self::watchlist::Watchlist;
