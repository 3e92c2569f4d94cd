//! 同一内容のファイルをハードリンクに集約してディスク容量を回収するライブラリ

pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod hardlink;
pub mod i18n;
pub mod logging;
pub mod partition;
pub mod prompt;
pub mod scanner;
pub mod signal;
pub mod stats;
pub mod verify;

pub use config::DedupConfig;
pub use engine::deduplicate;
pub use error::DedupError;
pub use stats::Stats;
