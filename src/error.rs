//! エラー型と終了コード

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 正常終了
pub const EXIT_SUCCESS: i32 = 0;
/// 設定エラー (ディレクトリ不正、候補ファイル不足など)
pub const EXIT_CONFIG_ERROR: i32 = 1;
/// Ctrl+C による中断 (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

/// 重複排除処理のエラー
///
/// `Config` のみが致命的で、それ以外は統計に記録されて処理は継続する。
#[derive(Debug, Error)]
pub enum DedupError {
    /// 入力や前提条件の誤り (終了コード1、処理は一切行わない)
    #[error("{0}")]
    Config(String),

    /// ダイジェスト計算・内容比較中の読み込み失敗
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// ファイルシステムがハードリンク作成を拒否した
    #[error("{}: {source}", .path.display())]
    Link {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DedupError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DedupError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn link(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DedupError::Link {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DedupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_error_display_includes_path() {
        let err = DedupError::link("/a", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(err.to_string().starts_with("/a: "));
    }

    #[test]
    fn test_display_includes_path() {
        let err = DedupError::io("/tmp/file", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.to_string().starts_with("/tmp/file: "));
    }
}
