//! ハードリンク処理

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use crate::config::DedupConfig;
use crate::error::DedupError;
use crate::prompt::Confirm;

/// 退避ファイル名に付ける接尾辞 (バックアップなしの場合)
const ASIDE_SUFFIX: &str = ".linkdup.tmp";

/// リンク処理の結果
#[derive(Debug)]
pub enum LinkOutcome {
    /// 置換成功 (バックアップを残した場合はそのパス)
    Linked { backup: Option<PathBuf> },
    /// ドライランのため置換しなかった
    WouldLink,
    /// 利用者が置換を拒否した
    Declined,
    /// 置換失敗
    Failed(DedupError),
}

/// 検証済みの重複ペアをハードリンクに置き換える
pub struct LinkExecutor<'a> {
    config: &'a DedupConfig,
    confirm: &'a mut dyn Confirm,
}

impl<'a> LinkExecutor<'a> {
    pub fn new(config: &'a DedupConfig, confirm: &'a mut dyn Confirm) -> Self {
        LinkExecutor { config, confirm }
    }

    /// duplicate を survivor へのハードリンクに置き換える
    ///
    /// ドライランでは確認も変更も行わない。
    pub fn execute(&mut self, survivor: &Path, duplicate: &Path) -> LinkOutcome {
        if self.config.dry_run {
            return LinkOutcome::WouldLink;
        }
        if self.config.interactive && !self.confirm.confirm(survivor, duplicate) {
            return LinkOutcome::Declined;
        }
        match replace_with_hardlink(survivor, duplicate, self.config.backup) {
            Ok(backup) => LinkOutcome::Linked { backup },
            Err(e) => LinkOutcome::Failed(e),
        }
    }
}

/// 2つのファイルが既に同一inode (ハードリンク済み) か確認する
#[cfg(unix)]
pub fn is_same_inode(path1: &Path, path2: &Path) -> io::Result<bool> {
    let meta1 = fs::metadata(path1)?;
    let meta2 = fs::metadata(path2)?;
    Ok(meta1.dev() == meta2.dev() && meta1.ino() == meta2.ino())
}

#[cfg(not(unix))]
pub fn is_same_inode(_path1: &Path, _path2: &Path) -> io::Result<bool> {
    Ok(false)
}

/// ファイルをハードリンクに置換する
///
/// target を退避名にリネームしてからハードリンクを作成し、成功したら退避ファイルを
/// 削除する (keep_backup の場合は番号付きバックアップとして残す)。
/// ハードリンク作成に失敗した場合は退避ファイルを元の名前に戻す。
///
/// Args:
///     source: 基準ファイル (リンク元)
///     target: 置換対象ファイル
///     keep_backup: 置換前の target をバックアップとして残すか
///
/// Returns:
///     成功時は残したバックアップのパス、失敗時は`DedupError::Link`
pub fn replace_with_hardlink(
    source: &Path,
    target: &Path,
    keep_backup: bool,
) -> Result<Option<PathBuf>, DedupError> {
    let aside = if keep_backup {
        numbered_backup_path(target)
    } else {
        aside_path(target)
    };

    fs::rename(target, &aside).map_err(|e| DedupError::link(target, e))?;

    if let Err(e) = fs::hard_link(source, target) {
        remove_if_regular_file(target);
        return match fs::rename(&aside, target) {
            Ok(()) => Err(DedupError::link(target, e)),
            Err(rollback_err) => Err(DedupError::link(
                target,
                io::Error::new(
                    e.kind(),
                    format!(
                        "{} (rollback failed: {}, original kept at {})",
                        e,
                        rollback_err,
                        aside.display()
                    ),
                ),
            )),
        };
    }

    if keep_backup {
        return Ok(Some(aside));
    }

    if let Err(e) = fs::remove_file(&aside) {
        log::warn!("failed to remove {}: {}", aside.display(), e);
    }
    Ok(None)
}

/// `name.~N~` 形式で未使用の最小番号のバックアップパスを返す
pub fn numbered_backup_path(target: &Path) -> PathBuf {
    let file_name = file_name_of(target);
    (1u32..)
        .map(|n| target.with_file_name(format!("{}.~{}~", file_name, n)))
        .find(|p| fs::symlink_metadata(p).is_err())
        .unwrap_or_else(|| aside_path(target))
}

fn aside_path(target: &Path) -> PathBuf {
    target.with_file_name(format!("{}{}", file_name_of(target), ASIDE_SUFFIX))
}

fn file_name_of(target: &Path) -> String {
    target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "target".to_string())
}

fn remove_if_regular_file(path: &Path) {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => {
            let _ = fs::remove_file(path);
        }
        _ => {}
    }
}
