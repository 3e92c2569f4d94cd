//! 候補ファイルの探索とダイジェスト計算

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;

#[cfg(unix)]
use std::os::unix::fs::MetadataExt;

use crate::config::DedupConfig;
use crate::error::{DedupError, Result};
use crate::fingerprint::{digest_file, Digest};
use crate::signal::ShutdownHandler;

/// ファイルの実体を識別する (デバイスID, inode番号) の組
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    pub device: u64,
    pub inode: u64,
}

impl FileId {
    /// メタデータからFileIdを作成する (非Unix環境では常に0)
    pub fn from_metadata(metadata: &Metadata) -> Self {
        #[cfg(unix)]
        let (device, inode) = (metadata.dev(), metadata.ino());

        #[cfg(not(unix))]
        let (device, inode) = {
            let _ = metadata;
            (0, 0)
        };

        FileId { device, inode }
    }

    /// 同一の実体を指しているか
    ///
    /// 非Unix環境ではinode番号が取れないため常にfalse。
    pub fn same_file(&self, other: &FileId) -> bool {
        cfg!(unix) && self == other
    }
}

/// 候補ファイルの状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateState {
    /// 未処理
    Pending,
    /// 後続ファイルの同値クラスに統合済み (統合先の実体を保持)
    Merged(FileId),
}

/// 重複排除の候補となる、サイズが0でない通常ファイル
#[derive(Debug, Clone)]
pub struct Candidate {
    /// ファイルパス
    pub path: PathBuf,
    /// ファイルサイズ (バイト)
    pub size: u64,
    /// 探索時点の実体
    pub id: FileId,
    /// 内容全体のダイジェスト
    pub digest: Digest,
    /// 探索時点のハードリンク数
    pub links: u64,
    /// 統合状態
    pub state: CandidateState,
}

impl Candidate {
    pub fn new(path: PathBuf, size: u64, id: FileId, digest: Digest) -> Self {
        Candidate {
            path,
            size,
            id,
            digest,
            links: 1,
            state: CandidateState::Pending,
        }
    }

    pub fn with_links(mut self, links: u64) -> Self {
        self.links = links;
        self
    }

    /// 現在の実体 (統合済みなら統合先のもの)
    pub fn identity(&self) -> FileId {
        match self.state {
            CandidateState::Pending => self.id,
            CandidateState::Merged(id) => id,
        }
    }

    /// 同値クラスに統合済みとして印を付け、実体を統合先に合わせる
    pub fn merge_into(&mut self, survivor: FileId) {
        self.state = CandidateState::Merged(survivor);
    }
}

/// ダイジェスト計算前のファイル情報
#[derive(Debug, Clone)]
struct FileEntry {
    path: PathBuf,
    size: u64,
    id: FileId,
    links: u64,
}

/// ルート以下の候補ファイルを探索し、ダイジェストを計算する
///
/// ダイジェストを計算できなかったファイルは警告を出して除外する。
///
/// Args:
///     config: 実行設定 (roots, recursive, threads を使用)
///     shutdown: 中断要求フラグ
///
/// Returns:
///     候補ファイルのリスト。中断されずに候補が2件未満の場合は`DedupError::Config`
pub fn index_candidates(config: &DedupConfig, shutdown: &ShutdownHandler) -> Result<Vec<Candidate>> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for root in &config.roots {
        log::info!("scanning {}", root.display());
        for entry in scan_root(root, config.recursive) {
            // シンボリックリンク経由や相対/絶対の違いで同じファイルに2回到達しうる
            let key = entry.path.canonicalize().unwrap_or_else(|_| entry.path.clone());
            if seen.insert(key) {
                entries.push(entry);
            } else {
                log::trace!("already indexed via another root: {}", entry.path.display());
            }
        }
    }
    log::debug!("{} non-empty regular files found", entries.len());

    let candidates = fingerprint_entries(entries, config.threads, shutdown);

    if candidates.len() < 2 && !shutdown.is_shutdown_requested() {
        return Err(DedupError::Config(format!(
            "need at least 2 non-empty files to deduplicate, found {}",
            candidates.len()
        )));
    }
    Ok(candidates)
}

/// 1つのルート以下のサイズ0でない通常ファイルを列挙する
///
/// 非再帰モードでは直下のファイルのみ対象とする。シンボリックリンクは辿らない。
fn scan_root(root: &Path, recursive: bool) -> Vec<FileEntry> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut entries = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(false)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        // シンボリックリンク、ディレクトリ、デバイスファイルは除外
        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("skipping {}: {}", entry.path().display(), e);
                continue;
            }
        };

        if metadata.len() == 0 {
            log::trace!("skipping empty file {}", entry.path().display());
            continue;
        }

        entries.push(FileEntry {
            path: entry.into_path(),
            size: metadata.len(),
            id: FileId::from_metadata(&metadata),
            links: link_count(&metadata),
        });
    }

    entries
}

#[cfg(unix)]
fn link_count(metadata: &Metadata) -> u64 {
    metadata.nlink()
}

#[cfg(not(unix))]
fn link_count(_metadata: &Metadata) -> u64 {
    1
}

/// ファイル群のダイジェストを並列に計算する
fn fingerprint_entries(entries: Vec<FileEntry>, threads: usize, shutdown: &ShutdownHandler) -> Vec<Candidate> {
    let hash_one = |entry: FileEntry| -> Option<Candidate> {
        if shutdown.is_shutdown_requested() {
            return None;
        }
        match digest_file(&entry.path) {
            Ok(digest) => {
                log::trace!("{} {}", digest, entry.path.display());
                Some(Candidate::new(entry.path, entry.size, entry.id, digest).with_links(entry.links))
            }
            Err(e) => {
                log::warn!("excluding {}", e);
                None
            }
        }
    };

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| entries.into_par_iter().filter_map(hash_one).collect()),
        Err(e) => {
            log::warn!("failed to build thread pool, hashing sequentially: {}", e);
            entries.into_iter().filter_map(hash_one).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn config_for(root: &Path, recursive: bool) -> DedupConfig {
        DedupConfig {
            recursive,
            roots: vec![root.to_path_buf()],
            ..Default::default()
        }
    }

    fn create_tree(root: &Path) {
        fs::write(root.join("a"), b"X").unwrap();
        fs::write(root.join("b"), b"X").unwrap();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::write(root.join("sub/c"), b"Y").unwrap();
        fs::write(root.join("sub/deeper/d"), b"Z").unwrap();
    }

    #[test]
    fn test_non_recursive_only_direct_children() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());

        let candidates =
            index_candidates(&config_for(temp_dir.path(), false), &ShutdownHandler::new()).unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_recursive_whole_subtree() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());

        let candidates =
            index_candidates(&config_for(temp_dir.path(), true), &ShutdownHandler::new()).unwrap();
        assert_eq!(candidates.len(), 4);
        assert!(candidates.iter().all(|c| c.state == CandidateState::Pending));
    }

    #[test]
    fn test_empty_files_excluded() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        File::create(temp_dir.path().join("empty")).unwrap();

        let candidates =
            index_candidates(&config_for(temp_dir.path(), false), &ShutdownHandler::new()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| !c.path.ends_with("empty")));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_excluded() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        std::os::unix::fs::symlink(temp_dir.path().join("a"), temp_dir.path().join("link")).unwrap();

        let candidates =
            index_candidates(&config_for(temp_dir.path(), false), &ShutdownHandler::new()).unwrap();
        assert_eq!(candidates.len(), 2);
    }

    #[test]
    fn test_fewer_than_two_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("only"), b"X").unwrap();
        File::create(temp_dir.path().join("empty")).unwrap();

        let result = index_candidates(&config_for(temp_dir.path(), false), &ShutdownHandler::new());
        assert!(matches!(result, Err(DedupError::Config(_))));
    }

    #[test]
    fn test_overlapping_roots_indexed_once() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let config = DedupConfig {
            recursive: true,
            roots: vec![temp_dir.path().to_path_buf(), temp_dir.path().join("sub")],
            ..Default::default()
        };

        let candidates = index_candidates(&config, &ShutdownHandler::new()).unwrap();
        assert_eq!(candidates.len(), 4);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_root_reaching_same_file_indexed_once() {
        let temp_dir = TempDir::new().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(data.join("sub")).unwrap();
        fs::write(data.join("sub/only"), b"X").unwrap();
        let alias = temp_dir.path().join("alias");
        std::os::unix::fs::symlink(data.join("sub"), &alias).unwrap();
        let config = DedupConfig {
            recursive: true,
            roots: vec![data, alias],
            ..Default::default()
        };

        let result = index_candidates(&config, &ShutdownHandler::new());
        assert!(matches!(result, Err(DedupError::Config(_))));
    }

    #[test]
    fn test_relative_and_absolute_root_indexed_once() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let dotted = temp_dir.path().join("sub").join("..");
        let config = DedupConfig {
            recursive: true,
            roots: vec![temp_dir.path().to_path_buf(), dotted],
            ..Default::default()
        };

        let candidates = index_candidates(&config, &ShutdownHandler::new()).unwrap();
        assert_eq!(candidates.len(), 4);
    }

    #[test]
    fn test_vanished_file_excluded_without_abort() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let mut entries = scan_root(temp_dir.path(), false);
        assert_eq!(entries.len(), 2);
        entries.push(FileEntry {
            path: temp_dir.path().join("vanished"),
            size: 1,
            id: FileId { device: 0, inode: 0 },
            links: 1,
        });

        let candidates = fingerprint_entries(entries, 2, &ShutdownHandler::new());
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| !c.path.ends_with("vanished")));
    }

    #[cfg(unix)]
    #[test]
    fn test_link_count_recorded() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a"), b"X").unwrap();
        fs::hard_link(temp_dir.path().join("a"), temp_dir.path().join("b")).unwrap();

        let candidates =
            index_candidates(&config_for(temp_dir.path(), false), &ShutdownHandler::new()).unwrap();
        assert!(candidates.iter().all(|c| c.links == 2));
    }

    #[test]
    fn test_shutdown_skips_hashing() {
        let temp_dir = TempDir::new().unwrap();
        create_tree(temp_dir.path());
        let shutdown = ShutdownHandler::new();
        shutdown.request_shutdown();

        let candidates = index_candidates(&config_for(temp_dir.path(), true), &shutdown).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_merge_into_changes_identity() {
        let digest = Digest::from_bytes([1; 32]);
        let own = FileId { device: 1, inode: 10 };
        let survivor = FileId { device: 1, inode: 20 };
        let mut candidate = Candidate::new(PathBuf::from("/x"), 1, own, digest);

        assert_eq!(candidate.identity(), own);
        candidate.merge_into(survivor);
        assert!(matches!(candidate.state, CandidateState::Merged(_)));
        assert_eq!(candidate.identity(), survivor);
        assert_eq!(candidate.id, own);
    }
}
