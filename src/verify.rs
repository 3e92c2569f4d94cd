//! 隣接する候補ペアの判定

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{DedupError, Result};
use crate::scanner::Candidate;

const COMPARE_BUF_SIZE: usize = 64 * 1024;

/// ダイジェストが一致したペアに対する判定
#[derive(Debug)]
pub enum Decision {
    /// 既に同一inode
    AlreadyLinked,
    /// デバイスが異なるためハードリンク不可 (おそらく重複)
    CrossDevice,
    /// ダイジェストは一致したが内容が異なる
    ContentMismatch,
    /// 内容比較中の読み込みに失敗した
    CompareFailed(DedupError),
    /// 内容が完全に一致したのでリンクしてよい
    Link,
}

/// 並び順で隣接する2つの候補を判定する
///
/// Args:
///     survivor: 後ろ側の候補 (残す側)
///     duplicate: 前側の候補 (置き換える側)
///
/// Returns:
///     ダイジェストが異なる場合はNone
pub fn verify_pair(survivor: &Candidate, duplicate: &Candidate) -> Option<Decision> {
    if survivor.digest != duplicate.digest {
        return None;
    }

    let (a, b) = (survivor.identity(), duplicate.identity());
    if a.same_file(&b) {
        return Some(Decision::AlreadyLinked);
    }
    if a.device != b.device {
        return Some(Decision::CrossDevice);
    }
    if survivor.size != duplicate.size {
        return Some(Decision::ContentMismatch);
    }

    Some(match same_content(&survivor.path, &duplicate.path) {
        Ok(true) => Decision::Link,
        Ok(false) => Decision::ContentMismatch,
        Err(e) => Decision::CompareFailed(e),
    })
}

/// 2つのファイルの内容をバイト単位で比較する
///
/// Returns:
///     内容が完全に一致すればtrue、読み込みに失敗した場合は`DedupError::Io`
pub fn same_content(a: &Path, b: &Path) -> Result<bool> {
    let mut fa = File::open(a).map_err(|e| DedupError::io(a, e))?;
    let mut fb = File::open(b).map_err(|e| DedupError::io(b, e))?;
    let mut buf_a = vec![0u8; COMPARE_BUF_SIZE];
    let mut buf_b = vec![0u8; COMPARE_BUF_SIZE];

    loop {
        let na = fill(&mut fa, &mut buf_a).map_err(|e| DedupError::io(a, e))?;
        let nb = fill(&mut fb, &mut buf_b).map_err(|e| DedupError::io(b, e))?;
        if na != nb || buf_a[..na] != buf_b[..nb] {
            return Ok(false);
        }
        if na == 0 {
            return Ok(true);
        }
    }
}

/// バッファが埋まるかEOFに達するまで読み込む
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
