//! ファイル内容のダイジェスト計算

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{DedupError, Result};

const READ_BUF_SIZE: usize = 64 * 1024;

/// ファイル内容全体のBLAKE3ダイジェスト
///
/// 等価性のヒントとしてのみ使い、一致しても内容が同一である証明にはならない。
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Digest(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}

/// ファイル内容全体を順次読み込んでダイジェストを計算する
///
/// Args:
///     path: 対象ファイルのパス
///
/// Returns:
///     成功時はDigest、読み込みに失敗した場合は`DedupError::Io`
pub fn digest_file(path: &Path) -> Result<Digest> {
    let file = File::open(path).map_err(|e| DedupError::io(path, e))?;
    digest_reader(file).map_err(|e| DedupError::io(path, e))
}

fn digest_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut hasher = blake3::Hasher::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(Digest(*hasher.finalize().as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_digest_matches_blake3() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("file");
        fs::write(&path, b"hello").unwrap();

        let digest = digest_file(&path).unwrap();
        assert_eq!(digest.as_bytes(), blake3::hash(b"hello").as_bytes());
    }

    #[test]
    fn test_same_content_same_digest() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        let c = temp_dir.path().join("c");
        fs::write(&a, b"X").unwrap();
        fs::write(&b, b"X").unwrap();
        fs::write(&c, b"Y").unwrap();

        assert_eq!(digest_file(&a).unwrap(), digest_file(&b).unwrap());
        assert_ne!(digest_file(&a).unwrap(), digest_file(&c).unwrap());
    }

    #[test]
    fn test_larger_than_buffer() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("big");
        let content = vec![7u8; READ_BUF_SIZE * 3 + 11];
        fs::write(&path, &content).unwrap();

        let digest = digest_file(&path).unwrap();
        assert_eq!(digest.as_bytes(), blake3::hash(&content).as_bytes());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = digest_file(&temp_dir.path().join("nonexistent"));
        assert!(matches!(result, Err(DedupError::Io { .. })));
    }

    #[test]
    fn test_display_is_hex() {
        let digest = Digest::from_bytes([0xab; 32]);
        let s = digest.to_string();
        assert_eq!(s.len(), 64);
        assert!(s.starts_with("abab"));
    }
}
