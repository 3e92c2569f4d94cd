//! エンジンに渡す実行設定

use std::collections::HashSet;
use std::path::PathBuf;

use crate::cli::Args;
use crate::error::{DedupError, Result};

/// 重複排除エンジンの実行設定
#[derive(Debug, Clone, Default)]
pub struct DedupConfig {
    /// 置換前のファイルを番号付きバックアップとして残す
    pub backup: bool,
    /// ファイルシステムを一切変更しない
    pub dry_run: bool,
    /// 置換ごとに確認を求める
    pub interactive: bool,
    /// サブディレクトリも探索する
    pub recursive: bool,
    /// 判定ごとのログを出す
    pub verbose: bool,
    /// ダイジェスト計算のスレッド数 (0: rayonの既定値)
    pub threads: usize,
    /// 探索するルートディレクトリ
    pub roots: Vec<PathBuf>,
}

impl DedupConfig {
    /// CLI引数から設定を作成し、ルートを検証する
    ///
    /// Returns:
    ///     ルートが存在しない、またはディレクトリでない場合は`DedupError::Config`
    pub fn from_args(args: &Args) -> Result<Self> {
        let config = DedupConfig {
            backup: args.backup,
            dry_run: args.dry_run,
            interactive: args.interactive,
            recursive: args.recursive,
            verbose: args.verbose > 0,
            threads: args.threads,
            roots: args.roots.clone(),
        };
        config.validated()
    }

    /// ルートの存在を確認し、重複したルートを取り除く
    pub fn validated(mut self) -> Result<Self> {
        if self.roots.is_empty() {
            self.roots.push(PathBuf::from("."));
        }

        let mut seen = HashSet::new();
        let mut roots = Vec::with_capacity(self.roots.len());
        for root in self.roots {
            if !root.exists() {
                return Err(DedupError::Config(format!(
                    "{} does not exist",
                    root.display()
                )));
            }
            if !root.is_dir() {
                return Err(DedupError::Config(format!(
                    "{} is not a directory",
                    root.display()
                )));
            }
            let key = root.canonicalize().unwrap_or_else(|_| root.clone());
            if seen.insert(key) {
                roots.push(root);
            }
        }
        self.roots = roots;
        Ok(self)
    }
}
