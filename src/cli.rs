//! コマンドライン引数のパースと設定

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// 同一内容のファイルをハードリンクに置き換えてディスク容量を回収するツール
#[derive(Parser, Debug)]
#[command(name = "linkdup")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 探索対象のディレクトリ (デフォルト: カレントディレクトリ)
    #[arg(default_value = ".")]
    pub roots: Vec<PathBuf>,

    /// 置換前のファイルを番号付きバックアップとして残す
    #[arg(short, long)]
    pub backup: bool,

    /// ドライラン (実際には変更せず、検出結果のみ表示)
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// 置換ごとに確認する
    #[arg(short, long)]
    pub interactive: bool,

    /// サブディレクトリも再帰的に探索する
    #[arg(short, long)]
    pub recursive: bool,

    /// 詳細出力 (-vv でさらに詳細)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// エラー以外を出力しない
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// ダイジェスト計算のスレッド数 (0: CPU数)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,
}

impl Args {
    /// 引数をパースして返す
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
