//! 対話モードの確認プロンプト

use std::io::{self, BufRead, BufReader, Stdin, Stderr, Write};
use std::path::Path;

use crate::i18n::{msg, Msg};

/// 置換の可否を利用者に問い合わせる
pub trait Confirm {
    /// duplicate を survivor へのハードリンクに置き換えてよいか
    fn confirm(&mut self, survivor: &Path, duplicate: &Path) -> bool;
}

/// 常に許可する (非対話モード用)
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _survivor: &Path, _duplicate: &Path) -> bool {
        true
    }
}

/// 入力ストリームから y/N を読み取るプロンプト
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl PromptConfirm<BufReader<Stdin>, Stderr> {
    /// 標準入力から読み、標準エラーに問い合わせを表示する
    pub fn stdin() -> Self {
        PromptConfirm::new(BufReader::new(io::stdin()), io::stderr())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        PromptConfirm { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, survivor: &Path, duplicate: &Path) -> bool {
        let _ = write!(
            self.output,
            "{} {} -> {} [y/N] ",
            msg(Msg::ConfirmReplace),
            duplicate.display(),
            survivor.display()
        );
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(line.trim()),
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}
