//! 国際化 (i18n) サポート

use sys_locale::get_locale;

/// 現在のロケールが日本語かどうかを判定する
pub fn is_japanese() -> bool {
    get_locale()
        .map(|l| l.starts_with("ja"))
        .unwrap_or(false)
}

/// メッセージキー
#[derive(Clone, Copy, Debug)]
pub enum Msg {
    // 対話
    ConfirmReplace,

    // エラー
    ErrorOccurred,

    // サマリー
    SummaryDryRun,
    SummaryComplete,
    SummaryInterrupted,
    FilesIndexed,
    PairsCompared,
    DuplicatesFound,
    AlreadyLinked,
    CrossDevice,
    ContentMismatch,
    CompareFailed,
    Linked,
    WouldLink,
    Declined,
    LinkFailed,
    BytesReclaimed,
    BytesReclaimable,
    IndexTime,
    DedupTime,
}

/// ローカライズされたメッセージを取得する
pub fn msg(key: Msg) -> &'static str {
    if is_japanese() {
        msg_ja(key)
    } else {
        msg_en(key)
    }
}

fn msg_ja(key: Msg) -> &'static str {
    match key {
        Msg::ConfirmReplace => "ハードリンクに置換しますか:",

        Msg::ErrorOccurred => "エラー",

        Msg::SummaryDryRun => "=== ドライラン結果 ===",
        Msg::SummaryComplete => "=== 処理完了 ===",
        Msg::SummaryInterrupted => "=== 中断 ===",
        Msg::FilesIndexed => "対象ファイル数",
        Msg::PairsCompared => "比較ペア数",
        Msg::DuplicatesFound => "重複と判定",
        Msg::AlreadyLinked => "リンク済み",
        Msg::CrossDevice => "デバイス跨ぎのためスキップ",
        Msg::ContentMismatch => "内容不一致",
        Msg::CompareFailed => "比較失敗",
        Msg::Linked => "置換成功",
        Msg::WouldLink => "置換予定",
        Msg::Declined => "ユーザーがスキップ",
        Msg::LinkFailed => "置換失敗",
        Msg::BytesReclaimed => "回収済み容量",
        Msg::BytesReclaimable => "回収可能容量",
        Msg::IndexTime => "探索時間",
        Msg::DedupTime => "重複排除時間",
    }
}

fn msg_en(key: Msg) -> &'static str {
    match key {
        Msg::ConfirmReplace => "Replace with hard link:",

        Msg::ErrorOccurred => "Error",

        Msg::SummaryDryRun => "=== Dry Run Results ===",
        Msg::SummaryComplete => "=== Complete ===",
        Msg::SummaryInterrupted => "=== Interrupted ===",
        Msg::FilesIndexed => "Files indexed",
        Msg::PairsCompared => "Pairs compared",
        Msg::DuplicatesFound => "Duplicates found",
        Msg::AlreadyLinked => "Already linked",
        Msg::CrossDevice => "Skipped (cross-device)",
        Msg::ContentMismatch => "Content mismatch",
        Msg::CompareFailed => "Comparison failed",
        Msg::Linked => "Linked",
        Msg::WouldLink => "Would link",
        Msg::Declined => "Skipped by user",
        Msg::LinkFailed => "Link failed",
        Msg::BytesReclaimed => "Space reclaimed",
        Msg::BytesReclaimable => "Space reclaimable",
        Msg::IndexTime => "Indexing time",
        Msg::DedupTime => "Dedup time",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_have_translations() {
        let keys = [
            Msg::ConfirmReplace,
            Msg::ErrorOccurred,
            Msg::SummaryDryRun,
            Msg::SummaryComplete,
            Msg::SummaryInterrupted,
            Msg::FilesIndexed,
            Msg::PairsCompared,
            Msg::DuplicatesFound,
            Msg::AlreadyLinked,
            Msg::CrossDevice,
            Msg::ContentMismatch,
            Msg::CompareFailed,
            Msg::Linked,
            Msg::WouldLink,
            Msg::Declined,
            Msg::LinkFailed,
            Msg::BytesReclaimed,
            Msg::BytesReclaimable,
            Msg::IndexTime,
            Msg::DedupTime,
        ];

        for key in keys {
            assert!(!msg_ja(key).is_empty());
            assert!(!msg_en(key).is_empty());
        }
    }
}
