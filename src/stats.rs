//! 処理統計

use std::time::Duration;

use bytesize::ByteSize;

use crate::hardlink::LinkOutcome;
use crate::verify::Decision;

/// 重複排除の集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// 候補として索引付けしたファイル数
    pub files_indexed: usize,
    /// ダイジェストが一致して判定したペア数
    pub pairs_compared: usize,
    pub already_linked: usize,
    pub cross_device: usize,
    pub content_mismatch: usize,
    /// 比較中の読み込み失敗
    pub compare_failed: usize,
    /// 実際に作成したハードリンク数
    pub linked: usize,
    /// ドライランで作成するはずだったハードリンク数
    pub would_link: usize,
    /// 対話モードで拒否された数
    pub declined: usize,
    pub link_failed: usize,
    /// 実際に回収したバイト数
    pub bytes_reclaimed: u64,
    /// 全ての重複をリンクできた場合に回収できるバイト数
    pub bytes_reclaimable: u64,
    pub index_elapsed: Duration,
    pub dedup_elapsed: Duration,
    /// Ctrl+C で中断された
    pub interrupted: bool,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 判定結果を記録する (Linkの場合はリンク結果を別途記録する)
    pub fn record_decision(&mut self, decision: &Decision, size: u64) {
        self.pairs_compared += 1;
        match decision {
            Decision::AlreadyLinked => self.already_linked += 1,
            Decision::CrossDevice => self.cross_device += 1,
            Decision::ContentMismatch => self.content_mismatch += 1,
            Decision::CompareFailed(_) => self.compare_failed += 1,
            Decision::Link => self.bytes_reclaimable += size,
        }
    }

    /// リンク結果を記録する
    ///
    /// 回収バイト数には置換した重複ファイルのサイズをそのまま加える。置換した
    /// ファイルのinodeが木の外や、区間末尾以外の複数リンクinodeにまだ残っている
    /// 場合、実際に解放された量より多く数える。
    pub fn record_link(&mut self, outcome: &LinkOutcome, size: u64) {
        match outcome {
            LinkOutcome::Linked { .. } => {
                self.linked += 1;
                self.bytes_reclaimed += size;
            }
            LinkOutcome::WouldLink => self.would_link += 1,
            LinkOutcome::Declined => self.declined += 1,
            LinkOutcome::Failed(_) => self.link_failed += 1,
        }
    }

    /// 内容一致と判定されたペア数 (リンクの成否を問わない)
    pub fn linkable(&self) -> usize {
        self.linked + self.would_link + self.declined + self.link_failed
    }

    /// 時間を除いた集計値 (実行間の比較用)
    pub fn counts(&self) -> Stats {
        Stats {
            index_elapsed: Duration::ZERO,
            dedup_elapsed: Duration::ZERO,
            ..self.clone()
        }
    }
}

/// バイト数をKiB/MiB/GiB単位の表示用文字列にする
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).display().iec().to_string()
}
