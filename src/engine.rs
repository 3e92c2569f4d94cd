//! 重複排除エンジン
//!
//! 候補の索引付け → ダイジェスト順の並べ替え → 隣接ペアの判定 → ハードリンク置換
//! の順に処理し、結果を`Stats`に集計する。

use std::time::Instant;

use crate::config::DedupConfig;
use crate::error::Result;
use crate::hardlink::{LinkExecutor, LinkOutcome};
use crate::partition::{partition, runs};
use crate::prompt::Confirm;
use crate::scanner::{index_candidates, Candidate};
use crate::signal::ShutdownHandler;
use crate::stats::Stats;
use crate::verify::{verify_pair, Decision};

/// ルート以下の重複ファイルをハードリンクに集約する
///
/// Args:
///     config: 実行設定
///     confirm: 対話モードで使う確認プロンプト
///     shutdown: 中断要求フラグ
///
/// Returns:
///     集計結果。候補が2件未満などの設定エラーのみ`Err`になる
pub fn deduplicate(config: &DedupConfig, confirm: &mut dyn Confirm, shutdown: &ShutdownHandler) -> Result<Stats> {
    let mut stats = Stats::new();

    let started = Instant::now();
    let mut candidates = index_candidates(config, shutdown)?;
    partition(&mut candidates);
    stats.files_indexed = candidates.len();
    stats.index_elapsed = started.elapsed();
    log::info!(
        "{} candidates in {} digest groups",
        candidates.len(),
        runs(&candidates).filter(|run| run.len() > 1).count()
    );

    let started = Instant::now();
    let mut executor = LinkExecutor::new(config, confirm);
    link_pass(&mut candidates, &mut executor, shutdown, &mut stats);
    stats.dedup_elapsed = started.elapsed();
    stats.interrupted |= shutdown.is_shutdown_requested();

    Ok(stats)
}

/// 並べ替え済みの候補を末尾から走査し、隣接ペアごとに判定・置換する
///
/// 置換 (またはドライランでの置換予定) が決まった前側の候補は後ろ側の実体に統合され、
/// 同じ同値クラス内の次の比較では既にリンク済みと判定される。
/// これにより隣接ペアの比較だけでクラス全体が1つのinodeにまとまる。
pub fn link_pass(
    candidates: &mut [Candidate],
    executor: &mut LinkExecutor<'_>,
    shutdown: &ShutdownHandler,
    stats: &mut Stats,
) {
    for i in (1..candidates.len()).rev() {
        if shutdown.is_shutdown_requested() {
            log::warn!("interrupted, {} pairs left unprocessed", i);
            stats.interrupted = true;
            return;
        }

        let (head, tail) = candidates.split_at_mut(i);
        let duplicate = &mut head[i - 1];
        let survivor = &tail[0];

        let Some(decision) = verify_pair(survivor, duplicate) else {
            continue;
        };
        stats.record_decision(&decision, duplicate.size);

        match decision {
            Decision::AlreadyLinked => {
                log::debug!("already linked: {} = {}", duplicate.path.display(), survivor.path.display());
            }
            Decision::CrossDevice => {
                log::info!(
                    "probable duplicate on another device, skipped: {} ~ {}",
                    duplicate.path.display(),
                    survivor.path.display()
                );
            }
            Decision::ContentMismatch => {
                log::info!(
                    "digest collision, contents differ: {} != {}",
                    duplicate.path.display(),
                    survivor.path.display()
                );
            }
            Decision::CompareFailed(e) => {
                log::warn!("comparison failed: {}", e);
            }
            Decision::Link => {
                let outcome = executor.execute(&survivor.path, &duplicate.path);
                match &outcome {
                    LinkOutcome::Linked { backup } => {
                        log::info!("linked: {} -> {}", duplicate.path.display(), survivor.path.display());
                        if let Some(backup) = backup {
                            log::debug!("backup kept at {}", backup.display());
                        }
                        duplicate.merge_into(survivor.identity());
                    }
                    LinkOutcome::WouldLink => {
                        log::info!("would link: {} -> {}", duplicate.path.display(), survivor.path.display());
                        duplicate.merge_into(survivor.identity());
                    }
                    LinkOutcome::Declined => {
                        log::info!("skipped by user: {}", duplicate.path.display());
                    }
                    LinkOutcome::Failed(e) => {
                        log::warn!("link failed: {}", e);
                    }
                }
                stats.record_link(&outcome, duplicate.size);
            }
        }
    }
}
