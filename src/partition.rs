//! ダイジェスト順の並べ替え

use crate::scanner::Candidate;

/// 候補をダイジェスト、デバイスID、ハードリンク数、パスの順で並べ替える
///
/// 同じダイジェストの候補は連続した区間に並ぶため、隣接ペアの比較だけで
/// 同値クラスを走査できる。同一デバイス上のファイルも区間内で連続する。
/// 末尾が残す側になるので、リンク数の最も多い既存のinodeが区間の末尾に来る。
/// 複数リンクを持つinodeのメンバーは互いに隣接する。
pub fn partition(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        a.digest
            .cmp(&b.digest)
            .then_with(|| a.id.device.cmp(&b.id.device))
            .then_with(|| a.links.cmp(&b.links))
            .then_with(|| shared_inode(a).cmp(&shared_inode(b)))
            .then_with(|| a.path.cmp(&b.path))
    });
}

/// 複数リンクを持つ場合のみinode番号で並べ、単独ファイルはパス順にする
fn shared_inode(candidate: &Candidate) -> u64 {
    if candidate.links > 1 {
        candidate.id.inode
    } else {
        0
    }
}

/// 並べ替え済みの候補を同じダイジェストの区間ごとに返す
pub fn runs(candidates: &[Candidate]) -> impl Iterator<Item = &[Candidate]> {
    candidates.chunk_by(|a, b| a.digest == b.digest)
}
