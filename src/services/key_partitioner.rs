// キー集合分割
//
// ソースとターゲットのカタログのオブジェクト名を、
// 追加・削除・共通の3つの集合に分割します。

use std::collections::BTreeSet;

use crate::core::metadata::ObjectCatalog;

/// オブジェクト名の分割結果
///
/// 各集合は名前の昇順で走査されます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPartition {
    /// ソースにのみ存在する名前
    pub added: BTreeSet<String>,

    /// ターゲットにのみ存在する名前
    pub removed: BTreeSet<String>,

    /// 両方に存在する名前
    pub intersect: BTreeSet<String>,
}

impl KeyPartition {
    /// 2つのカタログのキーを分割
    pub fn of(source: &ObjectCatalog, target: &ObjectCatalog) -> Self {
        let source_keys: BTreeSet<&String> = source.keys().collect();
        let target_keys: BTreeSet<&String> = target.keys().collect();

        Self {
            added: source_keys
                .difference(&target_keys)
                .map(|k| (*k).clone())
                .collect(),
            removed: target_keys
                .difference(&source_keys)
                .map(|k| (*k).clone())
                .collect(),
            intersect: source_keys
                .intersection(&target_keys)
                .map(|k| (*k).clone())
                .collect(),
        }
    }

    /// 分割結果に含まれる名前の総数
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.intersect.len()
    }
}
