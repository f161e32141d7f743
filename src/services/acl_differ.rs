// ACL差分サービス
//
// 権限リスト（datacl, relacl など）を集合的に比較し、
// 付与すべきエントリと取り消すべきエントリを差分辞書に記録します。

use serde_json::{Map, Value};

use crate::core::difference::{DifferenceDict, ElementChanges};

/// ACLを保持するキー（優先順）
pub const ACL_KEYS: [&str; 4] = ["datacl", "relacl", "typacl", "pkgacl"];

/// いずれのACLキーも見つからない場合のキー
pub const DEFAULT_ACL_KEY: &str = "acl";

/// ACL差分サービス
#[derive(Debug, Clone, Default)]
pub struct AclDiffer {}

impl AclDiffer {
    /// 新しいAclDifferを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 比較対象のACLキーを決定
    ///
    /// ソースで最初に見つかったキー、なければターゲットで見つかったキーを使用します。
    pub fn acl_key(source: &Map<String, Value>, target: &Map<String, Value>) -> &'static str {
        ACL_KEYS
            .iter()
            .copied()
            .find(|key| source.contains_key(*key))
            .or_else(|| {
                ACL_KEYS
                    .iter()
                    .copied()
                    .find(|key| target.contains_key(*key))
            })
            .unwrap_or(DEFAULT_ACL_KEY)
    }

    /// ACLの差分を差分辞書に反映
    ///
    /// 追加・削除がどちらも空の場合はキー自体を差分辞書から取り除きます。
    pub fn parse_acl(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
        difference: &mut DifferenceDict,
    ) {
        let key = Self::acl_key(source, target);

        let source_acl = acl_entries(source, key);
        let mut remaining = acl_entries(target, key);

        let mut added = Vec::new();
        for entry in source_acl {
            match remaining.iter().position(|candidate| *candidate == entry) {
                Some(index) => {
                    remaining.remove(index);
                }
                None => added.push(entry),
            }
        }

        if added.is_empty() && remaining.is_empty() {
            difference.remove(key);
        } else {
            difference.set_elements(
                key,
                ElementChanges {
                    added: Some(added),
                    changed: None,
                    deleted: Some(remaining),
                },
            );
        }
    }
}

/// ACLエントリのリストを取得（nullや未設定は空リスト）
fn acl_entries(metadata: &Map<String, Value>, key: &str) -> Vec<Value> {
    match metadata.get(key) {
        Some(Value::Array(entries)) => entries.clone(),
        _ => Vec::new(),
    }
}
