// 辞書比較サービス
//
// 2つのメタデータ辞書が同一かどうかを再帰的に判定します。
// リストは同一性キーで並べ替えてから要素ごとに比較するため、
// 要素の順序の違いは差分として扱いません。

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

use crate::core::identity::sort_by_identity;

/// 辞書比較サービス
#[derive(Debug, Clone, Default)]
pub struct DictionaryComparator {
    ignore_whitespaces: bool,
}

impl DictionaryComparator {
    /// 新しいDictionaryComparatorを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 空白を無視して文字列を比較するComparatorを作成
    pub fn with_ignore_whitespaces(ignore_whitespaces: bool) -> Self {
        Self { ignore_whitespaces }
    }

    /// 2つの辞書が同一かどうかを判定
    ///
    /// # Arguments
    ///
    /// * `source` - ソース側のメタデータ
    /// * `target` - ターゲット側のメタデータ
    /// * `ignore_keys` - 比較から除外するキー（入れ子の辞書にも適用）
    ///
    /// # Returns
    ///
    /// すべてのフィールドが一致すれば `true`
    pub fn are_dictionaries_identical(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
        ignore_keys: &HashSet<String>,
    ) -> bool {
        let source_keys: BTreeSet<&String> = source.keys().collect();
        let target_keys: BTreeSet<&String> = target.keys().collect();

        let source_only: BTreeSet<&&String> = source_keys.difference(&target_keys).collect();
        let target_only: BTreeSet<&&String> = target_keys.difference(&source_keys).collect();

        // キーの数が異なる場合は不一致
        if source_only.len() != target_only.len() {
            return false;
        }

        // 片側にしか存在しないキーがある場合は不一致
        if source_only.iter().any(|key| !target_only.contains(key)) {
            return false;
        }

        for (key, source_value) in source {
            if ignore_keys.contains(key) {
                continue;
            }

            let target_value = target.get(key).unwrap_or(&Value::Null);

            let identical = match source_value {
                Value::Object(source_map) => match target_value {
                    Value::Object(target_map) => {
                        self.are_dictionaries_identical(source_map, target_map, ignore_keys)
                    }
                    _ => false,
                },
                Value::Array(source_list) => match target_value {
                    Value::Array(target_list) => {
                        let mut source_list = source_list.clone();
                        let mut target_list = target_list.clone();
                        sort_by_identity(&mut source_list);
                        sort_by_identity(&mut target_list);
                        self.are_lists_identical(&source_list, &target_list, ignore_keys)
                    }
                    _ => false,
                },
                _ => self.are_scalars_identical(source_value, target_value),
            };

            if !identical {
                return false;
            }
        }

        true
    }

    /// 2つのリストが同一かどうかを判定（並べ替え済みであること）
    pub fn are_lists_identical(
        &self,
        source: &[Value],
        target: &[Value],
        ignore_keys: &HashSet<String>,
    ) -> bool {
        if source.len() != target.len() {
            return false;
        }

        source
            .iter()
            .zip(target)
            .all(|(source_item, target_item)| match (source_item, target_item) {
                (Value::Object(source_map), Value::Object(target_map)) => {
                    self.are_dictionaries_identical(source_map, target_map, ignore_keys)
                }
                (Value::Object(_), _) => false,
                _ => source_item == target_item,
            })
    }

    /// スカラー値の比較
    ///
    /// 空文字列とnullは同一として扱います。
    fn are_scalars_identical(&self, source: &Value, target: &Value) -> bool {
        let (source, target) = if self.ignore_whitespaces {
            (strip_whitespace(source), strip_whitespace(target))
        } else {
            (source.clone(), target.clone())
        };

        if is_null_or_empty_pair(&source, &target) {
            return true;
        }

        source == target
    }
}

/// 空文字列とnullの組み合わせかどうか
pub(crate) fn is_null_or_empty_pair(source: &Value, target: &Value) -> bool {
    matches!(
        (source, target),
        (Value::String(s), Value::Null) | (Value::Null, Value::String(s)) if s.is_empty()
    )
}

/// 文字列値から空白文字をすべて取り除く
fn strip_whitespace(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(
            s.chars()
                .filter(|c| !c.is_whitespace())
                .collect(),
        ),
        other => other.clone(),
    }
}
