// ディレクトリ差分サービス
//
// 2つのメタデータ辞書の差分（ソース -> ターゲットの方向）を再帰的に計算します。
// 結果はターゲットをソースの定義に近づけるALTER文の生成に使用されます。
//
// 入れ子の辞書の差分は親キーの下ではなく同じフラットな差分辞書に書き込まれます。
// 深さの異なるキーが衝突した場合は後から書き込まれた値が残ります。

use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

use crate::core::difference::{DifferenceDict, ElementChanges};
use crate::core::identity::IdentityKey;
use crate::core::metadata::contains_struct;
use crate::services::dictionary_comparator::is_null_or_empty_pair;

/// 空文字列で消去を表すキー
const CLEARABLE_KEYS: [&str; 2] = ["comment", "description"];

/// ディレクトリ差分サービス
#[derive(Debug, Clone, Default)]
pub struct DirectoryDiffer {}

impl DirectoryDiffer {
    /// 新しいDirectoryDifferを作成
    pub fn new() -> Self {
        Self {}
    }

    /// 2つの辞書の差分を計算
    ///
    /// # Arguments
    ///
    /// * `source` - ソース側のメタデータ（あるべき定義）
    /// * `target` - ターゲット側のメタデータ（現在の定義）
    /// * `ignore_keys` - 差分から除外するキー
    ///
    /// # Returns
    ///
    /// 呼び出しごとに新しく作成される差分辞書
    pub fn directory_diff(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
        ignore_keys: &HashSet<String>,
    ) -> DifferenceDict {
        let mut difference = DifferenceDict::new();
        self.diff_into(source, target, ignore_keys, &mut difference);
        difference
    }

    /// 既存の差分辞書に差分を書き込む
    pub fn diff_into(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
        ignore_keys: &HashSet<String>,
        difference: &mut DifferenceDict,
    ) {
        let source_keys: BTreeSet<&String> = source.keys().collect();
        let target_keys: BTreeSet<&String> = target.keys().collect();
        let target_only: Vec<&String> = target_keys.difference(&source_keys).copied().collect();

        for (key, source_value) in source {
            if ignore_keys.contains(key) {
                continue;
            }

            let Some(target_value) = target.get(key) else {
                // ソースにのみ存在するリストは全要素を追加として扱う
                if let Value::Array(list) = source_value {
                    difference.set_elements(key, ElementChanges::added(list.clone()));
                }
                continue;
            };

            match source_value {
                Value::Object(source_map) => {
                    let empty = Map::new();
                    let target_map = target_value.as_object().unwrap_or(&empty);
                    self.diff_into(source_map, target_map, ignore_keys, difference);
                }
                Value::Array(source_list) => {
                    self.diff_list(key, source_list, target_value, ignore_keys, difference);
                }
                _ => self.diff_scalar(key, source_value, target_value, difference),
            }
        }

        // ターゲットにのみ存在するリストは全要素を削除として扱う
        for key in target_only {
            if ignore_keys.contains(key) {
                continue;
            }
            if let Some(Value::Array(list)) = target.get(key) {
                difference.set_elements(key, ElementChanges::deleted(list.clone()));
            }
        }
    }

    /// リスト値の差分
    fn diff_list(
        &self,
        key: &str,
        source_list: &[Value],
        target_value: &Value,
        ignore_keys: &HashSet<String>,
        difference: &mut DifferenceDict,
    ) {
        let target_list: &[Value] = match target_value {
            Value::Array(list) => list,
            _ => &[],
        };

        if contains_struct(source_list) {
            let changes = self.diff_struct_list(source_list, target_list, ignore_keys);
            if changes.is_empty() {
                difference.remove(key);
            } else {
                difference.set_elements(key, changes);
            }
        } else if source_list.is_empty() {
            if contains_struct(target_list) {
                difference.set_elements(key, ElementChanges::deleted(target_list.to_vec()));
            }
        } else {
            // スカラーのみのリストは値全体を置き換える
            difference.set_value(key, Value::Array(source_list.to_vec()));
        }
    }

    /// サブオブジェクトのリストを同一性キーで突き合わせる
    fn diff_struct_list(
        &self,
        source_list: &[Value],
        target_list: &[Value],
        ignore_keys: &HashSet<String>,
    ) -> ElementChanges {
        let mut added = Vec::new();
        let mut changed = Vec::new();
        let mut remaining: Vec<Value> = target_list.to_vec();

        for source in source_list {
            // 入れ子のリストは突き合わせの対象外
            let Value::Object(source_map) = source else {
                continue;
            };
            let Some(identity) = IdentityKey::resolve(source_map) else {
                continue;
            };

            if target_list.is_empty() {
                added.push(source.clone());
                continue;
            }

            let position = remaining
                .iter()
                .rposition(|candidate| identity.matches(source, candidate));

            match position {
                Some(index) => {
                    let matched = remaining.remove(index);
                    if !same_ignoring(source, &matched, ignore_keys) {
                        changed.push(source.clone());
                    }
                }
                None => added.push(source.clone()),
            }
        }

        ElementChanges::from_parts(added, changed, remaining)
    }

    /// スカラー値の差分
    fn diff_scalar(
        &self,
        key: &str,
        source_value: &Value,
        target_value: &Value,
        difference: &mut DifferenceDict,
    ) {
        if is_null_or_empty_pair(source_value, target_value) {
            return;
        }

        if source_value == target_value {
            return;
        }

        // コメントの消去は空文字列として記録する
        if source_value.is_null() && CLEARABLE_KEYS.contains(&key) {
            difference.set_value(key, Value::String(String::new()));
        } else {
            difference.set_value(key, source_value.clone());
        }
    }
}

/// 無視キーを取り除いた上で2つの要素が等しいか
fn same_ignoring(source: &Value, target: &Value, ignore_keys: &HashSet<String>) -> bool {
    match (source, target) {
        (Value::Object(source_map), Value::Object(target_map)) => {
            let strip = |map: &Map<String, Value>| -> Map<String, Value> {
                map.iter()
                    .filter(|(k, _)| !ignore_keys.contains(*k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            };
            strip(source_map) == strip(target_map)
        }
        _ => source == target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn keys(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_scalar_change() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"name": "t", "fillfactor": 70})),
            &map(json!({"name": "t", "fillfactor": 100})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"fillfactor": 70}));
    }

    #[test]
    fn test_comment_clearing_records_empty_string() {
        let differ = DirectoryDiffer::new();
        for key in ["comment", "description"] {
            let diff = differ.directory_diff(
                &map(json!({ key: null })),
                &map(json!({ key: "old text" })),
                &keys(&[]),
            );
            assert_eq!(diff.to_value(), json!({ key: "" }));
        }
    }

    #[test]
    fn test_other_keys_record_null() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"spcname": null})),
            &map(json!({"spcname": "fast"})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"spcname": null}));
    }

    #[test]
    fn test_null_and_empty_string_are_not_a_change() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"comment": ""})),
            &map(json!({"comment": null})),
            &keys(&[]),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn test_list_identity_matching() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"cols": [{"name": "a", "v": 1}, {"name": "b", "v": 2}]})),
            &map(json!({"cols": [{"name": "b", "v": 99}, {"name": "c", "v": 3}]})),
            &keys(&[]),
        );

        let cols = diff.elements("cols").unwrap();
        assert_eq!(cols.added_values(), &[json!({"name": "a", "v": 1})]);
        assert_eq!(cols.changed_values(), &[json!({"name": "b", "v": 2})]);
        assert_eq!(cols.deleted_values(), &[json!({"name": "c", "v": 3})]);
    }

    #[test]
    fn test_list_matching_ignores_keys() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"cols": [{"name": "a", "attnum": 1}]})),
            &map(json!({"cols": [{"name": "a", "attnum": 7}]})),
            &keys(&["attnum"]),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn test_identical_struct_list_is_not_recorded() {
        let differ = DirectoryDiffer::new();
        let list = json!({"cols": [{"name": "a"}], "x": 1});
        let diff = differ.directory_diff(&map(list.clone()), &map(list), &keys(&[]));
        assert!(!diff.contains_key("cols"));
    }

    #[test]
    fn test_source_only_list_is_added() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"name": "t", "seclabels": [{"provider": "p", "label": "x"}]})),
            &map(json!({"name": "t"})),
            &keys(&[]),
        );
        assert_eq!(
            diff.to_value(),
            json!({"seclabels": {"added": [{"provider": "p", "label": "x"}]}})
        );
    }

    #[test]
    fn test_source_only_scalar_is_ignored() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"name": "t", "extra": 1})),
            &map(json!({"name": "t"})),
            &keys(&[]),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn test_target_only_list_is_deleted() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"name": "t"})),
            &map(json!({"name": "t", "variables": [{"name": "work_mem", "value": "4MB"}]})),
            &keys(&[]),
        );
        assert_eq!(
            diff.to_value(),
            json!({"variables": {"deleted": [{"name": "work_mem", "value": "4MB"}]}})
        );
    }

    #[test]
    fn test_empty_source_list_deletes_target_structs() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"cols": []})),
            &map(json!({"cols": [{"name": "a"}]})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"cols": {"deleted": [{"name": "a"}]}}));
    }

    #[test]
    fn test_empty_source_list_against_scalars() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"opts": []})),
            &map(json!({"opts": ["a"]})),
            &keys(&[]),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn test_scalar_list_is_replaced_atomically() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"proargtypes": ["int4", "text"]})),
            &map(json!({"proargtypes": ["int4"]})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"proargtypes": ["int4", "text"]}));
    }

    #[test]
    fn test_nested_dictionaries_are_flattened() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"name": "t", "storage": {"fillfactor": 70, "autovacuum": true}})),
            &map(json!({"name": "t", "storage": {"fillfactor": 100, "autovacuum": true}})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"fillfactor": 70}));
    }

    #[test]
    fn test_ignore_keys_are_skipped() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"name": "t", "relowner": "alice", "cols": [{"name": "a"}]})),
            &map(json!({"name": "t", "relowner": "bob"})),
            &keys(&["relowner", "cols"]),
        );
        assert!(diff.is_empty());
    }

    #[test]
    fn test_elements_without_identity_key_are_skipped() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"opts": [{"value": 1}]})),
            &map(json!({"opts": [{"value": 2}]})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"opts": {"deleted": [{"value": 2}]}}));
    }

    #[test]
    fn test_struct_list_against_missing_target_list() {
        let differ = DirectoryDiffer::new();
        let diff = differ.directory_diff(
            &map(json!({"cols": [{"name": "a"}]})),
            &map(json!({"cols": null})),
            &keys(&[]),
        );
        assert_eq!(diff.to_value(), json!({"cols": {"added": [{"name": "a"}]}}));
    }

    #[test]
    fn test_each_call_starts_with_empty_difference() {
        let differ = DirectoryDiffer::new();
        let first = differ.directory_diff(
            &map(json!({"a": 1})),
            &map(json!({"a": 2})),
            &keys(&[]),
        );
        let second = differ.directory_diff(
            &map(json!({"b": 1})),
            &map(json!({"b": 2})),
            &keys(&[]),
        );
        assert_eq!(first.to_value(), json!({"a": 1}));
        assert_eq!(second.to_value(), json!({"b": 1}));
    }
}
