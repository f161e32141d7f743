/// 深い比較・差分計算の統合テスト
///
/// DictionaryComparator、DirectoryDiffer、AclDiffer、TableDiffer の公開APIを使用して、
/// null と空文字列の扱い、リストの突き合わせ、ACL の集合差分を確認します。
use pgschemadiff::core::difference::{DifferenceDict, ElementChanges};
use pgschemadiff::services::acl_differ::AclDiffer;
use pgschemadiff::services::dictionary_comparator::DictionaryComparator;
use pgschemadiff::services::directory_differ::DirectoryDiffer;
use pgschemadiff::services::table_differ::TableDiffer;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

fn map(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

fn no_keys() -> HashSet<String> {
    HashSet::new()
}

#[cfg(test)]
mod comparator_tests {
    use super::*;

    /// null と空文字列は同一として扱われる（順序によらない）
    #[test]
    fn test_null_equals_empty_string() {
        let comparator = DictionaryComparator::new();
        let with_null = map(json!({"c": null}));
        let with_empty = map(json!({"c": ""}));

        assert!(comparator.are_dictionaries_identical(&with_null, &with_empty, &no_keys()));
        assert!(comparator.are_dictionaries_identical(&with_empty, &with_null, &no_keys()));
    }

    /// 片側にしかないキーがあれば、値に関わらず不一致
    #[test]
    fn test_key_sets_must_match() {
        let comparator = DictionaryComparator::new();
        let source = map(json!({"a": 1, "b": null}));
        let target = map(json!({"a": 1}));

        assert!(!comparator.are_dictionaries_identical(&source, &target, &no_keys()));
    }

    /// サブオブジェクトのリストは同一性キーで並べ替えてから比較される
    #[test]
    fn test_lists_are_compared_in_identity_order() {
        let comparator = DictionaryComparator::new();
        let source = map(json!({"columns": [{"name": "b", "t": 1}, {"name": "a", "t": 2}]}));
        let target = map(json!({"columns": [{"name": "a", "t": 2}, {"name": "b", "t": 1}]}));

        assert!(comparator.are_dictionaries_identical(&source, &target, &no_keys()));
    }

    /// 無視キーは入れ子のサブオブジェクトにも適用される
    #[test]
    fn test_ignore_keys_apply_to_nested_elements() {
        let comparator = DictionaryComparator::new();
        let source = map(json!({"columns": [{"name": "a", "attnum": 1}]}));
        let target = map(json!({"columns": [{"name": "a", "attnum": 4}]}));
        let ignore: HashSet<String> = ["attnum".to_string()].into_iter().collect();

        assert!(!comparator.are_dictionaries_identical(&source, &target, &no_keys()));
        assert!(comparator.are_dictionaries_identical(&source, &target, &ignore));
    }
}

#[cfg(test)]
mod differ_tests {
    use super::*;

    /// コメント・説明の消去は空文字列として記録される
    #[test]
    fn test_cleared_comment_becomes_empty_string() {
        let differ = DirectoryDiffer::new();

        for key in ["comment", "description"] {
            let mut source = Map::new();
            source.insert(key.to_string(), Value::Null);
            let mut target = Map::new();
            target.insert(key.to_string(), json!("old text"));

            let difference = differ.directory_diff(&source, &target, &no_keys());
            assert_eq!(difference.value(key), Some(&json!("")));
            assert_eq!(difference.len(), 1);
        }
    }

    /// 他のキーのnullはそのまま記録される
    #[test]
    fn test_other_null_values_are_kept() {
        let differ = DirectoryDiffer::new();
        let source = map(json!({"default": null}));
        let target = map(json!({"default": "0"}));

        let difference = differ.directory_diff(&source, &target, &no_keys());
        assert_eq!(difference.value("default"), Some(&Value::Null));
    }

    /// サブオブジェクトのリストは追加・変更・削除に分類される
    #[test]
    fn test_struct_list_matching() {
        let differ = DirectoryDiffer::new();
        let source = map(json!({"cols": [{"name": "a"}, {"name": "b", "v": 2}]}));
        let target = map(json!({"cols": [{"name": "b", "v": 1}, {"name": "c"}]}));

        let difference = differ.directory_diff(&source, &target, &no_keys());
        let changes = difference.elements("cols").unwrap();

        assert_eq!(changes.added_values(), &[json!({"name": "a"})]);
        assert_eq!(changes.changed_values(), &[json!({"name": "b", "v": 2})]);
        assert_eq!(changes.deleted_values(), &[json!({"name": "c"})]);
    }

    /// 入れ子のオブジェクトの差分はトップレベルに平坦化される
    #[test]
    fn test_nested_objects_are_flattened() {
        let differ = DirectoryDiffer::new();
        let source = map(json!({"name": "t", "options": {"fillfactor": 70}}));
        let target = map(json!({"name": "t", "options": {"fillfactor": 100}}));

        let difference = differ.directory_diff(&source, &target, &no_keys());
        assert_eq!(difference.to_value(), json!({"fillfactor": 70}));
    }

    /// ターゲットにのみ存在するリストは削除として記録される
    #[test]
    fn test_target_only_list_is_deleted() {
        let differ = DirectoryDiffer::new();
        let source = map(json!({"name": "f"}));
        let target = map(json!({"name": "f", "seclabels": [{"provider": "selinux", "label": "x"}]}));

        let difference = differ.directory_diff(&source, &target, &no_keys());
        let changes = difference.elements("seclabels").unwrap();
        assert_eq!(changes.deleted_values().len(), 1);
        assert!(changes.added_values().is_empty());
    }

    /// スカラーのみのリストは値全体で置き換えられる
    #[test]
    fn test_scalar_list_is_replaced() {
        let differ = DirectoryDiffer::new();
        let source = map(json!({"options": ["a=1", "b=2"]}));
        let target = map(json!({"options": ["a=1"]}));

        let difference = differ.directory_diff(&source, &target, &no_keys());
        assert_eq!(difference.value("options"), Some(&json!(["a=1", "b=2"])));
    }

    /// 呼び出しごとに新しい差分辞書が返される
    #[test]
    fn test_each_call_starts_fresh() {
        let differ = DirectoryDiffer::new();
        let first = differ.directory_diff(&map(json!({"a": 1})), &map(json!({"a": 2})), &no_keys());
        let second = differ.directory_diff(&map(json!({"b": 1})), &map(json!({"b": 2})), &no_keys());

        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(second.keys().collect::<Vec<_>>(), vec!["b"]);
    }
}

#[cfg(test)]
mod acl_tests {
    use super::*;

    /// ACLは集合として差分が計算される
    #[test]
    fn test_acl_set_difference() {
        let source = map(json!({"relacl": ["alice=r/bob"]}));
        let target = map(json!({"relacl": ["bob=w/alice", "carol=r/alice"]}));
        let mut difference = DifferenceDict::new();

        AclDiffer::new().parse_acl(&source, &target, &mut difference);

        let changes = difference.elements("relacl").unwrap();
        assert_eq!(changes.added_values(), &[json!("alice=r/bob")]);
        assert_eq!(
            changes.deleted_values(),
            &[json!("bob=w/alice"), json!("carol=r/alice")]
        );
    }

    /// 同じACLの場合はキー自体が差分辞書から取り除かれる
    #[test]
    fn test_identical_acl_removes_key() {
        let acl = map(json!({"datacl": ["alice=CTc/alice"]}));
        let mut difference = DifferenceDict::new();
        difference.set_value("datacl", json!(["alice=CTc/alice"]));

        AclDiffer::new().parse_acl(&acl, &acl.clone(), &mut difference);
        assert!(!difference.contains_key("datacl"));
    }

    /// ACLキーはソースを優先して選ばれる
    #[test]
    fn test_acl_key_selection() {
        let source = map(json!({"typacl": []}));
        let target = map(json!({"relacl": []}));
        assert_eq!(AclDiffer::acl_key(&source, &target), "typacl");
        assert_eq!(AclDiffer::acl_key(&map(json!({})), &target), "relacl");
        assert_eq!(AclDiffer::acl_key(&map(json!({})), &map(json!({}))), "acl");
    }
}

#[cfg(test)]
mod table_tests {
    use super::*;

    /// カラムの変更はターゲットのattnumを引き継ぎ、型変換の可否を付与する
    #[test]
    fn test_column_change_keeps_target_attnum() {
        let source = map(json!({"columns": [
            {"name": "id", "attnum": 1, "typname": "bigint", "edit_types": ["bigint", "numeric"]}
        ]}));
        let target = map(json!({"columns": [
            {"name": "id", "attnum": 3, "typname": "text", "edit_types": ["text"]}
        ]}));

        let difference = TableDiffer::new().column_diff(&source, &target);
        let changed = difference.elements("columns").unwrap().changed_values();

        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0]["attnum"], 3);
        assert_eq!(changed[0]["col_type_conversion"], false);
    }

    /// 編集不可の属性が変わった制約は再作成（追加と削除）になる
    #[test]
    fn test_non_editable_constraint_is_recreated() {
        let source = map(json!({"check_constraint": [
            {"name": "positive", "oid": 1, "consrc": "amount > 0", "comment": "x"}
        ]}));
        let target = map(json!({"check_constraint": [
            {"name": "positive", "oid": 9, "consrc": "amount >= 0", "comment": "x"}
        ]}));

        let difference = TableDiffer::new().constraint_diff(&source, &target);
        let changes = difference.elements("check_constraint").unwrap();

        assert_eq!(changes.added_values()[0]["consrc"], "amount > 0");
        assert_eq!(changes.deleted_values()[0]["consrc"], "amount >= 0");
        assert!(changes.changed_values().is_empty());
    }

    /// 編集可能な属性のみの変更はターゲットのOIDで変更として記録される
    #[test]
    fn test_editable_constraint_change() {
        let source = map(json!({"check_constraint": [
            {"name": "positive", "oid": 1, "consrc": "amount > 0", "comment": "new"}
        ]}));
        let target = map(json!({"check_constraint": [
            {"name": "positive", "oid": 9, "consrc": "amount > 0", "comment": "old"}
        ]}));

        let difference = TableDiffer::new().constraint_diff(&source, &target);
        let changes = difference.elements("check_constraint").unwrap();

        assert_eq!(changes.changed_values()[0]["oid"], 9);
        assert_eq!(changes.changed_values()[0]["comment"], "new");
    }

    /// OIDのみ異なる制約は差分にならない
    #[test]
    fn test_constraint_oid_only_difference_is_ignored() {
        let source = map(json!({"primary_key": [{"name": "pk", "oid": 1, "columns": ["id"]}]}));
        let target = map(json!({"primary_key": [{"name": "pk", "oid": 2, "columns": ["id"]}]}));

        let difference = TableDiffer::new().constraint_diff(&source, &target);
        assert!(difference.is_empty());
    }

    /// ElementChanges のJSON表現は空のリストを省略する
    #[test]
    fn test_element_changes_serialization() {
        let changes = ElementChanges::from_parts(vec![json!("a")], Vec::new(), Vec::new());
        assert_eq!(serde_json::to_value(&changes).unwrap(), json!({"added": ["a"]}));
    }
}
