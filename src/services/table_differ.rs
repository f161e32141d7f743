// テーブル差分サービス
//
// テーブルの定義はカラムや制約など複数のサブ構造にまたがるため、
// 汎用のディレクトリ差分とは別にカラム・制約の差分を計算します。
// - カラム: 名前で突き合わせ、列番号と型変換可否を付与
// - 制約: 編集不可の属性が変わった場合は削除して再作成
// - 比較前に揮発性のキー（OIDなど）を取り除く

use serde_json::{Map, Value};

use crate::core::difference::{DifferenceDict, ElementChanges};

/// カラムリストのキー
pub const COLUMNS_KEY: &str = "columns";

/// 差分計算の対象となる制約キーと、変更時に再作成が必要な属性
const CONSTRAINT_NON_EDITABLE_KEYS: [(&str, &[&str]); 3] = [
    (
        "primary_key",
        &["col_count", "condeferrable", "condeffered", "columns"],
    ),
    ("check_constraint", &["consrc"]),
    ("exclude_constraint", &["amname", "indconstraint", "columns"]),
];

/// 比較前に取り除くサブリストのキー
const VOLATILE_KEYS: [(&str, &[&str]); 7] = [
    (
        "columns",
        &["relname", "nspname", "parent_tbl", "attrelid", "adrelid"],
    ),
    ("primary_key", &["oid"]),
    ("unique_constraint", &["oid"]),
    ("check_constraint", &["oid", "nspname"]),
    ("foreign_key", &["oid", "fknsp", "confrelid"]),
    ("exclude_constraint", &["oid"]),
    ("partitions", &["oid"]),
];

/// テーブル差分サービス
#[derive(Debug, Clone, Default)]
pub struct TableDiffer {}

impl TableDiffer {
    /// 新しいTableDifferを作成
    pub fn new() -> Self {
        Self {}
    }

    /// カラムと制約のサブリストキー
    ///
    /// これらは汎用差分の対象から外し、このサービスで差分を計算します。
    pub fn handled_keys() -> Vec<&'static str> {
        let mut keys = vec![COLUMNS_KEY];
        keys.extend(CONSTRAINT_NON_EDITABLE_KEYS.iter().map(|(key, _)| *key));
        keys
    }

    /// カラム・制約の差分をまとめて計算
    pub fn table_diff(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
    ) -> DifferenceDict {
        let mut difference = self.column_diff(source, target);
        difference.merge(self.constraint_diff(source, target));
        difference
    }

    /// カラムの差分を計算
    ///
    /// 変更されたカラムはターゲットの列番号（attnum）を引き継ぎます。
    /// ターゲットの型がソースの変換可能な型（edit_types）に含まれない場合は
    /// `col_type_conversion: false` を付与します。
    pub fn column_diff(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
    ) -> DifferenceDict {
        let source_columns = sub_list(source, COLUMNS_KEY);
        let mut remaining = sub_list(target, COLUMNS_KEY);

        let mut added = Vec::new();
        let mut changed = Vec::new();

        for column in source_columns {
            let Some(name) = column.get("name") else {
                continue;
            };

            let position = remaining
                .iter()
                .rposition(|candidate| candidate.get("name") == Some(name));

            let Some(index) = position else {
                added.push(column);
                continue;
            };

            let matched = remaining.remove(index);
            if matched == column {
                continue;
            }

            let mut updated = column.clone();
            if let (Some(obj), Some(attnum)) = (updated.as_object_mut(), matched.get("attnum")) {
                obj.insert("attnum".to_string(), attnum.clone());
            }
            if !type_is_editable(&column, &matched) {
                if let Some(obj) = updated.as_object_mut() {
                    obj.insert("col_type_conversion".to_string(), Value::Bool(false));
                }
            }
            changed.push(updated);
        }

        let mut difference = DifferenceDict::new();
        let changes = ElementChanges::from_parts(added, changed, remaining);
        if !changes.is_empty() {
            difference.set_elements(COLUMNS_KEY, changes);
        }
        difference
    }

    /// 制約の差分を計算
    ///
    /// OIDを除いて比較し、編集不可の属性が異なる制約は
    /// 追加（ソース）と削除（ターゲット）の組として記録します。
    pub fn constraint_diff(
        &self,
        source: &Map<String, Value>,
        target: &Map<String, Value>,
    ) -> DifferenceDict {
        let mut difference = DifferenceDict::new();

        for (constraint, non_editable) in CONSTRAINT_NON_EDITABLE_KEYS {
            let source_constraints = sub_list(source, constraint);
            let mut remaining = sub_list(target, constraint);

            let mut added = Vec::new();
            let mut changed = Vec::new();
            let mut deleted = Vec::new();

            for item in source_constraints {
                let Some(name) = item.get("name") else {
                    continue;
                };

                let position = remaining
                    .iter()
                    .rposition(|candidate| candidate.get("name") == Some(name));

                let Some(index) = position else {
                    added.push(item);
                    continue;
                };

                let matched = remaining.remove(index);
                if without_oid(&item) == without_oid(&matched) {
                    continue;
                }

                let recreate = non_editable.iter().any(|key| {
                    item.get(*key)
                        .is_some_and(|value| matched.get(*key) != Some(value))
                });

                if recreate {
                    added.push(item);
                    deleted.push(matched);
                } else {
                    let mut updated = item.clone();
                    if let (Some(obj), Some(oid)) = (updated.as_object_mut(), matched.get("oid")) {
                        obj.insert("oid".to_string(), oid.clone());
                    }
                    changed.push(updated);
                }
            }

            deleted.extend(remaining);

            let changes = ElementChanges::from_parts(added, changed, deleted);
            if !changes.is_empty() {
                difference.set_elements(constraint, changes);
            }
        }

        difference
    }

    /// 比較に不要な揮発性キーをサブリストの各要素から取り除く
    pub fn strip_volatile_keys(&self, metadata: &mut Map<String, Value>) {
        for (list_key, keys) in VOLATILE_KEYS {
            let Some(Value::Array(items)) = metadata.get_mut(list_key) else {
                continue;
            };
            for item in items.iter_mut() {
                if let Value::Object(obj) = item {
                    for key in keys {
                        obj.remove(*key);
                    }
                }
            }
        }
    }
}

/// サブリストを取得（nullや未設定は空リスト）
fn sub_list(metadata: &Map<String, Value>, key: &str) -> Vec<Value> {
    match metadata.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// ターゲットの型がソースの変換可能な型に含まれるか
fn type_is_editable(source_column: &Value, target_column: &Value) -> bool {
    let Some(typname) = target_column.get("typname") else {
        return true;
    };
    match source_column.get("edit_types") {
        Some(Value::Array(types)) => types.contains(typname),
        _ => true,
    }
}

fn without_oid(value: &Value) -> Value {
    let mut copy = value.clone();
    if let Value::Object(obj) = &mut copy {
        obj.remove("oid");
    }
    copy
}
