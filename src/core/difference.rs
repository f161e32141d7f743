// 差分辞書モデル
//
// ターゲットをソースの定義に合わせるための差分を表すフラットな辞書。
// DDL生成側は入れ子の深さに関係なく同じ名前空間でフィールドを参照します。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// リスト要素の差分
///
/// `added` / `changed` / `deleted` はそれぞれ省略可能です。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementChanges {
    /// 追加された要素
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added: Option<Vec<Value>>,

    /// 変更された要素（ソース側の値）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changed: Option<Vec<Value>>,

    /// 削除された要素
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Vec<Value>>,
}

impl ElementChanges {
    /// 追加のみの差分
    pub fn added(values: Vec<Value>) -> Self {
        Self {
            added: Some(values),
            ..Self::default()
        }
    }

    /// 削除のみの差分
    pub fn deleted(values: Vec<Value>) -> Self {
        Self {
            deleted: Some(values),
            ..Self::default()
        }
    }

    /// 空でないリストだけを保持して構築
    pub fn from_parts(added: Vec<Value>, changed: Vec<Value>, deleted: Vec<Value>) -> Self {
        let non_empty = |values: Vec<Value>| (!values.is_empty()).then_some(values);
        Self {
            added: non_empty(added),
            changed: non_empty(changed),
            deleted: non_empty(deleted),
        }
    }

    /// すべてのリストが未設定または空か
    pub fn is_empty(&self) -> bool {
        [&self.added, &self.changed, &self.deleted]
            .iter()
            .all(|part| part.as_ref().is_none_or(|values| values.is_empty()))
    }

    /// 追加された要素（未設定なら空）
    pub fn added_values(&self) -> &[Value] {
        self.added.as_deref().unwrap_or_default()
    }

    /// 変更された要素（未設定なら空）
    pub fn changed_values(&self) -> &[Value] {
        self.changed.as_deref().unwrap_or_default()
    }

    /// 削除された要素（未設定なら空）
    pub fn deleted_values(&self) -> &[Value] {
        self.deleted.as_deref().unwrap_or_default()
    }
}

/// フィールド単位の差分
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDifference {
    /// リスト要素の追加・変更・削除
    Elements(ElementChanges),
    /// 値の置き換え（スカラー、またはスカラーのみのリスト）
    Value(Value),
}

/// 差分辞書
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DifferenceDict {
    fields: BTreeMap<String, FieldDifference>,
}

impl DifferenceDict {
    /// 空の差分辞書を作成
    pub fn new() -> Self {
        Self::default()
    }

    /// 値の置き換えを記録
    pub fn set_value(&mut self, key: &str, value: Value) {
        self.fields
            .insert(key.to_string(), FieldDifference::Value(value));
    }

    /// リスト要素の差分を記録
    pub fn set_elements(&mut self, key: &str, changes: ElementChanges) {
        self.fields
            .insert(key.to_string(), FieldDifference::Elements(changes));
    }

    /// 差分を取り除く
    pub fn remove(&mut self, key: &str) -> Option<FieldDifference> {
        self.fields.remove(key)
    }

    /// 別の差分辞書を上書きマージ
    pub fn merge(&mut self, other: DifferenceDict) {
        self.fields.extend(other.fields);
    }

    pub fn get(&self, key: &str) -> Option<&FieldDifference> {
        self.fields.get(key)
    }

    /// リスト要素の差分を取得
    pub fn elements(&self, key: &str) -> Option<&ElementChanges> {
        match self.fields.get(key) {
            Some(FieldDifference::Elements(changes)) => Some(changes),
            _ => None,
        }
    }

    /// 置き換え値を取得
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.fields.get(key) {
            Some(FieldDifference::Value(value)) => Some(value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// JSON値に変換（DDL生成側へ渡す形）
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
