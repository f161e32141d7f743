// 同一性キー解決
//
// サブオブジェクトのリスト（カラム、制約、オプションなど）の要素を
// 位置ではなく名前で対応付けるためのキーを決定します。

use serde_json::{Map, Value};
use std::cmp::Ordering;

/// 同一性キーの候補（優先順）
///
/// 先頭から順に探索し、最初に見つかったキーを採用します。
pub const IDENTITY_KEYS: [&str; 12] = [
    "name",
    "colname",
    "argid",
    "token",
    "option",
    "conname",
    "member_name",
    "label",
    "attname",
    "fdwoption",
    "fsrvoption",
    "umoption",
];

/// 解決済みの同一性キー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityKey(&'static str);

impl IdentityKey {
    /// 要素に含まれる最初の候補キーを返す
    ///
    /// どの候補も含まれない場合は `None` を返します。
    /// 呼び出し側はソートや突き合わせを行わずにそのまま扱います。
    pub fn resolve(element: &Map<String, Value>) -> Option<Self> {
        IDENTITY_KEYS
            .iter()
            .copied()
            .find(|key| element.contains_key(*key))
            .map(IdentityKey)
    }

    /// リストの先頭要素から同一性キーを決定
    pub fn for_list(list: &[Value]) -> Option<Self> {
        match list.first() {
            Some(Value::Object(first)) => Self::resolve(first),
            _ => None,
        }
    }

    /// キー名
    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// 要素からキーの値を取り出す
    pub fn value_of<'a>(&self, element: &'a Value) -> Option<&'a Value> {
        element.as_object().and_then(|map| map.get(self.0))
    }

    /// 2つの要素が同じ同一性を持つか
    pub fn matches(&self, left: &Value, right: &Value) -> bool {
        match (self.value_of(left), self.value_of(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }
}

/// リストを同一性キーで安定ソート
///
/// 先頭要素がマップでない、または同一性キーを持たない場合は並び替えません。
pub fn sort_by_identity(list: &mut [Value]) {
    let Some(key) = IdentityKey::for_list(list) else {
        return;
    };

    list.sort_by(|a, b| match (key.value_of(a), key.value_of(b)) {
        (Some(l), Some(r)) => compare_values(l, r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// JSON値の全順序
///
/// null < bool < number < string < その他 の順に並べます。
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        (Value::Number(l), Value::Number(r)) => {
            let l = l.as_f64().unwrap_or(f64::NAN);
            let r = r.as_f64().unwrap_or(f64::NAN);
            l.partial_cmp(&r).unwrap_or(Ordering::Equal)
        }
        (Value::String(l), Value::String(r)) => l.cmp(r),
        (l, r) if type_rank(l) != type_rank(r) => type_rank(l).cmp(&type_rank(r)),
        (l, r) => l.to_string().cmp(&r.to_string()),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolve_prefers_earlier_candidate() {
        let element = object(json!({"attname": "a", "name": "b"}));
        assert_eq!(IdentityKey::resolve(&element).unwrap().as_str(), "name");
    }

    #[test]
    fn test_resolve_without_candidate() {
        let element = object(json!({"value": 1}));
        assert!(IdentityKey::resolve(&element).is_none());
    }

    #[test]
    fn test_for_list_uses_first_element() {
        let list = vec![json!({"conname": "pk"}), json!({"name": "x"})];
        assert_eq!(IdentityKey::for_list(&list).unwrap().as_str(), "conname");

        let scalars = vec![json!("a"), json!("b")];
        assert!(IdentityKey::for_list(&scalars).is_none());
        assert!(IdentityKey::for_list(&[]).is_none());
    }

    #[test]
    fn test_sort_by_identity() {
        let mut list = vec![
            json!({"name": "c"}),
            json!({"name": "a"}),
            json!({"name": "b"}),
        ];
        sort_by_identity(&mut list);
        assert_eq!(
            list,
            vec![json!({"name": "a"}), json!({"name": "b"}), json!({"name": "c"})]
        );
    }

    #[test]
    fn test_sort_numeric_keys_and_missing_last() {
        let mut list = vec![
            json!({"argid": 10}),
            json!({"other": true}),
            json!({"argid": 2}),
        ];
        sort_by_identity(&mut list);
        assert_eq!(list[0], json!({"argid": 2}));
        assert_eq!(list[1], json!({"argid": 10}));
        assert_eq!(list[2], json!({"other": true}));
    }

    #[test]
    fn test_sort_without_identity_keeps_order() {
        let mut list = vec![json!({"v": 2}), json!({"v": 1})];
        sort_by_identity(&mut list);
        assert_eq!(list, vec![json!({"v": 2}), json!({"v": 1})]);
    }

    #[test]
    fn test_matches() {
        let key = IdentityKey::resolve(&object(json!({"name": "a"}))).unwrap();
        assert!(key.matches(&json!({"name": "a", "v": 1}), &json!({"name": "a"})));
        assert!(!key.matches(&json!({"name": "a"}), &json!({"name": "b"})));
        assert!(!key.matches(&json!({"name": "a"}), &json!({"colname": "a"})));
    }
}
