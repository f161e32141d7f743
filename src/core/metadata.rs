// オブジェクトメタデータモデル
//
// データベースのイントロスペクション結果を表す入れ子の辞書構造。
// 差分エンジンは中身を解釈せず、スナップショットとして扱います。

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// 単一オブジェクトのメタデータ（フィールド名 -> 値）
pub type ObjectMetadata = Map<String, Value>;

/// カテゴリ単位のオブジェクトカタログ（表示名 -> メタデータ）
pub type ObjectCatalog = BTreeMap<String, ObjectMetadata>;

/// オブジェクトIDを格納するキー
pub const OID_KEY: &str = "oid";

/// メタデータからオブジェクトIDを取得
///
/// 数値、または数値として解釈できる文字列を受け付けます。
pub fn object_oid(metadata: &ObjectMetadata) -> Option<i64> {
    match metadata.get(OID_KEY)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// 値がサブオブジェクト（マップまたはリスト）かどうか
pub fn is_struct(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

/// リストがサブオブジェクトを1つ以上含むかどうか
pub fn contains_struct(list: &[Value]) -> bool {
    list.iter().any(is_struct)
}
