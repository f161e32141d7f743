// カテゴリプロファイル
//
// オブジェクトカテゴリごとの既定値（無視キー、表示ラベル、グループ名）を提供します。

/// 大半のカテゴリで無視するキー
pub const DEFAULT_IGNORE_KEYS: &[&str] = &["oid", "oid-2", "schema"];

/// テーブルで無視するキー
pub const TABLE_IGNORE_KEYS: &[&str] = &[
    "oid",
    "schema",
    "vacuum_table",
    "vacuum_toast",
    "edit_types",
    "attnum",
    "col_type",
    "references",
    "reltuples",
    "rows_cnt",
];

/// ビュー・マテリアライズドビューで無視するキー
pub const VIEW_IGNORE_KEYS: &[&str] = &[
    "oid", "schema", "xmin", "oid-2", "setting", "indrelid", "tgrelid", "tgfoid", "tfunction",
    "tgqual", "tgconstraint", "nspname",
];

/// トリガーで無視するキー
pub const TRIGGER_IGNORE_KEYS: &[&str] = &[
    "oid", "xmin", "nspname", "tfunction", "tgrelid", "tgfoid", "oid-2",
];

/// 所有者を表すキー（所有者を無視する設定で追加される）
pub const OWNER_KEYS: &[&str] = &[
    "owner",
    "eventowner",
    "funcowner",
    "fdwowner",
    "fsrvowner",
    "lanowner",
    "relowner",
    "seqowner",
    "typowner",
    "typeowner",
];

/// テーブルのサブモジュール（個別カテゴリとして比較される）
pub const TABLE_SUBMODULES: &[&str] = &["index", "rule", "trigger", "compound_trigger"];

/// テーブルカテゴリ名
pub const TABLE_CATEGORY: &str = "table";

/// 既定のグループ名
pub const SCHEMA_OBJECTS_GROUP: &str = "Schema Objects";

/// データベースレベルのグループ名
pub const DATABASE_OBJECTS_GROUP: &str = "Database Objects";

/// データベースレベルのカテゴリ
const DATABASE_LEVEL_CATEGORIES: &[&str] = &[
    "event_trigger",
    "extension",
    "foreign_data_wrapper",
    "foreign_server",
    "user_mapping",
    "language",
    "publication",
    "subscription",
    "cast",
];

/// カテゴリプロファイル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryProfile {
    /// カテゴリ名
    pub category: String,
    /// 表示ラベル
    pub label: String,
    /// グループ名
    pub group_name: String,
    /// 既定の無視キー
    pub ignore_keys: Vec<String>,
}

impl CategoryProfile {
    /// カテゴリ名からプロファイルを作成
    pub fn for_category(category: &str) -> Self {
        let ignore_keys: &[&str] = match category {
            TABLE_CATEGORY | "partition" => TABLE_IGNORE_KEYS,
            "view" | "mview" => VIEW_IGNORE_KEYS,
            "trigger" | "compound_trigger" => TRIGGER_IGNORE_KEYS,
            _ => DEFAULT_IGNORE_KEYS,
        };

        let group_name = if DATABASE_LEVEL_CATEGORIES.contains(&category) {
            DATABASE_OBJECTS_GROUP
        } else {
            SCHEMA_OBJECTS_GROUP
        };

        Self {
            category: category.to_string(),
            label: collection_label(category),
            group_name: group_name.to_string(),
            ignore_keys: ignore_keys.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// カテゴリの表示ラベル
fn collection_label(category: &str) -> String {
    match category {
        "mview" => "Materialized Views".to_string(),
        "fts_configuration" => "FTS Configurations".to_string(),
        "fts_dictionary" => "FTS Dictionaries".to_string(),
        "fts_parser" => "FTS Parsers".to_string(),
        "fts_template" => "FTS Templates".to_string(),
        "index" => "Indexes".to_string(),
        "foreign_data_wrapper" => "Foreign Data Wrappers".to_string(),
        _ => {
            let words: Vec<String> = category
                .split('_')
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(first) => first.to_uppercase().chain(chars).collect(),
                        None => String::new(),
                    }
                })
                .collect();
            format!("{}s", words.join(" "))
        }
    }
}
