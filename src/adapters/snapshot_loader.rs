// スナップショット読み込み
//
// イントロスペクション結果をJSONファイルから読み込み、
// カテゴリごとのオブジェクトカタログに変換します。
//
// ファイル形式:
// {
//   "_meta": { "scid": 2200, "schema": "public" },
//   "table": { "users": { "oid": 16384, ... } },
//   "function": { ... }
// }

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::core::error::SnapshotError;
use crate::core::metadata::ObjectCatalog;
use crate::core::naming::SNAPSHOT_META_KEY;

/// スナップショットのメタ情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnapshotMeta {
    /// スキーマID
    #[serde(default)]
    pub scid: Option<i64>,

    /// スキーマ名
    #[serde(default)]
    pub schema: Option<String>,
}

/// 片側のスナップショット
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub meta: SnapshotMeta,

    /// カテゴリ名 -> カタログ
    pub categories: BTreeMap<String, ObjectCatalog>,
}

impl Snapshot {
    /// カテゴリのカタログを取得
    pub fn catalog(&self, category: &str) -> Option<&ObjectCatalog> {
        self.categories.get(category)
    }

    /// カテゴリ名の一覧
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// オブジェクトの総数
    pub fn object_count(&self) -> usize {
        self.categories.values().map(|c| c.len()).sum()
    }
}

/// スナップショット読み込みサービス
#[derive(Debug, Clone, Default)]
pub struct SnapshotLoader {}

impl SnapshotLoader {
    /// 新しいSnapshotLoaderを作成
    pub fn new() -> Self {
        Self {}
    }

    /// ファイルからスナップショットを読み込む
    pub fn load_file(&self, path: &Path) -> Result<Snapshot, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot = self.from_value(value)?;
        debug!(
            path = %path.display(),
            categories = snapshot.categories.len(),
            objects = snapshot.object_count(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// JSON値からスナップショットを構築
    pub fn from_value(&self, value: Value) -> Result<Snapshot, SnapshotError> {
        let Value::Object(root) = value else {
            return Err(SnapshotError::invalid_shape(
                "<root>",
                "snapshot must be a JSON object keyed by category",
            ));
        };

        let mut snapshot = Snapshot::default();

        for (category, objects) in root {
            if category == SNAPSHOT_META_KEY {
                snapshot.meta = serde_json::from_value(objects).map_err(|e| {
                    SnapshotError::invalid_shape(SNAPSHOT_META_KEY, e.to_string())
                })?;
                continue;
            }

            let Value::Object(objects) = objects else {
                return Err(SnapshotError::invalid_shape(
                    category,
                    "category must map object names to metadata objects",
                ));
            };

            let mut catalog = ObjectCatalog::new();
            for (name, metadata) in objects {
                let Value::Object(metadata) = metadata else {
                    return Err(SnapshotError::invalid_shape(
                        format!("{}/{}", category, name),
                        "object metadata must be a JSON object",
                    ));
                };
                catalog.insert(name, metadata);
            }

            snapshot.categories.insert(category, catalog);
        }

        Ok(snapshot)
    }
}
