/// スナップショット読み込みのテスト
///
/// 一時ファイルに書き出したJSONスナップショットを読み込み、
/// カテゴリ・メタ情報・エラーが正しく扱われることを確認します。
use pgschemadiff::adapters::snapshot_loader::SnapshotLoader;
use pgschemadiff::core::error::SnapshotError;
use std::fs;
use tempfile::TempDir;

#[cfg(test)]
mod snapshot_loader_tests {
    use super::*;

    fn write(temp_dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = temp_dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_snapshot_with_meta() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(
            &temp_dir,
            "snapshot.json",
            r#"{
                "_meta": {"scid": 2200, "schema": "public"},
                "table": {
                    "users": {"oid": 16384, "name": "users", "columns": [{"name": "id"}]},
                    "orders": {"oid": 16390, "name": "orders"}
                },
                "sequence": {"users_id_seq": {"oid": "16380"}}
            }"#,
        );

        let snapshot = SnapshotLoader::new().load_file(&path).unwrap();

        assert_eq!(snapshot.meta.scid, Some(2200));
        assert_eq!(snapshot.meta.schema.as_deref(), Some("public"));
        assert_eq!(snapshot.object_count(), 3);

        let tables = snapshot.catalog("table").unwrap();
        assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["orders", "users"]);
        assert!(snapshot.catalog("_meta").is_none());
    }

    #[test]
    fn test_meta_is_optional() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "snapshot.json", r#"{"view": {}}"#);

        let snapshot = SnapshotLoader::new().load_file(&path).unwrap();
        assert_eq!(snapshot.meta.scid, None);
        assert_eq!(snapshot.object_count(), 0);
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "broken.json", "{ not json");

        let error = SnapshotLoader::new().load_file(&path).unwrap_err();
        assert!(matches!(error, SnapshotError::Parse { .. }));
        assert!(error.to_string().contains("broken.json"));
    }

    #[test]
    fn test_category_must_be_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "snapshot.json", r#"{"table": ["users"]}"#);

        let error = SnapshotLoader::new().load_file(&path).unwrap_err();
        match error {
            SnapshotError::InvalidShape { location, .. } => assert_eq!(location, "table"),
            other => panic!("Expected InvalidShape, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_meta_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "snapshot.json", r#"{"_meta": {"scid": "abc"}}"#);

        let error = SnapshotLoader::new().load_file(&path).unwrap_err();
        assert!(matches!(error, SnapshotError::InvalidShape { .. }));
    }
}
