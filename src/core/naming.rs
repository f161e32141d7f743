// 命名ポリシー
//
// アプリケーション名とファイル名の単一ソースを提供します。

/// アプリケーション名（バイナリ名を兼ねる）
pub const APP_NAME: &str = "pgschemadiff";

/// 既定の設定ファイル名
pub const CONFIG_FILE: &str = ".pgschemadiff.yaml";

/// スナップショットファイル内のメタ情報キー
pub const SNAPSHOT_META_KEY: &str = "_meta";
