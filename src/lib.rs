// pgschemadiffライブラリのエントリーポイント
//
// モジュール構造:
// - cli: CLIレイヤー（ユーザー入力の受付とコマンドルーティング）
// - core: コアドメイン型（メタデータ、比較結果、差分辞書、設定）
// - services: 比較・差分エンジン
// - adapters: スナップショットファイルとDDL生成コラボレーターへのアクセス

pub mod adapters;
pub mod cli;
pub mod core;
pub mod services;
