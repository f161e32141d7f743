// Adapters
// スナップショットファイルとDDL生成コラボレーターへのアクセスを抽象化

pub mod noop_ddl_provider;
pub mod snapshot_loader;
