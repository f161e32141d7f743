// Services Layer
// 比較・差分計算を実行するサービス層

pub mod acl_differ;
pub mod dictionary_comparator;
pub mod directory_differ;
pub mod key_partitioner;
pub mod schema_comparator;
pub mod table_differ;
pub mod traits;
