// DDLを生成しないコラボレーター
//
// テンプレートを持たないCLIから差分エンジンを駆動するために使用します。
// すべてのDDLは空文字列、依存関係は空になります。

use crate::core::comparison::Dependency;
use crate::core::error::CollaboratorError;
use crate::services::traits::{DdlProvider, DiffSqlParams, ObjectRef};

/// DDLを生成しないプロバイダー
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDdlProvider;

impl NoopDdlProvider {
    pub fn new() -> Self {
        Self
    }
}

impl DdlProvider for NoopDdlProvider {
    fn sql_from_diff(&self, _params: &DiffSqlParams<'_>) -> Result<String, CollaboratorError> {
        Ok(String::new())
    }

    fn drop_sql(&self, _object: &ObjectRef<'_>) -> Result<String, CollaboratorError> {
        Ok(String::new())
    }

    fn dependencies(&self, _object: &ObjectRef<'_>) -> Result<Vec<Dependency>, CollaboratorError> {
        Ok(Vec::new())
    }
}
