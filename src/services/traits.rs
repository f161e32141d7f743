// サービストレイト定義
//
// 差分エンジンが依存する外部コラボレーター（DDL生成・依存関係取得）を抽象化します。
// SQLテンプレートのレンダリングやバージョン差異の吸収は実装側の責務です。

use crate::core::comparison::Dependency;
use crate::core::difference::DifferenceDict;
use crate::core::error::CollaboratorError;
use crate::core::metadata::ObjectMetadata;

/// 比較のどちら側か
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Source,
    Target,
}

/// DDL生成対象のオブジェクト
#[derive(Debug, Clone, Copy)]
pub struct ObjectRef<'a> {
    /// オブジェクトカテゴリ
    pub category: &'a str,
    /// オブジェクト名
    pub name: &'a str,
    /// ソース側かターゲット側か
    pub side: Side,
    /// オブジェクトID
    pub oid: Option<i64>,
    /// 所属スキーマID
    pub scid: Option<i64>,
    /// オブジェクトのメタデータ
    pub metadata: &'a ObjectMetadata,
}

/// DDL生成パラメータ
#[derive(Debug, Clone, Copy)]
pub struct DiffSqlParams<'a> {
    pub object: ObjectRef<'a>,
    /// 指定された場合はこのスキーマ名で書き換えたDDLを生成
    pub target_schema: Option<&'a str>,
    /// 指定された場合はこの差分を適用するALTER文を生成
    pub diff_data: Option<&'a DifferenceDict>,
}

impl<'a> DiffSqlParams<'a> {
    /// オブジェクト自身のDDL
    pub fn own(object: ObjectRef<'a>) -> Self {
        Self {
            object,
            target_schema: None,
            diff_data: None,
        }
    }

    /// スキーマを書き換えたDDL
    pub fn with_target_schema(object: ObjectRef<'a>, target_schema: Option<&'a str>) -> Self {
        Self {
            object,
            target_schema,
            diff_data: None,
        }
    }

    /// 差分を適用するDDL
    pub fn with_diff(
        object: ObjectRef<'a>,
        diff_data: &'a DifferenceDict,
        target_schema: Option<&'a str>,
    ) -> Self {
        Self {
            object,
            target_schema,
            diff_data: Some(diff_data),
        }
    }
}

/// テーブルとそのサブモジュールの差分DDL生成パラメータ
#[derive(Debug, Clone, Copy)]
pub struct SubmoduleDiffParams<'a> {
    pub source: ObjectRef<'a>,
    pub target: ObjectRef<'a>,
    /// テーブル本体の差分
    pub diff_data: &'a DifferenceDict,
    pub target_schema: Option<&'a str>,
    pub ignore_whitespaces: bool,
}

/// DDL生成コラボレーターのトレイト
///
/// いずれのメソッドも失敗した場合は `CollaboratorError` を返し、
/// 差分エンジンはそれをそのまま呼び出し元へ伝播します。
pub trait DdlProvider {
    /// オブジェクトのDDL（作成、スキーマ書き換え、または差分適用）を生成
    fn sql_from_diff(&self, params: &DiffSqlParams<'_>) -> Result<String, CollaboratorError>;

    /// テーブルのDDLを生成
    fn sql_from_table_diff(&self, params: &DiffSqlParams<'_>) -> Result<String, CollaboratorError> {
        self.sql_from_diff(params)
    }

    /// オブジェクトを削除するDDLを生成
    fn drop_sql(&self, object: &ObjectRef<'_>) -> Result<String, CollaboratorError>;

    /// テーブル本体とサブモジュール（インデックス、トリガーなど）の差分DDLを生成
    fn sql_from_submodule_diff(
        &self,
        params: &SubmoduleDiffParams<'_>,
    ) -> Result<String, CollaboratorError> {
        self.sql_from_table_diff(&DiffSqlParams::with_diff(
            params.target,
            params.diff_data,
            params.target_schema,
        ))
    }

    /// オブジェクトの依存関係を取得
    fn dependencies(&self, object: &ObjectRef<'_>) -> Result<Vec<Dependency>, CollaboratorError>;

    /// テーブルとそのサブモジュールの依存関係を取得
    fn table_submodules_dependencies(
        &self,
        object: &ObjectRef<'_>,
    ) -> Result<Vec<Dependency>, CollaboratorError> {
        self.dependencies(object)
    }
}

impl<T: DdlProvider + ?Sized> DdlProvider for &T {
    fn sql_from_diff(&self, params: &DiffSqlParams<'_>) -> Result<String, CollaboratorError> {
        (**self).sql_from_diff(params)
    }

    fn sql_from_table_diff(&self, params: &DiffSqlParams<'_>) -> Result<String, CollaboratorError> {
        (**self).sql_from_table_diff(params)
    }

    fn drop_sql(&self, object: &ObjectRef<'_>) -> Result<String, CollaboratorError> {
        (**self).drop_sql(object)
    }

    fn sql_from_submodule_diff(
        &self,
        params: &SubmoduleDiffParams<'_>,
    ) -> Result<String, CollaboratorError> {
        (**self).sql_from_submodule_diff(params)
    }

    fn dependencies(&self, object: &ObjectRef<'_>) -> Result<Vec<Dependency>, CollaboratorError> {
        (**self).dependencies(object)
    }

    fn table_submodules_dependencies(
        &self,
        object: &ObjectRef<'_>,
    ) -> Result<Vec<Dependency>, CollaboratorError> {
        (**self).table_submodules_dependencies(object)
    }
}
