// エラー型定義
//
// 差分エンジンと周辺レイヤーで使用されるエラー型を提供します。
// thiserrorを使用して、CollaboratorError と SnapshotError を定義します。
// 比較・差分計算そのものは失敗しません。

use std::path::PathBuf;
use thiserror::Error;

/// DDL生成側（コラボレーター）のエラー
///
/// 差分エンジンはこのエラーを捕捉・変換せず、そのまま呼び出し元へ返します。
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CollaboratorError {
    /// DDLのレンダリングに失敗
    #[error("Failed to render DDL for {category} '{object}': {message}")]
    Render {
        /// オブジェクトカテゴリ
        category: String,
        /// オブジェクト名
        object: String,
        /// エラーメッセージ
        message: String,
    },

    /// 依存関係の取得に失敗
    #[error("Failed to fetch dependencies for {category} '{object}': {message}")]
    Dependencies {
        /// オブジェクトカテゴリ
        category: String,
        /// オブジェクト名
        object: String,
        /// エラーメッセージ
        message: String,
    },

    /// カテゴリが操作をサポートしていない
    #[error("Operation '{operation}' is not supported for {category}")]
    Unsupported {
        /// オブジェクトカテゴリ
        category: String,
        /// 操作名
        operation: String,
    },
}

impl CollaboratorError {
    /// レンダリングエラーかどうか
    pub fn is_render(&self) -> bool {
        matches!(self, CollaboratorError::Render { .. })
    }

    /// 依存関係エラーかどうか
    pub fn is_dependencies(&self) -> bool {
        matches!(self, CollaboratorError::Dependencies { .. })
    }

    /// 未サポートエラーかどうか
    pub fn is_unsupported(&self) -> bool {
        matches!(self, CollaboratorError::Unsupported { .. })
    }

    /// 対象カテゴリを取得
    pub fn category(&self) -> &str {
        match self {
            CollaboratorError::Render { category, .. }
            | CollaboratorError::Dependencies { category, .. }
            | CollaboratorError::Unsupported { category, .. } => category,
        }
    }
}

/// スナップショット読み込みエラー
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// ファイルの読み込みに失敗
    #[error("Failed to read snapshot file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSONとして解析できない
    #[error("Failed to parse snapshot file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// 期待される構造ではない
    #[error("Invalid snapshot structure at '{location}': {message}")]
    InvalidShape {
        /// 問題のある位置（category または category/object）
        location: String,
        message: String,
    },
}

impl SnapshotError {
    /// 構造エラーを作成
    pub fn invalid_shape(location: impl Into<String>, message: impl Into<String>) -> Self {
        SnapshotError::InvalidShape {
            location: location.into(),
            message: message.into(),
        }
    }
}
