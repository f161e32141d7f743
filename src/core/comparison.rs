// 比較結果ドメインモデル
//
// オブジェクト単位の比較結果（ComparisonRecord）と、
// 比較実行ごとの連番ID（IdSequence）を定義します。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 比較ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonStatus {
    /// ソースにのみ存在
    SourceOnly,
    /// ターゲットにのみ存在
    TargetOnly,
    /// 両方に存在し同一
    Identical,
    /// 両方に存在し差分あり
    Different,
}

impl ComparisonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonStatus::SourceOnly => "source_only",
            ComparisonStatus::TargetOnly => "target_only",
            ComparisonStatus::Identical => "identical",
            ComparisonStatus::Different => "different",
        }
    }
}

impl fmt::Display for ComparisonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 依存関係の記述子
///
/// DDL生成側（DdlProvider）から返される依存オブジェクトの情報です。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// 依存オブジェクトの種類
    #[serde(rename = "type")]
    pub kind: String,

    /// 依存オブジェクト名
    pub name: String,

    /// 依存の種類（normal, auto, internal など）
    #[serde(default)]
    pub field: String,

    /// 依存オブジェクトのOID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oid: Option<i64>,
}

impl Dependency {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            field: String::new(),
            oid: None,
        }
    }
}

/// 比較結果レコード
///
/// 両カタログのいずれかに存在するオブジェクト名ごとに1件作成されます。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    /// 比較実行内で一意な連番
    pub id: u64,

    /// オブジェクトカテゴリ（table, function など）
    #[serde(rename = "type")]
    pub category: String,

    /// カテゴリの表示ラベル
    pub label: String,

    /// オブジェクト名
    pub title: String,

    /// オブジェクトID（ターゲットのみの場合はターゲット側）
    pub oid: Option<i64>,

    pub status: ComparisonStatus,

    /// ソース側のDDL
    pub source_ddl: String,

    /// ターゲット側のDDL
    pub target_ddl: String,

    /// ターゲットに適用する差分DDL
    pub diff_ddl: String,

    /// 表示用グループ名
    pub group_name: String,

    /// 依存関係
    pub dependencies: Vec<Dependency>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_oid: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_oid: Option<i64>,

    /// ソース側のスキーマID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_scid: Option<i64>,

    /// ターゲット側のスキーマID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_scid: Option<i64>,
}

/// 比較レコードIDの連番ジェネレーター
///
/// 比較実行ごとに作成し、複数カテゴリの比較で共有します。
/// プロセス全体で共有されることはありません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    /// 1から始まる連番を作成
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// 次のIDを払い出す
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
