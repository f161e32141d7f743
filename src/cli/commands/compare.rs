// compareコマンドハンドラー
//
// 2つのスナップショットをカテゴリごとに比較します。
// - 設定ファイルとCLIフラグから比較オプションを決定
// - カテゴリごとにSchemaComparatorを実行（IDは実行全体で連番）
// - テキスト（カラー）またはJSONでレポートを出力

use crate::adapters::noop_ddl_provider::NoopDdlProvider;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::comparison::{ComparisonRecord, ComparisonStatus, IdSequence};
use crate::core::metadata::ObjectCatalog;
use crate::services::schema_comparator::{CompareRequest, SchemaComparator};
use anyhow::{Context, Result};
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

/// compareコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct CompareCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    /// ソーススナップショット
    pub source: PathBuf,
    /// ターゲットスナップショット
    pub target: PathBuf,
    /// 比較するカテゴリ（空の場合は両スナップショットの全カテゴリ）
    pub categories: Vec<String>,
    pub ignore_owner: bool,
    pub ignore_whitespaces: bool,
    /// ソースのみのオブジェクトの書き換え先スキーマ
    pub target_schema: Option<String>,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// 比較サマリー
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompareSummary {
    pub total: usize,
    pub source_only: usize,
    pub target_only: usize,
    pub different: usize,
    pub identical: usize,
}

impl CompareSummary {
    fn from_records(records: &[ComparisonRecord]) -> Self {
        let count = |status: ComparisonStatus| records.iter().filter(|r| r.status == status).count();
        Self {
            total: records.len(),
            source_only: count(ComparisonStatus::SourceOnly),
            target_only: count(ComparisonStatus::TargetOnly),
            different: count(ComparisonStatus::Different),
            identical: count(ComparisonStatus::Identical),
        }
    }

    /// 差分が1件もないかどうか
    pub fn is_clean(&self) -> bool {
        self.total == self.identical
    }
}

/// compareコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct CompareOutput {
    /// レポート生成日時（RFC 3339）
    pub generated_at: String,
    pub source: String,
    pub target: String,
    /// ソースのみのオブジェクトのDDLを書き換えたスキーマ
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,
    /// 比較したカテゴリ
    pub categories: Vec<String>,
    pub summary: CompareSummary,
    pub records: Vec<ComparisonRecord>,
}

impl CommandOutput for CompareOutput {
    fn to_text(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", "=== Schema Comparison ===".bold()));
        output.push_str(&format!("Source: {}\n", self.source));
        output.push_str(&format!("Target: {}\n", self.target));
        if let Some(schema) = &self.target_schema {
            output.push_str(&format!("Target schema: {}\n", schema));
        }

        let mut current_category: Option<&str> = None;
        for record in &self.records {
            if current_category != Some(record.category.as_str()) {
                current_category = Some(record.category.as_str());
                output.push_str(&format!("\n[{}] {}\n", record.group_name, record.label.bold()));
            }
            output.push_str(&format!("  {}\n", format_record(record)));
        }

        output.push('\n');
        if self.summary.total == 0 {
            output.push_str("No objects found in the selected categories.\n");
        } else if self.summary.is_clean() {
            output.push_str(&format!(
                "{}\n",
                format!("All {} object(s) are identical.", self.summary.total).green()
            ));
        } else {
            output.push_str(&format!(
                "Summary: {} object(s): {} source only, {} target only, {} different, {} identical\n",
                self.summary.total,
                self.summary.source_only.to_string().green(),
                self.summary.target_only.to_string().red(),
                self.summary.different.to_string().yellow(),
                self.summary.identical,
            ));
        }

        output
    }
}

/// レコード1件を1行に整形
fn format_record(record: &ComparisonRecord) -> String {
    match record.status {
        ComparisonStatus::SourceOnly => {
            format!("{} {} (source only)", "+".green(), record.title.green())
        }
        ComparisonStatus::TargetOnly => {
            format!("{} {} (target only)", "-".red(), record.title.red())
        }
        ComparisonStatus::Different => {
            format!("{} {} (different)", "~".yellow(), record.title.yellow())
        }
        ComparisonStatus::Identical => format!("  {}", record.title.dimmed()),
    }
}

/// compareコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct CompareCommandHandler {}

impl CompareCommandHandler {
    /// 新しいCompareCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// compareコマンドを実行
    ///
    /// # Arguments
    ///
    /// * `command` - compareコマンドのパラメータ
    ///
    /// # Returns
    ///
    /// 成功時は比較レポート、失敗時はエラーメッセージ
    pub fn execute(&self, command: &CompareCommand) -> Result<String> {
        let output = self.compare(command)?;
        render_output(&output, &command.format)
    }

    /// 比較を実行して出力構造体を作成
    pub fn compare(&self, command: &CompareCommand) -> Result<CompareOutput> {
        let context = CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let (source, target) = context.load_snapshots(&command.source, &command.target)?;

        let preferences = context.preferences(command.ignore_owner, command.ignore_whitespaces);
        // フラグ、設定ファイル、ターゲットスナップショットのスキーマの順に決定
        let target_schema = command
            .target_schema
            .as_deref()
            .or(context.config.target_schema.as_deref())
            .or(target.meta.schema.as_deref());

        let categories: Vec<String> = if command.categories.is_empty() {
            source
                .category_names()
                .chain(target.category_names())
                .map(String::from)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            command.categories.clone()
        };

        let comparator = SchemaComparator::new(NoopDdlProvider::new(), preferences);
        let empty = ObjectCatalog::new();
        let mut ids = IdSequence::new();
        let mut records = Vec::new();

        for category in &categories {
            let profile = context.config.profile_for(category);
            let request = CompareRequest::from_profile(
                source.catalog(category).unwrap_or(&empty),
                target.catalog(category).unwrap_or(&empty),
                &profile,
            )
            .with_target_schema(target_schema)
            .with_scids(source.meta.scid, target.meta.scid);

            let category_records = comparator
                .compare_dictionaries(&request, &mut ids)
                .with_context(|| format!("Failed to compare category '{}'", category))?;
            records.extend(category_records);
        }

        let summary = CompareSummary::from_records(&records);
        info!(
            categories = categories.len(),
            total = summary.total,
            "Comparison finished"
        );

        Ok(CompareOutput {
            generated_at: Utc::now().to_rfc3339(),
            source: command.source.display().to_string(),
            target: command.target.display().to_string(),
            target_schema: target_schema.map(String::from),
            categories,
            summary,
            records,
        })
    }
}
