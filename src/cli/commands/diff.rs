// diffコマンドハンドラー
//
// 1つのオブジェクトについて、ソースとターゲットの差分辞書を表示します。

use crate::adapters::noop_ddl_provider::NoopDdlProvider;
use crate::adapters::snapshot_loader::Snapshot;
use crate::cli::command_context::CommandContext;
use crate::cli::commands::{render_output, CommandOutput};
use crate::cli::OutputFormat;
use crate::core::difference::DifferenceDict;
use crate::core::metadata::ObjectMetadata;
use crate::services::schema_comparator::SchemaComparator;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::path::PathBuf;

/// diffコマンドの入力パラメータ
#[derive(Debug, Clone)]
pub struct DiffCommand {
    /// プロジェクトのルートパス
    pub project_path: PathBuf,
    /// カスタム設定ファイルパス
    pub config_path: Option<PathBuf>,
    pub source: PathBuf,
    pub target: PathBuf,
    /// オブジェクトカテゴリ
    pub category: String,
    /// オブジェクト名
    pub object: String,
    pub ignore_owner: bool,
    pub ignore_whitespaces: bool,
    /// 出力フォーマット
    pub format: OutputFormat,
}

/// diffコマンドの出力構造体
#[derive(Debug, Clone, Serialize)]
pub struct DiffOutput {
    pub category: String,
    pub object: String,
    pub difference: DifferenceDict,
}

impl CommandOutput for DiffOutput {
    fn to_text(&self) -> String {
        if self.difference.is_empty() {
            return format!(
                "No differences found for {} '{}'.",
                self.category, self.object
            );
        }
        serde_json::to_string_pretty(&self.difference.to_value())
            .unwrap_or_else(|_| self.difference.to_value().to_string())
    }
}

/// diffコマンドハンドラー
#[derive(Debug, Clone, Default)]
pub struct DiffCommandHandler {}

impl DiffCommandHandler {
    /// 新しいDiffCommandHandlerを作成
    pub fn new() -> Self {
        Self {}
    }

    /// diffコマンドを実行
    pub fn execute(&self, command: &DiffCommand) -> Result<String> {
        let output = self.diff(command)?;
        render_output(&output, &command.format)
    }

    /// 差分を計算して出力構造体を作成
    pub fn diff(&self, command: &DiffCommand) -> Result<DiffOutput> {
        let context = CommandContext::load(command.project_path.clone(), command.config_path.clone())?;
        let (source, target) = context.load_snapshots(&command.source, &command.target)?;

        let source_metadata = find_object(&source, &command.category, &command.object)
            .with_context(|| "Object not found in source snapshot")?;
        let target_metadata = find_object(&target, &command.category, &command.object)
            .with_context(|| "Object not found in target snapshot")?;

        let preferences = context.preferences(command.ignore_owner, command.ignore_whitespaces);
        let profile = context.config.profile_for(&command.category);
        let comparator = SchemaComparator::new(NoopDdlProvider::new(), preferences);

        let difference = comparator.object_difference(
            &command.category,
            source_metadata,
            target_metadata,
            &profile.ignore_keys,
        );

        Ok(DiffOutput {
            category: command.category.clone(),
            object: command.object.clone(),
            difference,
        })
    }
}

fn find_object<'a>(snapshot: &'a Snapshot, category: &str, object: &str) -> Result<&'a ObjectMetadata> {
    snapshot
        .catalog(category)
        .ok_or_else(|| anyhow!("Category '{}' does not exist", category))?
        .get(object)
        .ok_or_else(|| anyhow!("{} '{}' does not exist", category, object))
}
