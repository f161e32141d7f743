// コマンドハンドラー層
// 各CLIコマンドの実装

pub mod compare;
pub mod diff;

use crate::cli::OutputFormat;
use anyhow::{Context, Result};
use serde::Serialize;

/// コマンド出力の共通トレイト
///
/// JSON出力はserdeでシリアライズし、テキスト出力は各コマンドが整形します。
pub trait CommandOutput: Serialize {
    fn to_text(&self) -> String;
}

/// 出力フォーマットに応じて文字列化
pub fn render_output<T: CommandOutput>(output: &T, format: &OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(output.to_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(output).with_context(|| "Failed to serialize output to JSON")
        }
    }
}
