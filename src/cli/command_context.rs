// コマンド共通コンテキスト
//
// 設定ファイル読み込みとスナップショット読み込みの重複をCLI層で集約する。

use crate::adapters::snapshot_loader::{Snapshot, SnapshotLoader};
use crate::core::config::{ComparePreferences, Config};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// CLIコマンド共通の実行コンテキスト
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub project_path: PathBuf,
    /// 読み込んだ設定ファイル（存在しない場合はNone）
    pub config_path: Option<PathBuf>,
    pub config: Config,
}

impl CommandContext {
    /// 設定を読み込んでコンテキストを作成
    ///
    /// 明示的に指定された設定ファイルは存在しなければエラーになります。
    /// 指定がない場合はプロジェクトルートのデフォルトファイルを探し、無ければデフォルト設定を使います。
    pub fn load(project_path: PathBuf, config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => {
                let path = resolve_path(&project_path, path);
                if !path.exists() {
                    return Err(anyhow!("Config file not found: {:?}", path));
                }
                Some(path)
            }
            None => {
                let path = project_path.join(Config::DEFAULT_CONFIG_PATH);
                path.exists().then_some(path)
            }
        };

        let config = match &config_path {
            Some(path) => {
                debug!(path = %path.display(), "Loading config file");
                Config::from_file(path).with_context(|| "Failed to read config file")?
            }
            None => Config::default(),
        };

        Ok(Self {
            project_path,
            config_path,
            config,
        })
    }

    /// CLIフラグを設定の比較オプションに重ねる
    ///
    /// フラグは有効化のみ行い、設定ファイルで有効な項目を無効化しません。
    pub fn preferences(&self, ignore_owner: bool, ignore_whitespaces: bool) -> ComparePreferences {
        ComparePreferences {
            ignore_owner: self.config.preferences.ignore_owner || ignore_owner,
            ignore_whitespaces: self.config.preferences.ignore_whitespaces || ignore_whitespaces,
        }
    }

    /// ソースとターゲットのスナップショットを読み込む
    pub fn load_snapshots(&self, source: &Path, target: &Path) -> Result<(Snapshot, Snapshot)> {
        let loader = SnapshotLoader::new();

        let source_path = resolve_path(&self.project_path, source.to_path_buf());
        let source = loader
            .load_file(&source_path)
            .with_context(|| "Failed to load source snapshot")?;

        let target_path = resolve_path(&self.project_path, target.to_path_buf());
        let target = loader
            .load_file(&target_path)
            .with_context(|| "Failed to load target snapshot")?;

        Ok((source, target))
    }
}

/// 相対パスをプロジェクトルート基準の絶対パスに変換
fn resolve_path(project_path: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        project_path.join(path)
    }
}
