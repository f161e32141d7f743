// 設定ファイル管理
//
// 比較設定ファイル（YAML形式）の読み込みと検証、
// カテゴリごとの無視キーやグループ名の上書きを管理します。

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::core::profiles::CategoryProfile;

/// 比較時のユーザー設定
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparePreferences {
    /// 所有者の違いを無視する
    #[serde(default)]
    pub ignore_owner: bool,

    /// 文字列値の空白の違いを無視する
    #[serde(default)]
    pub ignore_whitespaces: bool,
}

/// 比較設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 設定ファイルのバージョン
    pub version: String,

    /// ユーザー設定
    #[serde(default)]
    pub preferences: ComparePreferences,

    /// 差分DDLの書き換え先スキーマ
    #[serde(default)]
    pub target_schema: Option<String>,

    /// カテゴリ別の追加無視キー（既定値に追加される）
    #[serde(default)]
    pub ignore_keys: BTreeMap<String, Vec<String>>,

    /// カテゴリ別のグループ名の上書き
    #[serde(default)]
    pub group_names: BTreeMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            preferences: ComparePreferences::default(),
            target_schema: None,
            ignore_keys: BTreeMap::new(),
            group_names: BTreeMap::new(),
        }
    }
}

impl Config {
    /// デフォルトの設定ファイルパス
    pub const DEFAULT_CONFIG_PATH: &'static str = crate::core::naming::CONFIG_FILE;

    /// ファイルから設定を読み込む
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = content.parse()?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {:?}", path))?;
        Ok(config)
    }

    /// 設定の妥当性を検証
    pub fn validate(&self) -> Result<()> {
        // バージョンチェック
        if self.version.is_empty() {
            return Err(anyhow!("Config file version is not specified"));
        }

        // 無視キーのチェック
        for (category, keys) in &self.ignore_keys {
            if category.is_empty() {
                return Err(anyhow!("Category name in ignore_keys must not be empty"));
            }
            if keys.iter().any(|k| k.trim().is_empty()) {
                return Err(anyhow!(
                    "Ignore key for category '{}' must not be empty",
                    category
                ));
            }
        }

        for (category, group) in &self.group_names {
            if group.trim().is_empty() {
                return Err(anyhow!(
                    "Group name for category '{}' must not be empty",
                    category
                ));
            }
        }

        Ok(())
    }

    /// 設定を反映したカテゴリプロファイルを取得
    pub fn profile_for(&self, category: &str) -> CategoryProfile {
        let mut profile = CategoryProfile::for_category(category);

        if let Some(extra) = self.ignore_keys.get(category) {
            for key in extra {
                if !profile.ignore_keys.contains(key) {
                    profile.ignore_keys.push(key.clone());
                }
            }
        }

        if let Some(group) = self.group_names.get(category) {
            profile.group_name = group.clone();
        }

        profile
    }
}

/// std::str::FromStrトレイトの実装
impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(yaml: &str) -> Result<Self, Self::Err> {
        serde_saphyr::from_str(yaml).with_context(|| "Failed to parse config file")
    }
}
