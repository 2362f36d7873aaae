use crate::client::ApiContract;
use crate::error::{FurnitureMatchError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ベースURLを上書きする環境変数
pub const BASE_URL_ENV: &str = "FURNITURE_MATCH_BASE_URL";

/// ローカル開発用のマッチングサービス
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub contract: ApiContract,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            contract: ApiContract::Match,
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（ファイルがなければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FurnitureMatchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("furniture-match").join("config.json"))
    }

    /// 実際に使うベースURL（環境変数を優先）
    pub fn base_url(&self) -> String {
        self.resolve_base_url(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    /// 上書き値があればそれを、なければ設定値を使う。末尾の "/" は除去
    pub fn resolve_base_url(&self, env_override: Option<&str>) -> String {
        let url = env_override
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.base_url);
        url.trim_end_matches('/').to_string()
    }

    pub fn set_base_url(&mut self, url: String) -> Result<()> {
        validate_base_url(&url)?;
        self.base_url = url;
        Ok(())
    }
}

/// ベースURLは http(s) のみ受け付ける
pub fn validate_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(FurnitureMatchError::Config(format!(
            "ベースURLは http:// または https:// で始まる必要があります: {}",
            url
        )))
    }
}
