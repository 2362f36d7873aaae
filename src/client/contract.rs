use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// マッチングサービスのアップロード契約
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiContract {
    /// `POST /match`、フィールド名 `file`
    #[default]
    Match,
    /// `POST /api/upload/`、フィールド名 `image`
    Legacy,
}

impl ApiContract {
    pub fn path(&self) -> &'static str {
        match self {
            ApiContract::Match => "/match",
            ApiContract::Legacy => "/api/upload/",
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            ApiContract::Match => "file",
            ApiContract::Legacy => "image",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiContract::Match => "match",
            ApiContract::Legacy => "legacy",
        }
    }
}
