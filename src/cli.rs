use clap::{Parser, Subcommand};
use crate::client::ApiContract;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "furniture-match")]
#[command(about = "家具写真から類似アイテムを検索するツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を送信して類似家具を検索
    Match {
        /// 家具の写真
        #[arg(required = true)]
        image: PathBuf,

        /// マッチングサービスのベースURL（設定・環境変数より優先）
        #[arg(long)]
        base_url: Option<String>,

        /// アップロード契約 (match/legacy)
        #[arg(long)]
        contract: Option<ApiContract>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// マッチングサービスの死活確認
    Health {
        /// マッチングサービスのベースURL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// 設定の表示・変更
    Config {
        /// ベースURLを設定
        #[arg(long)]
        set_base_url: Option<String>,

        /// アップロード契約を設定 (match/legacy)
        #[arg(long)]
        set_contract: Option<ApiContract>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}
