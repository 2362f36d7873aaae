use clap::Parser;
use furniture_match::{cli, client, config, error, loader, workflow};
use cli::{Cli, Commands};
use client::MatchClient;
use config::Config;
use error::{FurnitureMatchError, Result};
use indicatif::ProgressBar;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use workflow::WorkflowController;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_directive = if cli.verbose { "furniture_match=debug" } else { "furniture_match=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Match { image, base_url, contract, json } => {
            println!("🪑 furniture-match - 類似家具検索\n");

            let mut config = config;
            if let Some(contract) = contract {
                config.contract = contract;
            }

            let client = build_client(&config, base_url)?;
            println!("  サービス: {} ({})\n", client.endpoint(), client.contract().as_str());

            let mut controller = WorkflowController::new(client);
            controller.get_started();

            // 1. 画像読み込み・検証
            println!("[1/3] 画像を読み込み中...");
            let file = match loader::load_candidate(&image).await {
                Ok(file) => file,
                Err(err) => {
                    println!("✘ {}", err);
                    return Err(err);
                }
            };
            let preview_task = match controller.select_file(file) {
                Ok(task) => task,
                Err(err) => {
                    println!("✘ {}", err);
                    return Err(err.into());
                }
            };
            println!("✔ {}\n", image.display());

            // 2. プレビュー生成と送信を並行実行
            println!("[2/3] 照合中...");
            let spinner = ProgressBar::new_spinner();
            spinner.set_message("Finding matches...");
            spinner.enable_steady_tick(Duration::from_millis(100));

            let (preview, submitted) = tokio::join!(preview_task.run(), controller.submit());
            spinner.finish_and_clear();
            controller.apply_preview(preview);

            for command in controller.take_commands() {
                tracing::debug!(?command, "UI command");
            }

            if let Err(err) = submitted {
                println!("✘ {}", err);
                return Err(err.into());
            }

            let session = controller.session();
            match &session.preview {
                Some(preview) => println!("✔ プレビュー: {} ({} chars)\n", preview.mime_type(), preview.data_url.len()),
                None => println!("- プレビューなし\n"),
            }

            // 3. 結果表示
            println!("[3/3] 結果");
            if json {
                println!("{}", serde_json::to_string_pretty(&session.results)?);
            } else if session.has_no_matches() {
                println!("  一致する家具が見つかりませんでした");
            } else {
                for (i, item) in session.results.iter().enumerate() {
                    let score = item.score().map(|s| format!(" [{:.3}]", s)).unwrap_or_default();
                    let price = item.price().map(|p| format!(" {}", p)).unwrap_or_default();
                    println!("  {}. {}{}{}", i + 1, item.title(), price, score);
                    if let Some(url) = item.image_url() {
                        println!("     画像: {}", url);
                    }
                    if let Some(link) = item.link() {
                        println!("     購入: {}", link);
                    }
                }
            }

            println!("\n✅ {}件の候補", session.results.len());
        }

        Commands::Health { base_url } => {
            let client = build_client(&config, base_url)?;
            client
                .health()
                .await
                .map_err(|e| FurnitureMatchError::Unhealthy(format!("{}: {}", client.base_url(), e)))?;
            println!("✔ {} は稼働中です", client.base_url());
        }

        Commands::Config { set_base_url, set_contract, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(url) = set_base_url {
                config.set_base_url(url)?;
                changed = true;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(contract) = set_contract {
                config.contract = contract;
                changed = true;
                println!("✔ アップロード契約を設定しました");
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  ベースURL: {}", config.base_url);
                println!("  実効URL: {}", config.base_url());
                println!("  契約: {}", config.contract.as_str());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

/// コマンドラインのURL指定 > 環境変数 > 設定ファイル
fn build_client(config: &Config, base_url: Option<String>) -> Result<MatchClient> {
    let client = MatchClient::from_config(config)?;
    match base_url {
        Some(url) => {
            config::validate_base_url(&url)?;
            Ok(client.with_base_url(url))
        }
        None => Ok(client),
    }
}
