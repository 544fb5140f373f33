use clap::Parser;
use photo_verdict::{cli, config, error, gemini, loader, logging, report, session};
use cli::{Cli, Commands};
use config::Config;
use error::{PhotoVerdictError, Result};
use gemini::GeminiClient;
use photo_verdict_common::{build_analysis_prompt, response_schema, AnalysisState};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, json, output, model } => {
            let mut client = GeminiClient::from_config(&config)?;
            if let Some(model) = model {
                client = client.with_model(model);
            }

            if !json {
                println!("🔍 photo-verdict - 鉴别 ({})\n", client.model());
            }

            let file = loader::load_image(&image)?;
            let mut machine = session::new_machine(&config, !json);
            machine.submit(&client, Some(file)).await;

            match machine.state() {
                AnalysisState::Success { result, .. } => {
                    if let Some(path) = &output {
                        std::fs::write(path, serde_json::to_string_pretty(result)?)?;
                    }

                    if json {
                        println!("{}", serde_json::to_string_pretty(result)?);
                    } else {
                        println!("{}", report::render_result(result));
                        if let Some(path) = &output {
                            println!("\n✔ 結果を保存: {}", path.display());
                        }
                    }
                }
                AnalysisState::Error { message, .. } => {
                    if !json {
                        println!("{}", report::render_error(message));
                    }
                    return Err(PhotoVerdictError::Failed(message.clone()));
                }
                other => {
                    // submit 完了後に Idle/Analyzing が残ることはない
                    println!("{}", report::render_state(other));
                }
            }
        }

        Commands::Session => {
            println!("🔍 photo-verdict - 对话模式\n");
            let client = GeminiClient::from_config(&config)?;
            session::run_interactive(&client, &config).await?;
        }

        Commands::Schema => {
            println!("# Prompt\n{}\n", build_analysis_prompt());
            println!("# Response schema\n{}", serde_json::to_string_pretty(&response_schema())?);
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  モデル: {}", config.model);
                println!("  temperature: {}", config.temperature);
                println!("  最大アップロードサイズ: {} bytes", config.max_upload_bytes);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  エンドポイント: {}", config.base_url);
                println!(
                    "  APIキー: {}",
                    if config.api_key_source().resolve().is_some() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}
