//! 端末フロントエンド
//!
//! 状態機械を組み立て、遷移に合わせてスピナーを出し、対話モードのループを回す。

use crate::config::Config;
use crate::error::{PhotoVerdictError, Result};
use crate::loader::load_image;
use crate::preview::ThumbnailPreviews;
use crate::report::render_state;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use photo_verdict_common::{AnalysisMachine, AnalysisState, Analyzer, Phase};
use std::path::Path;
use std::time::Duration;

/// 端末用の状態機械（サムネイルプレビュー + 設定の上限サイズ）
pub fn new_machine(config: &Config, show_spinner: bool) -> AnalysisMachine<ThumbnailPreviews> {
    let machine = AnalysisMachine::new(ThumbnailPreviews::in_temp_dir())
        .with_max_upload_bytes(config.max_upload_bytes);

    if show_spinner {
        machine.on_transition(spinner_listener())
    } else {
        machine
    }
}

/// Analyzing の間だけスピナーを回すリスナー
pub fn spinner_listener() -> impl FnMut(&AnalysisState) + 'static {
    let mut active: Option<ProgressBar> = None;

    move |state: &AnalysisState| match state.phase() {
        Phase::Analyzing => {
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("专家正在鉴别中... 正在提取关键信息，分析潜在风险");
            spinner.enable_steady_tick(Duration::from_millis(100));
            active = Some(spinner);
        }
        Phase::Uploading => {}
        Phase::Idle | Phase::Success | Phase::Error => {
            if let Some(spinner) = active.take() {
                spinner.finish_and_clear();
            }
        }
    }
}

const NEXT_ACTIONS: &[&str] = &["鉴别下一张", "退出"];

/// 対話モード
///
/// 画像パス入力 → 鉴别 → 結果表示 → reset を繰り返す。空入力で終了。
pub async fn run_interactive<A>(analyzer: &A, config: &Config) -> Result<()>
where
    A: Analyzer + ?Sized,
{
    let mut machine = new_machine(config, true);

    loop {
        let input: String = Input::new()
            .with_prompt("图片路径（留空退出）")
            .allow_empty(true)
            .interact_text()?;
        let input = input.trim();
        if input.is_empty() {
            break;
        }

        let file = match load_image(Path::new(input)) {
            Ok(file) => file,
            Err(PhotoVerdictError::FileNotFound(path)) => {
                println!("找不到文件: {}\n", path);
                continue;
            }
            Err(e) => return Err(e),
        };

        machine.submit(analyzer, Some(file)).await;
        println!("\n{}\n", render_state(machine.state()));

        let choice = Select::new()
            .items(NEXT_ACTIONS)
            .default(0)
            .interact()?;
        machine.reset();

        if choice != 0 {
            break;
        }
    }

    Ok(())
}
