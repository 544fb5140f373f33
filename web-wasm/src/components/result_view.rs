//! 結果表示コンポーネント

use leptos::prelude::*;
use photo_verdict_common::{AnalysisResult, NO_RISK_MESSAGE};

use crate::view_model::{severity_class, tier_class};

#[component]
pub fn ResultView<F>(result: AnalysisResult, preview_url: Option<String>, on_reset: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    let score_class = format!("score-ring {}", tier_class(result.tier()));
    let score = result.score.to_string();

    // リスクは返ってきた順のまま並べる
    let risk_section = if result.has_risks() {
        let items = result
            .risks
            .into_iter()
            .map(|risk| {
                view! {
                    <li class="risk-item">
                        <span class=severity_class(risk.severity)>{risk.severity.label()}</span>
                        <div class="risk-body">
                            <h4>{risk.title}</h4>
                            <p>{risk.explanation}</p>
                        </div>
                    </li>
                }
            })
            .collect_view();
        view! { <ul class="risk-list">{items}</ul> }.into_any()
    } else {
        view! { <p class="no-risk">{NO_RISK_MESSAGE}</p> }.into_any()
    };

    view! {
        <div class="result-view">
            {preview_url.map(|url| view! { <img class="preview" src=url alt="预览" /> })}

            <div class="verdict-card">
                <div class=score_class>
                    <span class="score">{score}</span>
                    <span class="score-max">"/10"</span>
                </div>
                <h2 class="verdict">{result.verdict}</h2>
                <p class="summary">{result.summary}</p>
            </div>

            <h3>"深度解读"</h3>
            {risk_section}

            <button class="btn btn-primary" on:click=move |_| on_reset()>
                "鉴别下一张"
            </button>
        </div>
    }
}
