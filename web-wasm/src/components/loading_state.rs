//! 解析中表示

use leptos::prelude::*;

#[component]
pub fn LoadingState(preview_url: Option<String>) -> impl IntoView {
    view! {
        <div class="loading-state">
            {preview_url.map(|url| view! { <img class="preview dimmed" src=url alt="预览" /> })}
            <div class="spinner" />
            <p>"专家正在鉴别中..."</p>
            <p class="text-muted">"正在提取关键信息，分析潜在风险"</p>
        </div>
    }
}
