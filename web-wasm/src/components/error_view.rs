//! エラー表示

use leptos::prelude::*;

#[component]
pub fn ErrorView<F>(message: String, preview_url: Option<String>, on_reset: F) -> impl IntoView
where
    F: Fn() + Copy + 'static,
{
    view! {
        <div class="error-view">
            {preview_url.map(|url| view! { <img class="preview" src=url alt="预览" /> })}
            <div class="error-icon">"⚠️"</div>
            <p class="error-message">{message}</p>
            <button class="btn btn-primary" on:click=move |_| on_reset()>
                "重新上传"
            </button>
        </div>
    }
}
