//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"拍照鉴别"</h1>
            <p class="text-muted">"配料表・合同・体检报告，拍一下就知道有没有坑"</p>
        </header>
    }
}
