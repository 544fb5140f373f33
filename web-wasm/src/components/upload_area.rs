//! アップロードエリアコンポーネント

use leptos::prelude::*;
use web_sys::{File, HtmlInputElement};

/// 1枚だけ選ばせる。スマホではカメラが開く
#[component]
pub fn UploadArea<F>(on_file_selected: F) -> impl IntoView
where
    F: Fn(Option<File>) + Copy + 'static,
{
    let on_change = move |ev: leptos::ev::Event| {
        let input = event_target::<HtmlInputElement>(&ev);
        let file = input.files().and_then(|files| files.get(0));
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");
        on_file_selected(file);
    };

    view! {
        <label class="upload-area">
            <div class="upload-icon">"📷"</div>
            <p>"拍照或上传图片"</p>
            <p class="text-muted">"支持配料表、合同、体检报告，10MB以内"</p>
            <input
                type="file"
                accept="image/*"
                capture="environment"
                class="hidden"
                on:change=on_change
            />
        </label>
    }
}
