//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use photo_verdict_common::{AnalysisMachine, Analyzer, Phase, SelectedFile, ValidationError};
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use crate::api::gemini::FetchAnalyzer;
use crate::components::{
    error_view::ErrorView,
    header::Header,
    loading_state::LoadingState,
    result_view::ResultView,
    upload_area::UploadArea,
};
use crate::preview::ObjectUrlPreviews;
use crate::view_model::ViewSnapshot;

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // 描画用の写し。状態機械の遷移ごとに更新される
    let snapshot = RwSignal::new(ViewSnapshot::default());

    let machine = StoredValue::new_local(
        AnalysisMachine::new(ObjectUrlPreviews)
            .on_transition(move |state| snapshot.set(ViewSnapshot::from(state))),
    );
    let analyzer = StoredValue::new_local(FetchAnalyzer::from_build_env());

    // ファイル選択ハンドラ
    let on_file_selected = move |file: Option<File>| {
        let analyzer = analyzer.get_value();
        spawn_local(async move {
            let selected = match file {
                Some(file) => match read_selected_file(&file).await {
                    Ok(selected) => Some(selected),
                    Err(reason) => {
                        web_sys::console::warn_1(&format!("file read failed: {}", reason).into());
                        machine.update_value(|m| m.reject(ValidationError::Unreadable(reason)));
                        return;
                    }
                },
                None => None,
            };

            let Some(pending) = machine.try_update_value(|m| m.begin(selected)).flatten() else {
                return;
            };

            let outcome = analyzer.analyze(&pending.payload).await;
            if let Err(e) = &outcome {
                web_sys::console::warn_1(&format!("analysis failed ({:?}): {}", e.kind(), e).into());
            }

            machine.update_value(|m| {
                if !m.complete(pending.ticket, outcome) {
                    web_sys::console::log_1(&"stale analysis result dropped".into());
                }
            });
        });
    };

    // 鉴别下一张 / 重新上传
    let on_reset = move || machine.update_value(|m| m.reset());

    view! {
        <div class="container">
            <Header />

            {move || {
                let snap = snapshot.get();
                if snap.busy {
                    return view! { <LoadingState preview_url=snap.preview_url /> }.into_any();
                }

                match (snap.phase, snap.result) {
                    (Phase::Success, Some(result)) => view! {
                        <ResultView result=result preview_url=snap.preview_url on_reset=on_reset />
                    }
                    .into_any(),
                    (Phase::Error, _) => view! {
                        <ErrorView
                            message=snap.error.unwrap_or_default()
                            preview_url=snap.preview_url
                            on_reset=on_reset
                        />
                    }
                    .into_any(),
                    _ => view! { <UploadArea on_file_selected=on_file_selected /> }.into_any(),
                }
            }}
        </div>
    }
}

/// File を読み込んで SelectedFile にする
async fn read_selected_file(file: &File) -> Result<SelectedFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| e.as_string().unwrap_or_else(|| format!("{:?}", e)))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mime_type = Some(file.type_()).filter(|t| !t.is_empty());
    Ok(SelectedFile::new(file.name(), mime_type, bytes))
}
