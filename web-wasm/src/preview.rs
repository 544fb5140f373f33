//! Blob Object URL によるプレビュー

use photo_verdict_common::{PreviewHost, SelectedFile};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, Url};

/// 画像バイト列から `blob:` URL を作り、解放時に revoke する
#[derive(Default)]
pub struct ObjectUrlPreviews;

impl PreviewHost for ObjectUrlPreviews {
    fn acquire(&mut self, file: &SelectedFile) -> Result<String, String> {
        let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
        let parts = js_sys::Array::of1(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(file.effective_mime_type());

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| describe(&e))?;
        Url::create_object_url_with_blob(&blob).map_err(|e| describe(&e))
    }

    fn release(&mut self, locator: &str) {
        if let Err(e) = Url::revoke_object_url(locator) {
            web_sys::console::warn_1(&format!("revokeObjectURL failed: {}", describe(&e)).into());
        }
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use photo_verdict_common::{AnalysisMachine, Phase};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    /// URL を fetch して Blob を取り出す。revoke 済みなら Err
    async fn fetch_blob(url: &str) -> Result<Blob, JsValue> {
        let window = web_sys::window().expect("no window");
        let resp: web_sys::Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
        JsFuture::from(resp.blob()?).await?.dyn_into()
    }

    fn png_file() -> SelectedFile {
        SelectedFile::new("label.png", Some("image/png".into()), vec![0x89, b'P', b'N', b'G', 1, 2, 3])
    }

    #[wasm_bindgen_test]
    async fn wasm_acquire_creates_blob_url_with_mime_type() {
        let mut previews = ObjectUrlPreviews;
        let file = png_file();

        let url = previews.acquire(&file).expect("acquire failed");
        assert!(url.starts_with("blob:"));

        let blob = fetch_blob(&url).await.expect("blob should be readable");
        assert_eq!(blob.type_(), "image/png");
        assert_eq!(blob.size() as usize, file.bytes.len());

        previews.release(&url);
        assert!(fetch_blob(&url).await.is_err());
    }

    #[wasm_bindgen_test]
    async fn wasm_undeclared_type_defaults_to_jpeg() {
        let mut previews = ObjectUrlPreviews;
        let file = SelectedFile::new("scan", None, vec![0xFF, 0xD8]);

        let url = previews.acquire(&file).expect("acquire failed");
        let blob = fetch_blob(&url).await.expect("blob should be readable");
        assert_eq!(blob.type_(), "image/jpeg");
        previews.release(&url);
    }

    #[wasm_bindgen_test]
    async fn wasm_machine_reset_revokes_preview() {
        let mut machine = AnalysisMachine::new(ObjectUrlPreviews);
        let pending = machine.begin(Some(png_file()));
        assert!(pending.is_some());
        assert_eq!(machine.state().phase(), Phase::Analyzing);

        let url = machine.state().preview().expect("preview").locator().to_string();
        assert!(fetch_blob(&url).await.is_ok());

        machine.reset();
        assert_eq!(machine.state().phase(), Phase::Idle);
        assert!(fetch_blob(&url).await.is_err());
    }
}
