use async_trait::async_trait;
use sandpit_host::{Clipboard, IoError};

/// `navigator.clipboard`
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorClipboard;

#[async_trait(?Send)]
impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<(), IoError> {
        let window =
            web_sys::window().ok_or_else(|| IoError::Clipboard("no window".to_string()))?;
        let promise = window.navigator().clipboard().write_text(text);
        wasm_bindgen_futures::JsFuture::from(promise)
            .await
            .map_err(|e| IoError::Clipboard(format!("{e:?}")))?;
        Ok(())
    }
}
