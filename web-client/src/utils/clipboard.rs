//! クリップボードユーティリティ
//!
//! ブラウザのクリップボードAPIを使用してピアIDをコピーします。
//! `web_sys::Clipboard` は unstable API のため `Reflect` 経由で呼び出します。

use js_sys::{Function, Promise, Reflect};
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::window;

use super::logging::describe_js_error;

/// クリップボードエラー
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// クリップボードAPIが利用できない
    #[error("クリップボードAPIが利用できません")]
    ApiNotSupported,

    /// 書き込みに失敗
    #[error("クリップボードへのコピーに失敗しました: {0}")]
    CopyFailed(String),
}

/// クリップボードにテキストをコピー
pub async fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let clipboard = get_clipboard().ok_or(ClipboardError::ApiNotSupported)?;

    let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .ok()
        .and_then(|f| f.dyn_into::<Function>().ok())
        .ok_or(ClipboardError::ApiNotSupported)?;

    // writeText()はPromiseを返すのでJsFutureに変換
    let promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .and_then(|value| value.dyn_into::<Promise>())
        .map_err(|e| ClipboardError::CopyFailed(describe_js_error(&e)))?;

    JsFuture::from(promise)
        .await
        .map_err(|e| ClipboardError::CopyFailed(describe_js_error(&e)))?;

    Ok(())
}

/// クリップボードオブジェクトを取得
fn get_clipboard() -> Option<JsValue> {
    let navigator = window()?.navigator();
    Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .ok()
        .filter(|clipboard| !clipboard.is_undefined() && !clipboard.is_null())
}
