//! ロギングユーティリティ
//!
//! `log` クレートの出力先をブラウザのコンソールに設定します。

use wasm_bindgen::{JsCast, JsValue};

/// ロガーを初期化
pub fn init_logger(level: log::Level) {
    wasm_logger::init(wasm_logger::Config::new(level));
}

/// パニック時のフックを設定
pub fn set_panic_hook() {
    #[cfg(feature = "development")]
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
}

/// JavaScript側のエラー値を文字列にする
pub fn describe_js_error(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{:?}", value)
}
