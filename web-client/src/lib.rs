//! Webクライアントエントリポイント
//!
//! このクレートは、リレー経由で他のピアに文字数カウントを依頼する
//! Webクライアントを提供します。WebAssemblyにコンパイルされ、ブラウザ上で実行されます。

mod app;
mod components;
mod config;
mod utils;

use wasm_bindgen::prelude::*;
use web_sys::window;

/// Webクライアントの初期化
#[wasm_bindgen]
pub fn initialize() -> Result<(), JsValue> {
    // パニック時のフックを設定
    utils::logging::set_panic_hook();

    // ロガーを初期化
    utils::logging::init_logger(config::load().log_level());

    log::info!("Webクライアントを初期化中... (v{})", get_version());

    let window = window().ok_or_else(|| JsValue::from_str("ウィンドウが見つかりません"))?;
    let document = window.document().ok_or_else(|| JsValue::from_str("ドキュメントが見つかりません"))?;

    // アプリケーションのコンテナを取得
    if let Some(app_container) = document.get_element_by_id("app") {
        yew::Renderer::<app::App>::with_root(app_container).render();
        log::info!("アプリケーションを正常にマウントしました");
    } else {
        // コンテナが存在しない場合は作成してマウント
        log::warn!("アプリケーションコンテナが見つかりません。新しく作成します。");

        let body = document.body().ok_or_else(|| JsValue::from_str("ドキュメントのボディが見つかりません"))?;

        let app_div = document.create_element("div")?;
        app_div.set_id("app");
        body.append_child(&app_div)?;

        yew::Renderer::<app::App>::with_root(app_div).render();
        log::info!("アプリケーションを新しく作成したコンテナにマウントしました");
    }

    Ok(())
}

/// バージョン情報を取得
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
