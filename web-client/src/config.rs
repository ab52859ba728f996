//! 埋め込み設定
//!
//! ビルド時に `relays.toml` を埋め込み、起動時に読み込みます。

use std::path::Path;

use charcount_common::{AppConfig, ConfigFormat};

const CONFIG_FILE: &str = "relays.toml";
const CONFIG_TEXT: &str = include_str!("../relays.toml");

/// 設定を読み込む
///
/// 埋め込み設定が不正な場合は既定値を使います。
pub fn load() -> AppConfig {
    let format = ConfigFormat::from_extension(Path::new(CONFIG_FILE)).unwrap_or_default();
    match AppConfig::parse(CONFIG_TEXT, format) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{} の読み込みに失敗しました。既定の設定を使用します: {}", CONFIG_FILE, e);
            AppConfig::default()
        }
    }
}
