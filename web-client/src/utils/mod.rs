//! ユーティリティモジュール
//!
//! このモジュールには、Webクライアントで使用されるブラウザAPIのラッパーが含まれています。

pub mod clipboard;
pub mod logging;
pub mod network;

// 主要ユーティリティを再エクスポート
pub use clipboard::copy_to_clipboard;
pub use network::WebSocketClientFactory;
