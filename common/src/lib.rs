//! 文字数カウントクライアント共通ライブラリ
//!
//! このクレートは、リレー経由でネットワーク上のピアを呼び出す
//! ブラウザクライアントのうち、プラットフォームに依存しない部分を提供します。
//! WebSocketやDOMなどの実体はWebクライアント側で実装されます。

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod relay;
pub mod service;
pub mod session;
pub mod view;

#[cfg(test)]
mod test_support;

// 主要コンポーネントを再エクスポート
pub use client::{ClientFactory, NetworkClient, RelayClient, SessionIdentity, Transport};
pub use config::{AppConfig, ConfigError, ConfigFormat};
pub use error::{CommonError, ErrorCode, Result};
pub use protocol::{Frame, RemoteCall};
pub use relay::{RelayDescriptor, RelayEndpoint};
pub use service::count_chars;
pub use session::{AppState, Connection, InvokeOutcome, Session};
pub use view::{ConnectedPanel, Screen, View};

/// ライブラリのバージョン
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
