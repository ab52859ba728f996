//! Webクライアントのコンポーネントモジュール
//!
//! このモジュールには、Webクライアントで使用するYewコンポーネントが含まれています。

pub mod connected_panel;
pub mod message;
pub mod relay_picker;

// 主要コンポーネントをre-export
pub use connected_panel::ConnectedPanelView;
pub use message::MessagePanel;
pub use relay_picker::RelayPicker;
