//! 画面モデル
//!
//! アプリケーション状態から描画内容を組み立てる純粋関数です。
//! UIフレームワークはこの結果をそのまま描画します。

use crate::relay::RelayDescriptor;
use crate::session::{AppState, Connection};

/// 画面全体
#[derive(Debug, Clone, PartialEq)]
pub struct View {
    /// メイン画面
    pub screen: Screen,
    /// 最後に受け取ったメッセージ
    pub message: Option<String>,
    /// 最後の呼び出しエラー
    pub error: Option<String>,
}

/// メイン画面
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// リレー選択
    RelayPicker {
        /// 選択可能なリレー
        relays: Vec<RelayDescriptor>,
    },
    /// 接続済みパネル
    Connected(ConnectedPanel),
}

/// 接続済みパネル
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedPanel {
    /// 自ピアID
    pub peer_id: String,
    /// リレーのピアID
    pub relay_peer_id: String,
    /// 対象ピアID入力
    pub peer_id_input: String,
    /// 対象リレーID入力
    pub relay_peer_id_input: String,
    /// 送信メッセージ入力
    pub message_to_send: String,
}

/// 状態から画面を構築
pub fn render(state: &AppState, relays: &[RelayDescriptor]) -> View {
    let screen = match &state.connection {
        Connection::Disconnected => Screen::RelayPicker {
            relays: relays.to_vec(),
        },
        Connection::Connected(client) => Screen::Connected(ConnectedPanel {
            peer_id: client.self_peer_id(),
            relay_peer_id: client.relay_peer_id(),
            peer_id_input: state.peer_id_input.clone(),
            relay_peer_id_input: state.relay_peer_id_input.clone(),
            message_to_send: state.message_to_send.clone(),
        }),
    };

    View {
        screen,
        // 空文字列は表示しない
        message: state.last_message.clone().filter(|message| !message.is_empty()),
        error: state.last_error.clone(),
    }
}
