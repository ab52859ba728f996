//! セッション状態管理
//!
//! 画面に表示する状態と、接続・リモート呼び出しの操作を管理します。
//! 状態はシングルスレッドのイベントループからのみ変更され、
//! `.await` をまたいで借用を保持しません。

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::client::{ClientFactory, NetworkClient};
use crate::config::AppConfig;
use crate::error::{CommonError, Result};
use crate::service::count_chars;
use crate::view::{self, View};

/// 接続状態
#[derive(Clone, Default)]
pub enum Connection {
    /// 未接続
    #[default]
    Disconnected,
    /// 接続済み
    Connected(Rc<dyn NetworkClient>),
}

impl Connection {
    /// 接続済みかどうか
    pub fn is_connected(&self) -> bool {
        matches!(self, Connection::Connected(_))
    }

    /// クライアントハンドルを取得
    pub fn client(&self) -> Option<Rc<dyn NetworkClient>> {
        match self {
            Connection::Connected(client) => Some(client.clone()),
            Connection::Disconnected => None,
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Disconnected => write!(f, "Disconnected"),
            Connection::Connected(client) => f
                .debug_struct("Connected")
                .field("peer_id", &client.self_peer_id())
                .field("relay_peer_id", &client.relay_peer_id())
                .finish(),
        }
    }
}

/// アプリケーション状態
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// 接続状態
    pub connection: Connection,
    /// 送信するメッセージ
    pub message_to_send: String,
    /// 最後に受け取ったメッセージ
    pub last_message: Option<String>,
    /// 対象ピアID入力
    pub peer_id_input: String,
    /// 対象リレーID入力
    pub relay_peer_id_input: String,
    /// 最後の呼び出しエラー
    pub last_error: Option<String>,
}

/// リモート呼び出しの結果
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeOutcome {
    /// 未接続のため何もしなかった
    Skipped,
    /// 応答を受け取った
    Delivered(String),
    /// 呼び出しに失敗した
    Failed(CommonError),
}

/// 文字数カウントを呼び出す
///
/// クライアントがなければ何もせず [`InvokeOutcome::Skipped`] を返します。
pub async fn invoke(
    client: Option<Rc<dyn NetworkClient>>,
    text: &str,
    target_peer_id: &str,
    target_relay_peer_id: &str,
) -> InvokeOutcome {
    let client = match client {
        Some(client) => client,
        None => return InvokeOutcome::Skipped,
    };

    match count_chars(client.as_ref(), text, target_peer_id, target_relay_peer_id).await {
        Ok(reply) => InvokeOutcome::Delivered(reply),
        Err(e) => InvokeOutcome::Failed(e),
    }
}

/// 状態変更の通知先
pub type ChangeListener = Rc<dyn Fn()>;

/// セッション
///
/// 複製しても同じ状態を共有します。
#[derive(Clone)]
pub struct Session {
    state: Rc<RefCell<AppState>>,
    config: Rc<AppConfig>,
    listener: Option<ChangeListener>,
}

impl Session {
    /// 新しいセッションを作成
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(AppState::default())),
            config: Rc::new(config),
            listener: None,
        }
    }

    /// 状態変更の通知先を設定
    pub fn with_listener(mut self, listener: ChangeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// 設定を取得
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// 現在の状態のコピーを取得
    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// 現在の状態から画面を構築
    pub fn view(&self) -> View {
        view::render(&self.state.borrow(), &self.config.relays)
    }

    /// 送信メッセージを更新
    pub fn set_message_to_send(&self, text: impl Into<String>) {
        self.update(|state| state.message_to_send = text.into());
    }

    /// 対象ピアIDを更新
    pub fn set_peer_id_input(&self, text: impl Into<String>) {
        self.update(|state| state.peer_id_input = text.into());
    }

    /// 対象リレーIDを更新
    pub fn set_relay_peer_id_input(&self, text: impl Into<String>) {
        self.update(|state| state.relay_peer_id_input = text.into());
    }

    /// リレーに接続
    ///
    /// 失敗した場合はログに記録するだけで状態は変更しません。
    pub async fn connect(&self, factory: &dyn ClientFactory, relay_address: &str) -> Result<()> {
        log::info!("リレーに接続しています: {}", relay_address);

        let client = match factory.create_client(relay_address).await {
            Ok(client) => client,
            Err(e) => {
                log::error!("クライアントの初期化に失敗しました: {}", e);
                return Err(e);
            }
        };

        // クライアント → ハンドラ → 状態 → クライアントの循環を避けるため弱参照を持たせる
        let state = Rc::downgrade(&self.state);
        let listener = self.listener.clone();
        client.on_event(
            &self.config.event_service,
            &self.config.event_function,
            Rc::new(move |args: &[Value]| on_inbound(&state, listener.as_ref(), args)),
        );

        log::info!(
            "接続しました: peer={} relay={}",
            client.self_peer_id(),
            client.relay_peer_id()
        );
        self.update(|state| state.connection = Connection::Connected(client));
        Ok(())
    }

    /// 入力中のメッセージを対象ピアに送る
    pub async fn send_message(&self) -> InvokeOutcome {
        let (client, text, peer_id, relay_peer_id) = {
            let state = self.state.borrow();
            (
                state.connection.client(),
                state.message_to_send.clone(),
                state.peer_id_input.clone(),
                state.relay_peer_id_input.clone(),
            )
        };

        let outcome = invoke(client, &text, &peer_id, &relay_peer_id).await;

        match &outcome {
            InvokeOutcome::Skipped => {}
            InvokeOutcome::Delivered(reply) => {
                let reply = reply.clone();
                self.update(|state| {
                    state.last_message = Some(reply);
                    state.last_error = None;
                });
            }
            InvokeOutcome::Failed(e) => {
                log::error!("文字数カウントの呼び出しに失敗しました: {}", e);
                let message = e.to_string();
                self.update(|state| state.last_error = Some(message));
            }
        }

        outcome
    }

    fn update(&self, f: impl FnOnce(&mut AppState)) {
        f(&mut self.state.borrow_mut());
        notify(self.listener.as_ref());
    }
}

fn on_inbound(state: &Weak<RefCell<AppState>>, listener: Option<&ChangeListener>, args: &[Value]) {
    let state = match state.upgrade() {
        Some(state) => state,
        None => return,
    };

    let message = args.first().map(|arg| match arg {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    });
    state.borrow_mut().last_message = message;
    notify(listener);
}

fn notify(listener: Option<&ChangeListener>) {
    if let Some(listener) = listener {
        listener();
    }
}
