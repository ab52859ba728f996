//! ネットワークユーティリティ
//!
//! ブラウザのWebSocketをリレークライアントのトランスポートとして使い、
//! リレーに接続したクライアントハンドルを作成します。

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use charcount_common::{
    ClientFactory, CommonError, NetworkClient, RelayClient, RelayEndpoint, Result, Transport,
};
use futures::channel::oneshot;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CloseEvent, MessageEvent, WebSocket};

use super::logging::describe_js_error;

type SocketCallback = Closure<dyn FnMut(JsValue)>;

/// WebSocketトランスポート
pub struct WebSocketTransport {
    socket: WebSocket,
    callbacks: RefCell<Vec<SocketCallback>>,
}

impl WebSocketTransport {
    fn new(socket: WebSocket) -> Self {
        Self {
            socket,
            callbacks: RefCell::new(Vec::new()),
        }
    }

    /// コールバックをソケットと同じ寿命で保持する
    fn keep(&self, callback: SocketCallback) {
        self.callbacks.borrow_mut().push(callback);
    }
}

impl Transport for WebSocketTransport {
    fn send_text(&self, text: &str) -> Result<()> {
        if self.socket.ready_state() != WebSocket::OPEN {
            return Err(CommonError::NotConnected);
        }
        self.socket
            .send_with_str(text)
            .map_err(|e| CommonError::ConnectionError(format!("送信エラー: {}", describe_js_error(&e))))
    }
}

impl Drop for WebSocketTransport {
    fn drop(&mut self) {
        // 解放済みのクロージャがJSから呼ばれないように先に外す
        self.socket.set_onopen(None);
        self.socket.set_onmessage(None);
        self.socket.set_onerror(None);
        self.socket.set_onclose(None);
        let _ = self.socket.close();
    }
}

type WebSocketClient = RelayClient<WebSocketTransport>;

/// WebSocketでリレーに接続するファクトリ
#[derive(Debug, Clone, Copy, Default)]
pub struct WebSocketClientFactory;

#[async_trait(?Send)]
impl ClientFactory for WebSocketClientFactory {
    async fn create_client(&self, relay_address: &str) -> Result<Rc<dyn NetworkClient>> {
        let endpoint = RelayEndpoint::parse(relay_address)?;
        let ws_url = endpoint.websocket_url();

        log::info!("WebSocketでの接続を試みています: {}", ws_url);

        let socket = WebSocket::new(&ws_url).map_err(|e| {
            CommonError::ConnectionError(format!("WebSocketの作成に失敗しました: {}", describe_js_error(&e)))
        })?;

        let client = Rc::new(RelayClient::new(WebSocketTransport::new(socket.clone())));
        let opened = install_callbacks(&socket, &client);

        opened
            .await
            .map_err(|_| CommonError::ConnectionError("WebSocket接続が確立される前に破棄されました".to_string()))??;

        log::info!("WebSocket接続が確立されました");

        let identity = client.handshake().await?;
        if let Some(expected) = &endpoint.peer_id {
            if expected != &identity.relay_peer_id {
                log::warn!(
                    "リレーのピアIDがアドレスと一致しません: expected={} actual={}",
                    expected,
                    identity.relay_peer_id
                );
            }
        }

        Ok(client as Rc<dyn NetworkClient>)
    }
}

/// ソケットのイベントハンドラーを設定し、接続完了を待つ受信側を返す
fn install_callbacks(socket: &WebSocket, client: &Rc<WebSocketClient>) -> oneshot::Receiver<Result<()>> {
    let (open_tx, open_rx) = oneshot::channel();
    let open_tx = Rc::new(RefCell::new(Some(open_tx)));

    // クライアント自身がコールバックを保持するので弱参照で循環を避ける
    let weak: Weak<WebSocketClient> = Rc::downgrade(client);

    let onopen_callback = {
        let open_tx = open_tx.clone();
        Closure::wrap(Box::new(move |_: JsValue| {
            if let Some(tx) = open_tx.borrow_mut().take() {
                let _ = tx.send(Ok(()));
            }
        }) as Box<dyn FnMut(JsValue)>)
    };

    let onmessage_callback = {
        let weak = weak.clone();
        Closure::wrap(Box::new(move |e: JsValue| {
            let client = match weak.upgrade() {
                Some(client) => client,
                None => return,
            };
            match e.dyn_into::<MessageEvent>().ok().and_then(|event| event.data().as_string()) {
                Some(text) => client.handle_text(&text),
                None => log::warn!("テキスト以外のフレームを受信したため破棄しました"),
            }
        }) as Box<dyn FnMut(JsValue)>)
    };

    let onerror_callback = Closure::wrap(Box::new(move |e: JsValue| {
        log::error!("WebSocket接続エラー: {}", describe_js_error(&e));
    }) as Box<dyn FnMut(JsValue)>);

    let onclose_callback = {
        let open_tx = open_tx.clone();
        Closure::wrap(Box::new(move |e: JsValue| {
            let reason = match e.dyn_into::<CloseEvent>() {
                Ok(event) if !event.reason().is_empty() => {
                    format!("WebSocket接続が閉じられました ({}: {})", event.code(), event.reason())
                }
                Ok(event) => format!("WebSocket接続が閉じられました ({})", event.code()),
                Err(_) => "WebSocket接続が閉じられました".to_string(),
            };
            log::info!("{}", reason);

            if let Some(tx) = open_tx.borrow_mut().take() {
                let _ = tx.send(Err(CommonError::ConnectionError(reason.clone())));
            }
            if let Some(client) = weak.upgrade() {
                client.handle_close(&reason);
            }
        }) as Box<dyn FnMut(JsValue)>)
    };

    // コールバックを設定
    socket.set_onopen(Some(onopen_callback.as_ref().unchecked_ref()));
    socket.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));
    socket.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));
    socket.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));

    let transport = client.transport();
    transport.keep(onopen_callback);
    transport.keep(onmessage_callback);
    transport.keep(onerror_callback);
    transport.keep(onclose_callback);

    open_rx
}
