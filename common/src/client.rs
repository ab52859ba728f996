//! ネットワーククライアント
//!
//! リレーに接続したセッションを表すクライアントハンドルのトレイトと、
//! 任意のトランスポート上で動作するリレークライアントを提供します。

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;

use crate::error::{CommonError, ErrorCode, Result};
use crate::protocol::{Frame, RemoteCall, PROTOCOL_VERSION};
use crate::registry::{EventHandler, EventRegistry};

/// クライアントハンドル
///
/// すべてのネットワーククライアントが実装する必要があるトレイト
#[async_trait(?Send)]
pub trait NetworkClient {
    /// 自ピアID
    fn self_peer_id(&self) -> String;

    /// 接続中のリレーのピアID
    fn relay_peer_id(&self) -> String;

    /// 着信ハンドラを登録
    fn on_event(&self, service: &str, function: &str, handler: EventHandler);

    /// リモート呼び出しを実行し戻り値を待つ
    async fn call(&self, call: RemoteCall) -> Result<Value>;
}

/// クライアントファクトリ
#[async_trait(?Send)]
pub trait ClientFactory {
    /// 指定したリレーアドレスに接続してハンドルを作成
    async fn create_client(&self, relay_address: &str) -> Result<Rc<dyn NetworkClient>>;
}

/// フレーム送信路
pub trait Transport {
    /// テキストフレームを送信
    fn send_text(&self, text: &str) -> Result<()>;
}

/// セッション識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionIdentity {
    /// 自ピアID
    pub peer_id: String,
    /// リレーのピアID
    pub relay_peer_id: String,
}

type PendingCall = oneshot::Sender<Result<Value>>;

/// リレークライアント
///
/// 受信フレームはトランスポート側から [`RelayClient::handle_text`] で渡されます。
pub struct RelayClient<T: Transport> {
    transport: T,
    registry: RefCell<EventRegistry>,
    pending: RefCell<HashMap<u64, PendingCall>>,
    next_request_id: Cell<u64>,
    identity: RefCell<Option<SessionIdentity>>,
    welcome: RefCell<Option<oneshot::Sender<Result<SessionIdentity>>>>,
    closed: Cell<bool>,
}

impl<T: Transport> RelayClient<T> {
    /// 新しいリレークライアントを作成
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            registry: RefCell::new(EventRegistry::new()),
            pending: RefCell::new(HashMap::new()),
            next_request_id: Cell::new(1),
            identity: RefCell::new(None),
            welcome: RefCell::new(None),
            closed: Cell::new(false),
        }
    }

    /// トランスポートへの参照
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `hello` を送り `welcome` を待つ
    pub async fn handshake(&self) -> Result<SessionIdentity> {
        let (tx, rx) = oneshot::channel();
        *self.welcome.borrow_mut() = Some(tx);

        self.send_frame(&Frame::Hello {
            client_version: PROTOCOL_VERSION.to_string(),
        })?;

        rx.await
            .map_err(|_| CommonError::ConnectionError("ハンドシェイク中に接続が失われました".to_string()))?
    }

    /// セッション識別情報（ハンドシェイク後のみ）
    pub fn identity(&self) -> Option<SessionIdentity> {
        self.identity.borrow().clone()
    }

    /// 応答待ちの呼び出し数
    pub fn pending_calls(&self) -> usize {
        self.pending.borrow().len()
    }

    /// 受信テキストを処理
    pub fn handle_text(&self, text: &str) {
        match Frame::from_json(text) {
            Ok(frame) => self.handle_frame(frame),
            Err(e) => log::warn!("受信フレームを解析できません: {}", e),
        }
    }

    /// 受信フレームを処理
    pub fn handle_frame(&self, frame: Frame) {
        match frame {
            Frame::Welcome { peer_id, relay_peer_id } => {
                let identity = SessionIdentity { peer_id, relay_peer_id };
                log::info!(
                    "セッションが確立されました: peer={} relay={}",
                    identity.peer_id,
                    identity.relay_peer_id
                );
                *self.identity.borrow_mut() = Some(identity.clone());
                if let Some(tx) = self.welcome.borrow_mut().take() {
                    let _ = tx.send(Ok(identity));
                }
            }
            Frame::CallResult { request_id, result } => {
                self.resolve(request_id, Ok(result));
            }
            Frame::CallError { request_id, code, message } => {
                let error = CommonError::RemoteCallError {
                    code: ErrorCode::from_i32(code),
                    message,
                };
                self.resolve(request_id, Err(error));
            }
            Frame::Event { service, function, args } => {
                // ハンドラ実行中の再登録に備えて借用を先に解放する
                let handler = self.registry.borrow().handler(&service, &function);
                match handler {
                    Some(handler) => {
                        log::debug!("着信呼び出し: {}.{} ({}個の引数)", service, function, args.len());
                        handler(&args);
                    }
                    None => log::warn!("未登録の着信呼び出しを破棄しました: {}.{}", service, function),
                }
            }
            other @ (Frame::Hello { .. } | Frame::Call { .. }) => {
                log::warn!("クライアント宛てではないフレームを受信しました: {}", other.kind());
            }
        }
    }

    /// トランスポートの切断を処理
    ///
    /// 応答待ちのすべての呼び出しとハンドシェイクを失敗させます。
    pub fn handle_close(&self, reason: &str) {
        self.closed.set(true);

        let pending: Vec<PendingCall> = self.pending.borrow_mut().drain().map(|(_, tx)| tx).collect();
        if !pending.is_empty() {
            log::warn!("切断により{}件の呼び出しを中断しました: {}", pending.len(), reason);
        }
        for tx in pending {
            let _ = tx.send(Err(CommonError::ConnectionError(reason.to_string())));
        }

        if let Some(tx) = self.welcome.borrow_mut().take() {
            let _ = tx.send(Err(CommonError::ConnectionError(reason.to_string())));
        }
    }

    fn resolve(&self, request_id: u64, result: Result<Value>) {
        let pending = self.pending.borrow_mut().remove(&request_id);
        match pending {
            Some(tx) => {
                let _ = tx.send(result);
            }
            None => log::warn!("不明なリクエストIDへの応答を破棄しました: {}", request_id),
        }
    }

    fn send_frame(&self, frame: &Frame) -> Result<()> {
        if self.closed.get() {
            return Err(CommonError::NotConnected);
        }
        self.transport.send_text(&frame.to_json()?)
    }
}

#[async_trait(?Send)]
impl<T: Transport> NetworkClient for RelayClient<T> {
    fn self_peer_id(&self) -> String {
        self.identity
            .borrow()
            .as_ref()
            .map(|identity| identity.peer_id.clone())
            .unwrap_or_default()
    }

    fn relay_peer_id(&self) -> String {
        self.identity
            .borrow()
            .as_ref()
            .map(|identity| identity.relay_peer_id.clone())
            .unwrap_or_default()
    }

    fn on_event(&self, service: &str, function: &str, handler: EventHandler) {
        self.registry.borrow_mut().register(service, function, handler);
    }

    async fn call(&self, call: RemoteCall) -> Result<Value> {
        let request_id = self.next_request_id.get();
        self.next_request_id.set(request_id + 1);

        log::debug!(
            "リモート呼び出し #{}: {}.{} → {} via {}",
            request_id,
            call.service,
            call.function,
            call.target_peer_id,
            call.target_relay_peer_id
        );

        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().insert(request_id, tx);

        if let Err(e) = self.send_frame(&call.into_frame(request_id)) {
            self.pending.borrow_mut().remove(&request_id);
            return Err(e);
        }

        rx.await
            .map_err(|_| CommonError::ConnectionError("応答を受け取る前に接続が失われました".to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingTransport;
    use futures::FutureExt;
    use serde_json::json;

    fn client() -> RelayClient<RecordingTransport> {
        RelayClient::new(RecordingTransport::default())
    }

    fn sample_call() -> RemoteCall {
        RemoteCall {
            service: "CharCount".to_string(),
            function: "char_count".to_string(),
            args: vec![json!("abc")],
            target_peer_id: "P1".to_string(),
            target_relay_peer_id: "R1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_handshake_sets_identity() {
        let client = client();
        let handshake = client.handshake();
        futures::pin_mut!(handshake);

        assert!(handshake.as_mut().now_or_never().is_none());
        assert_eq!(client.transport().sent_frames(), vec![Frame::Hello { client_version: "1".to_string() }]);

        client.handle_text(r#"{"type":"welcome","peer_id":"12D3Self","relay_peer_id":"12D3Relay"}"#);
        let identity = handshake.await.unwrap();

        assert_eq!(identity.peer_id, "12D3Self");
        assert_eq!(client.self_peer_id(), "12D3Self");
        assert_eq!(client.relay_peer_id(), "12D3Relay");
    }

    #[tokio::test]
    async fn test_handshake_fails_on_close() {
        let client = client();
        let handshake = client.handshake();
        futures::pin_mut!(handshake);
        assert!(handshake.as_mut().now_or_never().is_none());

        client.handle_close("socket closed");
        assert!(matches!(handshake.await, Err(CommonError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_call_resolves_by_request_id() {
        let client = client();
        let first = client.call(sample_call());
        let second = client.call(sample_call());
        futures::pin_mut!(first, second);

        assert!(first.as_mut().now_or_never().is_none());
        assert!(second.as_mut().now_or_never().is_none());
        assert_eq!(client.pending_calls(), 2);

        // 逆順に応答する
        client.handle_frame(Frame::CallResult { request_id: 2, result: json!("second") });
        client.handle_frame(Frame::CallResult { request_id: 1, result: json!("first") });

        assert_eq!(first.await.unwrap(), json!("first"));
        assert_eq!(second.await.unwrap(), json!("second"));
        assert_eq!(client.pending_calls(), 0);
    }

    #[tokio::test]
    async fn test_call_error_maps_code() {
        let client = client();
        let call = client.call(sample_call());
        futures::pin_mut!(call);
        assert!(call.as_mut().now_or_never().is_none());

        client.handle_text(r#"{"type":"call_error","request_id":1,"code":2,"message":"peer offline"}"#);

        assert_eq!(
            call.await,
            Err(CommonError::RemoteCallError {
                code: ErrorCode::PeerUnreachable,
                message: "peer offline".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_close_fails_pending_calls_and_blocks_new_ones() {
        let client = client();
        let call = client.call(sample_call());
        futures::pin_mut!(call);
        assert!(call.as_mut().now_or_never().is_none());

        client.handle_close("relay went away");
        assert!(matches!(call.await, Err(CommonError::ConnectionError(_))));
        assert_eq!(client.call(sample_call()).await, Err(CommonError::NotConnected));
    }

    #[tokio::test]
    async fn test_send_failure_does_not_leak_pending_entry() {
        let client = client();
        client.transport().fail_sends(true);

        assert!(client.call(sample_call()).await.is_err());
        assert_eq!(client.pending_calls(), 0);
    }

    #[test]
    fn test_inbound_event_dispatch() {
        let client = client();
        let received = Rc::new(RefCell::new(None));
        {
            let received = received.clone();
            client.on_event(
                "CharCountPeer",
                "char_count",
                Rc::new(move |args: &[Value]| *received.borrow_mut() = Some(args.to_vec())),
            );
        }

        client.handle_text(r#"{"type":"event","service":"Other","function":"char_count","args":["x"]}"#);
        assert!(received.borrow().is_none());

        client.handle_text(r#"{"type":"event","service":"CharCountPeer","function":"char_count","args":["hello", 5]}"#);
        assert_eq!(*received.borrow(), Some(vec![json!("hello"), json!(5)]));
    }

    #[test]
    fn test_garbage_and_unknown_responses_are_ignored() {
        let client = client();
        client.handle_text("{{{");
        client.handle_frame(Frame::CallResult { request_id: 99, result: json!(null) });
        client.handle_frame(Frame::Hello { client_version: "1".to_string() });
        assert_eq!(client.pending_calls(), 0);
    }
}
