//! テスト用のモック実装

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::Value;

use crate::client::{ClientFactory, NetworkClient, Transport};
use crate::error::{CommonError, Result};
use crate::protocol::{Frame, RemoteCall};
use crate::registry::{EventHandler, EventRegistry};

/// 送信フレームを記録するトランスポート
#[derive(Default)]
pub struct RecordingTransport {
    sent: RefCell<Vec<String>>,
    fail: Cell<bool>,
}

impl RecordingTransport {
    pub fn sent_frames(&self) -> Vec<Frame> {
        self.sent
            .borrow()
            .iter()
            .map(|text| Frame::from_json(text).unwrap())
            .collect()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl Transport for RecordingTransport {
    fn send_text(&self, text: &str) -> Result<()> {
        if self.fail.get() {
            return Err(CommonError::ConnectionError("send failed".to_string()));
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}

enum Reply {
    Ready(Result<Value>),
    Deferred(oneshot::Receiver<Result<Value>>),
}

/// 呼び出しを記録し、事前に用意した応答を返すクライアント
pub struct MockClient {
    peer_id: String,
    relay_peer_id: String,
    registry: RefCell<EventRegistry>,
    calls: RefCell<Vec<RemoteCall>>,
    replies: RefCell<VecDeque<Reply>>,
}

impl MockClient {
    pub fn new(peer_id: &str, relay_peer_id: &str) -> Self {
        Self {
            peer_id: peer_id.to_string(),
            relay_peer_id: relay_peer_id.to_string(),
            registry: RefCell::new(EventRegistry::new()),
            calls: RefCell::new(Vec::new()),
            replies: RefCell::new(VecDeque::new()),
        }
    }

    /// 次の呼び出しに即座に返す応答を積む
    pub fn reply_with(&self, reply: Result<Value>) {
        self.replies.borrow_mut().push_back(Reply::Ready(reply));
    }

    /// 次の呼び出しの応答を後から送れるようにする
    pub fn defer_reply(&self) -> oneshot::Sender<Result<Value>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Deferred(rx));
        tx
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.borrow().clone()
    }

    pub fn registered_handlers(&self) -> usize {
        self.registry.borrow().len()
    }

    /// 他ピアからの着信を模擬する
    pub fn emit(&self, service: &str, function: &str, args: &[Value]) -> bool {
        let handler = self.registry.borrow().handler(service, function);
        match handler {
            Some(handler) => {
                handler(args);
                true
            }
            None => false,
        }
    }
}

#[async_trait(?Send)]
impl NetworkClient for MockClient {
    fn self_peer_id(&self) -> String {
        self.peer_id.clone()
    }

    fn relay_peer_id(&self) -> String {
        self.relay_peer_id.clone()
    }

    fn on_event(&self, service: &str, function: &str, handler: EventHandler) {
        self.registry.borrow_mut().register(service, function, handler);
    }

    async fn call(&self, call: RemoteCall) -> Result<Value> {
        self.calls.borrow_mut().push(call);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(CommonError::Other("reply dropped".to_string()))),
            None => Err(CommonError::Other("no reply queued".to_string())),
        }
    }
}

/// 成功または失敗を返すファクトリ
pub struct MockFactory {
    client: Option<Rc<MockClient>>,
    addresses: RefCell<Vec<String>>,
}

impl MockFactory {
    pub fn succeeding(client: Rc<MockClient>) -> Self {
        Self {
            client: Some(client),
            addresses: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            client: None,
            addresses: RefCell::new(Vec::new()),
        }
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.borrow().clone()
    }
}

#[async_trait(?Send)]
impl ClientFactory for MockFactory {
    async fn create_client(&self, relay_address: &str) -> Result<Rc<dyn NetworkClient>> {
        self.addresses.borrow_mut().push(relay_address.to_string());
        match &self.client {
            Some(client) => Ok(client.clone() as Rc<dyn NetworkClient>),
            None => Err(CommonError::ConnectionError("relay refused connection".to_string())),
        }
    }
}
