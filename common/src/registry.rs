//! 着信ハンドラ登録
//!
//! 他ピアからの着信呼び出しを (サービス名, 関数名) の完全一致で
//! 登録済みハンドラに振り分けます。

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

/// 着信ハンドラ
///
/// 引数リストを順序どおりに受け取ります。
pub type EventHandler = Rc<dyn Fn(&[Value])>;

/// 着信ハンドラのレジストリ
#[derive(Default)]
pub struct EventRegistry {
    handlers: HashMap<(String, String), EventHandler>,
}

impl EventRegistry {
    /// 空のレジストリを作成
    pub fn new() -> Self {
        Self::default()
    }

    /// ハンドラを登録
    ///
    /// 同じ (サービス, 関数) への再登録は前のハンドラを置き換えます。
    pub fn register(&mut self, service: &str, function: &str, handler: EventHandler) {
        let key = (service.to_string(), function.to_string());
        if self.handlers.insert(key, handler).is_some() {
            log::debug!("着信ハンドラを置き換えました: {}.{}", service, function);
        }
    }

    /// 登録済みハンドラを取得
    pub fn handler(&self, service: &str, function: &str) -> Option<EventHandler> {
        self.handlers
            .get(&(service.to_string(), function.to_string()))
            .cloned()
    }

    /// 登録済みハンドラ数
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// 空かどうか
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
