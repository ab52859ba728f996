//! 通信プロトコル定義
//!
//! リレーゲートウェイとの間でWebSocket上を流れるJSONフレームを定義します。
//! ピア探索やルーティングはリレー側の責務で、ここでは封筒の形だけを扱います。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// プロトコルバージョン
pub const PROTOCOL_VERSION: &str = "1";

/// ワイヤーフレーム
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// セッション開始要求（クライアント → リレー）
    Hello {
        /// クライアントのプロトコルバージョン
        client_version: String,
    },

    /// セッション確立通知（リレー → クライアント）
    Welcome {
        /// 割り当てられた自ピアID
        peer_id: String,
        /// 接続中のリレーのピアID
        relay_peer_id: String,
    },

    /// リモート呼び出し（クライアント → リレー）
    Call {
        /// リクエストID
        request_id: u64,
        /// サービス名
        service: String,
        /// 関数名
        function: String,
        /// 引数
        args: Vec<Value>,
        /// 対象ピアID
        target_peer_id: String,
        /// 対象ピアが接続しているリレーのピアID
        target_relay_peer_id: String,
    },

    /// 呼び出し結果（リレー → クライアント）
    CallResult {
        /// リクエストID
        request_id: u64,
        /// 戻り値
        result: Value,
    },

    /// 呼び出し失敗（リレー → クライアント）
    CallError {
        /// リクエストID
        request_id: u64,
        /// エラーコード
        code: i32,
        /// エラーメッセージ
        message: String,
    },

    /// 他ピアからの着信呼び出し（リレー → クライアント）
    Event {
        /// サービス名
        service: String,
        /// 関数名
        function: String,
        /// 引数
        args: Vec<Value>,
    },
}

impl Frame {
    /// JSON文字列に変換
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// JSON文字列から解析
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// フレーム種別名（ログ用）
    pub fn kind(&self) -> &'static str {
        match self {
            Frame::Hello { .. } => "hello",
            Frame::Welcome { .. } => "welcome",
            Frame::Call { .. } => "call",
            Frame::CallResult { .. } => "call_result",
            Frame::CallError { .. } => "call_error",
            Frame::Event { .. } => "event",
        }
    }
}

/// リモート呼び出し要求
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    /// サービス名
    pub service: String,
    /// 関数名
    pub function: String,
    /// 引数
    pub args: Vec<Value>,
    /// 対象ピアID
    pub target_peer_id: String,
    /// 対象リレーのピアID
    pub target_relay_peer_id: String,
}

impl RemoteCall {
    /// リクエストIDを付与してフレームに変換
    pub fn into_frame(self, request_id: u64) -> Frame {
        Frame::Call {
            request_id,
            service: self.service,
            function: self.function,
            args: self.args,
            target_peer_id: self.target_peer_id,
            target_relay_peer_id: self.target_relay_peer_id,
        }
    }
}
