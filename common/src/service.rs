//! 文字数カウントサービス
//!
//! ネットワーク上の文字数カウントサービスを呼び出す関数と、
//! 着信イベント名の定数を提供します。

use serde_json::Value;

use crate::client::NetworkClient;
use crate::error::{CommonError, Result};
use crate::protocol::RemoteCall;

/// 計算を行うリモートサービス名
pub const CHAR_COUNT_SERVICE: &str = "CharCount";

/// 計算を行うリモート関数名
pub const CHAR_COUNT_FUNCTION: &str = "char_count";

/// 着信通知を受けるサービス名
pub const CHAR_COUNT_PEER_SERVICE: &str = "CharCountPeer";

/// 着信通知を受ける関数名
pub const CHAR_COUNT_PEER_FUNCTION: &str = "char_count";

/// メッセージの文字数を対象ピア経由で数える
///
/// 対象ピアには `CharCountPeer.char_count` として結果が届き、
/// 呼び出し元には対象ピアの応答文字列が返されます。
pub async fn count_chars(
    client: &dyn NetworkClient,
    message: &str,
    target_peer_id: &str,
    target_relay_peer_id: &str,
) -> Result<String> {
    let call = RemoteCall {
        service: CHAR_COUNT_SERVICE.to_string(),
        function: CHAR_COUNT_FUNCTION.to_string(),
        args: vec![Value::from(message)],
        target_peer_id: target_peer_id.to_string(),
        target_relay_peer_id: target_relay_peer_id.to_string(),
    };

    match client.call(call).await? {
        Value::String(reply) => Ok(reply),
        other => Err(CommonError::ProtocolError(format!(
            "{} の戻り値が文字列ではありません: {}",
            CHAR_COUNT_FUNCTION, other
        ))),
    }
}
