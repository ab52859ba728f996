//! リレー定義
//!
//! 接続先として選択できるリレーノードの記述子と、
//! マルチアドレスからWebSocket URLへの変換を提供します。

use serde::{Deserialize, Serialize};

use crate::error::{CommonError, Result};

/// リレー記述子
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayDescriptor {
    /// 表示用のピアID
    pub peer_id: String,
    /// 接続先マルチアドレス
    pub multiaddr: String,
}

impl RelayDescriptor {
    /// 新しいリレー記述子を作成
    pub fn new(peer_id: impl Into<String>, multiaddr: impl Into<String>) -> Self {
        Self {
            peer_id: peer_id.into(),
            multiaddr: multiaddr.into(),
        }
    }

    /// マルチアドレスを解析
    pub fn endpoint(&self) -> Result<RelayEndpoint> {
        RelayEndpoint::parse(&self.multiaddr)
    }
}

/// 既定のリレー一覧（Krasnodar 環境の先頭3ノード）
pub fn default_relays() -> Vec<RelayDescriptor> {
    vec![
        RelayDescriptor::new(
            "12D3KooWSD5PToNiLQwKDXsu8JSysCwUt8BVUJEqCHcDe7P5h45e",
            "/dns4/kras-00.fluence.dev/tcp/19990/wss/p2p/12D3KooWSD5PToNiLQwKDXsu8JSysCwUt8BVUJEqCHcDe7P5h45e",
        ),
        RelayDescriptor::new(
            "12D3KooWR4cv1a8tv7pps4HH6wePNaK6gf1Hww5wcCMzeWxyNw51",
            "/dns4/kras-01.fluence.dev/tcp/19001/wss/p2p/12D3KooWR4cv1a8tv7pps4HH6wePNaK6gf1Hww5wcCMzeWxyNw51",
        ),
        RelayDescriptor::new(
            "12D3KooWKnEqMfYo9zvfHmqTLpLdiHXPe4SVqUWcWHDJdFGrSmcA",
            "/dns4/kras-02.fluence.dev/tcp/19001/wss/p2p/12D3KooWKnEqMfYo9zvfHmqTLpLdiHXPe4SVqUWcWHDJdFGrSmcA",
        ),
    ]
}

/// 解析済みのリレー接続先
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayEndpoint {
    /// ホスト名またはIPアドレス
    pub host: String,
    /// ポート番号
    pub port: u16,
    /// TLS使用フラグ
    pub use_tls: bool,
    /// マルチアドレスに含まれるピアID
    pub peer_id: Option<String>,
}

impl RelayEndpoint {
    /// `/dns4/<host>/tcp/<port>/wss/p2p/<id>` 形式のマルチアドレスを解析
    pub fn parse(multiaddr: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            CommonError::ConfigError(format!("無効なマルチアドレス '{}': {}", multiaddr, reason))
        };

        let mut parts = multiaddr.strip_prefix('/').ok_or_else(|| invalid("'/' で始まっていません"))?.split('/');

        let host = match (parts.next(), parts.next()) {
            (Some("dns4" | "dns6" | "dns" | "ip4"), Some(host)) if !host.is_empty() => host.to_string(),
            (Some("ip6"), Some(host)) if !host.is_empty() => format!("[{}]", host),
            _ => return Err(invalid("ホスト部がありません")),
        };

        let port = match (parts.next(), parts.next()) {
            (Some("tcp"), Some(port)) => port.parse::<u16>().map_err(|_| invalid("ポート番号が不正です"))?,
            _ => return Err(invalid("tcp ポートがありません")),
        };

        let use_tls = match parts.next() {
            Some("wss") => true,
            Some("ws") => false,
            _ => return Err(invalid("ws/wss ではありません")),
        };

        let peer_id = match (parts.next(), parts.next()) {
            (None, _) => None,
            (Some("p2p"), Some(id)) if !id.is_empty() => Some(id.to_string()),
            _ => return Err(invalid("p2p 部が不正です")),
        };

        if parts.next().is_some() {
            return Err(invalid("余分な要素があります"));
        }

        Ok(Self {
            host,
            port,
            use_tls,
            peer_id,
        })
    }

    /// WebSocket URLを構築
    pub fn websocket_url(&self) -> String {
        let scheme = if self.use_tls { "wss" } else { "ws" };
        format!("{}://{}:{}/", scheme, self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dns_wss() {
        let endpoint = RelayEndpoint::parse("/dns4/kras-00.fluence.dev/tcp/19990/wss/p2p/12D3KooWabc").unwrap();
        assert_eq!(endpoint.host, "kras-00.fluence.dev");
        assert_eq!(endpoint.port, 19990);
        assert!(endpoint.use_tls);
        assert_eq!(endpoint.peer_id.as_deref(), Some("12D3KooWabc"));
        assert_eq!(endpoint.websocket_url(), "wss://kras-00.fluence.dev:19990/");
    }

    #[test]
    fn test_parse_local_ws_without_peer() {
        let endpoint = RelayEndpoint::parse("/ip4/127.0.0.1/tcp/9990/ws").unwrap();
        assert_eq!(endpoint.websocket_url(), "ws://127.0.0.1:9990/");
        assert_eq!(endpoint.peer_id, None);

        let endpoint = RelayEndpoint::parse("/ip6/::1/tcp/9990/ws").unwrap();
        assert_eq!(endpoint.websocket_url(), "ws://[::1]:9990/");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for addr in [
            "",
            "dns4/host/tcp/1/ws",
            "/dns4//tcp/1/ws",
            "/dns4/host/udp/1/ws",
            "/dns4/host/tcp/99999/ws",
            "/dns4/host/tcp/1/quic",
            "/dns4/host/tcp/1/ws/p2p",
            "/dns4/host/tcp/1/ws/p2p/id/extra",
        ] {
            assert!(
                matches!(RelayEndpoint::parse(addr), Err(CommonError::ConfigError(_))),
                "{} は拒否されるべき",
                addr
            );
        }
    }

    #[test]
    fn test_default_relays_are_consistent() {
        let relays = default_relays();
        assert_eq!(relays.len(), 3);
        for relay in &relays {
            let endpoint = relay.endpoint().unwrap();
            assert_eq!(endpoint.peer_id.as_deref(), Some(relay.peer_id.as_str()));
        }
    }
}
