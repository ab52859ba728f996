//! 設定管理
//!
//! リレー一覧や着信イベント名などのアプリケーション設定を
//! TOML / JSON テキストから読み込みます。

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CommonError;
use crate::relay::{default_relays, RelayDescriptor};
use crate::service::{CHAR_COUNT_PEER_FUNCTION, CHAR_COUNT_PEER_SERVICE};

/// 設定エラー
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON エラー
    #[error("JSONの解析に失敗しました: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML デシリアライズエラー
    #[error("TOMLの解析に失敗しました: {0}")]
    TomlDeError(#[from] toml::de::Error),

    /// 値が不正
    #[error("設定値が不正です: {0}")]
    Invalid(String),
}

impl From<ConfigError> for CommonError {
    fn from(err: ConfigError) -> Self {
        CommonError::ConfigError(err.to_string())
    }
}

/// 設定形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// TOML 形式
    #[default]
    Toml,
    /// JSON 形式
    Json,
}

impl ConfigFormat {
    /// ファイル拡張子から設定形式を判定
    pub fn from_extension(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 選択可能なリレー
    pub relays: Vec<RelayDescriptor>,
    /// 着信を受けるサービス名
    pub event_service: String,
    /// 着信を受ける関数名
    pub event_function: String,
    /// ログレベル
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            relays: default_relays(),
            event_service: CHAR_COUNT_PEER_SERVICE.to_string(),
            event_function: CHAR_COUNT_PEER_FUNCTION.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// テキストから設定を読み込んで検証
    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: AppConfig = match format {
            ConfigFormat::Toml => toml::from_str(text)?,
            ConfigFormat::Json => serde_json::from_str(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// 設定を検証
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.relays.is_empty() {
            return Err(ConfigError::Invalid("リレーが1つも設定されていません".to_string()));
        }
        for relay in &self.relays {
            relay
                .endpoint()
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        }
        if self.event_service.is_empty() || self.event_function.is_empty() {
            return Err(ConfigError::Invalid("着信イベント名が空です".to_string()));
        }
        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(ConfigError::Invalid(format!("不明なログレベル: {}", self.log_level)));
        }
        Ok(())
    }

    /// ログレベルを取得
    pub fn log_level(&self) -> log::Level {
        self.log_level
            .parse::<log::LevelFilter>()
            .ok()
            .and_then(|filter| filter.to_level())
            .unwrap_or(log::Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.event_service, "CharCountPeer");
        assert_eq!(config.event_function, "char_count");
        assert_eq!(config.log_level(), log::Level::Info);
    }

    #[test]
    fn test_load_toml() {
        let text = r#"
            log_level = "debug"

            [[relays]]
            peer_id = "12D3Local"
            multiaddr = "/ip4/127.0.0.1/tcp/9990/ws/p2p/12D3Local"
        "#;

        let config = AppConfig::parse(text, ConfigFormat::Toml).unwrap();

        assert_eq!(config.relays.len(), 1);
        assert_eq!(config.relays[0].peer_id, "12D3Local");
        assert_eq!(config.event_service, "CharCountPeer");
        assert_eq!(config.log_level(), log::Level::Debug);
    }

    #[test]
    fn test_load_json() {
        let text = r#"{"relays":[{"peer_id":"a","multiaddr":"/dns4/a.example/tcp/443/wss"}],"event_function":"notify"}"#;

        let config = AppConfig::parse(text, ConfigFormat::Json).unwrap();

        assert_eq!(config.event_function, "notify");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let cases = [
            "relays = []",
            "[[relays]]\npeer_id = \"x\"\nmultiaddr = \"not-a-multiaddr\"",
            "event_service = \"\"",
            "log_level = \"loud\"",
        ];
        for text in cases {
            assert!(
                matches!(AppConfig::parse(text, ConfigFormat::Toml), Err(ConfigError::Invalid(_))),
                "拒否されるべき: {}",
                text
            );
        }
        assert!(matches!(
            AppConfig::parse("relays = 3", ConfigFormat::Toml),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_extension(&PathBuf::from("relays.TOML")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension(&PathBuf::from("relays.json")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension(&PathBuf::from("relays.yaml")), None);
    }

    #[test]
    fn test_config_error_converts_to_common_error() {
        let err: CommonError = ConfigError::Invalid("x".to_string()).into();
        assert!(matches!(err, CommonError::ConfigError(_)));
    }
}
