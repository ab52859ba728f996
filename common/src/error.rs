//! エラー型定義
//!
//! クライアント全体で使用する共通エラー型を定義します。

use thiserror::Error;

/// 共通エラー
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommonError {
    /// 接続エラー
    #[error("接続エラー: {0}")]
    ConnectionError(String),

    /// プロトコルエラー
    #[error("プロトコルエラー: {0}")]
    ProtocolError(String),

    /// リモート呼び出しエラー
    #[error("リモート呼び出しエラー [{}]: {}", .code.as_str(), .message)]
    RemoteCallError {
        /// エラーコード
        code: ErrorCode,
        /// リレーから返されたメッセージ
        message: String,
    },

    /// シリアライズエラー
    #[error("シリアライズエラー: {0}")]
    SerializeError(String),

    /// 設定エラー
    #[error("設定エラー: {0}")]
    ConfigError(String),

    /// 未接続
    #[error("クライアントが接続されていません")]
    NotConnected,

    /// その他のエラー
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        CommonError::SerializeError(err.to_string())
    }
}

/// エラーコード
///
/// `call_error` フレームで送られてくる数値コードに対応します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// 一般的なエラー
    GeneralError = 1,
    /// 対象ピアに到達できない
    PeerUnreachable = 2,
    /// サービスが見つからない
    ServiceNotFound = 3,
    /// 関数が見つからない
    FunctionNotFound = 4,
    /// 引数が不正
    InvalidArguments = 5,
    /// サービス実行中のエラー
    ExecutionFailed = 6,
    /// その他のエラー
    Other = 99,
}

impl ErrorCode {
    /// エラーコードから文字列表現を取得
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::GeneralError => "GeneralError",
            ErrorCode::PeerUnreachable => "PeerUnreachable",
            ErrorCode::ServiceNotFound => "ServiceNotFound",
            ErrorCode::FunctionNotFound => "FunctionNotFound",
            ErrorCode::InvalidArguments => "InvalidArguments",
            ErrorCode::ExecutionFailed => "ExecutionFailed",
            ErrorCode::Other => "Other",
        }
    }

    /// 数値からエラーコードを取得
    pub fn from_i32(code: i32) -> Self {
        match code {
            1 => ErrorCode::GeneralError,
            2 => ErrorCode::PeerUnreachable,
            3 => ErrorCode::ServiceNotFound,
            4 => ErrorCode::FunctionNotFound,
            5 => ErrorCode::InvalidArguments,
            6 => ErrorCode::ExecutionFailed,
            _ => ErrorCode::Other,
        }
    }

    /// 数値表現を取得
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }
}

/// 結果型のエイリアス
pub type Result<T> = std::result::Result<T, CommonError>;
