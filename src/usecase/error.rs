//! UseCase 層のエラー定義
//!
//! クライアントに `error` イベントとして返すユーザー向けエラー。
//! `Display` 実装の文字列がそのままワイヤ契約になります（UI は
//! "must join a room" の部分一致でリダイレクトを判定します）。

use thiserror::Error;

use crate::domain::{RegistryError, RoomStoreError, ValueObjectError};

/// 回復可能なプロトコルエラー。すべて送信元の接続にのみ報告され、
/// 接続やサービス自体は継続します。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// 空のユーザー名・ルーム名・本文などの入力エラー
    #[error("{0}")]
    InvalidInput(String),

    /// 同名ルームが既に存在する（join へのフォールバックは行わない）
    #[error("room already exists")]
    RoomAlreadyExists,

    /// ルームが存在しない（自動作成は行わない）
    #[error("room does not exist")]
    RoomNotFound,

    /// パスワード不一致
    #[error("invalid password")]
    InvalidPassword,

    /// 状態機械上の不正な操作
    #[error("{0}")]
    InvalidState(String),
}

impl ChatError {
    /// 参加中の接続が create/join を試みた場合
    pub fn must_leave_room() -> Self {
        Self::InvalidState("must leave current room first".to_string())
    }

    /// 未参加の接続がメッセージを送信した場合
    pub fn must_join_room() -> Self {
        Self::InvalidState("must join a room before sending messages".to_string())
    }

    /// 操作の途中で接続が切断された場合
    pub fn connection_closed() -> Self {
        Self::InvalidState("connection closed".to_string())
    }
}

impl From<ValueObjectError> for ChatError {
    fn from(err: ValueObjectError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<RoomStoreError> for ChatError {
    fn from(err: RoomStoreError) -> Self {
        match err {
            RoomStoreError::RoomAlreadyExists(_) => Self::RoomAlreadyExists,
            RoomStoreError::RoomNotFound(_) => Self::RoomNotFound,
            RoomStoreError::InvalidPassword(_) => Self::InvalidPassword,
            RoomStoreError::MemberNotFound { .. } => {
                Self::InvalidState("not a member of the room".to_string())
            }
        }
    }
}

impl From<RegistryError> for ChatError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::ConnectionNotFound(_) => Self::connection_closed(),
            RegistryError::NameAlreadyClaimed(_) => {
                Self::InvalidState("display name already claimed".to_string())
            }
            RegistryError::AlreadyInRoom(_) => Self::must_leave_room(),
        }
    }
}
