//! UseCase: メッセージ送信処理
//!
//! 送信者の現在ルームを Registry で解決し、ルームの全メンバー
//! （送信者自身を含む）へ受理順に配信する。
//! - 本文がトリム後に空なら `InvalidInput`（送信者にのみ報告）
//! - 未参加なら `InvalidState`（"must join a room ..."）
//! - ワイヤの room フィールドが現在ルームと一致しない場合は `InvalidInput`

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, ConnectionRegistry, MessageText, RoomStore};

use super::error::ChatError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomStore>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomStore>) -> Self {
        Self { registry, rooms }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `conn_id` - 送信する接続の ID
    /// * `room` - ワイヤ上のルーム名（現在ルームと一致する必要がある）
    /// * `text` - 本文
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 配信されたメッセージ（連番・タイムスタンプ付き）
    /// * `Err(ChatError)` - 入力エラーまたは状態エラー
    pub async fn execute(
        &self,
        conn_id: &ConnectionId,
        room: String,
        text: String,
    ) -> Result<ChatMessage, ChatError> {
        let text = MessageText::new(text)?;

        let conn = self
            .registry
            .lookup(conn_id)
            .await
            .map_err(|_| ChatError::connection_closed())?;
        let (Some(current), Some(username)) = (conn.room, conn.username) else {
            return Err(ChatError::must_join_room());
        };

        if current.as_str() != room {
            return Err(ChatError::InvalidInput(
                "message room does not match joined room".to_string(),
            ));
        }

        let message = self.rooms.publish_chat(&current, &username, text).await?;
        tracing::debug!(
            "Routed message seq {} from '{}' to room '{}'",
            message.seq,
            username,
            current
        );
        Ok(message)
    }
}
