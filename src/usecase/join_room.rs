//! UseCase: ルーム参加処理
//!
//! 未参加の接続が既存ルームに参加する。
//! - ルームが存在しない場合は `RoomNotFound`（自動作成は行わない）
//! - パスワード不一致の場合はメンバー追加も user_list ブロードキャストも
//!   行わず `InvalidPassword` を返す
//! - 成功時は参加者自身を含む全メンバーへ user_list を配信し、参加者には
//!   `room_joined` を送信する

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::common::time::get_jst_timestamp;
use crate::domain::{
    ConnectionId, ConnectionRegistry, Member, RoomName, RoomStore, Timestamp, UserName,
};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::ChatError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomStore>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomStore>) -> Self {
        Self { registry, rooms }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(RoomName)` - 参加成功
    /// * `Err(ChatError)` - 入力エラー、ルーム不在、パスワード不一致、状態エラー
    pub async fn execute(
        &self,
        conn_id: &ConnectionId,
        room: String,
        password: String,
        username: String,
        sender: UnboundedSender<String>,
    ) -> Result<RoomName, ChatError> {
        let username = UserName::new(username)?;
        let room = RoomName::new(room)?;

        let conn = self
            .registry
            .lookup(conn_id)
            .await
            .map_err(|_| ChatError::connection_closed())?;
        if conn.is_joined() {
            return Err(ChatError::must_leave_room());
        }

        // パスワード検証はルームのロック内（join の中）で行われる。
        // 不一致の場合はメンバー追加もブロードキャストも発生しない
        let member = Member::new(
            conn_id.clone(),
            username.clone(),
            Timestamp::new(get_jst_timestamp()),
        );
        self.rooms
            .join(&room, member, &password, sender.clone())
            .await?;

        // 接続が切断と競合して消えていた場合はメンバー追加を巻き戻す
        if let Err(e) = self.bind_identity(conn_id, username.clone(), room.clone()).await {
            let _ = self.rooms.leave(&room, conn_id).await;
            let _ = self.rooms.delete_room_if_empty(&room).await;
            return Err(e);
        }

        let joined = ServerEvent::RoomJoined {
            room: room.as_str().to_string(),
            username: username.as_str().to_string(),
        };
        if sender.send(joined.to_json()).is_err() {
            tracing::warn!("Failed to send room_joined to connection '{}'", conn_id);
        }

        tracing::info!("Connection '{}' joined room '{}' as '{}'", conn_id, room, username);
        Ok(room)
    }

    async fn bind_identity(
        &self,
        conn_id: &ConnectionId,
        username: UserName,
        room: RoomName,
    ) -> Result<(), ChatError> {
        self.registry.claim_name(conn_id, username).await?;
        self.registry.bind_room(conn_id, room).await?;
        Ok(())
    }
}
