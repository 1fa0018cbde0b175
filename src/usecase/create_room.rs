//! UseCase: ルーム作成処理
//!
//! 未参加の接続がルームを新規作成し、唯一のメンバーとして参加する。
//! - 同名ルームが存在する場合は `RoomAlreadyExists`（join への
//!   フォールバックは行わず、UI 側の明示的なリダイレクトに任せる）
//! - 作成＋初回参加はアトミックに行われ、user_list（メンバー 1 名）の
//!   ブロードキャストと `room_joined` の送信まで完了する

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::common::time::get_jst_timestamp;
use crate::domain::{
    ConnectionId, ConnectionRegistry, Member, PasswordHash, RoomName, RoomStore, Timestamp,
    UserName,
};
use crate::infrastructure::dto::websocket::ServerEvent;

use super::error::ChatError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomStore>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomStore>) -> Self {
        Self { registry, rooms }
    }

    /// ルーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `conn_id` - 作成する接続の ID
    /// * `room` - ルーム名
    /// * `password` - パスワード（空文字はオープンルーム）
    /// * `username` - 表示名
    /// * `sender` - この接続への送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(RoomName)` - 作成・参加に成功
    /// * `Err(ChatError)` - 入力エラー、名前衝突、状態エラー
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

        let now = Timestamp::new(get_jst_timestamp());
        self.rooms
            .create_room(room.clone(), PasswordHash::from_plain(&password), now)
            .await?;

        let member = Member::new(conn_id.clone(), username.clone(), now);
        if let Err(e) = self.rooms.join(&room, member, &password, sender.clone()).await {
            let _ = self.rooms.delete_room_if_empty(&room).await;
            return Err(e.into());
        }

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

        tracing::info!("Connection '{}' created room '{}' as '{}'", conn_id, room, username);
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
