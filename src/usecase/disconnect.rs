//! UseCase: 切断処理（プレゼンス管理）
//!
//! トランスポート層の切断（明示的な close・異常切断の両方）に反応し、
//! Registry から接続を削除し、所属ルームから退出させる。残りのメンバーへ
//! 退出通知と更新済みメンバーリストを配信し、空になったルームを
//! ガベージコレクトする。
//!
//! この処理は冪等であり、同一接続に対して切断が複数回報告されても安全。
//! 切断した本人にエラーを返すことはない。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, RoomName, RoomStore};

/// 切断処理のユースケース
pub struct DisconnectUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    rooms: Arc<dyn RoomStore>,
}

impl DisconnectUseCase {
    /// 新しい DisconnectUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, rooms: Arc<dyn RoomStore>) -> Self {
        Self { registry, rooms }
    }

    /// 切断処理を実行
    ///
    /// # Returns
    ///
    /// * `Some(RoomName)` - 退出したルーム
    /// * `None` - 未参加、または既に切断処理済み（no-op）
    pub async fn execute(&self, conn_id: &ConnectionId) -> Option<RoomName> {
        // 冪等性: 既に削除済みなら何もしない
        let Some(conn) = self.registry.unregister(conn_id).await else {
            tracing::debug!("Disconnect for unknown connection '{}' ignored", conn_id);
            return None;
        };

        // Registry にルームが記録される前に接続が死んだ場合でも、メンバー追加
        // だけが先に完了していることがある。ストア側の逆引きで拾い上げ、
        // ゴーストメンバーを残さない
        let room = match conn.room {
            Some(room) => room,
            None => self.rooms.find_member_room(conn_id).await?,
        };

        match self.rooms.leave(&room, conn_id).await {
            Ok(remaining) => {
                tracing::info!(
                    "Connection '{}' left room '{}' ({} remaining)",
                    conn_id,
                    room,
                    remaining.len()
                );
            }
            Err(e) => {
                // 参加と切断の競合で既に巻き戻されている場合など
                tracing::debug!("Leave for '{}' in room '{}' skipped: {}", conn_id, room, e);
            }
        }

        match self.rooms.delete_room_if_empty(&room).await {
            Ok(true) => tracing::info!("Room '{}' became empty and was deleted", room),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to garbage-collect room '{}': {}", room, e),
        }

        Some(room)
    }
}
