//! WebSocket protocol integration tests.
//!
//! End-to-end scenarios over a real server: room lifecycle, membership,
//! message fan-out and disconnect handling.

mod fixtures;

use std::time::Duration;

use fixtures::{TestServer, create_room, recv_event, send_event, try_recv_event};
use serde_json::json;

#[tokio::test]
async fn test_create_join_and_message_flow() {
    // テスト項目: ルーム作成 → 参加 → メッセージ送信の一連の流れ（シナリオ A）
    // given (前提条件):
    let server = TestServer::start(19090).await;

    // when (操作): X が alpha を作成する
    let mut x = server.connect().await;
    send_event(
        &mut x,
        json!({"event": "create_room", "room": "alpha", "password": "", "username": "alice"}),
    )
    .await;

    // then (期待する結果): X は自分 1 名の user_list と room_joined を受信する
    let list = recv_event(&mut x).await;
    assert_eq!(list["event"], "user_list");
    let users = list["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[0]["room"], "alpha");

    let joined = recv_event(&mut x).await;
    assert_eq!(joined["event"], "room_joined");
    assert_eq!(joined["room"], "alpha");
    assert_eq!(joined["username"], "alice");

    // when (操作): Y が alpha に参加する
    let mut y = server.connect().await;
    send_event(
        &mut y,
        json!({"event": "join_room", "room": "alpha", "password": "", "username": "bob"}),
    )
    .await;

    // then (期待する結果): X と Y の両方が 2 名の user_list を受信する
    let x_list = recv_event(&mut x).await;
    assert_eq!(x_list["event"], "user_list");
    assert_eq!(x_list["users"].as_array().unwrap().len(), 2);

    let y_list = recv_event(&mut y).await;
    assert_eq!(y_list["event"], "user_list");
    assert_eq!(y_list["users"][0]["username"], "alice");
    assert_eq!(y_list["users"][1]["username"], "bob");
    let y_joined = recv_event(&mut y).await;
    assert_eq!(y_joined["event"], "room_joined");

    // when (操作): X がメッセージを送信する
    send_event(&mut x, json!({"event": "message", "text": "hi", "room": "alpha"})).await;

    // then (期待する結果): X 自身を含む両方が同じメッセージを受信する
    for ws in [&mut x, &mut y] {
        let msg = recv_event(ws).await;
        assert_eq!(msg["event"], "message");
        assert_eq!(msg["sender"], "alice");
        assert_eq!(msg["text"], "hi");
        assert_eq!(msg["room"], "alpha");
        assert_eq!(msg["system"], false);
    }
}

#[tokio::test]
async fn test_join_nonexistent_room_yields_error() {
    // テスト項目: 存在しないルームへの参加はエラーになり room_joined は届かない（シナリオ B）
    // given (前提条件):
    let server = TestServer::start(19091).await;
    let mut y = server.connect().await;

    // when (操作):
    send_event(
        &mut y,
        json!({"event": "join_room", "room": "beta", "password": "x", "username": "bob"}),
    )
    .await;

    // then (期待する結果):
    let event = recv_event(&mut y).await;
    assert_eq!(event["event"], "error");
    assert_eq!(event["message"], "room does not exist");
    assert!(try_recv_event(&mut y, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn test_wrong_password_rejected_without_broadcast() {
    // テスト項目: パスワード不一致は参加者にのみ報告され、既存メンバーへは何も配信されない（シナリオ C）
    // given (前提条件): X が secret 付きの gamma を作成済み
    let server = TestServer::start(19092).await;
    let mut x = server.connect().await;
    create_room(&mut x, "gamma", "secret", "alice").await;

    // when (操作): Y が誤ったパスワードで参加を試みる
    let mut y = server.connect().await;
    send_event(
        &mut y,
        json!({"event": "join_room", "room": "gamma", "password": "wrong", "username": "bob"}),
    )
    .await;

    // then (期待する結果): Y にはエラー、X には何も届かない
    let event = recv_event(&mut y).await;
    assert_eq!(event["event"], "error");
    assert_eq!(event["message"], "invalid password");
    assert!(try_recv_event(&mut x, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn test_message_before_join_yields_error() {
    // テスト項目: 未参加でのメッセージ送信は "must join a room" を含むエラーになる
    // given (前提条件):
    let server = TestServer::start(19093).await;
    let mut ws = server.connect().await;

    // when (操作):
    send_event(&mut ws, json!({"event": "message", "text": "hi", "room": "alpha"})).await;

    // then (期待する結果):
    let event = recv_event(&mut ws).await;
    assert_eq!(event["event"], "error");
    assert!(
        event["message"]
            .as_str()
            .unwrap()
            .contains("must join a room")
    );
}

#[tokio::test]
async fn test_duplicate_create_yields_room_already_exists() {
    // テスト項目: 同名ルームの作成は "room already exists" になる（join へのフォールバックなし）
    // given (前提条件):
    let server = TestServer::start(19094).await;
    let mut x = server.connect().await;
    create_room(&mut x, "alpha", "", "alice").await;

    // when (操作):
    let mut y = server.connect().await;
    send_event(
        &mut y,
        json!({"event": "create_room", "room": "alpha", "password": "", "username": "bob"}),
    )
    .await;

    // then (期待する結果):
    let event = recv_event(&mut y).await;
    assert_eq!(event["event"], "error");
    assert_eq!(event["message"], "room already exists");
}

#[tokio::test]
async fn test_messages_delivered_in_order() {
    // テスト項目: 同一ルームのメッセージは受理順・連番どおりに全員へ届く
    // given (前提条件):
    let server = TestServer::start(19095).await;
    let mut x = server.connect().await;
    create_room(&mut x, "alpha", "", "alice").await;
    let mut y = server.connect().await;
    send_event(
        &mut y,
        json!({"event": "join_room", "room": "alpha", "password": "", "username": "bob"}),
    )
    .await;
    let _ = recv_event(&mut x).await; // user_list
    let _ = recv_event(&mut y).await; // user_list
    let _ = recv_event(&mut y).await; // room_joined

    // when (操作): X が連続で 5 通送信する
    for i in 1..=5 {
        send_event(
            &mut x,
            json!({"event": "message", "text": format!("m{i}"), "room": "alpha"}),
        )
        .await;
    }

    // then (期待する結果): 両者が同じ順序・連番で受信する
    for ws in [&mut x, &mut y] {
        for i in 1..=5u64 {
            let msg = recv_event(ws).await;
            assert_eq!(msg["event"], "message");
            assert_eq!(msg["text"], format!("m{i}"));
            assert_eq!(msg["seq"], i);
        }
    }
}

#[tokio::test]
async fn test_disconnect_notifies_and_room_is_reclaimed() {
    // テスト項目: 切断で退出通知が届き、空になったルーム名は再利用できる（シナリオ D）
    // given (前提条件): alice と bob が alpha に参加している
    let server = TestServer::start(19096).await;
    let mut x = server.connect().await;
    create_room(&mut x, "alpha", "", "alice").await;
    let mut y = server.connect().await;
    send_event(
        &mut y,
        json!({"event": "join_room", "room": "alpha", "password": "", "username": "bob"}),
    )
    .await;
    let _ = recv_event(&mut x).await; // user_list
    let _ = recv_event(&mut y).await; // user_list
    let _ = recv_event(&mut y).await; // room_joined

    // when (操作): bob が切断する
    drop(y);

    // then (期待する結果): alice は user_left・システム通知・更新済み user_list を受信する
    let left = recv_event(&mut x).await;
    assert_eq!(left["event"], "user_left");
    assert_eq!(left["username"], "bob");
    assert_eq!(left["room"], "alpha");

    let notice = recv_event(&mut x).await;
    assert_eq!(notice["event"], "message");
    assert_eq!(notice["system"], true);
    assert_eq!(notice["text"], "bob left the room");

    let list = recv_event(&mut x).await;
    assert_eq!(list["event"], "user_list");
    let users = list["users"].as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["username"], "alice");

    // when (操作): 最後のメンバー alice も切断し、delta と同様に名前が解放される
    drop(x);

    // then (期待する結果): 別の接続が同名ルームを作成できるようになる
    let mut z = server.connect().await;
    let mut created = false;
    for _ in 0..50 {
        send_event(
            &mut z,
            json!({"event": "create_room", "room": "alpha", "password": "", "username": "zoe"}),
        )
        .await;
        let event = recv_event(&mut z).await;
        if event["event"] == "user_list" {
            let joined = recv_event(&mut z).await;
            assert_eq!(joined["event"], "room_joined");
            created = true;
            break;
        }
        // 切断処理がまだ完了していない場合は少し待って再試行する
        assert_eq!(event["event"], "error");
        assert_eq!(event["message"], "room already exists");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(created, "room name was never released after disconnect");
}

#[tokio::test]
async fn test_unparseable_frame_yields_error_and_keeps_connection() {
    // テスト項目: 不正なフレームはエラーになるが接続は維持される
    // given (前提条件):
    let server = TestServer::start(19097).await;
    let mut ws = server.connect().await;

    // when (操作): JSON でないテキストを送る
    send_event(&mut ws, json!("not an event")).await;

    // then (期待する結果): エラーを受信した後も通常どおり操作できる
    let event = recv_event(&mut ws).await;
    assert_eq!(event["event"], "error");

    create_room(&mut ws, "alpha", "", "alice").await;
}

#[tokio::test]
async fn test_join_while_joined_yields_error() {
    // テスト項目: 参加中の接続の再参加は "must leave current room first" になる
    // given (前提条件):
    let server = TestServer::start(19098).await;
    let mut x = server.connect().await;
    create_room(&mut x, "alpha", "", "alice").await;

    // when (操作):
    send_event(
        &mut x,
        json!({"event": "join_room", "room": "alpha", "password": "", "username": "alice"}),
    )
    .await;

    // then (期待する結果):
    let event = recv_event(&mut x).await;
    assert_eq!(event["event"], "error");
    assert_eq!(event["message"], "must leave current room first");
}
