use crate::integration::{init_tracing, start_relay, wait_for_room_size};
use crate::utils::TestClient;

#[tokio::test]
async fn test_frames_reach_other_member_verbatim() {
    init_tracing();

    let (addr, state) = start_relay().await;
    let mut admin = TestClient::connect(addr, "R1").await.expect("Admin failed to connect");
    let mut user = TestClient::connect(addr, "R1").await.expect("User failed to connect");
    assert!(wait_for_room_size(&state, "R1", 2).await);

    let frame = r#"{"type":"chat","message":"hi","sender":"User"}"#;
    user.send_text(frame).await.unwrap();

    assert_eq!(admin.recv_text().await.unwrap(), frame);
    assert!(user.is_silent().await, "Sender must not receive its own frame");
}

#[tokio::test]
async fn test_order_is_preserved() {
    init_tracing();

    let (addr, state) = start_relay().await;
    let mut admin = TestClient::connect(addr, "R2").await.unwrap();
    let mut user = TestClient::connect(addr, "R2").await.unwrap();
    assert!(wait_for_room_size(&state, "R2", 2).await);

    let frames: Vec<String> = (0..20)
        .map(|n| format!(r#"{{"type":"ice","candidate":{{"candidate":"candidate:{n}"}}}}"#))
        .collect();
    for frame in &frames {
        user.send_text(frame).await.unwrap();
    }

    for frame in &frames {
        assert_eq!(&admin.recv_text().await.unwrap(), frame);
    }
}

#[tokio::test]
async fn test_rooms_do_not_leak() {
    init_tracing();

    let (addr, state) = start_relay().await;
    let mut first = TestClient::connect(addr, "R3").await.unwrap();
    let mut second = TestClient::connect(addr, "R3").await.unwrap();
    let mut outsider = TestClient::connect(addr, "R4").await.unwrap();
    assert!(wait_for_room_size(&state, "R3", 2).await);
    assert!(wait_for_room_size(&state, "R4", 1).await);

    first
        .send_text(r#"{"type":"offer","offer":{"type":"offer","sdp":"v=0"}}"#)
        .await
        .unwrap();

    assert!(second.recv_text().await.unwrap().contains("\"offer\""));
    assert!(outsider.is_silent().await);
}
