use crate::utils::{TestClient, setup_pair};
use crate::{init_tracing, spawn_server};
use duet_core::{ClientMessage, ServerMessage};
use std::time::Duration;

#[tokio::test]
async fn third_join_is_rejected_without_disturbing_occupants() {
    init_tracing();
    let addr = spawn_server().await;
    let (mut x, mut y) = setup_pair(addr, "crowded").await.expect("pair");

    let mut z = TestClient::connect(addr).await.expect("connect z");
    z.join("crowded").await.expect("join z");
    assert_eq!(z.recv().await.expect("z: room-full"), ServerMessage::RoomFull);

    // Rejection is invisible to the occupants.
    x.expect_silence(Duration::from_millis(300)).await.expect("x quiet");
    y.expect_silence(Duration::from_millis(300)).await.expect("y quiet");

    // Still full on retry.
    z.join("crowded").await.expect("rejoin z");
    assert_eq!(z.recv().await.expect("z: room-full again"), ServerMessage::RoomFull);

    // A departure frees the slot.
    y.send(&ClientMessage::Leave).await.expect("y leaves");
    assert_eq!(
        x.recv().await.expect("x: peer-left"),
        ServerMessage::PeerLeft { id: y.id }
    );

    z.join("crowded").await.expect("z joins freed slot");
    assert_eq!(
        x.recv().await.expect("x: peer-joined"),
        ServerMessage::PeerJoined { id: z.id }
    );
    assert_eq!(x.recv().await.expect("x: ready"), ServerMessage::Ready);
    assert_eq!(z.recv().await.expect("z: ready"), ServerMessage::Ready);
}
