use crate::utils::setup_pair;
use crate::{init_tracing, spawn_server};
use duet_core::{ClientMessage, ServerMessage};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn messages_to_a_departed_peer_vanish_silently() {
    init_tracing();
    let addr = spawn_server().await;
    let (mut x, y) = setup_pair(addr, "r1").await.expect("pair");

    let departed = y.id;
    y.close().await.expect("y closes");
    assert_eq!(
        x.recv().await.expect("x: peer-left"),
        ServerMessage::PeerLeft { id: departed }
    );

    // The race where an offer chases a peer that just vanished: dropped,
    // no error, sender unaffected.
    x.send(&ClientMessage::Offer {
        sdp: json!({"sdp": "v=0"}),
        to: departed,
    })
    .await
    .expect("x sends offer into the void");
    x.expect_silence(Duration::from_millis(300))
        .await
        .expect("no error for routing miss");

    // The sender's own state is intact: a newcomer can still pair up.
    let mut w = crate::utils::TestClient::connect(addr).await.expect("connect w");
    w.join("r1").await.expect("join w");
    assert_eq!(
        x.recv().await.expect("x: peer-joined"),
        ServerMessage::PeerJoined { id: w.id }
    );
    assert_eq!(x.recv().await.expect("x: ready"), ServerMessage::Ready);
    assert_eq!(w.recv().await.expect("w: ready"), ServerMessage::Ready);
}
