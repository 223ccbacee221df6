use crate::utils::TestClient;
use crate::{init_tracing, spawn_server};
use duet_core::ServerMessage;
use std::time::Duration;

#[tokio::test]
async fn first_occupant_waits_second_completes_the_pair() {
    init_tracing();
    let addr = spawn_server().await;

    let mut x = TestClient::connect(addr).await.expect("connect x");
    x.join("r1").await.expect("join x");
    x.expect_silence(Duration::from_millis(300))
        .await
        .expect("sole occupant must not receive ready");

    let mut y = TestClient::connect(addr).await.expect("connect y");
    y.join("r1").await.expect("join y");

    // The existing occupant hears about the newcomer, then both get ready.
    assert_eq!(
        x.recv().await.expect("x: peer-joined"),
        ServerMessage::PeerJoined { id: y.id }
    );
    assert_eq!(x.recv().await.expect("x: ready"), ServerMessage::Ready);
    assert_eq!(y.recv().await.expect("y: ready"), ServerMessage::Ready);

    // The newcomer gets no peer-joined of its own.
    y.expect_silence(Duration::from_millis(300))
        .await
        .expect("y should only see ready");
}
