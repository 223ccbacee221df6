use crate::utils::setup_pair;
use crate::{init_tracing, spawn_server};
use duet_core::{ClientMessage, ServerMessage};
use serde_json::json;

#[tokio::test]
async fn offers_answers_and_candidates_relay_verbatim() {
    init_tracing();
    let addr = spawn_server().await;
    let (mut x, mut y) = setup_pair(addr, "r1").await.expect("pair");

    let offer_sdp = json!({"type": "offer", "sdp": "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n"});
    x.send(&ClientMessage::Offer {
        sdp: offer_sdp.clone(),
        to: y.id,
    })
    .await
    .expect("x sends offer");

    match y.recv().await.expect("y: offer") {
        ServerMessage::Offer { sdp, from } => {
            assert_eq!(from, x.id);
            assert_eq!(sdp, offer_sdp, "sdp must pass through untouched");
        }
        other => panic!("expected offer, got {other:?}"),
    }

    let answer_sdp = json!({"type": "answer", "sdp": "v=0\r\na=setup:active\r\n"});
    y.send(&ClientMessage::Answer {
        sdp: answer_sdp.clone(),
        to: x.id,
    })
    .await
    .expect("y sends answer");

    match x.recv().await.expect("x: answer") {
        ServerMessage::Answer { sdp, from } => {
            assert_eq!(from, y.id);
            assert_eq!(sdp, answer_sdp);
        }
        other => panic!("expected answer, got {other:?}"),
    }

    // Candidates flow both ways, equally untouched.
    let candidate = json!({"candidate": "candidate:1 1 udp 2122260223 192.168.1.7 54321 typ host", "sdpMid": "0"});
    x.send(&ClientMessage::IceCandidate {
        candidate: candidate.clone(),
        to: y.id,
    })
    .await
    .expect("x sends candidate");

    match y.recv().await.expect("y: candidate") {
        ServerMessage::IceCandidate { candidate: relayed, from } => {
            assert_eq!(from, x.id);
            assert_eq!(relayed, candidate);
        }
        other => panic!("expected ice-candidate, got {other:?}"),
    }
}
