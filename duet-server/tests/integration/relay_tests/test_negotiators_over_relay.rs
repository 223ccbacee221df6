use crate::utils::{TestClient, setup_pair};
use crate::{init_tracing, spawn_server};
use duet_core::{ClientMessage, NegotiationAction, NegotiationState, Negotiator, ServerMessage};
use serde_json::json;

/// Feeds relayed messages into a negotiator until it settles, executing the
/// send side of its actions over the real socket.
async fn drive_to_stable(client: &mut TestClient, negotiator: &mut Negotiator) -> bool {
    let mut answered = false;
    while negotiator.state() != NegotiationState::Stable {
        match client.recv().await.expect("client recv") {
            ServerMessage::Offer { sdp, from } => {
                let actions = negotiator.remote_offer(from, sdp);
                if actions.contains(&NegotiationAction::CreateAnswer) {
                    client
                        .send(&ClientMessage::Answer {
                            sdp: json!({"type": "answer", "sdp": format!("answer-by-{}", client.id)}),
                            to: from,
                        })
                        .await
                        .expect("send answer");
                    negotiator.answer_sent();
                    answered = true;
                }
            }
            ServerMessage::Answer { sdp, from } => {
                negotiator.remote_answer(from, sdp);
            }
            ServerMessage::IceCandidate { candidate, .. } => {
                negotiator.remote_candidate(candidate);
            }
            other => panic!("unexpected message during negotiation: {other:?}"),
        }
    }
    answered
}

/// Both sides fire an offer at once; the identifier tie-break must settle
/// the exchange with exactly one answerer and no deadlock.
#[tokio::test]
async fn simultaneous_offers_settle_over_the_wire() {
    init_tracing();
    let addr = spawn_server().await;
    let (mut x, mut y) = setup_pair(addr, "race").await.expect("pair");

    let mut x_neg = Negotiator::new(x.id);
    let mut y_neg = Negotiator::new(y.id);

    // Simulate both endpoints deciding to initiate before seeing the
    // other's offer.
    assert_eq!(
        x_neg.peer_joined(y.id),
        vec![NegotiationAction::CreateOffer { ice_restart: false }]
    );
    assert_eq!(
        y_neg.peer_joined(x.id),
        vec![NegotiationAction::CreateOffer { ice_restart: false }]
    );
    x.send(&ClientMessage::Offer {
        sdp: json!({"type": "offer", "sdp": format!("offer-by-{}", x.id)}),
        to: y.id,
    })
    .await
    .expect("x offer");
    y.send(&ClientMessage::Offer {
        sdp: json!({"type": "offer", "sdp": format!("offer-by-{}", y.id)}),
        to: x.id,
    })
    .await
    .expect("y offer");

    let (x_answered, y_answered) =
        tokio::join!(drive_to_stable(&mut x, &mut x_neg), drive_to_stable(&mut y, &mut y_neg));

    assert_eq!(x_neg.state(), NegotiationState::Stable);
    assert_eq!(y_neg.state(), NegotiationState::Stable);
    assert!(
        x_answered ^ y_answered,
        "exactly one side must yield and answer"
    );
    // The side with the lower identifier is the one that yielded.
    assert_eq!(x_answered, x.id < y.id);
}
