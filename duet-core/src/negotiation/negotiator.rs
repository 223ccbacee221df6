use crate::model::ConnectionId;
use crate::negotiation::state::{NegotiationState, TrackChange};
use serde_json::Value;
use tracing::debug;

/// Side effects the driver must execute, in order, after feeding an event
/// into the [`Negotiator`].
///
/// The machine itself never touches a peer connection or a socket; the
/// driver (browser glue, or a native webrtc wrapper) owns all I/O.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationAction {
    /// Create and send an offer to the current partner.
    CreateOffer { ice_restart: bool },
    ApplyRemoteOffer { sdp: Value },
    /// Create and send an answer; report back via [`Negotiator::answer_sent`].
    CreateAnswer,
    ApplyRemoteAnswer { sdp: Value },
    ApplyCandidate { candidate: Value },
    /// Stop capture and drop all outbound tracks.
    ReleaseMedia,
    /// Connectivity is gone for good; tell the user layer.
    NotifyFailed,
}

/// Per-endpoint negotiation coordinator.
///
/// Both sides of a call run one of these, mirrored. It serializes offer
/// attempts (one outstanding offer per pair), resolves simultaneous-offer
/// collisions by identifier order, buffers early ICE candidates, and allows
/// exactly one ICE-restart cycle after a connectivity failure.
#[derive(Debug)]
pub struct Negotiator {
    local: ConnectionId,
    remote: Option<ConnectionId>,
    state: NegotiationState,
    remote_description_set: bool,
    pending_candidates: Vec<Value>,
    restart_attempted: bool,
    renegotiate_when_stable: bool,
}

impl Negotiator {
    pub fn new(local: ConnectionId) -> Self {
        Self {
            local,
            remote: None,
            state: NegotiationState::Idle,
            remote_description_set: false,
            pending_candidates: Vec::new(),
            restart_attempted: false,
            renegotiate_when_stable: false,
        }
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn local(&self) -> ConnectionId {
        self.local
    }

    /// The partner this endpoint is negotiating with, once known.
    pub fn remote(&self) -> Option<ConnectionId> {
        self.remote
    }

    /// A `peer-joined` notice arrived: this side saw the partner appear and
    /// is therefore the designated initiator.
    pub fn peer_joined(&mut self, remote: ConnectionId) -> Vec<NegotiationAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.remote = Some(remote);
        match self.state {
            NegotiationState::Idle => {
                self.state = NegotiationState::OfferPending;
                vec![NegotiationAction::CreateOffer { ice_restart: false }]
            }
            state => {
                debug!(?state, "peer_joined with negotiation already underway");
                Vec::new()
            }
        }
    }

    /// The partner departed. Resets the exchange so a future occupant of the
    /// room starts from a clean slate.
    pub fn peer_left(&mut self) -> Vec<NegotiationAction> {
        if self.state == NegotiationState::Closed {
            return Vec::new();
        }
        self.remote = None;
        self.state = NegotiationState::Idle;
        self.remote_description_set = false;
        self.pending_candidates.clear();
        self.restart_attempted = false;
        self.renegotiate_when_stable = false;
        Vec::new()
    }

    /// A local track changed. Screen-share toggling changes track identity
    /// and renegotiates; a camera switch replaces the track in its existing
    /// sender and does not.
    pub fn track_changed(&mut self, change: TrackChange) -> Vec<NegotiationAction> {
        if self.is_terminal() || change == TrackChange::CameraSwitched {
            return Vec::new();
        }
        match self.state {
            NegotiationState::Stable => {
                self.state = NegotiationState::OfferPending;
                vec![NegotiationAction::CreateOffer { ice_restart: false }]
            }
            NegotiationState::OfferPending | NegotiationState::AnswerPending => {
                // One offer outstanding at a time; renegotiate once settled.
                self.renegotiate_when_stable = true;
                Vec::new()
            }
            NegotiationState::Idle | NegotiationState::Failed | NegotiationState::Closed => {
                Vec::new()
            }
        }
    }

    /// An offer arrived from the partner.
    pub fn remote_offer(&mut self, from: ConnectionId, sdp: Value) -> Vec<NegotiationAction> {
        if self.is_terminal() {
            debug!(%from, "dropping offer received after teardown");
            return Vec::new();
        }
        if let Some(remote) = self.remote
            && remote != from
        {
            debug!(%from, expected = %remote, "dropping offer from unexpected peer");
            return Vec::new();
        }
        self.remote = Some(from);

        match self.state {
            NegotiationState::Idle | NegotiationState::Stable => self.accept_offer(sdp),
            NegotiationState::OfferPending => {
                // Simultaneous offers. The lower identifier yields and
                // answers; the higher one ignores the inbound offer and
                // keeps waiting for its own answer.
                if self.local < from {
                    debug!(%from, "offer collision, yielding to remote offer");
                    self.accept_offer(sdp)
                } else {
                    debug!(%from, "offer collision, ignoring remote offer");
                    Vec::new()
                }
            }
            NegotiationState::AnswerPending => {
                debug!(%from, "already answering, dropping duplicate offer");
                Vec::new()
            }
            NegotiationState::Failed | NegotiationState::Closed => unreachable!(),
        }
    }

    /// The driver finished producing and sending the answer requested by a
    /// [`NegotiationAction::CreateAnswer`].
    pub fn answer_sent(&mut self) -> Vec<NegotiationAction> {
        if self.state != NegotiationState::AnswerPending {
            debug!(state = ?self.state, "answer_sent outside AnswerPending");
            return Vec::new();
        }
        self.state = NegotiationState::Stable;
        self.follow_up_renegotiation()
    }

    /// The answer to this side's outstanding offer arrived.
    pub fn remote_answer(&mut self, from: ConnectionId, sdp: Value) -> Vec<NegotiationAction> {
        if self.state != NegotiationState::OfferPending {
            debug!(%from, state = ?self.state, "dropping unexpected answer");
            return Vec::new();
        }
        if let Some(remote) = self.remote
            && remote != from
        {
            debug!(%from, expected = %remote, "dropping answer from unexpected peer");
            return Vec::new();
        }
        self.remote_description_set = true;
        self.state = NegotiationState::Stable;
        let mut actions = vec![NegotiationAction::ApplyRemoteAnswer { sdp }];
        actions.extend(self.flush_candidates());
        actions.extend(self.follow_up_renegotiation());
        actions
    }

    /// An ICE candidate arrived. Buffered until a remote description exists;
    /// dropped outright once the exchange failed or closed.
    pub fn remote_candidate(&mut self, candidate: Value) -> Vec<NegotiationAction> {
        if self.is_terminal() {
            debug!("dropping candidate after teardown");
            return Vec::new();
        }
        if self.remote_description_set {
            vec![NegotiationAction::ApplyCandidate { candidate }]
        } else {
            self.pending_candidates.push(candidate);
            Vec::new()
        }
    }

    /// The transport reported terminal connectivity failure. One ICE-restart
    /// cycle is attempted; a second failure is final.
    pub fn transport_failed(&mut self) -> Vec<NegotiationAction> {
        if self.is_terminal() {
            return Vec::new();
        }
        if self.restart_attempted {
            self.state = NegotiationState::Failed;
            self.pending_candidates.clear();
            return vec![NegotiationAction::NotifyFailed];
        }
        self.restart_attempted = true;
        self.remote_description_set = false;
        self.pending_candidates.clear();
        self.state = NegotiationState::OfferPending;
        vec![NegotiationAction::CreateOffer { ice_restart: true }]
    }

    /// Tear down. Safe from any state, any number of times.
    pub fn close(&mut self) -> Vec<NegotiationAction> {
        if self.state == NegotiationState::Closed {
            return Vec::new();
        }
        self.state = NegotiationState::Closed;
        self.pending_candidates.clear();
        vec![NegotiationAction::ReleaseMedia]
    }

    fn is_terminal(&self) -> bool {
        matches!(
            self.state,
            NegotiationState::Failed | NegotiationState::Closed
        )
    }

    fn accept_offer(&mut self, sdp: Value) -> Vec<NegotiationAction> {
        self.remote_description_set = true;
        self.state = NegotiationState::AnswerPending;
        let mut actions = vec![NegotiationAction::ApplyRemoteOffer { sdp }];
        actions.extend(self.flush_candidates());
        actions.push(NegotiationAction::CreateAnswer);
        actions
    }

    fn flush_candidates(&mut self) -> Vec<NegotiationAction> {
        self.pending_candidates
            .drain(..)
            .map(|candidate| NegotiationAction::ApplyCandidate { candidate })
            .collect()
    }

    fn follow_up_renegotiation(&mut self) -> Vec<NegotiationAction> {
        if !self.renegotiate_when_stable {
            return Vec::new();
        }
        self.renegotiate_when_stable = false;
        self.state = NegotiationState::OfferPending;
        vec![NegotiationAction::CreateOffer { ice_restart: false }]
    }
}
