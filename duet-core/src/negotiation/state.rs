/// Lifecycle of one offer/answer exchange with the current partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    /// No exchange in flight, no partner or nothing to negotiate yet.
    Idle,
    /// A local offer is out; waiting for the matching answer.
    OfferPending,
    /// A remote offer was applied; a local answer is being produced.
    AnswerPending,
    /// Both descriptions applied; media can flow.
    Stable,
    /// Connectivity died and the single restart cycle was already spent.
    Failed,
    /// Torn down. Terminal.
    Closed,
}

/// Local media changes reported by the capture layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackChange {
    ScreenShareStarted,
    ScreenShareStopped,
    /// Swapped camera device. The new track replaces the old one in the
    /// existing sender, so no renegotiation happens.
    CameraSwitched,
}
