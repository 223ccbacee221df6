use crate::signaling::SignalingService;
use axum::Json;
use axum::extract::State;
use duet_core::IceConfig;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub ok: bool,
}

pub async fn health() -> Json<Health> {
    Json(Health { ok: true })
}

/// ICE configuration query. Clients fetch this before building their peer
/// connection instead of hardcoding server lists.
pub async fn ice_config(State(service): State<SignalingService>) -> Json<IceConfig> {
    Json(service.ice_config())
}
