pub mod config;
pub mod error;
pub mod http;
pub mod registry;
pub mod relay;
pub mod room;
pub mod signaling;

pub use config::*;
pub use error::*;
pub use registry::*;
pub use relay::*;
pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;

/// Assembles the signaling endpoints around a service instance.
pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/ice", get(http::ice_config))
        .route("/health", get(http::health))
        .with_state(service)
}
