use clap::Parser;
use duet_core::{IceConfig, IceServerConfig};

/// Publicly reachable STUN defaults, served when no override is configured.
pub const DEFAULT_STUN_SERVERS: [&str; 2] = [
    "stun:stun.l.google.com:19302",
    "stun:global.stun.twilio.com:3478",
];

/// Runtime configuration, from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "duet-server", about = "Two-party call signaling server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// STUN server URLs offered to clients (comma separated).
    #[arg(long = "stun-url", env = "STUN_URLS", value_delimiter = ',')]
    pub stun_urls: Vec<String>,

    /// TURN server URL; relay fallback is offered to clients only when set.
    #[arg(long, env = "TURN_URL")]
    pub turn_url: Option<String>,

    /// TURN username.
    #[arg(long, env = "TURN_USER", requires = "turn_url")]
    pub turn_user: Option<String>,

    /// TURN credential.
    #[arg(long, env = "TURN_PASS", requires = "turn_url")]
    pub turn_pass: Option<String>,
}

impl ServerConfig {
    /// The `/ice` payload: STUN always present, one TURN entry iff
    /// configured.
    pub fn ice_config(&self) -> IceConfig {
        let stun_urls = if self.stun_urls.is_empty() {
            DEFAULT_STUN_SERVERS.iter().map(|s| s.to_string()).collect()
        } else {
            self.stun_urls.clone()
        };

        let mut ice_servers = vec![IceServerConfig::stun(stun_urls)];
        if let Some(url) = &self.turn_url {
            ice_servers.push(IceServerConfig {
                urls: vec![url.clone()],
                username: self.turn_user.clone(),
                credential: self.turn_pass.clone(),
            });
        }
        IceConfig { ice_servers }
    }
}
