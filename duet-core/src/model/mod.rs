mod connection;
mod ice;
mod message;
mod room;

pub use connection::*;
pub use ice::*;
pub use message::*;
pub use room::*;
