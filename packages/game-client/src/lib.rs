//! Client-side session handling for the matchmaking platform: joining a
//! room with a freshly minted room token, surviving a dropped websocket,
//! and rejoining with the rotating reconnect token.

pub mod endpoint;
pub mod error;
pub mod session;
pub mod store;
pub mod transport;

pub use endpoint::{EndpointClient, HttpEndpointClient};
pub use error::GameClientError;
pub use session::{ConnectionState, SessionClient};
pub use store::{MemorySessionStore, SessionStore, StoredSession};
pub use transport::{GameTransport, JoinAck, JoinCredentials, WsTransport};
