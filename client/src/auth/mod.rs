//! Authentication and session state.
//!
//! - `provider`: boundary to the service that authenticates users
//! - `http`: REST implementation of that boundary
//! - `store`: the signed-in identity, as read by access checks
//! - `session`: lifecycle operations wiring the two together

pub mod error;
pub mod http;
pub mod provider;
pub mod session;
pub mod store;
pub mod token_store;

pub use error::AuthError;
pub use http::HttpIdentityProvider;
pub use provider::{Credentials, IdentityProvider, Registration};
pub use session::SessionManager;
pub use store::{IdentityStore, SessionSnapshot, SnapshotReceiver};
pub use token_store::{KeyringTokenStore, MemoryTokenStore, TokenStore};
