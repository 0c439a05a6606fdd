//! Push notification module
//!
//! Token registry, provider transport and the dispatcher that ties them
//! together.

pub mod fcm;
pub mod notifier;
pub mod storage;
pub mod transport;
pub mod types;

pub use fcm::{FcmTransport, ServiceAccountKey};
pub use notifier::NotificationDispatcher;
pub use storage::{AddOutcome, AddStatus, RemoveOutcome, RemoveStatus, TokenMap, TokenStore};
pub use transport::PushTransport;
pub use types::{
    validate_email, validate_token, DispatchResult, ErrorKind, MulticastResponse,
    NotificationPayload, SendResponse, TokenResult,
};
