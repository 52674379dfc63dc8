//! WhatsApp Gateway - HTTP façade over a WhatsApp Web bridge.
//!
//! The gateway:
//! - Tracks whether the bridge session is paired and connected
//! - Normalizes phone numbers and checks registration before sending
//! - Exposes send, OTP, and account-info endpoints with a uniform JSON shape

pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod lifecycle;
pub mod phone;
pub mod qr;
pub mod readiness;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use dispatch::{Dispatcher, SendReceipt};
pub use error::{ApiError, GatewayError};
pub use lifecycle::LifecycleListener;
pub use phone::{ChatAddress, PhoneNormalizer};
pub use readiness::{ClientStatus, ReadinessTracker};
