//! Registration and session authentication for Logvault.
//!
//! Both services are generic over any
//! [`CredentialStore`](logvault_core::store::CredentialStore). Validation
//! problems come back as per-field feedback values; only infrastructure
//! failures are errors.

pub mod hash;
pub mod messages;
pub mod register;
pub mod signin;

pub use register::{SignUpOutcome, sign_up};
pub use signin::{SignInOutcome, sign_in};
