//! Real-time session provisioning for the voice feedback backend.
//!
//! The browser client cannot hold the provider credential, so it asks this
//! backend for a session. [`SessionProvisioner`] renders the interview
//! instructions into the provider's session-creation body, forwards it with
//! the bearer credential, and hands back the provider's response untouched.
//!
//! Nothing here retries, caches, or inspects the provider's reply: one call
//! in, one outbound request, one opaque JSON document out.

pub mod config;
pub mod error;
pub mod provisioner;
pub mod request;

pub use config::{ProviderConfig, DEFAULT_SESSION_URL};
pub use error::SessionError;
pub use provisioner::{ProviderResponse, SessionProvisioner};
pub use request::{render_instructions, SessionRequest, TranscriptionConfig, FALLBACK_INSTRUCTIONS};
