//! Identity boundary: validation, the identity-provider abstraction, the
//! Firebase client and the account flows built on top of them.

pub mod firebase;
pub mod provider;
pub mod service;
pub mod validate;

pub use firebase::FirebaseAuthClient;
pub use provider::{AuthError, AuthSession, AuthUser, IdentityProvider, TokenClaims};
pub use service::{AuthService, LoginRequest, RegisterProviderRequest, RegisterSeekerRequest};
pub use validate::ValidationError;

#[cfg(test)]
pub(crate) mod mock;
