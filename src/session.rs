//! Session and identity context.
//!
//! Holds the bearer credential and the role derived from its claims. The
//! role only gates which flows the UI offers; the server re-checks
//! authorization on every request, so nothing here is a security boundary.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;
use std::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Guest,
    Customer,
    Admin,
}

/// What the current role is allowed to see and do. The single place
/// role-based gating lives; every surface consults this instead of
/// re-deriving its own checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub manage_catalog: bool,
    pub book_seats: bool,
    pub view_own_tickets: bool,
}

impl Capabilities {
    pub const fn for_role(role: Role) -> Self {
        match role {
            Role::Guest => Capabilities {
                manage_catalog: false,
                book_seats: false,
                view_own_tickets: false,
            },
            Role::Customer => Capabilities {
                manage_catalog: false,
                book_seats: true,
                view_own_tickets: true,
            },
            Role::Admin => Capabilities {
                manage_catalog: true,
                book_seats: true,
                view_own_tickets: true,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Session {
    token: Option<String>,
    role: Role,
}

// The only claim we read; everything else in the payload is ignored
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    role: Option<String>,
}

/// Reads the role claim out of a JWT payload without verifying the
/// signature. Verification belongs to the server; a forged claim only
/// changes what the client offers to show, not what the server permits.
/// Malformed tokens degrade to `Customer` rather than erroring, since the
/// token itself may still be perfectly valid to the server.
pub fn decode_role(token: &str) -> Role {
    let payload = match token.split('.').nth(1) {
        Some(segment) => segment,
        None => return Role::Customer,
    };
    let decoded = match general_purpose::URL_SAFE_NO_PAD.decode(payload) {
        Ok(bytes) => bytes,
        Err(_) => return Role::Customer,
    };
    let claims: TokenClaims = match serde_json::from_slice(&decoded) {
        Ok(claims) => claims,
        Err(_) => return Role::Customer,
    };
    match claims.role.as_deref() {
        Some("admin") => Role::Admin,
        _ => Role::Customer,
    }
}

/// Shared credential store read by every outgoing request.
///
/// Mutated only by login, registration, logout, and 401 invalidation, all of
/// which run from user-triggered flows; there is no background writer.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: RwLock<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fresh token and derives its role. Returns the role so the
    /// caller can report it.
    pub fn authenticate(&self, token: String) -> Role {
        let role = decode_role(&token);
        let mut session = self.inner.write().unwrap();
        session.token = Some(token);
        session.role = role;
        debug!(?role, "session established");
        role
    }

    /// Drops the credential; the caller routes the user to re-authentication.
    pub fn clear(&self) {
        let mut session = self.inner.write().unwrap();
        session.token = None;
        session.role = Role::Guest;
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().unwrap().token.clone()
    }

    pub fn role(&self) -> Role {
        self.inner.read().unwrap().role
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::for_role(self.role())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().unwrap().token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#);
        let body = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn admin_claim_yields_admin_role() {
        let token = token_with_payload(r#"{"sub":"a@b.c","role":"admin","exp":1}"#);
        assert_eq!(decode_role(&token), Role::Admin);
    }

    #[test]
    fn missing_role_claim_defaults_to_customer() {
        let token = token_with_payload(r#"{"sub":"a@b.c"}"#);
        assert_eq!(decode_role(&token), Role::Customer);
    }

    #[test]
    fn garbage_token_defaults_to_customer() {
        assert_eq!(decode_role("not-a-jwt"), Role::Customer);
        assert_eq!(decode_role("a.%%%.c"), Role::Customer);
    }

    #[test]
    fn store_round_trip_and_invalidation() {
        let store = SessionStore::new();
        assert_eq!(store.role(), Role::Guest);
        assert!(!store.is_authenticated());

        let token = token_with_payload(r#"{"role":"admin"}"#);
        assert_eq!(store.authenticate(token.clone()), Role::Admin);
        assert_eq!(store.token().as_deref(), Some(token.as_str()));
        assert!(store.capabilities().manage_catalog);

        store.clear();
        assert_eq!(store.role(), Role::Guest);
        assert_eq!(store.token(), None);
        assert!(!store.capabilities().book_seats);
    }

    #[test]
    fn guest_capabilities_are_fully_gated() {
        let caps = Capabilities::for_role(Role::Guest);
        assert!(!caps.manage_catalog);
        assert!(!caps.book_seats);
        assert!(!caps.view_own_tickets);

        let caps = Capabilities::for_role(Role::Customer);
        assert!(!caps.manage_catalog);
        assert!(caps.book_seats);
    }
}
