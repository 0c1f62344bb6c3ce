//! authcore — stateless JWT authentication and role-based authorization.
//!
//! The crate is the request-scoped security core of a user-facing backend:
//! bcrypt credential hashing, HMAC-signed access/refresh token issuance and
//! verification, a login/refresh flow over a pluggable user store, and a
//! role-gated authorization layer that resolves a [`models::Principal`] from
//! a bearer token.
//!
//! Transport, routing, and persistence schemas live outside this crate. The
//! HTTP layer is expected to extract the bearer token from the
//! `Authorization` header (see [`gate::bearer_token`]), call into
//! [`gate::AuthGate`], and rely on the [`errors::AuthError`] `IntoResponse`
//! impl for status-code mapping.

pub mod config;
pub mod errors;
pub mod flow;
pub mod gate;
pub mod models;
pub mod password;
pub mod store;
pub mod token;
