//! Request extractors that identify the planner user and gate routes by role.
//!
//! - [`auth::AuthUser`]: the signed-in user, from the bearer token.
//! - [`rbac::RequireAdmin`], [`rbac::RequireEditor`], [`rbac::RequireAuth`]:
//!   role gates used in handler signatures.

pub mod auth;
pub mod rbac;
