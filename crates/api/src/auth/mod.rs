//! Authentication primitives.
//!
//! - [`jwt`] -- verification (and, for tooling and tests, minting) of the
//!   HS256 identity tokens issued by the sign-in provider.

pub mod jwt;
