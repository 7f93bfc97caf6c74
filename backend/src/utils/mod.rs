//! Collection of general utility functions.
//!
//! Password hashing and token signing live here so that the auth service, the
//! access guard and the tests can share them.

pub mod crypto;
pub mod jwt;
