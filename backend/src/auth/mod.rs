//! Authentication module for user accounts, tokens and access control.
//!
//! This module provides signup, login and token refresh, the token-checking
//! middleware, and the role/ownership policy checks used by the user routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod policy;
pub mod routes;
pub mod service;
