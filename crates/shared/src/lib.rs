//! Shared utilities and common types for the Atelier teams backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT verification for bearer tokens issued by the identity provider
//! - Common validation logic for request payloads

pub mod jwt;
pub mod validation;
