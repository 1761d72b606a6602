//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256 signing, base64url)
//! - Password hashing (Argon2id with a fixed work factor)
//! - Cookie building and extraction

pub mod cookie;
pub mod crypto;
pub mod password;
