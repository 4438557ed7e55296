// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Password hashing with Argon2id
//!
//! Hashes are stored in PHC string format, which embeds the salt and
//! parameters, so verification needs no extra state.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};

use crate::error::{Result, TaskdError};

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TaskdError::Unauthorized(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC hash
///
/// A malformed stored hash verifies as false rather than erroring, so a
/// corrupt row cannot be distinguished from a wrong password by a caller.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
