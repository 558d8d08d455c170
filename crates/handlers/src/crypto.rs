// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sealed-file format used by `encrypt`/`decrypt`: AES-256-GCM with a
//! key derived from the password by PBKDF2-HMAC-SHA256.
//!
//! The spec's source derived the key with plain SHA-256 and flagged this
//! as an open question; PBKDF2 is the chosen resolution (see DESIGN.md).
//! Wire format: `salt(16) || nonce(12) || ciphertext-with-tag`.

use std::num::NonZeroU32;

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};

use crate::error::HandlerError;

const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;
const PBKDF2_ITERATIONS: u32 = 210_000;

fn derive_key(password: &str, salt: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    let iterations = NonZeroU32::new(PBKDF2_ITERATIONS).expect("nonzero literal");
    pbkdf2::derive(pbkdf2::PBKDF2_HMAC_SHA256, iterations, salt, password.as_bytes(), &mut key);
    key
}

/// Seals `plaintext` under `password`, producing the on-disk wire format.
pub fn seal(plaintext: &[u8], password: &str) -> Result<Vec<u8>, HandlerError> {
    let rng = SystemRandom::new();

    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt).map_err(|_| HandlerError::DecryptionFailed)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes).map_err(|_| HandlerError::DecryptionFailed)?;

    let key = derive_key(password, &salt);
    let unbound = UnboundKey::new(&AES_256_GCM, &key).map_err(|_| HandlerError::DecryptionFailed)?;
    let sealing_key = LessSafeKey::new(unbound);

    let mut in_out = plaintext.to_vec();
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);
    sealing_key
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| HandlerError::DecryptionFailed)?;

    let mut out = Vec::with_capacity(SALT_LEN + NONCE_LEN + in_out.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&in_out);
    Ok(out)
}

/// Opens a sealed payload produced by [`seal`], returning the plaintext.
pub fn open(sealed: &[u8], password: &str) -> Result<Vec<u8>, HandlerError> {
    if sealed.len() < SALT_LEN + NONCE_LEN {
        return Err(HandlerError::DecryptionFailed);
    }
    let (salt, rest) = sealed.split_at(SALT_LEN);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);

    let key = derive_key(password, salt);
    let unbound = UnboundKey::new(&AES_256_GCM, &key).map_err(|_| HandlerError::DecryptionFailed)?;
    let opening_key = LessSafeKey::new(unbound);

    let mut in_out = ciphertext.to_vec();
    let nonce_array: [u8; NONCE_LEN] =
        nonce_bytes.try_into().map_err(|_| HandlerError::DecryptionFailed)?;
    let nonce = Nonce::assume_unique_for_key(nonce_array);
    let plaintext = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| HandlerError::DecryptionFailed)?;
    Ok(plaintext.to_vec())
}
