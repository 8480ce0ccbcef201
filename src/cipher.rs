// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! File encryption with a process-lifetime key.
//!
//! One AES-256 key is generated from the OS RNG when the cipher is
//! constructed. It is never persisted, rotated, or shared across
//! processes, so artifacts are only decryptable within the run that
//! produced them. This is a placeholder design: real key derivation,
//! storage, and per-purchase scoping are out of scope.

use crate::BotError;
use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit, OsRng},
};
use std::path::Path;

/// The size of the AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;
/// The size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Symmetric file cipher holding the process-wide key.
pub struct FileCipher {
    cipher: Aes256Gcm,
}

impl FileCipher {
    /// Generates a fresh random key and constructs the cipher.
    pub fn new() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        FileCipher {
            cipher: Aes256Gcm::new(&key.into()),
        }
    }

    /// Encrypts a plaintext into a self-contained artifact.
    ///
    /// A random nonce is generated per call and prepended to the
    /// AES-GCM ciphertext, so the returned bytes carry everything
    /// needed for [`FileCipher::decrypt`] under the same key.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, BotError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| BotError::Cipher(format!("encrypt: {e}")))?;

        let mut artifact = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        artifact.extend_from_slice(&nonce_bytes);
        artifact.extend_from_slice(&ciphertext);
        Ok(artifact)
    }

    /// Decrypts an artifact produced by [`FileCipher::encrypt`].
    pub fn decrypt(&self, artifact: &[u8]) -> Result<Vec<u8>, BotError> {
        if artifact.len() < NONCE_SIZE {
            return Err(BotError::Cipher("artifact too short".into()));
        }
        let (nonce_bytes, ciphertext) = artifact.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| BotError::Cipher(format!("decrypt: {e}")))
    }

    /// Reads a source file and encrypts its contents.
    ///
    /// An unreadable file maps to [`BotError::Cipher`].
    pub fn encrypt_file(&self, path: &Path) -> Result<Vec<u8>, BotError> {
        let plaintext = std::fs::read(path)
            .map_err(|e| BotError::Cipher(format!("read {}: {e}", path.display())))?;
        self.encrypt(&plaintext)
    }
}

impl Default for FileCipher {
    fn default() -> Self {
        Self::new()
    }
}
