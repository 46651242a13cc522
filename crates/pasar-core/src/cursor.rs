//! # Pagination Cursor Codec
//!
//! Keyset pagination over the product catalog with opaque cursors.
//!
//! ## Cursor Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  row id 42                                                              │
//! │     │  decimal string                                                   │
//! │     ▼                                                                   │
//! │  "42" ──AES-GCM(key, random 12-byte nonce)──► nonce ‖ ciphertext ‖ tag  │
//! │                                                     │  hex              │
//! │                                                     ▼                   │
//! │                                   "9f3c…e1"  (what the caller sees)     │
//! │                                                                         │
//! │  Same id encrypts differently every time; tampering fails the tag.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Page Boundaries
//! ```text
//!   direction   rows fetched               prev_cursor        next_cursor
//!   ─────────   ────────────────────────   ────────────────   ────────────────
//!   First       first `limit` by id ASC    ""                 enc(last.id)
//!   Next        id > cursor, ASC           input cursor       enc(last.id)
//!   Prev        id < cursor, closest       enc(first.id)      input cursor
//!               `limit`, shown ASC
//! ```

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use rand::RngCore;

use crate::error::CryptoError;
use crate::validation::PageDirection;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

// =============================================================================
// Cipher
// =============================================================================

/// Symmetric cipher used to seal cursors.
pub trait CursorCipher: Send + Sync {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError>;
    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError>;
}

/// AES-GCM with a 128- or 256-bit key, hex in and hex out.
#[derive(Clone)]
pub struct AesGcmCipher {
    key: AesKey,
}

#[derive(Clone)]
enum AesKey {
    Aes128(Aes128Gcm),
    Aes256(Aes256Gcm),
}

impl AesGcmCipher {
    /// Builds a cipher from a hex-encoded key of 16 or 32 bytes.
    pub fn from_hex_key(hex_key: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_key.trim())
            .map_err(|e| CryptoError::InvalidKey(format!("key is not hex: {e}")))?;

        let key = match bytes.len() {
            16 => AesKey::Aes128(
                Aes128Gcm::new_from_slice(&bytes)
                    .map_err(|e| CryptoError::InvalidKey(e.to_string()))?,
            ),
            32 => AesKey::Aes256(
                Aes256Gcm::new_from_slice(&bytes)
                    .map_err(|e| CryptoError::InvalidKey(e.to_string()))?,
            ),
            n => {
                return Err(CryptoError::InvalidKey(format!(
                    "expected 16 or 32 bytes, got {n}"
                )))
            }
        };

        Ok(AesGcmCipher { key })
    }

    /// Key size in bits.
    pub fn key_bits(&self) -> usize {
        match self.key {
            AesKey::Aes128(_) => 128,
            AesKey::Aes256(_) => 256,
        }
    }
}

impl std::fmt::Debug for AesGcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesGcmCipher")
            .field("key_bits", &self.key_bits())
            .finish_non_exhaustive()
    }
}

impl CursorCipher for AesGcmCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce);
        let nonce_ga = GenericArray::from_slice(&nonce);

        let sealed = match &self.key {
            AesKey::Aes128(cipher) => cipher.encrypt(nonce_ga, plaintext.as_bytes()),
            AesKey::Aes256(cipher) => cipher.encrypt(nonce_ga, plaintext.as_bytes()),
        }
        .map_err(|e| CryptoError::Encrypt(e.to_string()))?;

        // Prepend nonce to ciphertext
        let mut out = nonce.to_vec();
        out.extend_from_slice(&sealed);
        Ok(hex::encode(out))
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        let data = hex::decode(ciphertext)
            .map_err(|e| CryptoError::Decrypt(format!("cursor is not hex: {e}")))?;

        if data.len() <= NONCE_LEN {
            return Err(CryptoError::Decrypt("cursor too short".to_string()));
        }

        let (nonce, sealed) = data.split_at(NONCE_LEN);
        let nonce_ga = GenericArray::from_slice(nonce);

        let plain = match &self.key {
            AesKey::Aes128(cipher) => cipher.decrypt(nonce_ga, sealed),
            AesKey::Aes256(cipher) => cipher.decrypt(nonce_ga, sealed),
        }
        .map_err(|_| CryptoError::Decrypt("authentication failed".to_string()))?;

        String::from_utf8(plain).map_err(|e| CryptoError::Decrypt(e.to_string()))
    }
}

// =============================================================================
// Cursor Codec
// =============================================================================

/// Seals a row id into an opaque cursor.
pub fn encode_cursor(cipher: &dyn CursorCipher, id: i64) -> Result<String, CryptoError> {
    cipher.encrypt(&id.to_string())
}

/// Opens a cursor back into a row id.
pub fn decode_cursor(cipher: &dyn CursorCipher, cursor: &str) -> Result<i64, CryptoError> {
    let plain = cipher.decrypt(cursor)?;
    let id: i64 = plain
        .parse()
        .map_err(|_| CryptoError::InvalidCursor(format!("not a row id: {plain:?}")))?;
    if id < 0 {
        return Err(CryptoError::InvalidCursor(format!("negative row id {id}")));
    }
    Ok(id)
}

/// The keyset position a request asks for.
///
/// `First` never looks at the cursor. `Next`/`Prev` must decrypt it; an
/// empty or tampered cursor is a `CryptoError`.
pub fn resolve_cursor(
    cipher: &dyn CursorCipher,
    direction: PageDirection,
    cursor: &str,
) -> Result<i64, CryptoError> {
    match direction {
        PageDirection::First => Ok(0),
        PageDirection::Next | PageDirection::Prev => decode_cursor(cipher, cursor),
    }
}

// =============================================================================
// Page Cursors
// =============================================================================

/// Cursors and first-page flag for a fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursors {
    pub is_first_page: bool,
    pub prev_cursor: String,
    pub next_cursor: String,
}

impl PageCursors {
    /// Computes boundary cursors for a non-empty page.
    ///
    /// `first_id`/`last_id` are the ids of the first and last rows in
    /// display (ascending) order. `input_cursor` is echoed back unchanged
    /// on the side the caller came from.
    pub fn compute(
        cipher: &dyn CursorCipher,
        direction: PageDirection,
        cursor_id: i64,
        input_cursor: &str,
        first_id: i64,
        last_id: i64,
    ) -> Result<Self, CryptoError> {
        let (prev_cursor, next_cursor) = match direction {
            PageDirection::First => (String::new(), encode_cursor(cipher, last_id)?),
            PageDirection::Next => (input_cursor.to_string(), encode_cursor(cipher, last_id)?),
            PageDirection::Prev => (encode_cursor(cipher, first_id)?, input_cursor.to_string()),
        };

        Ok(PageCursors {
            is_first_page: cursor_id == 0,
            prev_cursor,
            next_cursor,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_256: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";
    const KEY_128: &str = "00112233445566778899aabbccddeeff";

    fn cipher() -> AesGcmCipher {
        AesGcmCipher::from_hex_key(KEY_256).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let c = cipher();
        let sealed = c.encrypt("42").unwrap();
        assert_eq!(c.decrypt(&sealed).unwrap(), "42");

        let c128 = AesGcmCipher::from_hex_key(KEY_128).unwrap();
        assert_eq!(c128.key_bits(), 128);
        assert_eq!(c128.decrypt(&c128.encrypt("42").unwrap()).unwrap(), "42");
    }

    #[test]
    fn test_ciphertext_is_randomized_hex() {
        let c = cipher();
        let a = c.encrypt("42").unwrap();
        let b = c.encrypt("42").unwrap();
        assert_ne!(a, b);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
        // nonce + 2 plaintext bytes + 16-byte tag
        assert_eq!(a.len(), 2 * (NONCE_LEN + 2 + 16));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let c = cipher();
        let sealed = c.encrypt("42").unwrap();

        let mut bytes = hex::decode(&sealed).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        let tampered = hex::encode(bytes);

        assert!(matches!(c.decrypt(&tampered), Err(CryptoError::Decrypt(_))));
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = cipher().encrypt("42").unwrap();
        let other = AesGcmCipher::from_hex_key(KEY_128).unwrap();
        assert!(other.decrypt(&sealed).is_err());
    }

    #[test]
    fn test_malformed_input() {
        let c = cipher();
        assert!(matches!(c.decrypt(""), Err(CryptoError::Decrypt(_))));
        assert!(matches!(c.decrypt("zz"), Err(CryptoError::Decrypt(_))));
        assert!(matches!(c.decrypt("00ff"), Err(CryptoError::Decrypt(_))));
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(
            AesGcmCipher::from_hex_key("not-hex"),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(
            AesGcmCipher::from_hex_key("0011"),
            Err(CryptoError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_decode_cursor_rejects_non_ids() {
        let c = cipher();
        assert_eq!(decode_cursor(&c, &encode_cursor(&c, 10).unwrap()).unwrap(), 10);

        let words = c.encrypt("ten").unwrap();
        assert!(matches!(
            decode_cursor(&c, &words),
            Err(CryptoError::InvalidCursor(_))
        ));
        let negative = c.encrypt("-5").unwrap();
        assert!(decode_cursor(&c, &negative).is_err());
    }

    #[test]
    fn test_resolve_cursor() {
        let c = cipher();
        assert_eq!(resolve_cursor(&c, PageDirection::First, "garbage").unwrap(), 0);

        let sealed = encode_cursor(&c, 5).unwrap();
        assert_eq!(resolve_cursor(&c, PageDirection::Next, &sealed).unwrap(), 5);
        assert_eq!(resolve_cursor(&c, PageDirection::Prev, &sealed).unwrap(), 5);
        assert!(resolve_cursor(&c, PageDirection::Next, "").is_err());
    }

    #[test]
    fn test_page_cursors_first_page() {
        let c = cipher();
        let page = PageCursors::compute(&c, PageDirection::First, 0, "", 1, 5).unwrap();
        assert!(page.is_first_page);
        assert_eq!(page.prev_cursor, "");
        assert_eq!(decode_cursor(&c, &page.next_cursor).unwrap(), 5);
    }

    #[test]
    fn test_page_cursors_next_echoes_input() {
        let c = cipher();
        let input = encode_cursor(&c, 5).unwrap();
        let page = PageCursors::compute(&c, PageDirection::Next, 5, &input, 6, 10).unwrap();
        assert!(!page.is_first_page);
        assert_eq!(page.prev_cursor, input);
        assert_eq!(decode_cursor(&c, &page.next_cursor).unwrap(), 10);
    }

    #[test]
    fn test_page_cursors_prev_echoes_input() {
        let c = cipher();
        let input = encode_cursor(&c, 11).unwrap();
        let page = PageCursors::compute(&c, PageDirection::Prev, 11, &input, 6, 10).unwrap();
        assert_eq!(page.next_cursor, input);
        assert_eq!(decode_cursor(&c, &page.prev_cursor).unwrap(), 6);
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", cipher());
        assert!(rendered.contains("256"));
        assert!(!rendered.contains("0102030405"));
    }
}
