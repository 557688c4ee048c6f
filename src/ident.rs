//! Identifier codec: reversible mapping between a client's 128-bit UUID and
//! a short fixed-length code suitable for Code 128 barcodes.
//!
//! The code is the UUID's 128-bit value written in Crockford base32: 26
//! uppercase characters from an alphabet with no ambiguous letters. This is
//! a pure base conversion, not a hash, so `decode(encode(id)) == id` for
//! every UUID and decoding an ill-formed code fails instead of silently
//! producing a wrong identifier. Decoding is case-insensitive and accepts
//! the usual Crockford aliases (I/L read as 1, O as 0).

use uuid::Uuid;

use crate::error::{AppError, AppResult};

const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// ceil(128 / 5) base-32 digits
pub const SHORT_ID_LEN: usize = 26;

/// Encode a client identifier as its fixed-length short code.
pub fn encode(id: Uuid) -> String {
    let mut value = id.as_u128();
    let mut out = [b'0'; SHORT_ID_LEN];
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET[(value & 0x1f) as usize];
        value >>= 5;
    }
    // 26 digits cover 130 bits, so a u128 always fits
    debug_assert_eq!(value, 0);
    String::from_utf8_lossy(&out).into_owned()
}

/// Decode a short code back into the client identifier. Fails with
/// `InvalidIdentifier` on wrong length, characters outside the alphabet, or
/// a value that does not fit in 128 bits.
pub fn decode(code: &str) -> AppResult<Uuid> {
    if code.len() != SHORT_ID_LEN {
        return Err(AppError::InvalidIdentifier(format!(
            "Short code must be {} characters, got {}",
            SHORT_ID_LEN,
            code.len()
        )));
    }

    let mut value: u128 = 0;
    for c in code.chars() {
        let digit = digit_value(c).ok_or_else(|| {
            AppError::InvalidIdentifier(format!("Character '{}' is not in the short code alphabet", c))
        })?;
        value = value
            .checked_mul(32)
            .and_then(|v| v.checked_add(digit as u128))
            .ok_or_else(|| {
                AppError::InvalidIdentifier("Short code is out of range".to_string())
            })?;
    }

    Ok(Uuid::from_u128(value))
}

fn digit_value(c: char) -> Option<u8> {
    let c = c.to_ascii_uppercase();
    match c {
        'I' | 'L' => Some(1),
        'O' => Some(0),
        _ => ALPHABET.iter().position(|&a| a == c as u8).map(|p| p as u8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_kind_of_uuid() {
        for id in [
            Uuid::nil(),
            Uuid::from_u128(u128::MAX),
            Uuid::from_u128(1),
            Uuid::new_v4(),
            Uuid::new_v4(),
        ] {
            let code = encode(id);
            assert_eq!(code.len(), SHORT_ID_LEN);
            assert_eq!(decode(&code).unwrap(), id);
        }
    }

    #[test]
    fn decoding_is_case_insensitive() {
        let id = Uuid::new_v4();
        let code = encode(id);
        assert_eq!(decode(&code.to_lowercase()).unwrap(), id);
    }

    #[test]
    fn ambiguous_characters_alias_onto_digits() {
        let zero = encode(Uuid::nil());
        let aliased = zero.replace('0', "O");
        assert_eq!(decode(&aliased).unwrap(), Uuid::nil());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            decode("ABC"),
            Err(AppError::InvalidIdentifier(_))
        ));
        let too_long = "0".repeat(SHORT_ID_LEN + 1);
        assert!(decode(&too_long).is_err());
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        let mut code = encode(Uuid::nil());
        code.replace_range(0..1, "U");
        assert!(matches!(
            decode(&code),
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn rejects_values_above_the_identifier_domain() {
        // 26 base-32 digits reach 130 bits; the top digit must stay below 4
        let out_of_range = format!("Z{}", "0".repeat(SHORT_ID_LEN - 1));
        assert!(matches!(
            decode(&out_of_range),
            Err(AppError::InvalidIdentifier(_))
        ));
    }
}
