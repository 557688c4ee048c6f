//! EAN-13 symbology for ISBN barcodes.
//!
//! A symbol is 95 modules: start guard, six left digits (L/G parity chosen
//! by the leading digit), center guard, six right digits (R), end guard.

use crate::error::{AppError, AppResult};

/// L-codes for digits 0-9, 7 bits each, MSB first.
/// R is the bitwise complement, G is R reversed.
const L_CODES: [u8; 10] = [
    0b0001101, 0b0011001, 0b0010011, 0b0111101, 0b0100011,
    0b0110001, 0b0101111, 0b0111011, 0b0110111, 0b0001011,
];

/// Parity pattern for the six left digits, selected by the leading digit.
/// Bit i (MSB first over 6 bits) set means position i uses a G-code.
const PARITY: [u8; 10] = [
    0b000000, 0b001011, 0b001101, 0b001110, 0b010011,
    0b011001, 0b011100, 0b010101, 0b010110, 0b011010,
];

/// Compute the EAN-13 check digit over the first 12 digits
pub fn check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// True when the string is 13 digits with a correct check digit.
/// Storage accepts invalid check digits; barcode issuance does not.
pub fn is_valid(isbn: &str) -> bool {
    match parse_digits(isbn) {
        Ok(digits) => check_digit(&digits) == digits[12],
        Err(_) => false,
    }
}

fn parse_digits(isbn: &str) -> AppResult<[u8; 13]> {
    if isbn.len() != 13 || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::Validation(format!(
            "'{}' is not a 13-digit ISBN",
            isbn
        )));
    }
    let mut digits = [0u8; 13];
    for (i, b) in isbn.bytes().enumerate() {
        digits[i] = b - b'0';
    }
    Ok(digits)
}

fn push_code(modules: &mut Vec<bool>, code: u8) {
    for bit in (0..7).rev() {
        modules.push(code >> bit & 1 == 1);
    }
}

fn reverse7(code: u8) -> u8 {
    let mut out = 0u8;
    for bit in 0..7 {
        if code >> bit & 1 == 1 {
            out |= 1 << (6 - bit);
        }
    }
    out
}

/// Encode a 13-digit ISBN into its 95-module sequence. Fails with a
/// validation error when the string is malformed or the check digit is
/// wrong; a book with a bad ISBN can be stored but not printed.
pub fn encode(isbn: &str) -> AppResult<Vec<bool>> {
    let digits = parse_digits(isbn)?;
    if check_digit(&digits) != digits[12] {
        return Err(AppError::Validation(format!(
            "ISBN '{}' has an invalid check digit",
            isbn
        )));
    }

    let mut modules = Vec::with_capacity(95);

    // Start guard
    modules.extend([true, false, true]);

    let parity = PARITY[digits[0] as usize];
    for (i, &d) in digits[1..7].iter().enumerate() {
        let l = L_CODES[d as usize];
        let code = if parity >> (5 - i) & 1 == 1 {
            // G-code: reversed complement of L
            reverse7(!l & 0x7f)
        } else {
            l
        };
        push_code(&mut modules, code);
    }

    // Center guard
    modules.extend([false, true, false, true, false]);

    for &d in &digits[7..13] {
        // R-code: complement of L
        push_code(&mut modules, !L_CODES[d as usize] & 0x7f);
    }

    // End guard
    modules.extend([true, false, true]);

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_known_check_digits() {
        // 978030640615: weighted sum 93, so the check digit is 7
        let digits = [9, 7, 8, 0, 3, 0, 6, 4, 0, 6, 1, 5];
        assert_eq!(check_digit(&digits), 7);
        // All zeros -> 0
        assert_eq!(check_digit(&[0; 12]), 0);
    }

    #[test]
    fn validates_full_isbns() {
        assert!(is_valid("9780306406157"));
        assert!(is_valid("9780000000002"));
        assert!(!is_valid("9780306406158"));
        assert!(!is_valid("978030640615"));
        assert!(!is_valid("97803064061x7"));
    }

    #[test]
    fn symbol_has_ninety_five_modules_and_guards() {
        let modules = encode("9780306406157").unwrap();
        assert_eq!(modules.len(), 95);
        assert_eq!(&modules[0..3], &[true, false, true]);
        assert_eq!(&modules[45..50], &[false, true, false, true, false]);
        assert_eq!(&modules[92..95], &[true, false, true]);
        let dark: usize = modules.iter().filter(|&&m| m).count();
        assert_eq!(dark, 51);
    }

    #[test]
    fn refuses_bad_check_digit() {
        assert!(encode("9780306406158").is_err());
    }
}
