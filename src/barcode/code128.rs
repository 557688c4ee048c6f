//! Code 128 symbology (code set B) for client badge barcodes.
//!
//! Short codes are uppercase alphanumerics, so set B covers them without
//! shifts. Each symbol value is 11 modules written as six alternating
//! bar/space widths; the stop pattern is 13 modules.

use crate::error::{AppError, AppResult};

/// Bar/space widths for symbol values 0-104 (values 103-105 are the start
/// codes; this implementation only ever emits Start B = 104).
const PATTERNS: [&[u8; 6]; 105] = [
    b"212222", b"222122", b"222221", b"121223", b"121322", // 0-4
    b"131222", b"122213", b"122312", b"132212", b"221213", // 5-9
    b"221312", b"231212", b"112232", b"122132", b"122231", // 10-14
    b"113222", b"123122", b"123221", b"223211", b"221132", // 15-19
    b"221231", b"213212", b"223112", b"312131", b"311222", // 20-24
    b"321122", b"321221", b"312212", b"322112", b"322211", // 25-29
    b"212123", b"212321", b"232121", b"111323", b"131123", // 30-34
    b"131321", b"112313", b"132113", b"132311", b"211313", // 35-39
    b"231113", b"231311", b"112133", b"112331", b"132131", // 40-44
    b"113123", b"113321", b"133121", b"313121", b"211331", // 45-49
    b"231131", b"213113", b"213311", b"213131", b"311123", // 50-54
    b"311321", b"331121", b"312113", b"312311", b"332111", // 55-59
    b"314111", b"221411", b"431111", b"111224", b"111422", // 60-64
    b"121124", b"121421", b"141122", b"141221", b"112214", // 65-69
    b"112412", b"122114", b"122411", b"142112", b"142211", // 70-74
    b"241211", b"221114", b"413111", b"241112", b"134111", // 75-79
    b"111242", b"121142", b"121241", b"114212", b"124112", // 80-84
    b"124211", b"411212", b"421112", b"421211", b"212141", // 85-89
    b"214121", b"412121", b"111143", b"111341", b"131141", // 90-94
    b"114113", b"114311", b"411113", b"411311", b"113141", // 95-99
    b"114131", b"311141", b"411131", b"211412", b"211214", // 100-104
];

const START_B: u8 = 104;
const STOP: &[u8; 7] = b"2331112";

fn push_pattern(modules: &mut Vec<bool>, widths: &[u8]) {
    let mut bar = true;
    for &w in widths {
        for _ in 0..(w - b'0') {
            modules.push(bar);
        }
        bar = !bar;
    }
}

/// Symbol value of a character in code set B
fn value_of(c: char) -> AppResult<u8> {
    let b = c as u32;
    if (32..=127).contains(&b) {
        Ok((b - 32) as u8)
    } else {
        Err(AppError::Validation(format!(
            "Character '{}' cannot be encoded in Code 128 set B",
            c
        )))
    }
}

/// Modulo-103 check symbol over start code and data values
pub fn checksum(values: &[u8]) -> u8 {
    let sum: u32 = START_B as u32
        + values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as u32 + 1) * v as u32)
            .sum::<u32>();
    (sum % 103) as u8
}

/// Encode text into a Code 128 (set B) module sequence
pub fn encode(text: &str) -> AppResult<Vec<bool>> {
    if text.is_empty() {
        return Err(AppError::Validation(
            "Cannot encode an empty barcode".to_string(),
        ));
    }

    let values: Vec<u8> = text.chars().map(value_of).collect::<AppResult<_>>()?;

    let mut modules = Vec::with_capacity(11 * (values.len() + 2) + 13);
    push_pattern(&mut modules, PATTERNS[START_B as usize]);
    for &v in &values {
        push_pattern(&mut modules, PATTERNS[v as usize]);
    }
    push_pattern(&mut modules, PATTERNS[checksum(&values) as usize]);
    push_pattern(&mut modules, STOP);

    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_spans_eleven_modules() {
        for p in PATTERNS {
            let total: u32 = p.iter().map(|&w| (w - b'0') as u32).sum();
            assert_eq!(total, 11);
        }
        let stop: u32 = STOP.iter().map(|&w| (w - b'0') as u32).sum();
        assert_eq!(stop, 13);
    }

    #[test]
    fn checksum_matches_worked_example() {
        // "AB12" in set B: values 33, 34, 17, 18
        // 104 + 1*33 + 2*34 + 3*17 + 4*18 = 328; 328 mod 103 = 19
        assert_eq!(checksum(&[33, 34, 17, 18]), 19);
    }

    #[test]
    fn symbol_layout_is_start_data_check_stop() {
        let modules = encode("AB12").unwrap();
        assert_eq!(modules.len(), 11 * 6 + 13);
        // Symbols begin with a bar and the stop pattern ends with one
        assert!(modules[0]);
        assert!(modules[modules.len() - 1]);
    }

    #[test]
    fn rejects_characters_outside_set_b() {
        assert!(encode("caf\u{e9}").is_err());
        assert!(encode("").is_err());
    }
}
