//! Name normalization for cross-renumbering matching.
//!
//! Entry names accumulate whitespace and decorative emoji over time while
//! remaining "the same name" to a human. Matching happens on a normalized
//! form with both stripped. Variation selectors and fullwidth punctuation
//! are *not* stripped; the declared exception table accounts for them.

/// Unicode scalar ranges treated as decorative symbols.
const SYMBOL_RANGES: &[(u32, u32)] = &[
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport and map symbols
    (0x1F700, 0x1F77F), // alchemical symbols
    (0x1F780, 0x1F7FF), // geometric shapes extended
    (0x1F800, 0x1F8FF), // supplemental arrows-C
    (0x1F900, 0x1F9FF), // supplemental symbols and pictographs
    (0x1FA00, 0x1FA6F), // chess symbols
    (0x1FA70, 0x1FAFF), // symbols and pictographs extended-A
];

fn is_symbol(c: char) -> bool {
    let cp = c as u32;
    SYMBOL_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Strip all whitespace and decorative symbols.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && !is_symbol(*c))
        .collect()
}
