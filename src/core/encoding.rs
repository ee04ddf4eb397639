// src/core/encoding.rs
//! UTF-8 <-> Shift_JIS bridge.
//!
//! Strict in both directions: the portal accepts a mangled body without
//! complaint and stores the garbage, so an unmappable character has to fail
//! the request instead of being replaced.

use encoding_rs::SHIFT_JIS;

use crate::error::{ PortalError, Result };

pub fn to_legacy(text: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = SHIFT_JIS.encode(text);
    if had_errors {
        let bad = first_unmappable(text).unwrap_or('\u{FFFD}');
        return Err(PortalError::Encoding(format!(
            "character {bad:?} (U+{:04X}) has no Shift_JIS mapping",
            bad as u32
        )));
    }
    Ok(bytes.into_owned())
}

pub fn from_legacy(bytes: &[u8]) -> Result<String> {
    SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|s| s.into_owned())
        .ok_or_else(|| {
            let at = first_malformed(bytes);
            PortalError::Encoding(format!("malformed Shift_JIS input near byte {at}"))
        })
}

fn first_unmappable(text: &str) -> Option<char> {
    let mut buf = [0u8; 4];
    text.chars().find(|c| SHIFT_JIS.encode(c.encode_utf8(&mut buf)).2)
}

// Coarse position for the error message: longest prefix that still decodes.
fn first_malformed(bytes: &[u8]) -> usize {
    let (mut lo, mut hi) = (0usize, bytes.len());
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        let ok = SHIFT_JIS
            .decode_without_bom_handling_and_without_replacement(&bytes[..mid])
            .is_some();
        if ok { lo = mid } else { hi = mid - 1 }
    }
    lo
}
