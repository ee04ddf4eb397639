// src/specs/control.rs
//! Plain-text control protocol of the transactional endpoint.
//!
//! The reply is one `KEY=value` per line:
//!
//! ```text
//! RET=01
//! RET_CODE=00000120
//! RECEP_NO=2024012345
//! ADM_JPNIC_HDL=EXG001JP
//! TECH1_JPNIC_HDL=TY1234JP
//! ```
//!
//! `RET` is the overall code (`00` = accepted). Each `RET_CODE` is an
//! 8-character composite: characters 4..7 are the interface code, 7.. the
//! error genre. `000` / `0` mean "nothing to report" for that segment.
//! A 7-character short form also occurs; see `segments`.

use serde::Serialize;
use tracing::{ debug, warn };

use crate::classify::ErrorClassifier;
use crate::error::{ PortalError, Result };

const UNREADABLE: &str = "unreadable result code";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InterfaceError {
    pub interface_code: String,
    pub genre_code: String,
    /// `"{iface}: {text}"`, `"_{text}"`, or both, in that order.
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResultOutcome {
    pub recep_no: String,
    pub adm_handle: String,
    pub tech1_handle: String,
    pub tech2_handle: String,
    pub overall_code: String,
    pub top_level_error: Option<String>,
    pub interface_errors: Vec<InterfaceError>,
}

impl ResultOutcome {
    pub fn is_ok(&self) -> bool {
        self.top_level_error.is_none() && self.interface_errors.is_empty()
    }

    /// Every message, top-level first, as one `Application` error.
    pub fn into_result(self) -> Result<Self> {
        if self.is_ok() {
            return Ok(self);
        }
        let mut parts: Vec<&str> = Vec::new();
        if let Some(top) = &self.top_level_error {
            parts.push(top);
        }
        parts.extend(self.interface_errors.iter().map(|e| e.message.as_str()));
        Err(PortalError::Application(parts.join("; ")))
    }
}

/// Never fails: an unreadable code becomes an error entry of its own, so the
/// overall code, receipt number and handles always reach the caller.
pub fn parse(text: &str, classifier: &ErrorClassifier) -> ResultOutcome {
    let mut out = ResultOutcome { overall_code: s!("00"), ..ResultOutcome::default() };
    let mut composites: Vec<String> = Vec::new();

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(v) = line.strip_prefix("RET=") {
            out.overall_code = v.trim().to_string();
        } else if let Some(v) = line.strip_prefix("RET_CODE=") {
            composites.push(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix("RECEP_NO=") {
            out.recep_no = v.to_string();
        } else if let Some(v) = line.strip_prefix("ADM_JPNIC_HDL=") {
            out.adm_handle = v.to_string();
        } else if let Some(v) = line.strip_prefix("TECH1_JPNIC_HDL=") {
            out.tech1_handle = v.to_string();
        } else if let Some(v) = line.strip_prefix("TECH2_JPNIC_HDL=") {
            out.tech2_handle = v.to_string();
        }
    }

    if out.overall_code != "00" {
        let text = classifier.text(&out.overall_code).unwrap_or_else(|| {
            warn!(ret = %out.overall_code, "non-numeric RET");
            s!(UNREADABLE)
        });
        out.top_level_error = Some(join!(&out.overall_code, ": ", &text));
    }

    out.interface_errors = composites.iter().filter_map(|c| decode_composite(c, classifier)).collect();

    debug!(ret = %out.overall_code, codes = composites.len(), errors = out.interface_errors.len(), "control response parsed");
    out
}

/// Split a composite into (interface, genre).
///
/// Full form is 8 digits, `[4..7]` interface and `[7..]` genre. The portal
/// also answers with a 7-digit short form, interface first and genre last
/// (`0120000` is interface `012`, genre `0`).
fn segments(code: &str) -> Option<(&str, &str)> {
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match code.len() {
        7 => Some((&code[..3], &code[6..])),
        n if n >= 8 => Some((&code[4..7], &code[7..])),
        _ => None,
    }
}

fn decode_composite(code: &str, classifier: &ErrorClassifier) -> Option<InterfaceError> {
    let Some((iface, genre)) = segments(code) else {
        warn!(code, "unreadable RET_CODE");
        return Some(InterfaceError {
            interface_code: code.to_string(),
            genre_code: s!(),
            message: join!(code, ": ", UNREADABLE),
        });
    };

    let mut message = s!();
    if iface != "000" {
        let text = classifier.text(iface).unwrap_or_else(|| s!(UNREADABLE));
        message.push_str(&join!(iface, ": ", &text));
    }
    if genre != "0" {
        let text = classifier.text(genre).unwrap_or_else(|| s!(UNREADABLE));
        message.push('_');
        message.push_str(&text);
    }

    (!message.is_empty()).then(|| InterfaceError {
        interface_code: iface.to_string(),
        genre_code: genre.to_string(),
        message,
    })
}
