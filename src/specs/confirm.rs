// src/specs/confirm.rs
//! Two-phase write pages: the confirmation screen and the receipt.

use std::sync::LazyLock;

use scraper::{ Html, Selector };

use crate::config::consts::{ CONFIRM_PHRASE, RECEIPT_LABEL };
use crate::core::html::{ prev_element, sel, text_of };
use crate::error::{ PortalError, Result };

static RED_FONT: LazyLock<Selector> = LazyLock::new(|| sel(r#"font[color="red"]"#));
static RECEIPT_CELLS: LazyLock<Selector> = LazyLock::new(|| sel("table > * table > * td"));

/// The portal only asks to confirm when it accepted the input. Anything
/// else is a rejection; the reason is the last red text on the page.
pub fn require_confirmation(page: &str, doc: &Html) -> Result<()> {
    if page.contains(CONFIRM_PHRASE) {
        return Ok(());
    }
    let reason = doc
        .select(&RED_FONT)
        .map(text_of)
        .filter(|t| !t.is_empty())
        .last()
        .unwrap_or_else(|| s!("unexpected response to the application form"));
    Err(PortalError::Application(reason))
}

/// Receipt number: the cell right after the one captioned `受付番号`.
pub fn receipt_number(doc: &Html) -> Option<String> {
    doc.select(&RECEIPT_CELLS)
        .find(|td| prev_element(*td).is_some_and(|p| text_of(p).contains(RECEIPT_LABEL)))
        .map(text_of)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::html::parse;

    #[test]
    fn rejection_reason_is_last_red_text() {
        let page = r#"<html><body>
            <font color="red">入力内容に誤りがあります</font>
            <p><font color="red">郵便番号の形式が正しくありません</font></p>
            </body></html>"#;
        match require_confirmation(page, &parse(page)) {
            Err(PortalError::Application(m)) => assert_eq!(m, "郵便番号の形式が正しくありません"),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn rejection_without_reason() {
        let page = "<html><body>システムエラー</body></html>";
        match require_confirmation(page, &parse(page)) {
            Err(PortalError::Application(m)) => assert!(m.contains("unexpected response")),
            other => panic!("expected application error, got {other:?}"),
        }
    }

    #[test]
    fn finds_receipt_number() {
        let doc = parse(r#"<table><tr><td><table>
            <tr><td>申請種別</td><td>担当者変更</td></tr>
            <tr><td>受付番号</td><td> 2024001234 </td></tr>
            </table></td></tr></table>"#);
        assert_eq!(receipt_number(&doc).as_deref(), Some("2024001234"));
        assert_eq!(receipt_number(&parse("<p>done</p>")), None);
    }
}
