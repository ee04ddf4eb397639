// src/specs/menu.rs
//! Menu navigation.
//!
//! The login page doubles as the member menu: every workflow is an anchor
//! whose visible text is its label. Labels are matched exactly (after
//! trimming). A miss means the menu changed or we never got logged in.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ Html, Selector };
use tracing::{ debug, info };

use crate::config::consts::LOGIN_PATH;
use crate::core::html::{ parse, sel, text_of, title };
use crate::core::net::{ resolve as resolve_href, Net, Transport };
use crate::error::{ PortalError, Result };

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub href: String,
}

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| sel("a[href]"));

/// All labelled links on the page, in document order.
pub fn entries(doc: &Html) -> Vec<MenuEntry> {
    doc.select(&ANCHOR)
        .filter_map(|a| {
            let label = text_of(a);
            let href = a.value().attr("href")?;
            (!label.is_empty()).then(|| MenuEntry { label, href: href.to_string() })
        })
        .collect()
}

pub fn find_entry(doc: &Html, label: &str) -> Option<MenuEntry> {
    doc.select(&ANCHOR)
        .find(|a| text_of(*a) == label)
        .and_then(|a| {
            a.value().attr("href").map(|href| MenuEntry { label: label.to_string(), href: href.to_string() })
        })
}

/// Fetch the navigation page and return the absolute URL behind `label`.
pub fn resolve<T: Transport + ?Sized>(net: &mut Net<'_, T>, base: &Url, label: &str) -> Result<Url> {
    let menu_url = base.join(LOGIN_PATH)
        .map_err(|e| PortalError::Config(format!("base url {base}: {e}")))?;
    let page = net.get_page(&menu_url)?;
    let doc = parse(&page);

    let entry = find_entry(&doc, label).ok_or_else(|| {
        debug!(labels = ?entries(&doc).iter().map(|e| e.label.as_str()).collect::<Vec<_>>(), "menu labels on page");
        let page_title = title(&doc).unwrap_or_else(|| s!("untitled page"));
        PortalError::structural(
            join!(menu_url.as_str(), " (", &page_title, ")"),
            format!("menu entry {label:?} not found; layout changed or not logged in"),
        )
    })?;

    let target = resolve_href(&menu_url, &entry.href)?;
    info!(label, %target, "menu resolved");
    Ok(target)
}
