// src/scrape/lookup.rs
//! Single-record lookups: one network, one handle, our own resource summary.

use tracing::info;

use crate::{
    config::consts::{ HANDLE_PATH, MENU_HANDLE_SEARCH, MENU_RESOURCE_MANAGER, MENU_SEARCH_IPV6 },
    core::{ html::parse, Transport },
    error::{ PortalError, Result },
    specs::{
        detail::{ read_one, HandleDetail, InfoDetail, HANDLE_DETAIL, NETWORK_DETAIL },
        resource::{ self, ResourceInfo },
    },
};

use super::portal::Portal;

impl<T: Transport> Portal<T> {
    /// Detail page of one registration, by its portal path
    /// (`/jpnic/entryinfo_v4.do?...` as linked from a listing).
    pub fn ip_detail(&mut self, path: &str) -> Result<InfoDetail> {
        // the portal serves detail pages only after a menu visit
        self.menu(MENU_HANDLE_SEARCH)?;
        let (_, page) = self.get_path(path)?;
        let detail: InfoDetail = read_one(&parse(&page), &NETWORK_DETAIL)?;
        info!(ip = %detail.ip_address, "network detail read");
        Ok(detail)
    }

    pub fn handle_detail(&mut self, handle: &str) -> Result<HandleDetail> {
        if handle.trim().is_empty() {
            return Err(PortalError::Config(s!("empty handle")));
        }
        self.open(MENU_SEARCH_IPV6)?;
        let (_, page) = self.get_path(&join!(HANDLE_PATH, handle.trim()))?;
        let detail: HandleDetail = read_one(&parse(&page), &HANDLE_DETAIL)?;
        info!(handle = %detail.handle, person = detail.is_jpnic_handle, "handle detail read");
        Ok(detail)
    }

    /// Resource-manager summary, with the raw page for callers that keep it.
    pub fn resource_management(&mut self) -> Result<(ResourceInfo, String)> {
        let (_, page) = self.open(MENU_RESOURCE_MANAGER)?;
        let info = resource::parse_doc(&parse(&page))?;
        info!(blocks = info.cidr_blocks.len(), "resource summary read");
        Ok((info, page))
    }
}
