// src/scrape/requests.rs
use tracing::info;

use crate::{
    config::consts::{ CAPTION_SEARCH_SJIS, FIELD_DESTDISP, MENU_REQUEST_LIST },
    core::{ html::parse, Transport },
    error::Result,
    specs::{
        form,
        listings::{ RequestInfo, REQUEST_LIST },
        schema::extract_as,
    },
};

use super::portal::Portal;

impl<T: Transport> Portal<T> {
    /// Applications from receipt number `start` on.
    pub fn request_list(&mut self, start: &str) -> Result<Vec<RequestInfo>> {
        let (menu_url, page) = self.open(MENU_REQUEST_LIST)?;
        let seed = form::extract_last(&parse(&page), |a| !a.is_empty())?;

        let body = form_body! {
            FIELD_DESTDISP => seed.value_or_empty(FIELD_DESTDISP),
            "startRecepNo" => start,
            "endRecepNo" => "",
            "deliNo" => "",
            "aplyKind" => "",
            "aplyClass" => "",
            "resceAdmSnm" => "",
            "aplyDateS" => "",
            "aplyDateE" => "",
            "completDateS" => "",
            "completDateE" => "",
            "statusId" => "",
            "pswdResceNewConfirm" => CAPTION_SEARCH_SJIS,
        };
        let (_, reply) = self.submit(&menu_url, &seed.action, &body)?;

        let rows: Vec<RequestInfo> = extract_as(&parse(&reply), &REQUEST_LIST)?;
        info!(rows = rows.len(), start, "request list read");
        Ok(rows)
    }
}
