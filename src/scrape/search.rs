// src/scrape/search.rs
//! Registration search (IPv4 / IPv6) and the optional detail traversal.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ Html, Selector };
use serde::Deserialize;
use tracing::{ debug, info, warn };

use crate::{
    config::consts::*,
    core::{ html::{ parse, sel }, Transport },
    error::{ PortalError, Result },
    progress::Progress,
    specs::{
        detail::{ read_one, HandleDetail, InfoDetail, HANDLE_DETAIL, NETWORK_DETAIL },
        form::{ self, flag, FormSeed },
        listings::{ DetailRow, InfoIpv4, InfoIpv6, IPV4_LISTING, IPV6_LISTING },
        schema::extract_as,
    },
};

use super::links::{ LinkResolutionCache, RateLimiter };
use super::portal::Portal;

/// IPv4 search criteria. Empty strings leave a criterion open.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchIpv4 {
    pub ip_address: String,
    pub size_start: String,
    pub size_end: String,
    pub network_name: String,
    pub reg_start: String,
    pub reg_end: String,
    pub return_start: String,
    pub return_end: String,
    pub org: String,
    pub admin_short_name: String,
    pub recep_no: String,
    pub deli_no: String,
    pub is_pa: bool,
    pub is_allocate: bool,
    pub is_assign_infra: bool,
    pub is_assign_user: bool,
    pub is_sub_allocate: bool,
    pub is_historical_pi: bool,
    pub is_special_pi: bool,
    /// Search under our own resource-manager short name (read from the form).
    pub myself: bool,
    /// Follow each row to its detail page and contact handles.
    pub with_detail: bool,
    /// Handles never to fetch during the detail traversal.
    pub skip_handles: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchIpv6 {
    pub ip_address: String,
    pub size_start: String,
    pub size_end: String,
    pub network_name: String,
    pub reg_start: String,
    pub reg_end: String,
    pub return_start: String,
    pub return_end: String,
    pub org: String,
    pub admin_short_name: String,
    pub recep_no: String,
    pub deli_no: String,
    pub is_allocate: bool,
    pub is_assign_infra: bool,
    pub is_assign_user: bool,
    pub is_sub_allocate: bool,
    /// Own registrations only; every other criterion is ignored.
    pub myself: bool,
    pub with_detail: bool,
    pub skip_handles: Vec<String>,
}

static OWN_NAME_SCOPE: LazyLock<Selector> = LazyLock::new(|| sel("form ul table > * table > * input"));

fn own_short_name(doc: &Html, page: &Url) -> Result<String> {
    form::input_value(doc, &OWN_NAME_SCOPE, FIELD_OWN_SHORT_NAME).ok_or_else(|| {
        PortalError::structural(page.as_str(), "resource manager short name not on search form")
    })
}

fn destdisp(seed: &FormSeed, page: &Url) -> Result<String> {
    seed.first_input_value()
        .or_else(|| seed.value(FIELD_DESTDISP))
        .map(str::to_string)
        .ok_or_else(|| PortalError::structural(page.as_str(), "search form carries no screen id"))
}

impl<T: Transport> Portal<T> {
    pub fn search_ipv4(&mut self, q: &SearchIpv4, progress: &mut dyn Progress) -> Result<(Vec<InfoIpv4>, Vec<HandleDetail>)> {
        let (menu_url, page) = self.open(MENU_SEARCH_IPV4)?;
        let (seed, own) = {
            let doc = parse(&page);
            let seed = form::extract(&doc, |_| true)?;
            let own = if q.myself { own_short_name(&doc, &menu_url)? } else { q.admin_short_name.clone() };
            (seed, own)
        };

        let body = form_body! {
            "destdisp" => destdisp(&seed, &menu_url)?,
            "ipaddr" => q.ip_address.as_str(),
            "sizeS" => q.size_start.as_str(),
            "sizeE" => q.size_end.as_str(),
            "netwrkName" => q.network_name.as_str(),
            "regDateS" => q.reg_start.as_str(),
            "regDateE" => q.reg_end.as_str(),
            "rtnDateS" => q.return_start.as_str(),
            "rtnDateE" => q.return_end.as_str(),
            "organizationName" => q.org.as_str(),
            FIELD_OWN_SHORT_NAME => own,
            "recepNo" => q.recep_no.as_str(),
            "deliNo" => q.deli_no.as_str(),
            "ipaddrKindPa" => flag(q.is_pa),
            "regKindAllo" => flag(q.is_allocate),
            "regKindEvent" => flag(q.is_assign_infra),
            "regKindUser" => flag(q.is_assign_user),
            "regKindSubA" => flag(q.is_sub_allocate),
            "ipaddrKindPiHistorical" => flag(q.is_historical_pi),
            "ipaddrKindPiSpecial" => flag(q.is_special_pi),
            "action" => CAPTION_SEARCH_RAW,
        };

        let (result_url, reply) = self.submit(&menu_url, &seed.action, &body)?;
        let mut rows: Vec<InfoIpv4> = extract_as(&parse(&reply), &IPV4_LISTING)?;
        info!(rows = rows.len(), "ipv4 search done");

        let handles = if q.with_detail {
            self.traverse(&mut rows, &result_url, &q.skip_handles, progress)?
        } else {
            Vec::new()
        };
        Ok((rows, handles))
    }

    pub fn search_ipv6(&mut self, q: &SearchIpv6, progress: &mut dyn Progress) -> Result<(Vec<InfoIpv6>, Vec<HandleDetail>)> {
        let (menu_url, page) = self.open(MENU_SEARCH_IPV6)?;
        let (seed, own) = {
            let doc = parse(&page);
            let seed = form::extract(&doc, |_| true)?;
            let own = if q.myself { Some(own_short_name(&doc, &menu_url)?) } else { None };
            (seed, own)
        };
        let screen = destdisp(&seed, &menu_url)?;

        let body = match own {
            Some(own) => form_body! {
                "destdisp" => screen,
                "ipaddr" => "",
                "sizeS" => "",
                "sizeE" => "",
                "netwrkName" => "",
                "regDateS" => "",
                "regDateE" => "",
                "rtnDateS" => "",
                "rtnDateE" => "",
                "organizationName" => "",
                FIELD_OWN_SHORT_NAME => own,
                "recepNo" => "",
                "deliNo" => "",
                "action" => CAPTION_SEARCH_SJIS,
            },
            None => form_body! {
                "destdisp" => screen,
                "ipaddr" => q.ip_address.as_str(),
                "sizeS" => q.size_start.as_str(),
                "sizeE" => q.size_end.as_str(),
                "netwrkName" => q.network_name.as_str(),
                "regDateS" => q.reg_start.as_str(),
                "regDateE" => q.reg_end.as_str(),
                "rtnDateS" => q.return_start.as_str(),
                "rtnDateE" => q.return_end.as_str(),
                "organizationName" => q.org.as_str(),
                FIELD_OWN_SHORT_NAME => q.admin_short_name.as_str(),
                "recepNo" => q.recep_no.as_str(),
                "deliNo" => q.deli_no.as_str(),
                "regKindAllo" => flag(q.is_allocate),
                "regKindEvent" => flag(q.is_assign_infra),
                "regKindUser" => flag(q.is_assign_user),
                "regKindSubA" => flag(q.is_sub_allocate),
                "action" => CAPTION_SEARCH_SJIS,
            },
        };

        let (result_url, reply) = self.submit(&menu_url, &seed.action, &body)?;
        let mut rows: Vec<InfoIpv6> = extract_as(&parse(&reply), &IPV6_LISTING)?;
        info!(rows = rows.len(), "ipv6 search done");

        let handles = if q.with_detail {
            self.traverse(&mut rows, &result_url, &q.skip_handles, progress)?
        } else {
            Vec::new()
        };
        Ok((rows, handles))
    }

    /// Attach detail to each row and collect the contact handles it names.
    fn traverse<R: DetailRow>(
        &mut self,
        rows: &mut [R],
        page: &Url,
        skip: &[String],
        progress: &mut dyn Progress,
    ) -> Result<Vec<HandleDetail>> {
        progress.begin(rows.len());
        let out = self.traverse_rows(rows, page, skip, progress);
        progress.finish();
        out
    }

    fn traverse_rows<R: DetailRow>(
        &mut self,
        rows: &mut [R],
        page: &Url,
        skip: &[String],
        progress: &mut dyn Progress,
    ) -> Result<Vec<HandleDetail>> {
        let mut cache = LinkResolutionCache::new();
        cache.seed(skip.iter().cloned());
        let mut limiter = self.limiter();
        let mut handles = Vec::new();

        for (i, row) in rows.iter_mut().enumerate() {
            let Some(link) = row.detail_link().filter(|l| !l.is_empty()).map(str::to_string) else {
                debug!(row = row.label(), "no detail link");
                progress.item_done(i, row.label());
                continue;
            };

            limiter.wait_turn(&self.deadline)?;
            let detail = match self.fetch_detail(page, &link) {
                Ok(d) => d,
                Err(e) if e.is_interrupt() => return Err(e),
                Err(e) => {
                    warn!(row = row.label(), error = %e, "detail fetch failed; row kept without detail");
                    progress.log(&format!("{}: {e}", row.label()));
                    progress.item_failed(i, row.label());
                    continue;
                }
            };

            // Keys are crossed: the tech handle gates the admin link and
            // the admin handle gates the tech link.
            let checks = [
                (detail.tech_handle.clone(), detail.admin_handle_link.clone()),
                (detail.admin_handle.clone(), detail.tech_handle_link.clone()),
            ];
            row.set_detail(detail);

            let mut failed = false;
            for (key, href) in checks {
                if !cache.should_fetch(&key) {
                    continue;
                }
                let Some(href) = href.filter(|h| !h.is_empty()) else {
                    debug!(row = row.label(), handle = %key, "handle has no link");
                    continue;
                };
                limiter.wait_turn(&self.deadline)?;
                match self.fetch_handle(page, &href) {
                    Ok(h) => {
                        handles.push(h);
                        cache.mark_fetched(&key);
                    }
                    Err(e) if e.is_interrupt() => return Err(e),
                    Err(e) => {
                        warn!(row = row.label(), handle = %key, error = %e, "handle fetch failed");
                        progress.log(&format!("{} ({key}): {e}", row.label()));
                        failed = true;
                        break;
                    }
                }
            }

            if failed {
                progress.item_failed(i, row.label());
            } else {
                progress.item_done(i, row.label());
            }
        }

        info!(rows = rows.len(), handles = handles.len(), "detail traversal done");
        Ok(handles)
    }

    fn fetch_detail(&mut self, page: &Url, href: &str) -> Result<InfoDetail> {
        let (_, body) = self.follow(page, href)?;
        read_one(&parse(&body), &NETWORK_DETAIL)
    }

    fn fetch_handle(&mut self, page: &Url, href: &str) -> Result<HandleDetail> {
        let (_, body) = self.follow(page, href)?;
        read_one(&parse(&body), &HANDLE_DETAIL)
    }
}
