// src/specs/listings.rs
//! Listing pages: registration search results (IPv4 / IPv6) and the
//! application list.
//!
//! Search results mark live cells with `class="dataRow_mnt04"`; the first
//! group of such cells repeats the column captions. The application list
//! has no marker class, so its cells are placed by column index instead.

use std::sync::LazyLock;

use serde::Serialize;

use super::detail::InfoDetail;
use super::schema::{ link, text, FromRecord, Record, RecordSchema };
use crate::config::consts::LISTING_CELL_CLASS;
use crate::core::html::nested_cells;
use crate::error::Result;

pub static IPV4_LISTING: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::rows(
        "ipv4 listing",
        &[
            link("ip_address"),
            text("size"),
            text("network_name"),
            text("assign_date"),
            text("return_date"),
            text("org_name"),
            text("admin_short_name"),
            text("recep_no"),
            text("deli_no"),
            text("address_type"),
            text("kind_id"),
        ],
        nested_cells(1),
    )
    .with_class(LISTING_CELL_CLASS)
});

pub static IPV6_LISTING: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::rows(
        "ipv6 listing",
        &[
            link("ip_address"),
            text("network_name"),
            text("assign_date"),
            text("return_date"),
            text("org_name"),
            text("admin_short_name"),
            text("recep_no"),
            text("deli_no"),
            text("kind_id"),
        ],
        nested_cells(1),
    )
    .with_class(LISTING_CELL_CLASS)
});

pub static REQUEST_LIST: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::rows(
        "request list",
        &[
            text("recep_no"),
            text("deli_no"),
            text("apply_kind"),
            text("apply_class"),
            text("applicant"),
            text("apply_date"),
            text("complete_date"),
            text("status"),
        ],
        nested_cells(1),
    )
    .by_sibling_index()
});

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InfoIpv4 {
    pub ip_address: String,
    pub detail_link: Option<String>,
    pub size: String,
    pub network_name: String,
    pub assign_date: String,
    pub return_date: String,
    pub org_name: String,
    pub admin_short_name: String,
    pub recep_no: String,
    pub deli_no: String,
    pub address_type: String,
    pub kind_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<InfoDetail>,
}

impl FromRecord for InfoIpv4 {
    fn from_record(r: &Record) -> Result<Self> {
        Ok(Self {
            ip_address: r.text("ip_address"),
            detail_link: r.href("ip_address"),
            size: r.text("size"),
            network_name: r.text("network_name"),
            assign_date: r.text("assign_date"),
            return_date: r.text("return_date"),
            org_name: r.text("org_name"),
            admin_short_name: r.text("admin_short_name"),
            recep_no: r.text("recep_no"),
            deli_no: r.text("deli_no"),
            address_type: r.text("address_type"),
            kind_id: r.text("kind_id"),
            detail: None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InfoIpv6 {
    pub ip_address: String,
    pub detail_link: Option<String>,
    pub network_name: String,
    pub assign_date: String,
    pub return_date: String,
    pub org_name: String,
    pub admin_short_name: String,
    pub recep_no: String,
    pub deli_no: String,
    pub kind_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<InfoDetail>,
}

impl FromRecord for InfoIpv6 {
    fn from_record(r: &Record) -> Result<Self> {
        Ok(Self {
            ip_address: r.text("ip_address"),
            detail_link: r.href("ip_address"),
            network_name: r.text("network_name"),
            assign_date: r.text("assign_date"),
            return_date: r.text("return_date"),
            org_name: r.text("org_name"),
            admin_short_name: r.text("admin_short_name"),
            recep_no: r.text("recep_no"),
            deli_no: r.text("deli_no"),
            kind_id: r.text("kind_id"),
            detail: None,
        })
    }
}

/// Listing rows that can link to a detail page.
pub trait DetailRow {
    fn detail_link(&self) -> Option<&str>;
    fn set_detail(&mut self, detail: InfoDetail);
    fn label(&self) -> &str;
}

impl DetailRow for InfoIpv4 {
    fn detail_link(&self) -> Option<&str> { self.detail_link.as_deref() }
    fn set_detail(&mut self, detail: InfoDetail) { self.detail = Some(detail) }
    fn label(&self) -> &str { &self.ip_address }
}

impl DetailRow for InfoIpv6 {
    fn detail_link(&self) -> Option<&str> { self.detail_link.as_deref() }
    fn set_detail(&mut self, detail: InfoDetail) { self.detail = Some(detail) }
    fn label(&self) -> &str { &self.ip_address }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RequestInfo {
    pub recep_no: String,
    pub deli_no: String,
    pub apply_kind: String,
    pub apply_class: String,
    pub applicant: String,
    pub apply_date: String,
    pub complete_date: String,
    pub status: String,
}

impl FromRecord for RequestInfo {
    fn from_record(r: &Record) -> Result<Self> {
        Ok(Self {
            recep_no: r.text("recep_no"),
            deli_no: r.text("deli_no"),
            apply_kind: r.text("apply_kind"),
            apply_class: r.text("apply_class"),
            applicant: r.text("applicant"),
            apply_date: r.text("apply_date"),
            complete_date: r.text("complete_date"),
            status: r.text("status"),
        })
    }
}
