// src/specs/detail.rs
//! Detail pages: one network registration, and one contact handle.
//!
//! Both are caption/value tables nested several layout tables deep. The
//! network page sits four tables down, the handle page three.

use std::sync::LazyLock;

use serde::Serialize;

use super::schema::{ link, text, FromRecord, Record, RecordSchema };
use crate::core::html::{ nested_cells, title };
use crate::error::{ PortalError, Result };

const NETWORK_CAPTIONS: &[(&str, &str)] = &[
    ("IPネットワークアドレス", "ip_address"),
    ("資源管理者略称", "admin_short_name"),
    ("アドレス種別", "address_type"),
    ("インフラ・ユーザ区分", "infra_user_kind"),
    ("ネットワーク名", "network_name"),
    ("組織名", "org"),
    ("Organization", "org_en"),
    ("郵便番号", "post_code"),
    ("住所", "address"),
    ("Address", "address_en"),
    ("管理者連絡窓口", "admin_handle"),
    ("技術連絡担当者", "tech_handle"),
    ("ネームサーバ", "name_server"),
    ("DSレコード", "ds_record"),
    ("通知アドレス", "notify_address"),
    ("審議番号", "deli_no"),
    ("受付番号", "recep_no"),
    ("割当年月日", "assign_date"),
    ("返却年月日", "return_date"),
    ("最終更新", "update_date"),
];

pub static NETWORK_DETAIL: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::title_value(
        "network detail",
        &[
            text("ip_address"),
            text("admin_short_name"),
            text("address_type"),
            text("infra_user_kind"),
            text("network_name"),
            text("org"),
            text("org_en"),
            text("post_code"),
            text("address"),
            text("address_en"),
            link("admin_handle"),
            link("tech_handle"),
            text("name_server"),
            text("ds_record"),
            text("notify_address"),
            text("deli_no"),
            text("recep_no"),
            text("assign_date"),
            text("return_date"),
            text("update_date"),
        ],
        nested_cells(4),
        NETWORK_CAPTIONS,
    )
});

// The portal spells e-mail and fax two ways depending on the page.
const HANDLE_CAPTIONS: &[(&str, &str)] = &[
    ("グループハンドル", "group_handle"),
    ("JPNICハンドル", "person_handle"),
    ("グループ名", "name"),
    ("氏名", "name"),
    ("Group Name", "name_en"),
    ("Last, First", "name_en"),
    ("電子メール", "email"),
    ("電子メイル", "email"),
    ("組織名", "org"),
    ("Organization", "org_en"),
    ("部署", "division"),
    ("Division", "division_en"),
    ("肩書", "title"),
    ("Title", "title_en"),
    ("電話番号", "tel"),
    ("Fax番号", "fax"),
    ("FAX番号", "fax"),
    ("通知アドレス", "notify_address"),
    ("最終更新", "update_date"),
];

pub static HANDLE_DETAIL: LazyLock<RecordSchema> = LazyLock::new(|| {
    RecordSchema::title_value(
        "handle detail",
        &[
            text("group_handle"),
            text("person_handle"),
            text("name"),
            text("name_en"),
            text("email"),
            text("org"),
            text("org_en"),
            text("division"),
            text("division_en"),
            text("title"),
            text("title_en"),
            text("tel"),
            text("fax"),
            text("notify_address"),
            text("update_date"),
        ],
        nested_cells(3),
        HANDLE_CAPTIONS,
    )
});

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InfoDetail {
    pub ip_address: String,
    pub admin_short_name: String,
    pub address_type: String,
    pub infra_user_kind: String,
    pub network_name: String,
    pub org: String,
    pub org_en: String,
    pub post_code: String,
    pub address: String,
    pub address_en: String,
    pub admin_handle: String,
    pub admin_handle_link: Option<String>,
    pub tech_handle: String,
    pub tech_handle_link: Option<String>,
    pub name_server: String,
    pub ds_record: String,
    pub notify_address: String,
    pub deli_no: String,
    pub recep_no: String,
    pub assign_date: String,
    pub return_date: String,
    pub update_date: String,
}

impl FromRecord for InfoDetail {
    fn from_record(r: &Record) -> Result<Self> {
        Ok(Self {
            ip_address: r.text("ip_address"),
            admin_short_name: r.text("admin_short_name"),
            address_type: r.text("address_type"),
            infra_user_kind: r.text("infra_user_kind"),
            network_name: r.text("network_name"),
            org: r.text("org"),
            org_en: r.text("org_en"),
            post_code: r.text("post_code"),
            address: r.text("address"),
            address_en: r.text("address_en"),
            admin_handle: r.text("admin_handle"),
            admin_handle_link: r.href("admin_handle"),
            tech_handle: r.text("tech_handle"),
            tech_handle_link: r.href("tech_handle"),
            name_server: r.text("name_server"),
            ds_record: r.text("ds_record"),
            notify_address: r.text("notify_address"),
            deli_no: r.text("deli_no"),
            recep_no: r.text("recep_no"),
            assign_date: r.text("assign_date"),
            return_date: r.text("return_date"),
            update_date: r.text("update_date"),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct HandleDetail {
    /// Personal JPNIC handle (true) or group handle (false).
    pub is_jpnic_handle: bool,
    pub handle: String,
    pub name: String,
    pub name_en: String,
    pub email: String,
    pub org: String,
    pub org_en: String,
    pub division: String,
    pub division_en: String,
    pub title: String,
    pub title_en: String,
    pub tel: String,
    pub fax: String,
    pub notify_address: String,
    pub update_date: String,
}

impl FromRecord for HandleDetail {
    fn from_record(r: &Record) -> Result<Self> {
        let (is_jpnic_handle, handle) = if r.has("person_handle") {
            (true, r.text("person_handle"))
        } else {
            (false, r.text("group_handle"))
        };
        Ok(Self {
            is_jpnic_handle,
            handle,
            name: r.text("name"),
            name_en: r.text("name_en"),
            email: r.text("email"),
            org: r.text("org"),
            org_en: r.text("org_en"),
            division: r.text("division"),
            division_en: r.text("division_en"),
            title: r.text("title"),
            title_en: r.text("title_en"),
            tel: r.text("tel"),
            fax: r.text("fax"),
            notify_address: r.text("notify_address"),
            update_date: r.text("update_date"),
        })
    }
}

/// The single record of a detail page. A page with none of the known
/// captions (login page, session error) is structural.
pub fn read_one<T: FromRecord>(doc: &scraper::Html, schema: &RecordSchema) -> Result<T> {
    let record = super::schema::extract(doc, schema).next().unwrap_or_default();
    if record.is_empty() {
        let page = title(doc).unwrap_or_else(|| s!("untitled page"));
        return Err(PortalError::structural(page, format!("no known captions for {}", schema.name())));
    }
    T::from_record(&record)
}
