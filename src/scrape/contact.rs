// src/scrape/contact.rs
//! Contact (handle) registration / change. Two phases: the input form,
//! then the confirmation screen; the receipt page carries the number.

use serde::Deserialize;
use tracing::info;

use crate::{
    config::consts::*,
    core::{ html::parse, Transport },
    error::{ PortalError, Result },
    specs::{ confirm, form },
};

use super::portal::Portal;

/// New contents for a person or group handle.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    /// Person handle; `false` for a group handle.
    pub is_jpnic_handle: bool,
    pub handle: String,
    pub name: String,
    pub name_en: String,
    pub email: String,
    pub org: String,
    pub org_en: String,
    pub zip_code: String,
    pub address: String,
    pub address_en: String,
    pub division: String,
    pub division_en: String,
    pub title: String,
    pub title_en: String,
    pub tel: String,
    pub fax: String,
    pub notify_mail: String,
    /// Applicant address; also sent as its own confirmation.
    pub apply_mail: String,
}

impl ContactInput {
    fn kind(&self) -> &'static str {
        if self.is_jpnic_handle { "person" } else { "group" }
    }
}

impl<T: Transport> Portal<T> {
    /// Submit a contact change and return the receipt number.
    pub fn change_contact_info(&mut self, input: &ContactInput) -> Result<String> {
        let (menu_url, page) = self.open(MENU_CONTACT_CHANGE)?;
        let seed = form::extract(&parse(&page), |a| a.contains("regist.do"))?;

        let body = form_body! {
            FIELD_TOKEN => seed.value_or_empty(FIELD_TOKEN),
            FIELD_DESTDISP => seed.value_or_empty(FIELD_DESTDISP),
            FIELD_APLYID => seed.value_or_empty(FIELD_APLYID),
            "kind" => input.kind(),
            "jpnic_hdl" => input.handle.as_str(),
            "name_jp" => input.name.as_str(),
            "name" => input.name_en.as_str(),
            "email" => input.email.as_str(),
            "org_nm_jp" => input.org.as_str(),
            "org_nm" => input.org_en.as_str(),
            "zipcode" => input.zip_code.as_str(),
            "addr_jp" => input.address.as_str(),
            "addr" => input.address_en.as_str(),
            "division_jp" => input.division.as_str(),
            "division" => input.division_en.as_str(),
            "title_jp" => input.title.as_str(),
            "title" => input.title_en.as_str(),
            "phone" => input.tel.as_str(),
            "fax" => input.fax.as_str(),
            "ntfy_mail" => input.notify_mail.as_str(),
            "aply_from_addr" => input.apply_mail.as_str(),
            "aply_from_addr_confirm" => input.apply_mail.as_str(),
            "action" => CAPTION_APPLY_SJIS,
        };
        let (apply_url, reply) = self.submit(&menu_url, &seed.action, &body)?;

        let seed = {
            let doc = parse(&reply);
            confirm::require_confirmation(&reply, &doc)?;
            form::extract(&doc, |a| a.contains("apply"))?
        };
        info!(handle = %input.handle, "contact change accepted for confirmation");

        let body = form_body! {
            FIELD_TOKEN => seed.value_or_empty(FIELD_TOKEN),
            FIELD_PREV_DISP => seed.value_or_empty(FIELD_PREV_DISP),
            FIELD_APLYID => seed.value_or_empty(FIELD_APLYID),
            FIELD_DESTDISP => seed.value_or_empty(FIELD_DESTDISP),
            "inputconf" => CAPTION_CONFIRM_SJIS,
        };
        let (receipt_url, receipt) = self.submit(&apply_url, &seed.action, &body)?;

        let recep_no = confirm::receipt_number(&parse(&receipt)).ok_or_else(|| {
            PortalError::structural(receipt_url.as_str(), "no receipt number on completion page")
        })?;
        info!(handle = %input.handle, %recep_no, "contact change filed");
        Ok(recep_no)
    }
}
