// src/specs/resource.rs
//! Resource-manager summary page.
//!
//! Rows of a table four layout tables deep, read by column:
//! - col 0: caption. For address-block rows it is a link to the block's
//!   `entryinfo` page, with the prefix before a parenthesised kind.
//! - col 1: the value for manager fields, or the assignment date of a block.
//! - col 2: utilisation (`pct% (used/total)`) for the total and for each
//!   block, or the AD ratio.
//!
//! Any utilisation cell that does not parse fails the page.

use serde::Serialize;
use scraper::Html;

use crate::core::html::{ first_href, nested_cells, sibling_index, text_of };
use crate::core::sanitize::{ address_before_paren, parse_ratio, Ratio };
use crate::error::{ PortalError, Result };

const CTX: &str = "resource manager page";
const TOTAL_USAGE: &str = "総利用率";
const AD_RATIO: &str = "ＡＤ　ｒａｔｉｏ";

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceManagerInfo {
    pub manager_no: String,
    pub short_name: String,
    pub org: String,
    pub org_en: String,
    pub zip_code: String,
    pub address: String,
    pub address_en: String,
    pub tel: String,
    pub fax: String,
    pub management_manager: String,
    pub contact_person: String,
    pub inquiry: String,
    pub notify_mail: String,
    pub assignment_window_size: String,
    pub management_start_date: String,
    pub management_end_date: String,
    pub update_date: String,
}

impl ResourceManagerInfo {
    fn slot(&mut self, caption: &str) -> Option<&mut String> {
        Some(match caption {
            "資源管理者番号" => &mut self.manager_no,
            "資源管理者略称" => &mut self.short_name,
            "管理組織名" => &mut self.org,
            "Organization" => &mut self.org_en,
            "郵便番号" => &mut self.zip_code,
            "住所" => &mut self.address,
            "Address" => &mut self.address_en,
            "電話番号" => &mut self.tel,
            "FAX番号" => &mut self.fax,
            "資源管理責任者" => &mut self.management_manager,
            "連絡担当窓口" => &mut self.contact_person,
            "一般問い合わせ窓口" => &mut self.inquiry,
            "資源管理者通知アドレス" => &mut self.notify_mail,
            "アサインメントウィンドウサイズ" => &mut self.assignment_window_size,
            "管理開始日" => &mut self.management_start_date,
            "管理終了日" => &mut self.management_end_date,
            "最終更新日" => &mut self.update_date,
            _ => return None,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CidrBlock {
    pub address: String,
    pub url: String,
    pub assign_date: String,
    pub usage: Ratio,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResourceInfo {
    pub manager: ResourceManagerInfo,
    pub usage: Ratio,
    pub ad_ratio: f64,
    pub cidr_blocks: Vec<CidrBlock>,
}

pub fn parse_doc(doc: &Html) -> Result<ResourceInfo> {
    let cells = nested_cells(4);
    let mut info = ResourceInfo::default();
    let mut caption = s!();
    let mut block: Option<CidrBlock> = None;

    for cell in doc.select(&cells) {
        let text = text_of(cell);
        match sibling_index(cell) {
            0 => {
                block = first_href(cell)
                    .filter(|href| href.contains("entryinfo"))
                    .map(|url| CidrBlock { address: address_before_paren(&text), url, ..CidrBlock::default() });
                caption = text;
            }
            1 => {
                if let Some(slot) = info.manager.slot(&caption) {
                    *slot = text;
                } else if let Some(b) = block.as_mut() {
                    b.assign_date = text;
                }
            }
            2 => {
                if caption == TOTAL_USAGE {
                    info.usage = ratio_cell(&caption, &text)?;
                } else if caption == AD_RATIO {
                    info.ad_ratio = text.parse().map_err(|_| {
                        PortalError::structural(CTX, format!("AD ratio {text:?} is not a number"))
                    })?;
                } else if let Some(mut b) = block.take() {
                    b.usage = ratio_cell(&b.address, &text)?;
                    info.cidr_blocks.push(b);
                }
            }
            _ => {}
        }
    }

    Ok(info)
}

fn ratio_cell(what: &str, text: &str) -> Result<Ratio> {
    parse_ratio(text).ok_or_else(|| {
        PortalError::structural(CTX, format!("{what}: no utilisation figures in {text:?}"))
    })
}
