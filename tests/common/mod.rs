// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use reqwest::Url;

use jpnic_scrape::classify::ErrorClassifier;
use jpnic_scrape::config::options::PortalConfig;
use jpnic_scrape::core::encoding::{ from_legacy, to_legacy };
use jpnic_scrape::core::{ CancelToken, Transport };
use jpnic_scrape::progress::Progress;
use jpnic_scrape::scrape::ManualClock;
use jpnic_scrape::{ PortalError, Result };

pub const BASE: &str = "https://portal.test";
pub const TRANSACTION_PATH: &str = "/jpnic/transaction.do";

pub fn config() -> PortalConfig {
    PortalConfig {
        base_url: BASE.to_string(),
        transaction_url: Some(format!("{BASE}{TRANSACTION_PATH}")),
        request_pause_ms: 1000,
        ..PortalConfig::default()
    }
}

pub fn classifier() -> ErrorClassifier {
    ErrorClassifier::new(|code: u32| match code {
        1 => "request rejected".to_string(),
        12 => "unknown handle".to_string(),
        n => format!("code {n}"),
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

#[derive(Clone, Debug)]
pub struct Call {
    pub method: Method,
    /// path?query
    pub target: String,
    pub content_type: Option<String>,
    /// POST body, decoded back from Shift_JIS.
    pub body: Option<String>,
    /// Virtual time of the call, when a clock is attached.
    pub at: Option<Duration>,
}

/// Serves fixture pages by `path?query`, Shift_JIS encoded like the
/// real portal. Routes are reusable; unknown targets fail.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<(Method, String), Vec<u8>>,
    cancel_on: Option<(String, CancelToken)>,
    clock: Option<ManualClock>,
    pub calls: Vec<Call>,
}

impl ScriptedTransport {
    pub fn new() -> Self { Self::default() }

    pub fn get(mut self, target: &str, page: &str) -> Self {
        self.routes.insert((Method::Get, target.to_string()), encode(page));
        self
    }

    pub fn post(mut self, target: &str, page: &str) -> Self {
        self.routes.insert((Method::Post, target.to_string()), encode(page));
        self
    }

    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Trip `token` once `target` has been served.
    pub fn cancel_after(mut self, target: &str, token: CancelToken) -> Self {
        self.cancel_on = Some((target.to_string(), token));
        self
    }

    pub fn targets(&self) -> Vec<&str> {
        self.calls.iter().map(|c| c.target.as_str()).collect()
    }

    pub fn posts(&self) -> Vec<&Call> {
        self.calls.iter().filter(|c| c.method == Method::Post).collect()
    }

    fn serve(&mut self, method: Method, url: &Url, content_type: Option<&str>, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let target = match url.query() {
            Some(q) => format!("{}?{}", url.path(), q),
            None => url.path().to_string(),
        };
        self.calls.push(Call {
            method,
            target: target.clone(),
            content_type: content_type.map(str::to_string),
            body: body.map(|b| from_legacy(&b).expect("request body is Shift_JIS")),
            at: self.clock.as_ref().map(ManualClock::elapsed),
        });
        if let Some((t, token)) = &self.cancel_on {
            if *t == target {
                token.cancel();
            }
        }
        self.routes
            .get(&(method, target.clone()))
            .cloned()
            .ok_or_else(|| PortalError::structural("scripted transport", format!("no route for {method:?} {target}")))
    }
}

impl Transport for ScriptedTransport {
    fn get(&mut self, url: &Url, _timeout: Duration) -> Result<Vec<u8>> {
        self.serve(Method::Get, url, None, None)
    }

    fn post(&mut self, url: &Url, content_type: &str, body: Vec<u8>, _timeout: Duration) -> Result<Vec<u8>> {
        self.serve(Method::Post, url, Some(content_type), Some(body))
    }
}

pub fn encode(page: &str) -> Vec<u8> {
    to_legacy(page).expect("fixture is Shift_JIS representable")
}

/// Caption/value rows inside `depth` nested layout tables.
pub fn nest(depth: usize, rows: &[(&str, &str)]) -> String {
    let mut inner = String::from("<table>");
    for (t, v) in rows {
        inner.push_str(&format!("<tr><td>{t}</td><td>{v}</td></tr>"));
    }
    inner.push_str("</table>");
    for _ in 1..depth {
        inner = format!("<table><tr><td>{inner}</td></tr></table>");
    }
    format!("<html><head><title>detail</title></head><body>{inner}</body></html>")
}

pub fn network_detail(ip: &str, admin: &str, tech: &str) -> String {
    let admin_link = format!(r#"<a href="/jpnic/entryinfo_handle.do?jpnic_hdl={admin}">{admin}</a>"#);
    let tech_link = format!(r#"<a href="/jpnic/entryinfo_handle.do?jpnic_hdl={tech}">{tech}</a>"#);
    nest(4, &[
        ("IPネットワークアドレス", ip),
        ("ネットワーク名", "EXAMPLE-NET"),
        ("組織名", "株式会社エグザンプル"),
        ("管理者連絡窓口", &admin_link),
        ("技術連絡担当者", &tech_link),
        ("割当年月日", "2020/04/01"),
    ])
}

pub fn person_handle(handle: &str, name: &str) -> String {
    nest(3, &[
        ("JPNICハンドル", handle),
        ("氏名", name),
        ("電子メール", "ops@example.jp"),
        ("最終更新", "2024/01/10"),
    ])
}

pub fn group_handle(handle: &str) -> String {
    nest(3, &[
        ("グループハンドル", handle),
        ("グループ名", "ネットワーク運用"),
        ("電子メイル", "noc@example.jp"),
    ])
}

pub const MENU: &str = include_str!("../fixtures/menu.html");

/// Records every item callback in order; status lines go to `logs`.
#[derive(Default, Debug)]
pub struct RecordingProgress {
    pub events: Vec<String>,
    pub logs: Vec<String>,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, total: usize) { self.events.push(format!("begin {total}")) }
    fn log(&mut self, msg: &str) { self.logs.push(msg.to_string()) }
    fn item_done(&mut self, index: usize, label: &str) { self.events.push(format!("done {index} {label}")) }
    fn item_failed(&mut self, index: usize, label: &str) { self.events.push(format!("failed {index} {label}")) }
    fn finish(&mut self) { self.events.push("finish".to_string()) }
}
