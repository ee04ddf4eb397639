// tests/listing_traversal.rs
mod common;

use std::sync::Arc;
use std::time::{ Duration, Instant };

use common::*;
use jpnic_scrape::core::{ CancelToken, Deadline };
use jpnic_scrape::progress::NullProgress;
use jpnic_scrape::scrape::{ ManualClock, Portal, SearchIpv4 };
use jpnic_scrape::PortalError;

const LOGIN: &str = "/jpnic/certmemberlogin.do";
const FORM: &str = "/jpnic/G11320.do?aplyid=101";
const SUBMIT: &str = "/jpnic/G11320search.do";
const DETAIL_1: &str = "/jpnic/entryinfo_v4.do?netwrk_id=1001";
const DETAIL_2: &str = "/jpnic/entryinfo_v4.do?netwrk_id=1002";
const HDL_ADMIN: &str = "/jpnic/entryinfo_handle.do?jpnic_hdl=EXG001JP";
const HDL_TECH: &str = "/jpnic/entryinfo_handle.do?jpnic_hdl=TY1234JP";
const HDL_OTHER: &str = "/jpnic/entryinfo_handle.do?jpnic_hdl=NEW999JP";

fn search_site() -> ScriptedTransport {
    ScriptedTransport::new()
        .get(LOGIN, MENU)
        .get(FORM, include_str!("fixtures/ipv4_search_form.html"))
        .post(SUBMIT, include_str!("fixtures/ipv4_result.html"))
}

fn portal(t: ScriptedTransport, clock: &ManualClock) -> Portal<ScriptedTransport> {
    Portal::with_transport(t.with_clock(clock.clone()), &config(), classifier())
        .unwrap()
        .with_clock(Arc::new(clock.clone()))
}

fn detail_query() -> SearchIpv4 {
    SearchIpv4 { myself: true, with_detail: true, ..SearchIpv4::default() }
}

#[test]
fn listing_drops_header_group_and_keeps_row_order() {
    let clock = ManualClock::new();
    let mut p = portal(search_site(), &clock);

    let (rows, handles) = p.search_ipv4(&SearchIpv4::default(), &mut NullProgress).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].ip_address, "192.0.2.0/24");
    assert_eq!(rows[0].detail_link.as_deref(), Some(DETAIL_1));
    assert_eq!(rows[0].size, "256");
    assert_eq!(rows[0].kind_id, "ASSIGNED");
    assert_eq!(rows[1].network_name, "EXAMPLE-NET-2");
    assert_eq!(rows[1].recep_no, "A-2021-0042");
    assert!(rows.iter().all(|r| r.detail.is_none()));
    assert!(handles.is_empty());
    // no detail requested, no pauses
    assert!(clock.waits().is_empty());
    assert_eq!(p.transport().targets(), vec![LOGIN, FORM, SUBMIT]);
}

#[test]
fn ipv4_body_is_fixed_order_with_own_short_name() {
    let clock = ManualClock::new();
    let mut p = portal(search_site(), &clock);
    let q = SearchIpv4 { myself: true, is_pa: true, is_assign_user: true, ..SearchIpv4::default() };

    p.search_ipv4(&q, &mut NullProgress).unwrap();

    let posts = p.transport().posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content_type.as_deref(), Some("application/x-www-form-urlencoded"));
    assert_eq!(
        posts[0].body.as_deref(),
        Some("destdisp=G11320&ipaddr=&sizeS=&sizeE=&netwrkName=&regDateS=&regDateE=&rtnDateS=&rtnDateE=\
              &organizationName=&resceAdmSnm=EXAMPLE-NET&recepNo=&deliNo=&ipaddrKindPa=on&regKindAllo=\
              &regKindEvent=&regKindUser=on&regKindSubA=&ipaddrKindPiHistorical=&ipaddrKindPiSpecial=\
              &action=　検索　"),
    );
}

#[test]
fn manual_mode_sends_caller_short_name() {
    let clock = ManualClock::new();
    let mut p = portal(search_site(), &clock);
    let q = SearchIpv4 { ip_address: "192.0.2.0".into(), admin_short_name: "OTHER-NET".into(), ..SearchIpv4::default() };

    p.search_ipv4(&q, &mut NullProgress).unwrap();

    let body = p.transport().posts()[0].body.clone().unwrap();
    assert!(body.starts_with("destdisp=G11320&ipaddr=192.0.2.0&"));
    assert!(body.contains("&resceAdmSnm=OTHER-NET&"));
}

#[test]
fn myself_without_short_name_is_structural() {
    let clock = ManualClock::new();
    let t = ScriptedTransport::new()
        .get(LOGIN, MENU)
        .get(FORM, include_str!("fixtures/ipv4_search_form_no_name.html"));
    let mut p = portal(t, &clock);

    let err = p.search_ipv4(&detail_query(), &mut NullProgress).unwrap_err();
    assert!(matches!(err, PortalError::Structural { .. }), "{err}");
    assert!(p.transport().posts().is_empty());
}

#[test]
fn detail_traversal_dedups_handles_and_paces_requests() {
    let clock = ManualClock::new();
    let t = search_site()
        .get(DETAIL_1, &network_detail("192.0.2.0/24", "EXG001JP", "TY1234JP"))
        .get(DETAIL_2, &network_detail("198.51.100.0/25", "EXG001JP", "TY1234JP"))
        .get(HDL_ADMIN, &group_handle("EXG001JP"))
        .get(HDL_TECH, &person_handle("TY1234JP", "山田 太郎"));
    let mut p = portal(t, &clock);
    let mut progress = RecordingProgress::default();

    let (rows, handles) = p.search_ipv4(&detail_query(), &mut progress).unwrap();

    assert_eq!(rows.len(), 2);
    let d = rows[0].detail.as_ref().unwrap();
    assert_eq!(d.network_name, "EXAMPLE-NET");
    assert_eq!(d.admin_handle, "EXG001JP");
    assert_eq!(rows[1].detail.as_ref().unwrap().ip_address, "198.51.100.0/25");

    let got: Vec<_> = handles.iter().map(|h| (h.handle.as_str(), h.is_jpnic_handle)).collect();
    assert_eq!(got, vec![("EXG001JP", false), ("TY1234JP", true)]);

    assert_eq!(p.transport().targets(), vec![LOGIN, FORM, SUBMIT, DETAIL_1, HDL_ADMIN, HDL_TECH, DETAIL_2]);

    // every dependent fetch waited out the full interval first
    let stamps: Vec<Duration> = p.transport().calls[3..].iter().map(|c| c.at.unwrap()).collect();
    assert_eq!(stamps[0], Duration::from_secs(1));
    for pair in stamps.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_secs(1), "{stamps:?}");
    }
    assert_eq!(clock.elapsed(), Duration::from_secs(4));

    assert_eq!(progress.events, vec!["begin 2", "done 0 192.0.2.0/24", "done 1 198.51.100.0/25", "finish"]);
}

#[test]
fn tech_key_gates_admin_link() {
    let clock = ManualClock::new();
    let t = search_site()
        .get(DETAIL_1, &network_detail("192.0.2.0/24", "EXG001JP", "TY1234JP"))
        .get(DETAIL_2, &network_detail("198.51.100.0/25", "EXG001JP", "NEW999JP"))
        .get(HDL_ADMIN, &group_handle("EXG001JP"))
        .get(HDL_TECH, &person_handle("TY1234JP", "山田 太郎"))
        .get(HDL_OTHER, &person_handle("NEW999JP", "佐藤 花子"));
    let mut p = portal(t, &clock);

    let (_, handles) = p.search_ipv4(&detail_query(), &mut NullProgress).unwrap();

    // Row 2: tech NEW999JP is unseen, so its *admin* link is fetched again;
    // admin EXG001JP is seen, so its *tech* link (NEW999JP) is not.
    let got: Vec<_> = handles.iter().map(|h| h.handle.as_str()).collect();
    assert_eq!(got, vec!["EXG001JP", "TY1234JP", "EXG001JP"]);
    assert!(!p.transport().targets().contains(&HDL_OTHER));
}

#[test]
fn skip_handles_preseed_the_cache() {
    let clock = ManualClock::new();
    let t = search_site()
        .get(DETAIL_1, &network_detail("192.0.2.0/24", "EXG001JP", "TY1234JP"))
        .get(DETAIL_2, &network_detail("198.51.100.0/25", "EXG001JP", "TY1234JP"));
    let mut p = portal(t, &clock);
    let q = SearchIpv4 { skip_handles: vec!["EXG001JP".into(), "TY1234JP".into()], ..detail_query() };

    let (rows, handles) = p.search_ipv4(&q, &mut NullProgress).unwrap();

    assert!(handles.is_empty());
    assert!(rows.iter().all(|r| r.detail.is_some()));
    assert_eq!(clock.waits().iter().sum::<Duration>(), Duration::from_secs(2));
}

#[test]
fn failed_detail_skips_only_that_row() {
    let clock = ManualClock::new();
    // DETAIL_1 has no route: the fetch fails
    let t = search_site()
        .get(DETAIL_2, &network_detail("198.51.100.0/25", "EXG001JP", "TY1234JP"))
        .get(HDL_ADMIN, &group_handle("EXG001JP"))
        .get(HDL_TECH, &person_handle("TY1234JP", "山田 太郎"));
    let mut p = portal(t, &clock);
    let mut progress = RecordingProgress::default();

    let (rows, handles) = p.search_ipv4(&detail_query(), &mut progress).unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows[0].detail.is_none());
    assert!(rows[1].detail.is_some());
    assert_eq!(handles.len(), 2);
    assert_eq!(progress.events[1], "failed 0 192.0.2.0/24");
    assert_eq!(progress.events[2], "done 1 198.51.100.0/25");
}

#[test]
fn error_page_in_place_of_detail_skips_the_row() {
    let clock = ManualClock::new();
    let t = search_site()
        .get(DETAIL_1, "<html><head><title>システムエラー</title></head><body><p>error</p></body></html>")
        .get(DETAIL_2, &network_detail("198.51.100.0/25", "EXG001JP", "TY1234JP"))
        .get(HDL_ADMIN, &group_handle("EXG001JP"))
        .get(HDL_TECH, &person_handle("TY1234JP", "山田 太郎"));
    let mut p = portal(t, &clock);
    let mut progress = RecordingProgress::default();

    let (rows, _) = p.search_ipv4(&detail_query(), &mut progress).unwrap();

    assert!(rows[0].detail.is_none());
    assert!(rows[1].detail.is_some());
    assert_eq!(progress.events[1], "failed 0 192.0.2.0/24");
    assert_eq!(
        progress.logs,
        vec!["192.0.2.0/24: unexpected page at システムエラー: no known captions for network detail"],
    );
}

#[test]
fn failed_handle_keeps_row_detail() {
    let clock = ManualClock::new();
    // HDL_TECH has no route
    let t = search_site()
        .get(DETAIL_1, &network_detail("192.0.2.0/24", "EXG001JP", "TY1234JP"))
        .get(DETAIL_2, &network_detail("198.51.100.0/25", "EXG001JP", "TY1234JP"))
        .get(HDL_ADMIN, &group_handle("EXG001JP"));
    let mut p = portal(t, &clock);
    let mut progress = RecordingProgress::default();

    let (rows, handles) = p.search_ipv4(&detail_query(), &mut progress).unwrap();

    assert!(rows.iter().all(|r| r.detail.is_some()));
    let got: Vec<_> = handles.iter().map(|h| h.handle.as_str()).collect();
    assert_eq!(got, vec!["EXG001JP"]);
    // the failed key stays unmarked, so row 2 tries the tech link again
    assert_eq!(
        p.transport().targets(),
        vec![LOGIN, FORM, SUBMIT, DETAIL_1, HDL_ADMIN, HDL_TECH, DETAIL_2, HDL_TECH],
    );
    assert_eq!(progress.events, vec!["begin 2", "failed 0 192.0.2.0/24", "failed 1 198.51.100.0/25", "finish"]);
    assert_eq!(progress.logs.len(), 2);
    assert!(progress.logs[0].starts_with("192.0.2.0/24 (EXG001JP): "), "{}", progress.logs[0]);
}

#[test]
fn cancellation_halts_traversal() {
    let clock = ManualClock::new();
    let token = CancelToken::new();
    let t = search_site()
        .get(DETAIL_1, &network_detail("192.0.2.0/24", "EXG001JP", "TY1234JP"))
        .cancel_after(DETAIL_1, token.clone());
    let mut p = portal(t, &clock).with_deadline(Deadline::none().with_cancel(token));
    let mut progress = RecordingProgress::default();

    let err = p.search_ipv4(&detail_query(), &mut progress).unwrap_err();

    assert!(matches!(err, PortalError::Cancelled), "{err}");
    assert_eq!(p.transport().targets().last(), Some(&DETAIL_1));
    assert_eq!(progress.events.last().map(String::as_str), Some("finish"));
}

#[test]
fn expired_deadline_sends_nothing() {
    let clock = ManualClock::new();
    let mut p = portal(search_site(), &clock).with_deadline(Deadline::at(Instant::now()));

    let err = p.search_ipv4(&SearchIpv4::default(), &mut NullProgress).unwrap_err();

    assert!(matches!(err, PortalError::DeadlineExceeded), "{err}");
    assert!(p.transport().calls.is_empty());
}
