// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://iphostmaster.nic.ad.jp";
pub const LOGIN_PATH: &str = "/jpnic/certmemberlogin.do";
pub const HANDLE_PATH: &str = "/jpnic/entryinfo_handle.do?jpnic_hdl=";
pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:91.0) Gecko/20100101 Firefox/91.0";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
// The transactional endpoint takes its key=value body as text/html.
pub const TRANSACTION_CONTENT_TYPE: &str = "text/html";
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

// Pause before every dependent detail/handle fetch. Be polite.
pub const REQUEST_PAUSE_MS: u64 = 1000;

// Menu labels (exact anchor text on the navigation page)
pub const MENU_SEARCH_IPV4: &str = "登録情報検索(IPv4)";
pub const MENU_SEARCH_IPV6: &str = "登録情報検索(IPv6)";
pub const MENU_HANDLE_SEARCH: &str = "担当グループ・JPNICハンドル検索／変換";
pub const MENU_CONTACT_CHANGE: &str = "担当グループ（担当者）情報登録・変更";
pub const MENU_REQUEST_LIST: &str = "申請一覧";
pub const MENU_RESOURCE_MANAGER: &str = "資源管理者情報";

// Button captions. IPv4 search sends its caption raw (transcoded with the
// body); the rest are already percent-encoded Shift_JIS and go out verbatim.
pub const CAPTION_SEARCH_RAW: &str = "　検索　";
pub const CAPTION_SEARCH_SJIS: &str = "%81%40%8C%9F%8D%F5%81%40";
pub const CAPTION_APPLY_SJIS: &str = "%90%5C%90%BF";
pub const CAPTION_CONFIRM_SJIS: &str = "%8Am%94F";

// Page markers
pub const CONFIRM_PHRASE: &str = "上記の申請内容でよろしければ、「確認」ボタンを押してください。";
pub const RECEIPT_LABEL: &str = "受付番号";
pub const LISTING_CELL_CLASS: &str = "dataRow_mnt04";

// Hidden form fields
pub const FIELD_TOKEN: &str = "org.apache.struts.taglib.html.TOKEN";
pub const FIELD_DESTDISP: &str = "destdisp";
pub const FIELD_APLYID: &str = "aplyid";
pub const FIELD_PREV_DISP: &str = "prevDispId";
pub const FIELD_OWN_SHORT_NAME: &str = "resceAdmSnm";

// Local log sink
pub const LOG_FILE: &str = ".store/debug.log";
