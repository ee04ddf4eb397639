// src/cli.rs
use std::collections::BTreeMap;
use std::fs;
use std::path::{ Path, PathBuf };
use std::time::Duration;

use clap::{ Args, Parser, Subcommand };
use color_eyre::eyre::{ Result, WrapErr };
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::classify::{ ErrorClassifier, UnmappedStatus };
use crate::config::consts::LOG_FILE;
use crate::config::options::PortalConfig;
use crate::core::Deadline;
use crate::progress::Progress;
use crate::scrape::{ ContactInput, Portal, SearchIpv4, SearchIpv6 };
use crate::specs::form::FormSubmission;

#[derive(Parser, Debug)]
#[command(name = "jpnic_scrape", version, about = "JPNIC member portal client")]
pub struct Cli {
    /// JSON config file; flags and env override its values.
    #[arg(long, global = true, env = "JPNIC_CONFIG")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, env = "JPNIC_BASE_URL")]
    pub base_url: Option<String>,
    /// PKCS#12 bundle with the member certificate.
    #[arg(long, global = true, env = "JPNIC_PFX")]
    pub pfx: Option<PathBuf>,
    #[arg(long, global = true, env = "JPNIC_PFX_PASS", hide_env_values = true)]
    pub pfx_pass: Option<String>,
    /// PEM file with the portal's CA certificates.
    #[arg(long, global = true, env = "JPNIC_CA")]
    pub ca: Option<PathBuf>,
    #[arg(long, global = true, env = "JPNIC_TRANSACTION_URL")]
    pub transaction_url: Option<String>,
    /// JSON object mapping status codes to messages.
    #[arg(long, global = true)]
    pub status_table: Option<PathBuf>,
    /// Give up after this many seconds.
    #[arg(long, global = true)]
    pub deadline_secs: Option<u64>,
    #[arg(long, global = true, default_value = "info", env = "JPNIC_LOG")]
    pub log_level: String,
    /// Log to this file instead of stderr.
    #[arg(long, global = true, num_args = 0..=1, default_missing_value = LOG_FILE)]
    pub log_file: Option<PathBuf>,
    /// Write JSON here instead of stdout.
    #[arg(short, long, global = true)]
    pub out: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// IPv4 registration search.
    SearchV4(SearchArgs),
    /// IPv6 registration search.
    SearchV6(SearchArgs),
    /// One registration's detail page, by portal path.
    IpDetail { path: String },
    /// One person or group handle.
    Handle { handle: String },
    /// Resource-manager summary.
    Resource {
        /// Also save the raw page here.
        #[arg(long)]
        raw: Option<PathBuf>,
    },
    /// File a contact change from a JSON description.
    Contact { input: PathBuf },
    /// Application list from a receipt number on.
    Requests {
        #[arg(long, default_value = "")]
        start: String,
    },
    /// POST a key=value file to the transactional endpoint.
    Transaction { body: PathBuf },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// JSON file with search criteria.
    #[arg(long)]
    pub query: Option<PathBuf>,
    #[arg(long)]
    pub ip: Option<String>,
    /// Only our own registrations.
    #[arg(long)]
    pub myself: bool,
    /// Follow rows to detail pages and contact handles.
    #[arg(long)]
    pub detail: bool,
    /// Handle to leave out of the detail traversal (repeatable).
    #[arg(long = "skip-handle")]
    pub skip_handles: Vec<String>,
}

/// Progress lines on stderr, stdout stays JSON.
struct StderrProgress {
    total: usize,
}

impl Progress for StderrProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("Fetching detail for {total} rows…");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, index: usize, label: &str) {
        eprintln!("[{}/{}] {label}", index + 1, self.total);
    }
    fn item_failed(&mut self, index: usize, label: &str) {
        eprintln!("[{}/{}] {label} (detail failed)", index + 1, self.total);
    }
    fn finish(&mut self) {
        eprintln!("Done.");
    }
}

#[derive(Serialize)]
struct Listing<R, H> {
    rows: Vec<R>,
    handles: Vec<H>,
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    crate::log::init(&cli.log_level, cli.log_file.as_deref())?;

    let cfg = portal_config(&cli)?;
    let classifier = classifier(cli.status_table.as_deref())?;
    let mut portal = Portal::connect(&cfg, classifier).wrap_err("could not open portal session")?;
    if let Some(secs) = cli.deadline_secs {
        portal.set_deadline(Deadline::after(Duration::from_secs(secs)));
    }
    let mut progress = StderrProgress { total: 0 };

    let json = match &cli.command {
        Command::SearchV4(a) => {
            let mut q: SearchIpv4 = read_json_or_default(a.query.as_deref())?;
            if let Some(ip) = &a.ip { q.ip_address = ip.clone(); }
            q.myself |= a.myself;
            q.with_detail |= a.detail;
            q.skip_handles.extend(a.skip_handles.iter().cloned());
            let (rows, handles) = portal.search_ipv4(&q, &mut progress)?;
            to_json(&Listing { rows, handles })?
        }
        Command::SearchV6(a) => {
            let mut q: SearchIpv6 = read_json_or_default(a.query.as_deref())?;
            if let Some(ip) = &a.ip { q.ip_address = ip.clone(); }
            q.myself |= a.myself;
            q.with_detail |= a.detail;
            q.skip_handles.extend(a.skip_handles.iter().cloned());
            let (rows, handles) = portal.search_ipv6(&q, &mut progress)?;
            to_json(&Listing { rows, handles })?
        }
        Command::IpDetail { path } => to_json(&portal.ip_detail(path)?)?,
        Command::Handle { handle } => to_json(&portal.handle_detail(handle)?)?,
        Command::Resource { raw } => {
            let (info, page) = portal.resource_management()?;
            if let Some(p) = raw {
                fs::write(p, page).wrap_err_with(|| format!("writing {}", p.display()))?;
            }
            to_json(&info)?
        }
        Command::Contact { input } => {
            let input: ContactInput = read_json(input)?;
            let recep_no = portal.change_contact_info(&input)?;
            to_json(&serde_json::json!({ "recep_no": recep_no }))?
        }
        Command::Requests { start } => to_json(&portal.request_list(start)?)?,
        Command::Transaction { body } => {
            let text = fs::read_to_string(body).wrap_err_with(|| format!("reading {}", body.display()))?;
            let form = FormSubmission::from_lines(&text)?;
            let outcome = portal.submit_transaction(&form)?;
            let json = to_json(&outcome)?;
            emit(cli.out.as_deref(), &json)?;
            outcome.into_result()?;
            return Ok(());
        }
    };

    emit(cli.out.as_deref(), &json)
}

fn portal_config(cli: &Cli) -> Result<PortalConfig> {
    let mut cfg = match &cli.config {
        Some(p) => PortalConfig::from_file(p)?,
        None => PortalConfig::default(),
    };
    if let Some(v) = &cli.base_url { cfg.base_url = v.clone(); }
    if let Some(v) = &cli.pfx { cfg.pfx_path = v.clone(); }
    if let Some(v) = &cli.pfx_pass { cfg.pfx_pass = v.clone(); }
    if let Some(v) = &cli.ca { cfg.ca_path = v.clone(); }
    if let Some(v) = &cli.transaction_url { cfg.transaction_url = Some(v.clone()); }
    Ok(cfg)
}

fn classifier(table: Option<&Path>) -> Result<ErrorClassifier> {
    let Some(path) = table else {
        return Ok(ErrorClassifier::new(UnmappedStatus));
    };
    let map: BTreeMap<u32, String> = read_json(path)?;
    Ok(ErrorClassifier::new(move |code: u32| {
        map.get(&code).cloned().unwrap_or_else(|| format!("status {code}"))
    }))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("parsing {}", path.display()))
}

fn read_json_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    path.map_or_else(|| Ok(T::default()), read_json::<T>)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn emit(out: Option<&Path>, json: &str) -> Result<()> {
    match out {
        Some(p) => {
            fs::write(p, json).wrap_err_with(|| format!("writing {}", p.display()))?;
            eprintln!("Wrote {}", p.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
