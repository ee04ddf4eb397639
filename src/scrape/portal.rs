// src/scrape/portal.rs
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use tracing::info;

use crate::{
    classify::ErrorClassifier,
    config::options::{ Credentials, PortalConfig },
    core::{ Deadline, Session, Transport },
    core::net::{ resolve, Net },
    error::{ PortalError, Result },
    specs::{ form::FormSubmission, menu },
};

use super::links::{ Clock, IntervalLimiter, SystemClock };

/// One logged-in member session and the workflows run over it.
///
/// Workflows take `&mut self`: the portal keeps per-session state on its
/// side, so requests on one session are strictly sequential.
pub struct Portal<T: Transport = Session> {
    transport: T,
    pub(crate) base: Url,
    pub(crate) classifier: ErrorClassifier,
    pub(crate) deadline: Deadline,
    timeout: Duration,
    pause: Duration,
    clock: Arc<dyn Clock>,
    pub(crate) transaction_url: Option<Url>,
}

impl Portal<Session> {
    /// Load certificate material and open the mTLS session.
    pub fn connect(cfg: &PortalConfig, classifier: ErrorClassifier) -> Result<Self> {
        let creds = Credentials::load(cfg)?;
        let session = Session::initialize(&creds, cfg)?;
        info!(base = %cfg.base_url, "portal session ready");
        Self::with_transport(session, cfg, classifier)
    }
}

impl<T: Transport> Portal<T> {
    pub fn with_transport(transport: T, cfg: &PortalConfig, classifier: ErrorClassifier) -> Result<Self> {
        let base = parse_url("base_url", &cfg.base_url)?;
        let transaction_url = cfg.transaction_url
            .as_deref()
            .map(|u| parse_url("transaction_url", u))
            .transpose()?;

        Ok(Self {
            transport,
            base,
            classifier,
            deadline: Deadline::none(),
            timeout: cfg.timeout(),
            pause: cfg.request_pause(),
            clock: Arc::new(SystemClock),
            transaction_url,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Applies to every workflow started afterwards.
    pub fn set_deadline(&mut self, deadline: Deadline) {
        self.deadline = deadline;
    }

    pub fn transport(&self) -> &T { &self.transport }

    pub fn into_transport(self) -> T { self.transport }

    pub(crate) fn net(&mut self) -> Net<'_, T> {
        Net { transport: &mut self.transport, deadline: &self.deadline, timeout: self.timeout }
    }

    /// Fresh limiter for one traversal.
    pub(crate) fn limiter(&self) -> IntervalLimiter<Arc<dyn Clock>> {
        IntervalLimiter::new(Arc::clone(&self.clock), self.pause)
    }

    /// Resolve a menu label to its endpoint.
    pub(crate) fn menu(&mut self, label: &str) -> Result<Url> {
        let base = self.base.clone();
        menu::resolve(&mut self.net(), &base, label)
    }

    /// Resolve a menu label and GET the page behind it.
    pub(crate) fn open(&mut self, label: &str) -> Result<(Url, String)> {
        let url = self.menu(label)?;
        let page = self.net().get_page(&url)?;
        Ok((url, page))
    }

    /// GET a path relative to the portal root.
    pub(crate) fn get_path(&mut self, path: &str) -> Result<(Url, String)> {
        let url = resolve(&self.base, path)?;
        let page = self.net().get_page(&url)?;
        Ok((url, page))
    }

    /// GET a link found on `page`.
    pub(crate) fn follow(&mut self, page: &Url, href: &str) -> Result<(Url, String)> {
        let url = resolve(page, href)?;
        let page = self.net().get_page(&url)?;
        Ok((url, page))
    }

    /// POST a form to its `action`, resolved against the page it came from.
    pub(crate) fn submit(&mut self, page: &Url, action: &str, body: &FormSubmission) -> Result<(Url, String)> {
        let url = resolve(page, action)?;
        info!(%url, fields = body.len(), "submitting form");
        let reply = self.net().post_form(&url, body)?;
        Ok((url, reply))
    }
}

fn parse_url(key: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| PortalError::Config(format!("{key} {raw:?}: {e}")))
}
