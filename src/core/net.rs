// src/core/net.rs
// Mutual-TLS session against the portal, plus the encode/decode wrappers
// every page and form goes through.

use std::time::{ Duration, Instant };

use reqwest::blocking::Client;
use reqwest::header::{ CONTENT_TYPE, USER_AGENT };
use reqwest::{ Certificate, Identity, Url };
use tracing::debug;

use crate::config::consts::{ FORM_CONTENT_TYPE, USER_AGENT as AGENT };
use crate::config::options::{ Credentials, PortalConfig };
use crate::core::deadline::Deadline;
use crate::core::encoding::{ from_legacy, to_legacy };
use crate::error::{ PortalError, Result };
use crate::specs::form::FormSubmission;

/// Raw byte transport. One implementation talks to the portal; tests
/// script one from fixtures.
///
/// Implementations carry session state (cookies), so calls for one
/// workflow must be issued in order through the same value.
pub trait Transport {
    fn get(&mut self, url: &Url, timeout: Duration) -> Result<Vec<u8>>;
    fn post(&mut self, url: &Url, content_type: &str, body: Vec<u8>, timeout: Duration) -> Result<Vec<u8>>;
}

/// One logical login: client identity, CA anchors, cookie jar and
/// connection pool, reused for every request.
pub struct Session {
    client: Client,
}

impl Session {
    pub fn initialize(creds: &Credentials, cfg: &PortalConfig) -> Result<Self> {
        let identity = Identity::from_pkcs12_der(&creds.pkcs12, &creds.passphrase)
            .map_err(|e| PortalError::Credential(format!("client certificate bundle: {e}")))?;
        let anchors = Certificate::from_pem_bundle(&creds.ca_pem)
            .map_err(|e| PortalError::Credential(format!("CA bundle: {e}")))?;
        if anchors.is_empty() {
            return Err(PortalError::Credential(s!("CA bundle holds no certificates")));
        }

        let mut builder = Client::builder()
            .identity(identity)
            .tls_built_in_root_certs(false)
            .cookie_store(true)
            .timeout(cfg.timeout());
        for cert in anchors {
            builder = builder.add_root_certificate(cert);
        }
        let client = builder
            .build()
            .map_err(|e| PortalError::Credential(format!("TLS setup: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for Session {
    fn get(&mut self, url: &Url, timeout: Duration) -> Result<Vec<u8>> {
        let t = Instant::now();
        let resp = self.client
            .get(url.clone())
            .header(USER_AGENT, AGENT)
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        let body = resp.bytes()?.to_vec();
        debug!(%url, bytes = body.len(), elapsed = ?t.elapsed(), "GET");
        Ok(body)
    }

    fn post(&mut self, url: &Url, content_type: &str, body: Vec<u8>, timeout: Duration) -> Result<Vec<u8>> {
        let t = Instant::now();
        let resp = self.client
            .post(url.clone())
            .header(USER_AGENT, AGENT)
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .timeout(timeout)
            .send()?
            .error_for_status()?;
        let body = resp.bytes()?.to_vec();
        debug!(%url, bytes = body.len(), elapsed = ?t.elapsed(), "POST");
        Ok(body)
    }
}

/// Request context shared by the helpers below.
pub struct Net<'a, T: Transport + ?Sized> {
    pub transport: &'a mut T,
    pub deadline: &'a Deadline,
    pub timeout: Duration,
}

impl<T: Transport + ?Sized> Net<'_, T> {
    /// GET and decode a page.
    pub fn get_page(&mut self, url: &Url) -> Result<String> {
        self.deadline.check()?;
        let bytes = self.transport.get(url, self.deadline.bound(self.timeout))?;
        from_legacy(&bytes)
    }

    /// POST a form body (`application/x-www-form-urlencoded`) and decode the reply.
    pub fn post_form(&mut self, url: &Url, form: &FormSubmission) -> Result<String> {
        self.post_as(url, FORM_CONTENT_TYPE, form)
    }

    pub fn post_as(&mut self, url: &Url, content_type: &str, form: &FormSubmission) -> Result<String> {
        self.deadline.check()?;
        let body = to_legacy(&form.to_body())?;
        let bytes = self.transport.post(url, content_type, body, self.deadline.bound(self.timeout))?;
        from_legacy(&bytes)
    }
}

/// Resolve an href from a page against that page's URL.
pub fn resolve(page: &Url, href: &str) -> Result<Url> {
    page.join(href)
        .map_err(|e| PortalError::structural(page.as_str(), format!("bad link {href:?}: {e}")))
}
