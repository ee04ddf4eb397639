// src/scrape/transaction.rs
use tracing::info;

use crate::{
    config::consts::TRANSACTION_CONTENT_TYPE,
    core::Transport,
    error::{ PortalError, Result },
    specs::{ control::{ self, ResultOutcome }, form::FormSubmission },
};

use super::portal::Portal;

impl<T: Transport> Portal<T> {
    /// POST a prepared `key=value` body to the transactional endpoint.
    ///
    /// The outcome is returned as parsed, rejections included; call
    /// [`ResultOutcome::into_result`] to turn them into an error.
    pub fn submit_transaction(&mut self, body: &FormSubmission) -> Result<ResultOutcome> {
        let url = self.transaction_url.clone().ok_or_else(|| {
            PortalError::Config(s!("no transaction_url configured"))
        })?;
        let reply = self.net().post_as(&url, TRANSACTION_CONTENT_TYPE, body)?;
        let outcome = control::parse(&reply, &self.classifier);
        info!(ret = %outcome.overall_code, recep_no = %outcome.recep_no, "transaction answered");
        Ok(outcome)
    }
}
