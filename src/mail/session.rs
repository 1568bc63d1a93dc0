//! Live IMAP session over TLS.

use std::net::TcpStream;

use native_tls::TlsStream;

use crate::config::ImapConfig;
use crate::error::{DropError, Result};
use crate::mail::criteria::SearchCriteria;
use crate::mail::MailSource;

/// An authenticated IMAP session with a mailbox selected.
pub struct ImapMailbox {
    session: imap::Session<TlsStream<TcpStream>>,
}

impl ImapMailbox {
    /// Connect, log in, and select the configured mailbox.
    ///
    /// A login failure is fatal here — nothing has been written yet, so
    /// there is no partial state to clean up.
    pub fn connect(config: &ImapConfig, password: &str) -> Result<Self> {
        if config.user.is_empty() {
            return Err(DropError::Config("imap.user is not set".into()));
        }

        let tls = native_tls::TlsConnector::builder().build()?;
        let client = imap::connect(
            (config.host.as_str(), config.port),
            config.host.as_str(),
            &tls,
        )?;

        let mut session = client
            .login(&config.user, password)
            .map_err(|(err, _client)| err)?;

        session.select(&config.mailbox)?;
        tracing::info!(
            host = %config.host,
            mailbox = %config.mailbox,
            "IMAP session established"
        );

        Ok(Self { session })
    }

    /// Log out cleanly. Dropping the session without this just closes
    /// the connection, which servers tolerate.
    pub fn logout(&mut self) -> Result<()> {
        self.session.logout()?;
        Ok(())
    }
}

impl MailSource for ImapMailbox {
    fn search(&mut self, criteria: &SearchCriteria) -> Result<Vec<u32>> {
        let query = criteria.to_query();
        tracing::debug!(query = %query, "IMAP SEARCH");

        let ids = self.session.search(&query)?;
        let mut ids: Vec<u32> = ids.into_iter().collect();
        ids.sort_unstable();
        Ok(ids)
    }

    fn fetch(&mut self, id: u32) -> Result<Vec<u8>> {
        let messages = self.session.fetch(id.to_string(), "RFC822")?;
        let message = messages
            .iter()
            .next()
            .ok_or_else(|| DropError::Protocol(format!("empty FETCH response for message {id}")))?;

        let body = message
            .body()
            .ok_or_else(|| DropError::Protocol(format!("message {id} has no RFC822 body")))?;

        Ok(body.to_vec())
    }
}
