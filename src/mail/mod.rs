//! Mail store access: search criteria, the live IMAP session, and
//! attachment extraction.

pub mod criteria;
pub mod extract;
pub mod session;

use crate::error::Result;
use crate::mail::criteria::SearchCriteria;

/// Capability set the mailbox-scan stage needs from a mail store.
///
/// The live implementation is [`session::ImapMailbox`]; tests use
/// in-memory fakes.
pub trait MailSource {
    /// Run a search and return matching message ids, ascending.
    fn search(&mut self, criteria: &SearchCriteria) -> Result<Vec<u32>>;

    /// Fetch the full RFC-822 bytes of one message.
    fn fetch(&mut self, id: u32) -> Result<Vec<u8>>;
}
