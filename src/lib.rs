//! `invoicedrop` — move PDF attachments from a mailbox into Google Drive.
//!
//! This crate provides the core library for the two-stage pipeline:
//! scan an IMAP mailbox for matching messages and stage their PDF
//! attachments locally, then reconcile the staging directory against a
//! Drive folder, uploading only what is not already there.

pub mod config;
pub mod drive;
pub mod error;
pub mod fetch;
pub mod local;
pub mod mail;
pub mod model;
pub mod sync;
