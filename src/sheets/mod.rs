//! Google Sheets API access.
//!
//! - [`model`]: request/reply shapes of the Sheets v4 REST API
//! - [`api`]: the [`SheetsApi`] trait the tools are written against
//! - [`client`]: [`HttpSheetsClient`], the `reqwest` implementation
//! - [`provider`]: [`ClientProvider`], the lazily built shared client

pub mod api;
pub mod client;
pub mod model;
pub mod provider;

#[cfg(test)]
pub(crate) mod testing;

pub use api::SheetsApi;
pub use client::{HttpSheetsClient, SPREADSHEETS_SCOPE};
pub use provider::ClientProvider;
