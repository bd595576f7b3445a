//! google-sheets-mcp: MCP server for working with Google Sheets spreadsheets
//!
//! This library exposes a small set of spreadsheet operations as MCP tools so
//! that AI assistants can inspect and edit spreadsheets they have access to.
//!
//! # Architecture
//!
//! Each tool maps onto exactly one Google Sheets API v4 request:
//!
//! - **Metadata**: spreadsheet title and the ID/title of every tab
//! - **Values**: read, append and overwrite cell ranges in A1 notation
//! - **Structure**: add, delete and rename tabs; insert and delete rows or columns
//!
//! Credentials come from Google application default credentials and are
//! resolved the first time a tool actually needs the API.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`error`]: Error types
//! - [`mcp`]: MCP protocol implementation
//! - [`sheets`]: Google Sheets API client
//! - [`tools`]: Tool definitions and handlers

pub mod config;
pub mod error;
pub mod mcp;
pub mod sheets;
pub mod tools;
