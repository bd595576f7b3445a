//! Spreadsheet tools exposed over MCP.
//!
//! Each tool function turns its arguments into exactly one Sheets API call
//! and maps the reply into a small serialisable result. Tool functions never
//! catch errors; [`handler::handle_tool_call`] is the only place failures
//! become user-visible text.
//!
//! | Tool | Function |
//! |------|----------|
//! | `get_sheet_metadata` | [`metadata::get_sheet_metadata`] |
//! | `read_values` | [`values::read_values`] |
//! | `append_values` | [`values::append_values`] |
//! | `update_values` | [`values::update_values`] |
//! | `add_sheet` | [`sheets::add_sheet`] |
//! | `delete_sheet` | [`sheets::delete_sheet`] |
//! | `rename_sheet` | [`sheets::rename_sheet`] |
//! | `delete_rows` | [`dimensions::delete_rows`] |
//! | `delete_columns` | [`dimensions::delete_columns`] |
//! | `insert_rows` | [`dimensions::insert_rows`] |
//! | `insert_columns` | [`dimensions::insert_columns`] |

pub mod dimensions;
pub mod handler;
pub mod metadata;
pub mod registry;
pub mod sheets;
pub mod values;

pub use handler::handle_tool_call;
pub use registry::{tool_definitions, ToolCall, TOOL_NAMES};
