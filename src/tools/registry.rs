//! Tool registry: definitions served by `tools/list` and typed dispatch for
//! `tools/call`.
//!
//! Arguments are parsed into one struct per tool before anything touches the
//! network, so a malformed call never reaches the Sheets API.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ToolError, ToolResult};
use crate::mcp::server::ToolDefinition;
use crate::sheets::model::CellGrid;
use crate::sheets::SheetsApi;
use crate::tools::dimensions::{self, MAX_INDEX};
use crate::tools::{metadata, sheets, values};

/// Arguments naming only a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetArgs {
    pub spreadsheet_id: String,
}

/// Arguments naming a range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeArgs {
    pub spreadsheet_id: String,
    pub range: String,
}

/// Arguments for writing a grid into a range.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteValuesArgs {
    pub spreadsheet_id: String,
    pub range: String,
    pub values: CellGrid,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetArgs {
    pub spreadsheet_id: String,
    pub title: String,
}

/// Arguments naming one tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetArgs {
    pub spreadsheet_id: String,
    pub sheet_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameSheetArgs {
    pub spreadsheet_id: String,
    pub sheet_id: i32,
    pub new_title: String,
}

/// Half-open `[startIndex, endIndex)` span on one tab.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanArgs {
    pub spreadsheet_id: String,
    pub sheet_id: i32,
    pub start_index: u32,
    pub end_index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRowsArgs {
    pub spreadsheet_id: String,
    pub sheet_id: i32,
    pub start_index: u32,
    pub num_rows: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertColumnsArgs {
    pub spreadsheet_id: String,
    pub sheet_id: i32,
    pub start_index: u32,
    pub num_columns: u32,
}

/// A validated tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GetSheetMetadata(SpreadsheetArgs),
    ReadValues(RangeArgs),
    AppendValues(WriteValuesArgs),
    UpdateValues(WriteValuesArgs),
    AddSheet(AddSheetArgs),
    DeleteSheet(SheetArgs),
    RenameSheet(RenameSheetArgs),
    DeleteRows(SpanArgs),
    DeleteColumns(SpanArgs),
    InsertRows(InsertRowsArgs),
    InsertColumns(InsertColumnsArgs),
}

/// Names of every registered tool, in `tools/list` order.
pub const TOOL_NAMES: [&str; 11] = [
    "get_sheet_metadata",
    "read_values",
    "append_values",
    "update_values",
    "add_sheet",
    "delete_sheet",
    "rename_sheet",
    "delete_rows",
    "delete_columns",
    "insert_rows",
    "insert_columns",
];

fn parse_args<T: DeserializeOwned>(tool: &str, arguments: &Value) -> ToolResult<T> {
    serde_json::from_value(arguments.clone()).map_err(|e| ToolError::validation(tool, e.to_string()))
}

impl ToolCall {
    /// Parses and validates the arguments of tool `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] for an unregistered name and
    /// [`ToolError::Validation`] when the arguments do not fit the tool's
    /// input shape.
    pub fn parse(name: &str, arguments: &Value) -> ToolResult<Self> {
        let call = match name {
            "get_sheet_metadata" => Self::GetSheetMetadata(parse_args(name, arguments)?),
            "read_values" => Self::ReadValues(parse_args(name, arguments)?),
            "append_values" => Self::AppendValues(parse_args(name, arguments)?),
            "update_values" => Self::UpdateValues(parse_args(name, arguments)?),
            "add_sheet" => Self::AddSheet(parse_args(name, arguments)?),
            "delete_sheet" => Self::DeleteSheet(parse_args(name, arguments)?),
            "rename_sheet" => Self::RenameSheet(parse_args(name, arguments)?),
            "delete_rows" => Self::DeleteRows(parse_args(name, arguments)?),
            "delete_columns" => Self::DeleteColumns(parse_args(name, arguments)?),
            "insert_rows" => Self::InsertRows(parse_args(name, arguments)?),
            "insert_columns" => Self::InsertColumns(parse_args(name, arguments)?),
            _ => {
                return Err(ToolError::UnknownTool {
                    name: name.to_string(),
                })
            }
        };

        call.validate()?;
        Ok(call)
    }

    /// Registered name of this tool.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GetSheetMetadata(_) => "get_sheet_metadata",
            Self::ReadValues(_) => "read_values",
            Self::AppendValues(_) => "append_values",
            Self::UpdateValues(_) => "update_values",
            Self::AddSheet(_) => "add_sheet",
            Self::DeleteSheet(_) => "delete_sheet",
            Self::RenameSheet(_) => "rename_sheet",
            Self::DeleteRows(_) => "delete_rows",
            Self::DeleteColumns(_) => "delete_columns",
            Self::InsertRows(_) => "insert_rows",
            Self::InsertColumns(_) => "insert_columns",
        }
    }

    fn spreadsheet_id(&self) -> &str {
        match self {
            Self::GetSheetMetadata(a) => &a.spreadsheet_id,
            Self::ReadValues(a) => &a.spreadsheet_id,
            Self::AppendValues(a) | Self::UpdateValues(a) => &a.spreadsheet_id,
            Self::AddSheet(a) => &a.spreadsheet_id,
            Self::DeleteSheet(a) => &a.spreadsheet_id,
            Self::RenameSheet(a) => &a.spreadsheet_id,
            Self::DeleteRows(a) | Self::DeleteColumns(a) => &a.spreadsheet_id,
            Self::InsertRows(a) => &a.spreadsheet_id,
            Self::InsertColumns(a) => &a.spreadsheet_id,
        }
    }

    /// Constraints the input schema declares but serde cannot express.
    fn validate(&self) -> ToolResult<()> {
        if self.spreadsheet_id().is_empty() {
            return Err(ToolError::validation(
                self.name(),
                "spreadsheetId must not be empty",
            ));
        }

        if let Self::DeleteRows(span) | Self::DeleteColumns(span) = self {
            self.check_index("startIndex", span.start_index)?;
            self.check_index("endIndex", span.end_index)?;
            if span.end_index < span.start_index {
                return Err(ToolError::validation(
                    self.name(),
                    format!(
                        "endIndex ({}) must not be less than startIndex ({})",
                        span.end_index, span.start_index
                    ),
                ));
            }
        }

        let insert = match self {
            Self::InsertRows(a) => Some((a.start_index, "numRows", a.num_rows)),
            Self::InsertColumns(a) => Some((a.start_index, "numColumns", a.num_columns)),
            _ => None,
        };
        if let Some((start_index, count_name, count)) = insert {
            self.check_index("startIndex", start_index)?;
            self.check_index(count_name, count)?;
            if start_index.checked_add(count).map_or(true, |end| end > MAX_INDEX) {
                return Err(ToolError::validation(
                    self.name(),
                    format!(
                        "startIndex ({start_index}) plus {count_name} ({count}) must not exceed {MAX_INDEX}"
                    ),
                ));
            }
        }

        Ok(())
    }

    fn check_index(&self, field: &str, value: u32) -> ToolResult<()> {
        if value > MAX_INDEX {
            return Err(ToolError::validation(
                self.name(),
                format!("{field} ({value}) must not exceed {MAX_INDEX}"),
            ));
        }
        Ok(())
    }

    /// Runs the tool against `api` and returns its result as JSON.
    ///
    /// # Errors
    ///
    /// Propagates the tool's error unchanged.
    pub async fn execute(self, api: &dyn SheetsApi) -> ToolResult<Value> {
        let value = match self {
            Self::GetSheetMetadata(a) => {
                serde_json::to_value(metadata::get_sheet_metadata(api, &a.spreadsheet_id).await?)?
            }
            Self::ReadValues(a) => {
                serde_json::to_value(values::read_values(api, &a.spreadsheet_id, &a.range).await?)?
            }
            Self::AppendValues(a) => serde_json::to_value(
                values::append_values(api, &a.spreadsheet_id, &a.range, a.values).await?,
            )?,
            Self::UpdateValues(a) => serde_json::to_value(
                values::update_values(api, &a.spreadsheet_id, &a.range, a.values).await?,
            )?,
            Self::AddSheet(a) => {
                serde_json::to_value(sheets::add_sheet(api, &a.spreadsheet_id, &a.title).await?)?
            }
            Self::DeleteSheet(a) => serde_json::to_value(
                sheets::delete_sheet(api, &a.spreadsheet_id, a.sheet_id).await?,
            )?,
            Self::RenameSheet(a) => serde_json::to_value(
                sheets::rename_sheet(api, &a.spreadsheet_id, a.sheet_id, &a.new_title).await?,
            )?,
            Self::DeleteRows(a) => serde_json::to_value(
                dimensions::delete_rows(
                    api,
                    &a.spreadsheet_id,
                    a.sheet_id,
                    a.start_index,
                    a.end_index,
                )
                .await?,
            )?,
            Self::DeleteColumns(a) => serde_json::to_value(
                dimensions::delete_columns(
                    api,
                    &a.spreadsheet_id,
                    a.sheet_id,
                    a.start_index,
                    a.end_index,
                )
                .await?,
            )?,
            Self::InsertRows(a) => serde_json::to_value(
                dimensions::insert_rows(
                    api,
                    &a.spreadsheet_id,
                    a.sheet_id,
                    a.start_index,
                    a.num_rows,
                )
                .await?,
            )?,
            Self::InsertColumns(a) => serde_json::to_value(
                dimensions::insert_columns(
                    api,
                    &a.spreadsheet_id,
                    a.sheet_id,
                    a.start_index,
                    a.num_columns,
                )
                .await?,
            )?,
        };
        Ok(value)
    }
}

fn spreadsheet_id_schema() -> Value {
    json!({
        "type": "string",
        "minLength": 1,
        "description": "Spreadsheet ID (the long token in the spreadsheet URL)"
    })
}

fn sheet_id_schema(purpose: &str) -> Value {
    json!({
        "type": "integer",
        "description": format!("ID of the sheet (tab) to {purpose}, as returned by get_sheet_metadata")
    })
}

fn index_schema(description: &str) -> Value {
    json!({
        "type": "integer",
        "minimum": 0,
        "maximum": MAX_INDEX,
        "description": description
    })
}

fn grid_schema(description: &str) -> Value {
    json!({
        "type": "array",
        "items": { "type": "array", "items": { "type": "string" } },
        "description": description
    })
}

/// Returns the definitions of every registered tool.
#[allow(clippy::too_many_lines)]
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        // === Metadata ===
        ToolDefinition {
            name: "get_sheet_metadata".to_string(),
            description: Some(
                "Get the title of a spreadsheet and the list of its sheets (tabs) with their IDs."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema()
                },
                "required": ["spreadsheetId"]
            }),
        },
        // === Values ===
        ToolDefinition {
            name: "read_values".to_string(),
            description: Some(
                "Read the values in a range. Returns computed, formatted values; formulas are \
                 not returned."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "range": {
                        "type": "string",
                        "description": "Range in A1 notation (e.g. 'Sheet1!A1:C10')"
                    }
                },
                "required": ["spreadsheetId", "range"]
            }),
        },
        ToolDefinition {
            name: "append_values".to_string(),
            description: Some(
                "Append rows after the last row of data in a range. Values are interpreted as \
                 if typed by a user, so numbers, dates and formulas are parsed."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "range": {
                        "type": "string",
                        "description": "Range in A1 notation to append to (e.g. 'Sheet1!A:C')"
                    },
                    "values": grid_schema("Rows of cell values to append")
                },
                "required": ["spreadsheetId", "range", "values"]
            }),
        },
        ToolDefinition {
            name: "update_values".to_string(),
            description: Some(
                "Overwrite the values in a range. Values are interpreted as if typed by a user, \
                 so numbers, dates and formulas are parsed."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "range": {
                        "type": "string",
                        "description": "Range in A1 notation to overwrite (e.g. 'Sheet1!A1:C10')"
                    },
                    "values": grid_schema("Rows of cell values to write")
                },
                "required": ["spreadsheetId", "range", "values"]
            }),
        },
        // === Sheet lifecycle ===
        ToolDefinition {
            name: "add_sheet".to_string(),
            description: Some(
                "Add a new sheet (tab). Returns the sheetId assigned to it.".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "title": {
                        "type": "string",
                        "description": "Name of the new sheet"
                    }
                },
                "required": ["spreadsheetId", "title"]
            }),
        },
        ToolDefinition {
            name: "delete_sheet".to_string(),
            description: Some("Delete a sheet (tab).".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "sheetId": sheet_id_schema("delete")
                },
                "required": ["spreadsheetId", "sheetId"]
            }),
        },
        ToolDefinition {
            name: "rename_sheet".to_string(),
            description: Some(
                "Rename a sheet (tab). Other sheet properties are left unchanged.".to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "sheetId": sheet_id_schema("rename"),
                    "newTitle": {
                        "type": "string",
                        "description": "New name of the sheet"
                    }
                },
                "required": ["spreadsheetId", "sheetId", "newTitle"]
            }),
        },
        // === Rows and columns ===
        ToolDefinition {
            name: "delete_rows".to_string(),
            description: Some(
                "Delete rows startIndex (inclusive) to endIndex (exclusive), zero-based. Rows \
                 below shift up; when deleting several ranges, go from the bottom up."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "sheetId": sheet_id_schema("edit"),
                    "startIndex": index_schema("First row to delete (0-based, inclusive)"),
                    "endIndex": index_schema("Row after the last one to delete (0-based, exclusive)")
                },
                "required": ["spreadsheetId", "sheetId", "startIndex", "endIndex"]
            }),
        },
        ToolDefinition {
            name: "delete_columns".to_string(),
            description: Some(
                "Delete columns startIndex (inclusive) to endIndex (exclusive), zero-based. \
                 Columns to the right shift left; when deleting several ranges, go from the \
                 right."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "sheetId": sheet_id_schema("edit"),
                    "startIndex": index_schema("First column to delete (0-based, inclusive, A = 0)"),
                    "endIndex": index_schema("Column after the last one to delete (0-based, exclusive)")
                },
                "required": ["spreadsheetId", "sheetId", "startIndex", "endIndex"]
            }),
        },
        ToolDefinition {
            name: "insert_rows".to_string(),
            description: Some(
                "Insert empty rows at a position. New rows take the formatting of the row \
                 above, except when inserting at the top."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "sheetId": sheet_id_schema("edit"),
                    "startIndex": index_schema("Row index to insert at (0-based)"),
                    "numRows": index_schema("Number of rows to insert")
                },
                "required": ["spreadsheetId", "sheetId", "startIndex", "numRows"]
            }),
        },
        ToolDefinition {
            name: "insert_columns".to_string(),
            description: Some(
                "Insert empty columns at a position. New columns take the formatting of the \
                 column to the left, except when inserting at column A."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "spreadsheetId": spreadsheet_id_schema(),
                    "sheetId": sheet_id_schema("edit"),
                    "startIndex": index_schema("Column index to insert at (0-based, A = 0)"),
                    "numColumns": index_schema("Number of columns to insert")
                },
                "required": ["spreadsheetId", "sheetId", "startIndex", "numColumns"]
            }),
        },
    ]
}
