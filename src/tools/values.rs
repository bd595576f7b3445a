//! Cell value tools: read, append, update.
//!
//! Reads return formatted (computed) values, never formulas. Writes use
//! user-entered interpretation, so strings that look like numbers, dates or
//! formulas are coerced by the remote service.

use serde::Serialize;

use crate::error::ToolResult;
use crate::sheets::model::{
    CellGrid, UpdateValuesResponse, ValueInputOption, ValueRange, ValueRenderOption,
};
use crate::sheets::SheetsApi;

/// Result of `read_values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadValuesResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Always present; empty when the range holds no data.
    pub values: CellGrid,
}

/// Result of `append_values` and `update_values`.
///
/// Each field is omitted when the remote reply omits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_rows: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_cells: Option<i64>,
}

impl From<UpdateValuesResponse> for UpdateSummary {
    fn from(reply: UpdateValuesResponse) -> Self {
        Self {
            updated_range: reply.updated_range,
            updated_rows: reply.updated_rows,
            updated_columns: reply.updated_columns,
            updated_cells: reply.updated_cells,
        }
    }
}

/// Reads the formatted values of `range`.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn read_values(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    range: &str,
) -> ToolResult<ReadValuesResult> {
    let reply = api
        .get_values(spreadsheet_id, range, ValueRenderOption::FormattedValue)
        .await?;

    Ok(ReadValuesResult {
        range: reply.range,
        values: reply.values.unwrap_or_default(),
    })
}

/// Appends `values` after the data table found in `range`.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn append_values(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    range: &str,
    values: CellGrid,
) -> ToolResult<UpdateSummary> {
    let reply = api
        .append_values(
            spreadsheet_id,
            range,
            ValueInputOption::UserEntered,
            &ValueRange::from_values(values),
        )
        .await?;

    Ok(reply.updates.map(UpdateSummary::from).unwrap_or_default())
}

/// Overwrites `range` with `values`. No merge with existing content.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn update_values(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    range: &str,
    values: CellGrid,
) -> ToolResult<UpdateSummary> {
    let reply = api
        .update_values(
            spreadsheet_id,
            range,
            ValueInputOption::UserEntered,
            &ValueRange::from_values(values),
        )
        .await?;

    Ok(reply.into())
}
