//! Spreadsheet metadata tool.

use serde::Serialize;

use crate::error::ToolResult;
use crate::sheets::SheetsApi;

/// Field mask for the metadata request: the spreadsheet title plus each
/// tab's id and title.
pub const METADATA_FIELDS: &str =
    "properties.title,sheets.properties.title,sheets.properties.sheetId";

/// Result of `get_sheet_metadata`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Tabs in the order the remote service lists them.
    pub sheets: Vec<SheetSummary>,
}

/// One tab of a spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Returns the spreadsheet title and its tabs.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn get_sheet_metadata(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
) -> ToolResult<SheetMetadata> {
    let spreadsheet = api.get_spreadsheet(spreadsheet_id, METADATA_FIELDS).await?;

    let sheets = spreadsheet
        .sheets
        .unwrap_or_default()
        .into_iter()
        .map(|sheet| {
            let properties = sheet.properties.unwrap_or_default();
            SheetSummary {
                sheet_id: properties.sheet_id,
                title: properties.title,
            }
        })
        .collect();

    Ok(SheetMetadata {
        title: spreadsheet.properties.and_then(|p| p.title),
        sheets,
    })
}
