//! Google Sheets v4 request and reply shapes.
//!
//! Only the fields the tools read or write are modelled. Every reply field
//! is optional because the remote service omits empty values.

use serde::{Deserialize, Serialize};

/// A cell grid: rows of column values.
pub type CellGrid = Vec<Vec<String>>;

/// Reply of `spreadsheets.get`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spreadsheet {
    /// Spreadsheet-level properties.
    #[serde(default)]
    pub properties: Option<SpreadsheetProperties>,
    /// Tabs in remote order.
    #[serde(default)]
    pub sheets: Option<Vec<Sheet>>,
}

/// Spreadsheet-level properties.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadsheetProperties {
    /// Spreadsheet title.
    #[serde(default)]
    pub title: Option<String>,
}

/// A single tab.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    /// Tab properties.
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}

/// Tab properties. Used both in replies and in partial-update requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    /// Remote-assigned tab id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i32>,
    /// Tab title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A block of values, as read from or written to a range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    /// Range the values cover, in A1 notation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Rows of values. Omitted by the remote service for empty ranges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<CellGrid>,
}

impl ValueRange {
    /// Creates a request body carrying only `values`.
    #[must_use]
    pub const fn from_values(values: CellGrid) -> Self {
        Self {
            range: None,
            values: Some(values),
        }
    }
}

/// Reply of `values.update`, also nested inside the `values.append` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    /// Range that was written.
    #[serde(default)]
    pub updated_range: Option<String>,
    /// Number of rows touched.
    #[serde(default)]
    pub updated_rows: Option<i64>,
    /// Number of columns touched.
    #[serde(default)]
    pub updated_columns: Option<i64>,
    /// Number of cells touched.
    #[serde(default)]
    pub updated_cells: Option<i64>,
}

/// Reply of `values.append`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    /// What the append wrote.
    #[serde(default)]
    pub updates: Option<UpdateValuesResponse>,
}

/// How values are rendered when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRenderOption {
    /// Computed values, formatted as displayed.
    FormattedValue,
}

impl ValueRenderOption {
    /// Query-string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FormattedValue => "FORMATTED_VALUE",
        }
    }
}

/// How written values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Parsed as if typed into the UI: numbers, dates and formulas are coerced.
    UserEntered,
}

impl ValueInputOption {
    /// Query-string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserEntered => "USER_ENTERED",
        }
    }
}

/// Body of `spreadsheets.batchUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchUpdateRequest {
    /// Requests applied in order, atomically.
    pub requests: Vec<Request>,
}

impl BatchUpdateRequest {
    /// Wraps a single request.
    #[must_use]
    pub fn single(request: Request) -> Self {
        Self {
            requests: vec![request],
        }
    }
}

/// One structural edit inside a batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Request {
    /// Create a tab.
    AddSheet(AddSheetRequest),
    /// Remove a tab.
    DeleteSheet(DeleteSheetRequest),
    /// Change selected tab properties.
    UpdateSheetProperties(UpdateSheetPropertiesRequest),
    /// Remove rows or columns.
    DeleteDimension(DeleteDimensionRequest),
    /// Insert empty rows or columns.
    InsertDimension(InsertDimensionRequest),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetRequest {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSheetRequest {
    pub sheet_id: i32,
}

/// Partial update: only the properties named in `fields` are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSheetPropertiesRequest {
    pub properties: SheetProperties,
    /// Field mask, e.g. `"title"`.
    pub fields: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDimensionRequest {
    pub range: DimensionRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertDimensionRequest {
    pub range: DimensionRange,
    /// Copy formatting from the row/column before `range.startIndex`.
    pub inherit_from_before: bool,
}

/// Row or column axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Dimension {
    Rows,
    Columns,
}

/// Half-open, zero-based span of rows or columns on one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionRange {
    pub sheet_id: i32,
    pub dimension: Dimension,
    pub start_index: u32,
    pub end_index: u32,
}

/// Reply of `spreadsheets.batchUpdate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateResponse {
    /// One reply per request, in request order. Empty objects for requests
    /// without a reply payload.
    #[serde(default)]
    pub replies: Option<Vec<Response>>,
}

impl BatchUpdateResponse {
    /// Properties of the tab created by the first request, if it was an `addSheet`.
    #[must_use]
    pub fn added_sheet(&self) -> Option<&SheetProperties> {
        self.replies
            .as_ref()?
            .first()?
            .add_sheet
            .as_ref()?
            .properties
            .as_ref()
    }
}

/// A single batch-update reply.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    #[serde(default)]
    pub add_sheet: Option<AddSheetResponse>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSheetResponse {
    #[serde(default)]
    pub properties: Option<SheetProperties>,
}
