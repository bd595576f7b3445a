//! The remote operations the tools depend on.

use async_trait::async_trait;

use crate::error::ToolResult;
use crate::sheets::model::{
    AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse, Spreadsheet,
    UpdateValuesResponse, ValueInputOption, ValueRange, ValueRenderOption,
};

/// Access to the Google Sheets v4 API.
///
/// Each method is exactly one remote call. Implementations must not retry,
/// cache, or reinterpret errors; a rejected request is returned as
/// [`ToolError::RemoteApi`](crate::error::ToolError::RemoteApi).
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// `spreadsheets.get`, restricted to the given field mask.
    async fn get_spreadsheet(&self, spreadsheet_id: &str, fields: &str) -> ToolResult<Spreadsheet>;

    /// `spreadsheets.values.get`.
    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRenderOption,
    ) -> ToolResult<ValueRange>;

    /// `spreadsheets.values.append`.
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        input: ValueInputOption,
        body: &ValueRange,
    ) -> ToolResult<AppendValuesResponse>;

    /// `spreadsheets.values.update`.
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        input: ValueInputOption,
        body: &ValueRange,
    ) -> ToolResult<UpdateValuesResponse>;

    /// `spreadsheets.batchUpdate`.
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateRequest,
    ) -> ToolResult<BatchUpdateResponse>;
}
