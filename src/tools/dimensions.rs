//! Row and column insert/delete tools.
//!
//! Indices are zero-based. Deletes take a half-open `[start, end)` span.
//! Every call issues exactly one structural edit; after a delete, later
//! indices shift, so callers deleting several spans should go from the
//! highest index down.

use serde::Serialize;

use crate::error::{ToolError, ToolResult};
use crate::sheets::model::{
    BatchUpdateRequest, DeleteDimensionRequest, Dimension, DimensionRange,
    InsertDimensionRequest, Request,
};
use crate::sheets::SheetsApi;

/// Largest row or column index the remote service accepts (a signed
/// 32-bit value on the wire).
pub const MAX_INDEX: u32 = i32::MAX.unsigned_abs();

/// Result of `delete_rows` / `delete_columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedDimension {
    pub deleted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

/// Result of `insert_rows` / `insert_columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertedDimension {
    pub inserted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
}

/// Splits a count into the `rows` / `columns` result fields.
const fn per_axis(dimension: Dimension, count: u32) -> (Option<u32>, Option<u32>) {
    match dimension {
        Dimension::Rows => (Some(count), None),
        Dimension::Columns => (None, Some(count)),
    }
}

/// Deletes `[start_index, end_index)` along `dimension`.
///
/// The caller guarantees `end_index >= start_index`.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn delete_dimension(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    dimension: Dimension,
    start_index: u32,
    end_index: u32,
) -> ToolResult<DeletedDimension> {
    let request = Request::DeleteDimension(DeleteDimensionRequest {
        range: DimensionRange {
            sheet_id,
            dimension,
            start_index,
            end_index,
        },
    });
    api.batch_update(spreadsheet_id, &BatchUpdateRequest::single(request))
        .await?;

    let (rows, columns) = per_axis(dimension, end_index.saturating_sub(start_index));
    Ok(DeletedDimension {
        deleted: true,
        rows,
        columns,
    })
}

/// Inserts `count` empty rows or columns before `start_index`.
///
/// New cells take their formatting from the preceding row/column, except
/// at index 0 where there is nothing before them.
///
/// # Errors
///
/// Returns [`ToolError::Validation`] if the inserted span would end past
/// [`MAX_INDEX`]; otherwise propagates any error from the Sheets API unchanged.
pub async fn insert_dimension(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    dimension: Dimension,
    start_index: u32,
    count: u32,
) -> ToolResult<InsertedDimension> {
    let end_index = start_index
        .checked_add(count)
        .filter(|end| *end <= MAX_INDEX)
        .ok_or_else(|| {
            let tool = match dimension {
                Dimension::Rows => "insert_rows",
                Dimension::Columns => "insert_columns",
            };
            ToolError::validation(
                tool,
                format!("startIndex ({start_index}) plus {count} must not exceed {MAX_INDEX}"),
            )
        })?;

    let request = Request::InsertDimension(InsertDimensionRequest {
        range: DimensionRange {
            sheet_id,
            dimension,
            start_index,
            end_index,
        },
        inherit_from_before: start_index > 0,
    });
    api.batch_update(spreadsheet_id, &BatchUpdateRequest::single(request))
        .await?;

    let (rows, columns) = per_axis(dimension, count);
    Ok(InsertedDimension {
        inserted: true,
        rows,
        columns,
    })
}

/// Deletes rows `[start_index, end_index)` of a tab.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn delete_rows(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    start_index: u32,
    end_index: u32,
) -> ToolResult<DeletedDimension> {
    delete_dimension(api, spreadsheet_id, sheet_id, Dimension::Rows, start_index, end_index).await
}

/// Deletes columns `[start_index, end_index)` of a tab.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn delete_columns(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    start_index: u32,
    end_index: u32,
) -> ToolResult<DeletedDimension> {
    delete_dimension(api, spreadsheet_id, sheet_id, Dimension::Columns, start_index, end_index)
        .await
}

/// Inserts `num_rows` empty rows before `start_index`.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn insert_rows(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    start_index: u32,
    num_rows: u32,
) -> ToolResult<InsertedDimension> {
    insert_dimension(api, spreadsheet_id, sheet_id, Dimension::Rows, start_index, num_rows).await
}

/// Inserts `num_columns` empty columns before `start_index`.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn insert_columns(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    start_index: u32,
    num_columns: u32,
) -> ToolResult<InsertedDimension> {
    insert_dimension(api, spreadsheet_id, sheet_id, Dimension::Columns, start_index, num_columns)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::testing::FakeSheets;
    use serde_json::json;

    #[tokio::test]
    async fn delete_rows_counts_half_open_span() {
        let api = FakeSheets::new();

        let result = delete_rows(&api, "abc", 0, 2, 4).await.unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "deleted": true, "rows": 2 })
        );

        let call = api.only_call();
        assert_eq!(
            call.request["body"]["requests"][0],
            json!({
                "deleteDimension": {
                    "range": { "sheetId": 0, "dimension": "ROWS", "startIndex": 2, "endIndex": 4 }
                }
            })
        );
    }

    #[tokio::test]
    async fn delete_columns_reports_columns() {
        let api = FakeSheets::new();

        let result = delete_columns(&api, "abc", 7, 0, 3).await.unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "deleted": true, "columns": 3 })
        );
        assert_eq!(
            api.only_call().request["body"]["requests"][0]["deleteDimension"]["range"]["dimension"],
            "COLUMNS"
        );
    }

    #[tokio::test]
    async fn delete_past_end_of_sheet_is_remote_error() {
        let api = FakeSheets::failing(
            400,
            "Invalid requests[0].deleteDimension: Cannot delete a row that doesn't exist.",
        );

        let err = delete_rows(&api, "abc", 0, 2, 4).await.unwrap_err();
        assert!(err.to_string().contains("doesn't exist"));
    }

    #[tokio::test]
    async fn insert_at_zero_does_not_inherit() {
        let api = FakeSheets::new();

        let result = insert_columns(&api, "abc", 3, 0, 3).await.unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "inserted": true, "columns": 3 })
        );

        let call = api.only_call();
        let request = &call.request["body"]["requests"][0]["insertDimension"];
        assert_eq!(request["inheritFromBefore"], false);
        assert_eq!(
            request["range"],
            json!({ "sheetId": 3, "dimension": "COLUMNS", "startIndex": 0, "endIndex": 3 })
        );
    }

    #[tokio::test]
    async fn insert_after_zero_inherits() {
        let api = FakeSheets::new();

        insert_columns(&api, "abc", 3, 2, 3).await.unwrap();

        let call = api.only_call();
        let request = &call.request["body"]["requests"][0]["insertDimension"];
        assert_eq!(request["inheritFromBefore"], true);
        assert_eq!(request["range"]["endIndex"], 5);
    }

    #[tokio::test]
    async fn insert_rows_reports_rows() {
        let api = FakeSheets::new();

        let result = insert_rows(&api, "abc", 0, 10, 1).await.unwrap();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "inserted": true, "rows": 1 })
        );
        assert_eq!(
            api.only_call().request["body"]["requests"][0]["insertDimension"]["range"]["dimension"],
            "ROWS"
        );
    }

    #[tokio::test]
    async fn insert_ending_past_max_index_is_rejected_locally() {
        let api = FakeSheets::new();

        let err = insert_rows(&api, "abc", 0, MAX_INDEX - 1, 2).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { ref tool, .. } if tool == "insert_rows"));
        let err = insert_columns(&api, "abc", 0, u32::MAX, 1).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation { ref tool, .. } if tool == "insert_columns"));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn insert_ending_exactly_at_max_index_is_sent() {
        let api = FakeSheets::new();

        insert_rows(&api, "abc", 0, MAX_INDEX - 2, 2).await.unwrap();
        assert_eq!(
            api.only_call().request["body"]["requests"][0]["insertDimension"]["range"]["endIndex"],
            MAX_INDEX
        );
    }
}
