//! Sheet (tab) lifecycle tools: add, delete, rename.

use serde::Serialize;

use crate::error::ToolResult;
use crate::sheets::model::{
    AddSheetRequest, BatchUpdateRequest, DeleteSheetRequest, Request, SheetProperties,
    UpdateSheetPropertiesRequest,
};
use crate::sheets::SheetsApi;

/// Result of `add_sheet`. The id is assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedSheet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Result of `delete_sheet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedSheet {
    pub deleted: bool,
    pub sheet_id: i32,
}

/// Result of `rename_sheet`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamedSheet {
    pub sheet_id: i32,
    pub title: String,
}

/// Adds a tab named `title`.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn add_sheet(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    title: &str,
) -> ToolResult<AddedSheet> {
    let request = Request::AddSheet(AddSheetRequest {
        properties: SheetProperties {
            sheet_id: None,
            title: Some(title.to_string()),
        },
    });

    let reply = api
        .batch_update(spreadsheet_id, &BatchUpdateRequest::single(request))
        .await?;

    let added = reply.added_sheet().cloned().unwrap_or_default();
    Ok(AddedSheet {
        sheet_id: added.sheet_id,
        title: added.title,
    })
}

/// Deletes tab `sheet_id`. Deleting an id that no longer exists is a
/// remote error.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn delete_sheet(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
) -> ToolResult<DeletedSheet> {
    let request = Request::DeleteSheet(DeleteSheetRequest { sheet_id });
    api.batch_update(spreadsheet_id, &BatchUpdateRequest::single(request))
        .await?;

    Ok(DeletedSheet {
        deleted: true,
        sheet_id,
    })
}

/// Changes the title of tab `sheet_id`, leaving every other property alone.
///
/// # Errors
///
/// Propagates any error from the Sheets API unchanged.
pub async fn rename_sheet(
    api: &dyn SheetsApi,
    spreadsheet_id: &str,
    sheet_id: i32,
    new_title: &str,
) -> ToolResult<RenamedSheet> {
    let request = Request::UpdateSheetProperties(UpdateSheetPropertiesRequest {
        properties: SheetProperties {
            sheet_id: Some(sheet_id),
            title: Some(new_title.to_string()),
        },
        fields: "title".to_string(),
    });
    api.batch_update(spreadsheet_id, &BatchUpdateRequest::single(request))
        .await?;

    Ok(RenamedSheet {
        sheet_id,
        title: new_title.to_string(),
    })
}
