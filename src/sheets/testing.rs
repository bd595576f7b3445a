//! Recording fake of [`SheetsApi`] for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::error::{ToolError, ToolResult};
use crate::sheets::api::SheetsApi;
use crate::sheets::model::{
    AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse, Spreadsheet,
    UpdateValuesResponse, ValueInputOption, ValueRange, ValueRenderOption,
};

/// A remote call as seen by the fake: operation name plus its inputs as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub request: Value,
}

/// Serves one canned reply (or one canned failure) for every call and
/// records what was asked for.
pub struct FakeSheets {
    reply: Value,
    failure: Option<(u16, String)>,
    hang: bool,
    calls: Mutex<Vec<RecordedCall>>,
    called: Notify,
}

impl FakeSheets {
    pub fn new() -> Self {
        Self {
            reply: json!({}),
            failure: None,
            hang: false,
            calls: Mutex::new(Vec::new()),
            called: Notify::new(),
        }
    }

    pub fn replying(reply: Value) -> Self {
        Self {
            reply,
            ..Self::new()
        }
    }

    pub fn failing(code: u16, message: &str) -> Self {
        Self {
            failure: Some((code, message.to_string())),
            ..Self::new()
        }
    }

    /// A remote service that accepts every request and never answers.
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::new()
        }
    }

    /// Completes once a call has been recorded.
    pub async fn wait_for_call(&self) {
        self.called.notified().await;
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The single recorded call. Panics unless exactly one call was made.
    pub fn only_call(&self) -> RecordedCall {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one remote call");
        calls.into_iter().next().unwrap()
    }

    async fn respond<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        request: Value,
    ) -> ToolResult<T> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall { operation, request });
        self.called.notify_one();

        if self.hang {
            std::future::pending::<()>().await;
        }

        if let Some((code, message)) = &self.failure {
            return Err(ToolError::RemoteApi {
                code: *code,
                status: None,
                message: message.clone(),
            });
        }
        Ok(serde_json::from_value(self.reply.clone())?)
    }
}

#[async_trait]
impl SheetsApi for FakeSheets {
    async fn get_spreadsheet(&self, spreadsheet_id: &str, fields: &str) -> ToolResult<Spreadsheet> {
        self.respond(
            "get_spreadsheet",
            json!({ "spreadsheetId": spreadsheet_id, "fields": fields }),
        )
        .await
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRenderOption,
    ) -> ToolResult<ValueRange> {
        self.respond(
            "get_values",
            json!({
                "spreadsheetId": spreadsheet_id,
                "range": range,
                "valueRenderOption": render.as_str(),
            }),
        )
        .await
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        input: ValueInputOption,
        body: &ValueRange,
    ) -> ToolResult<AppendValuesResponse> {
        self.respond(
            "append_values",
            json!({
                "spreadsheetId": spreadsheet_id,
                "range": range,
                "valueInputOption": input.as_str(),
                "body": body,
            }),
        )
        .await
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        input: ValueInputOption,
        body: &ValueRange,
    ) -> ToolResult<UpdateValuesResponse> {
        self.respond(
            "update_values",
            json!({
                "spreadsheetId": spreadsheet_id,
                "range": range,
                "valueInputOption": input.as_str(),
                "body": body,
            }),
        )
        .await
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateRequest,
    ) -> ToolResult<BatchUpdateResponse> {
        self.respond(
            "batch_update",
            json!({ "spreadsheetId": spreadsheet_id, "body": body }),
        )
        .await
    }
}
