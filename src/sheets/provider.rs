//! Lazily constructed, process-wide Sheets client.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::config::SheetsConfig;
use crate::error::{ToolError, ToolResult};
use crate::sheets::api::SheetsApi;
use crate::sheets::client::HttpSheetsClient;

/// Owns the single Sheets client for the lifetime of the server.
///
/// The client is built on first use, so credential discovery only happens
/// once a tool call actually needs the remote service. A failed build is
/// not remembered; the next call tries again.
pub struct ClientProvider {
    settings: SheetsConfig,
    client: OnceCell<Arc<dyn SheetsApi>>,
}

impl ClientProvider {
    /// Creates a provider that will connect with `settings` on first use.
    #[must_use]
    pub fn new(settings: SheetsConfig) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    /// Creates a provider that always hands out `client`.
    #[must_use]
    pub fn with_client(client: Arc<dyn SheetsApi>) -> Self {
        Self {
            settings: SheetsConfig::default(),
            client: OnceCell::new_with(Some(client)),
        }
    }

    /// Returns the shared client, building it on the first call.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Auth`] if ambient credentials cannot be resolved,
    /// or another [`ToolError`] if the client cannot be built.
    pub async fn client(&self) -> ToolResult<Arc<dyn SheetsApi>> {
        self.client
            .get_or_try_init(|| async {
                let client = HttpSheetsClient::connect(&self.settings).await?;
                Ok::<_, ToolError>(Arc::new(client) as Arc<dyn SheetsApi>)
            })
            .await
            .map(Arc::clone)
    }

    /// Whether the client has been built yet.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.client.initialized()
    }
}
