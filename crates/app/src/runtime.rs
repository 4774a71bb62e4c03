//! Wires configuration, adapters and services into one client.

use std::sync::Arc;

use anyhow::Context;
use stockroom_application::{
    ApiClient, AuthContext, LocationService, MovementService, ProductService,
    PurchaseOrderService, ReportService, SessionEvent, SessionStore, SuggestionSearch,
    SupplierService,
};
use stockroom_infrastructure::{ClientConfig, FileTokenStorage, ReqwestTransport};
use tokio::sync::broadcast;
use tracing::debug;

/// Everything a command needs, built once per process.
pub struct Runtime {
    pub config: ClientConfig,
    pub auth: AuthContext,
    pub products: ProductService,
    pub movements: MovementService,
    pub suppliers: SupplierService,
    pub orders: PurchaseOrderService,
    pub locations: LocationService,
    pub reports: ReportService,
}

impl Runtime {
    /// Builds the client and picks up any persisted session and its profile.
    pub async fn connect(config: ClientConfig) -> anyhow::Result<Self> {
        let state_dir = config.resolve_state_dir()?;
        let storage = Arc::new(FileTokenStorage::in_dir(&state_dir));
        let transport =
            Arc::new(ReqwestTransport::from_config(&config).context("creating HTTP client")?);
        let session =
            Arc::new(SessionStore::new(storage).with_refresh_buffer(config.refresh_buffer_secs));
        let client = Arc::new(ApiClient::new(&config.base_url, transport, session));
        debug!(base_url = %client.base_url(), "client ready");

        let auth = AuthContext::new(client.clone());
        auth.restore()
            .await
            .with_context(|| format!("reading session from {}", state_dir.display()))?;

        Ok(Self {
            auth,
            products: ProductService::new(client.clone()),
            movements: MovementService::new(client.clone()),
            suppliers: SupplierService::new(client.clone()),
            orders: PurchaseOrderService::new(client.clone()),
            locations: LocationService::new(client.clone()),
            reports: ReportService::new(client),
            config,
        })
    }

    /// Debounced suggestion search over the product service.
    pub fn suggestion_search(&self) -> SuggestionSearch {
        SuggestionSearch::new(self.products.clone(), self.config.search_debounce())
    }

    /// Subscribes to session events.
    pub fn session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.auth.subscribe()
    }
}

/// Drains pending events and reports whether the session was ended by the
/// client rather than the user.
pub fn session_was_forced_out(events: &mut broadcast::Receiver<SessionEvent>) -> bool {
    let mut forced = false;
    loop {
        match events.try_recv() {
            Ok(event) => forced |= event.is_forced_logout(),
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => return forced,
        }
    }
}
