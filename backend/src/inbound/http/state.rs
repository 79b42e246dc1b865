//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving ports,
//! so they stay testable without any storage behind them.

use std::sync::Arc;

use crate::domain::ports::{IdentityCommand, IdentityQuery, LedgerCommand, LedgerQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityCommand>,
    pub identity_query: Arc<dyn IdentityQuery>,
    pub ledger: Arc<dyn LedgerCommand>,
    pub ledger_query: Arc<dyn LedgerQuery>,
}

impl HttpState {
    pub fn new(
        identity: Arc<dyn IdentityCommand>,
        identity_query: Arc<dyn IdentityQuery>,
        ledger: Arc<dyn LedgerCommand>,
        ledger_query: Arc<dyn LedgerQuery>,
    ) -> Self {
        Self {
            identity,
            identity_query,
            ledger,
            ledger_query,
        }
    }
}
