//! Shared application state.

use fogon_db::{Database, EmployeeLocks, InventoryService, PayrollService};

/// Handed to every handler through `State`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub payrolls: PayrollService,
    pub inventory: InventoryService,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState {
            payrolls: PayrollService::new(db.clone(), EmployeeLocks::new()),
            inventory: InventoryService::new(db.clone()),
            db,
        }
    }
}
