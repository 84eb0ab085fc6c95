use crate::{
    config::AppConfig,
    db::DbPool,
    services::{ledger::TripLedger, report::CancellationRateService},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub ledger: TripLedger,
    pub reports: CancellationRateService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        let ledger = TripLedger::new(db.clone());
        let reports = CancellationRateService::new(db);
        Self {
            config,
            ledger,
            reports,
        }
    }
}
