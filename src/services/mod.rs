//! Business logic services

pub mod catalog;
pub mod clients;
pub mod exports;
pub mod ledger;
pub mod lookup;
pub mod settings;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub clients: clients::ClientsService,
    pub users: users::UsersService,
    pub ledger: ledger::LedgerService,
    pub settings: settings::SettingsService,
    pub lookup: lookup::LookupService,
    pub exports: exports::ExportsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            clients: clients::ClientsService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), config.auth.clone()),
            ledger: ledger::LedgerService::new(repository.clone(), config.loans.clone()),
            settings: settings::SettingsService::new(repository.clone()),
            lookup: lookup::LookupService::new(),
            exports: exports::ExportsService::new(repository, config.export.clone()),
        }
    }
}
