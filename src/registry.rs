// Name directory the client looks rental companies up in

use crate::company::CarRentalCompany;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("No company bound under name {0}")]
    NotBound(String),

    #[error("A company is already bound under name {0}")]
    AlreadyBound(String),
}

#[derive(Default)]
pub struct CompanyRegistry {
    companies: DashMap<String, Arc<dyn CarRentalCompany>>,
}

impl CompanyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        name: &str,
        company: Arc<dyn CarRentalCompany>,
    ) -> Result<(), RegistryError> {
        match self.companies.entry(name.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::AlreadyBound(name.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(company);
                info!(company = %name, "company_bound");
                Ok(())
            }
        }
    }

    // Bind, replacing whatever was bound under the name before
    pub fn rebind(&self, name: &str, company: Arc<dyn CarRentalCompany>) {
        let replaced = self.companies.insert(name.to_string(), company).is_some();
        info!(company = %name, replaced, "company_rebound");
    }

    pub fn unbind(&self, name: &str) -> Result<(), RegistryError> {
        match self.companies.remove(name) {
            Some(_) => {
                info!(company = %name, "company_unbound");
                Ok(())
            }
            None => Err(RegistryError::NotBound(name.to_string())),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<Arc<dyn CarRentalCompany>, RegistryError> {
        self.companies
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| RegistryError::NotBound(name.to_string()))
    }

    // Sorted so listings are stable
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.companies.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
