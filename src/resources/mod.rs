//! Concrete resources managed by the console.
//!
//! Each resource is the generic [`EntityContext`](crate::context::EntityContext)
//! instantiated with its record type, its route and, for services, an
//! extension reducer.

mod clinic_specialization;
mod dictionary;
pub mod food;
mod medical_brand;
mod service;
mod task;

use std::fmt;

use clap::ValueEnum;

use crate::client::{ApiError, RestClient};
use crate::config::{Config, ResourceConfig};

pub use clinic_specialization::{ClinicSpecialization, ClinicSpecializationContext};
pub use dictionary::{Dictionary, DictionaryContext};
pub use food::{FoodContext, FoodItem};
pub use medical_brand::{MedicalBrand, MedicalBrandContext};
pub use service::{
    Service, ServiceCheck, ServiceContext, ServiceIntent, ServiceReducer, ServiceState,
};
pub use task::{Task, TaskContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ResourceKind {
    Dictionaries,
    MedicalBrands,
    Services,
    ClinicSpecializations,
    Food,
    Tasks,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Dictionaries,
        ResourceKind::MedicalBrands,
        ResourceKind::Services,
        ResourceKind::ClinicSpecializations,
        ResourceKind::Food,
        ResourceKind::Tasks,
    ];

    /// Key used under `[resources.<name>]` in the config file.
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Dictionaries => "dictionaries",
            ResourceKind::MedicalBrands => "medical-brands",
            ResourceKind::Services => "services",
            ResourceKind::ClinicSpecializations => "clinic-specializations",
            ResourceKind::Food => "food",
            ResourceKind::Tasks => "tasks",
        }
    }

    /// Built-in route used when the config has no override.
    pub fn default_config(&self) -> ResourceConfig {
        match self {
            ResourceKind::Dictionaries => {
                ResourceConfig::new("/dicts", "id").with_reference("kinds", "/dicts/kinds")
            }
            ResourceKind::MedicalBrands => ResourceConfig::new("/medical-brands", "id"),
            ResourceKind::Services => ResourceConfig::new("/services", "id"),
            ResourceKind::ClinicSpecializations => {
                ResourceConfig::new("/clinic-specializations", "id")
            }
            ResourceKind::Food => ResourceConfig::new("/food", "id")
                .with_reference(food::AGES, "/dicts/ages")
                .with_reference(food::TASTE, "/dicts/taste")
                .with_reference(food::CATEGORIES, "/dicts/categories"),
            ResourceKind::Tasks => ResourceConfig::new("/tasks", "id"),
        }
    }

    pub fn config(&self, config: &Config) -> ResourceConfig {
        config
            .resources
            .get(self.name())
            .cloned()
            .unwrap_or_else(|| self.default_config())
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One context per resource, sharing a single HTTP client.
#[derive(Clone)]
pub struct Contexts {
    pub dictionaries: DictionaryContext,
    pub medical_brands: MedicalBrandContext,
    pub services: ServiceContext,
    pub clinic_specializations: ClinicSpecializationContext,
    pub food: FoodContext,
    pub tasks: TaskContext,
}

impl Contexts {
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let client = RestClient::new(&config.api)?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: RestClient, config: &Config) -> Self {
        let route = |kind: ResourceKind| kind.config(config);
        Self {
            dictionaries: DictionaryContext::new(client.clone(), &route(ResourceKind::Dictionaries)),
            medical_brands: MedicalBrandContext::new(
                client.clone(),
                &route(ResourceKind::MedicalBrands),
            ),
            services: ServiceContext::new(client.clone(), &route(ResourceKind::Services)),
            clinic_specializations: ClinicSpecializationContext::new(
                client.clone(),
                &route(ResourceKind::ClinicSpecializations),
            ),
            food: FoodContext::new(client.clone(), &route(ResourceKind::Food)),
            tasks: TaskContext::new(client, &route(ResourceKind::Tasks)),
        }
    }
}
