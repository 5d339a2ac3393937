// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

// Re-export useful test doubles from the data layer
pub use crew_health_data::repository::tests::MockHealthRecordRepository;
pub use crew_health_data::repository::InMemoryDraftStore;

use crate::entities::vitals::{VitalField, VitalsForm};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::drafts::DraftService;
use crate::services::health_records::HealthRecordService;

/// Form filled with a reading that validates and assesses as low risk
pub fn normal_vitals_form() -> VitalsForm {
    let mut form = VitalsForm::default();
    form.set(VitalField::Temperature, "36.8");
    form.set(VitalField::HeartRate, "68");
    form.set(VitalField::Systolic, "115");
    form.set(VitalField::Diastolic, "75");
    form.set(VitalField::OxygenSaturation, "98");
    form.set(VitalField::RespiratoryRate, "15");
    form
}

/// Draft service over a fresh in-memory store
pub fn in_memory_draft_service() -> DraftService {
    DraftService::new(Arc::new(InMemoryDraftStore::new()))
}

/// Mock implementation of health services for testing system health
#[derive(Debug)]
pub struct MockHealthService {
    database_status: ComponentStatus,
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// All components healthy
    pub fn new() -> Self {
        Self {
            database_status: ComponentStatus::Healthy,
            components: HashMap::new(),
        }
    }

    pub fn with_degraded_database(mut self) -> Self {
        self.database_status = ComponentStatus::Degraded;
        self
    }

    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = ComponentStatus::Unhealthy;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components.insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = HashMap::new();

        components.insert(
            "database".to_string(),
            HealthComponent {
                status: self.database_status.clone(),
                details: match self.database_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Database is experiencing high load".to_string()),
                    ComponentStatus::Unhealthy => Some("Database connection failed".to_string()),
                },
            },
        );
        components.insert(
            "api".to_string(),
            HealthComponent {
                status: ComponentStatus::Healthy,
                details: None,
            },
        );

        for (name, component) in &self.components {
            components.insert(name.clone(), component.clone());
        }

        SystemHealth::from_components(components)
    }

    async fn check_database_status(&self) -> Result<bool, String> {
        match self.database_status {
            ComponentStatus::Healthy => Ok(true),
            ComponentStatus::Degraded => Ok(false),
            ComponentStatus::Unhealthy => Err("Database connection failed".to_string()),
        }
    }
}

/// Health record service over a vector-backed repository
pub fn create_mock_health_record_service() -> HealthRecordService<MockHealthRecordRepository> {
    HealthRecordService::new(MockHealthRecordRepository::new())
}

/// Factory function to create a mock health service
pub fn create_mock_health_service() -> MockHealthService {
    MockHealthService::new()
}
