// Storage models
pub mod health_record;

pub use health_record::{
    CreateHealthRecordRequest, HealthRecord, HealthRecordFilter, UpdateHealthRecordRequest,
};
