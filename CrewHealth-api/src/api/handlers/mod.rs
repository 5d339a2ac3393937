pub mod drafts;
pub mod health;
pub mod records;
pub mod vitals;

// Re-export handlers for easier imports
pub use drafts::{delete_draft, get_draft, save_draft};
pub use health::health_check;
pub use records::{create_record, delete_record, get_record, list_records, submit_health_check, update_record};
pub use vitals::{assess_vitals, convert_temperature};
