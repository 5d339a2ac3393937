// Public entities for the CrewHealth API
// Request and response bodies exchanged with clients

// Common entities for error handling and pagination
pub mod common;

// Health record bodies and query parameters
pub mod records;

// Vitals assessment and health-check submission bodies
pub mod vitals;

// Draft bodies
pub mod drafts;
