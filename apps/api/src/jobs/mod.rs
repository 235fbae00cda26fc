// Job application tracking: CRUD over `job_applications`, ownership checks, and analytics.

pub mod analytics;
pub mod handlers;
pub mod ownership;
pub mod store;
