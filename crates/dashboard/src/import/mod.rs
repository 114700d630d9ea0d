//! Bulk CSV import: file checks, job tracking and the phase ladder

pub mod phase;
pub mod tracker;
pub mod validate;

#[cfg(test)]
mod tracker_test;

pub use phase::{PHASES, PhaseStep, StepStatus, phase_steps};
pub use tracker::{
    ImportEvent, ImportSnapshot, ImportState, ImportTracker, TrackerSettings, extract_job_id,
};
pub use validate::{MAX_FILE_SIZE, UploadFile, required_headers, validate_headers};
