//! Import phase ladder

use adboard_report::{COMPLETED_PHASE, ImportProgress};

/// Known phases in order, with the percentage that marks each as reached
pub const PHASES: [(&str, f64); 6] = [
    ("File uploaded, starting processing...", 10.0),
    ("Reading and validating file headers...", 20.0),
    ("Counting total records...", 30.0),
    ("Processing records...", 40.0),
    ("Saving to database...", 90.0),
    (COMPLETED_PHASE, 100.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseStep {
    pub phase: &'static str,
    pub threshold: f64,
    pub status: StepStatus,
}

/// Ladder for a progress report
///
/// The step named by `current_phase` is current; others are done once the
/// percentage reaches their threshold (`Completed` only at exactly 100).
pub fn phase_steps(progress: &ImportProgress) -> Vec<PhaseStep> {
    PHASES
        .iter()
        .map(|&(phase, threshold)| {
            let reached = if phase == COMPLETED_PHASE {
                progress.progress_percentage == threshold
            } else {
                progress.progress_percentage >= threshold
            };
            let status = if progress.current_phase == phase {
                StepStatus::Current
            } else if reached {
                StepStatus::Done
            } else {
                StepStatus::Pending
            };
            PhaseStep {
                phase,
                threshold,
                status,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(phase: &str, pct: f64) -> ImportProgress {
        ImportProgress {
            current_phase: phase.to_string(),
            progress_percentage: pct,
            ..Default::default()
        }
    }

    #[test]
    fn test_mid_import_ladder() {
        let steps = phase_steps(&progress("Processing records...", 55.0));
        let statuses: Vec<StepStatus> = steps.iter().map(|s| s.status).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Done,
                StepStatus::Done,
                StepStatus::Done,
                StepStatus::Current,
                StepStatus::Pending,
                StepStatus::Pending,
            ]
        );
    }

    #[test]
    fn test_completed_ladder() {
        let steps = phase_steps(&progress(COMPLETED_PHASE, 100.0));
        assert!(steps[..5].iter().all(|s| s.status == StepStatus::Done));
        assert_eq!(steps[5].status, StepStatus::Current);
    }

    #[test]
    fn test_unknown_phase_uses_thresholds_only() {
        let steps = phase_steps(&progress("Warming up", 25.0));
        assert_eq!(steps[1].status, StepStatus::Done);
        assert_eq!(steps[2].status, StepStatus::Pending);
    }
}
