//! Print job lifecycle status.
//!
//! Jobs move linearly through the lifecycle:
//!
//! ```text
//! uploaded -> paid -> printing -> printed
//!     |                   |
//!     +---> printing      +-----> failed
//! ```
//!
//! `uploaded -> printing` is only taken when payment is not required.
//! `printed` and `failed` are terminal.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle status of a print job, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Uploaded,
    Paid,
    Printing,
    Printed,
    Failed,
}

impl JobStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [JobStatus; 5] = [
        JobStatus::Uploaded,
        JobStatus::Paid,
        JobStatus::Printing,
        JobStatus::Printed,
        JobStatus::Failed,
    ];

    /// Name stored in the `jobs.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Paid => "paid",
            Self::Printing => "printing",
            Self::Printed => "printed",
            Self::Failed => "failed",
        }
    }

    /// Whether `self -> next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Uploaded, Self::Paid)
                | (Self::Uploaded, Self::Printing)
                | (Self::Paid, Self::Printing)
                | (Self::Printing, Self::Printed)
                | (Self::Printing, Self::Failed)
        )
    }

    /// Check that a job in this status may be handed to the printer.
    ///
    /// An `uploaded` job is only printable when `payment_required` is false.
    pub fn check_printable(self, token: &str, payment_required: bool) -> Result<(), CoreError> {
        match self {
            Self::Paid => Ok(()),
            Self::Uploaded if !payment_required => Ok(()),
            Self::Uploaded => Err(CoreError::NotPaid {
                token: token.to_string(),
            }),
            Self::Printing => Err(CoreError::Conflict(format!(
                "Job {token} is already being printed"
            ))),
            Self::Printed => Err(CoreError::AlreadyPrinted {
                token: token.to_string(),
            }),
            Self::Failed => Err(CoreError::Conflict(format!(
                "Job {token} failed to print and cannot be retried"
            ))),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploaded" => Ok(Self::Uploaded),
            "paid" => Ok(Self::Paid),
            "printing" => Ok(Self::Printing),
            "printed" => Ok(Self::Printed),
            "failed" => Ok(Self::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown job status '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for JobStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn names_round_trip() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_matches!("queued".parse::<JobStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn linear_transitions_only() {
        use JobStatus::*;
        assert!(Uploaded.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Printing));
        assert!(Printing.can_transition_to(Printed));
        assert!(Printing.can_transition_to(Failed));

        assert!(!Paid.can_transition_to(Uploaded));
        assert!(!Printed.can_transition_to(Printing));
        assert!(!Failed.can_transition_to(Paid));
        assert!(!Uploaded.can_transition_to(Printed));
    }

    #[test]
    fn terminal_statuses_have_no_successors() {
        for from in [JobStatus::Printed, JobStatus::Failed] {
            for to in JobStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn unpaid_job_is_not_printable_when_payment_required() {
        assert_matches!(
            JobStatus::Uploaded.check_printable("tok", true),
            Err(CoreError::NotPaid { token }) if token == "tok"
        );
        assert!(JobStatus::Uploaded.check_printable("tok", false).is_ok());
        assert!(JobStatus::Paid.check_printable("tok", true).is_ok());
    }

    #[test]
    fn printed_and_failed_jobs_are_not_printable() {
        assert_matches!(
            JobStatus::Printed.check_printable("tok", false),
            Err(CoreError::AlreadyPrinted { .. })
        );
        assert_matches!(
            JobStatus::Failed.check_printable("tok", false),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn in_flight_job_is_a_conflict_not_a_completed_print() {
        assert_matches!(
            JobStatus::Printing.check_printable("tok", true),
            Err(CoreError::Conflict(msg)) if msg.contains("being printed")
        );
    }
}
