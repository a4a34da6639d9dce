//! Submission outcomes and the per-run report

use serde::Serialize;

/// Result of submitting one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub barcode: String,
    pub response_body: String,
    pub succeeded: bool,
}

impl SubmissionOutcome {
    pub fn success(barcode: impl Into<String>, response_body: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            response_body: response_body.into(),
            succeeded: true,
        }
    }

    pub fn failure(barcode: impl Into<String>, response_body: impl Into<String>) -> Self {
        Self {
            barcode: barcode.into(),
            response_body: response_body.into(),
            succeeded: false,
        }
    }
}

/// A container that was not registered this run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedContainer {
    pub barcode: String,
    pub response_body: String,
}

/// Outcome of one wrangling pass, split by success
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Barcodes marked wrangled, in scan order
    pub succeeded: Vec<String>,
    /// Barcodes left unwrangled with the service response, in scan order
    pub failed: Vec<FailedContainer>,
}

impl RunReport {
    /// Two-way split of outcomes; each side keeps the input order
    pub fn partition(outcomes: Vec<SubmissionOutcome>) -> Self {
        let mut report = RunReport::default();

        for outcome in outcomes {
            if outcome.succeeded {
                report.succeeded.push(outcome.barcode);
            } else {
                report.failed.push(FailedContainer {
                    barcode: outcome.barcode,
                    response_body: outcome.response_body,
                });
            }
        }

        report
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn failed_barcodes(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.barcode.as_str()).collect()
    }
}
