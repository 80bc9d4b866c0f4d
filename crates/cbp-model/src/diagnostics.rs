//! Structured diagnostics emitted by the loading and merge stages.
//!
//! Library code reports what it did through a [`Diagnostics`] sink instead of
//! reaching for a global logger. The CLI installs [`TracingDiagnostics`];
//! tests can collect events and assert on them.

use std::fmt;
use std::path::PathBuf;

/// Which input table an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    Sample,
    Patient,
}

impl TableRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TableRole::Sample => "sample",
            TableRole::Patient => "patient",
        }
    }
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single diagnostics event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    /// An input table was read and its header located.
    TableLoaded {
        role: TableRole,
        path: PathBuf,
        rows: usize,
        columns: usize,
    },
    /// A non-key column exists in both tables and was renamed on each side.
    ColumnsRenamed {
        column: String,
        left: String,
        right: String,
    },
    /// The left join finished.
    Joined {
        rows: usize,
        unmatched_samples: usize,
    },
    /// Missing cells of the projected table were set to `"NA"`.
    MissingFilled { cells: usize },
    /// The patient table repeats one or more `PATIENT_ID` values.
    DuplicatePatients { patient_ids: Vec<String> },
    /// The output file was written.
    Written { path: PathBuf, rows: usize },
}

/// Receiver for [`MergeEvent`]s.
pub trait Diagnostics {
    fn record(&self, event: &MergeEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn record(&self, event: &MergeEvent) {
        match event {
            MergeEvent::TableLoaded {
                role,
                path,
                rows,
                columns,
            } => tracing::debug!(
                role = %role,
                path = %path.display(),
                rows,
                columns,
                "clinical table loaded"
            ),
            MergeEvent::ColumnsRenamed {
                column,
                left,
                right,
            } => tracing::debug!(
                column = %column,
                left = %left,
                right = %right,
                "column present in both tables, renamed"
            ),
            MergeEvent::Joined {
                rows,
                unmatched_samples,
            } => {
                tracing::info!(rows, unmatched_samples, "samples joined to patients");
                if *unmatched_samples > 0 {
                    tracing::warn!(
                        unmatched_samples,
                        "samples without a patient record; patient fields set to NA"
                    );
                }
            }
            MergeEvent::MissingFilled { cells } => {
                tracing::debug!(cells, "missing cells set to NA");
            }
            MergeEvent::DuplicatePatients { patient_ids } => tracing::warn!(
                duplicates = patient_ids.len(),
                "patient table repeats PATIENT_ID values; joined rows fan out"
            ),
            MergeEvent::Written { path, rows } => {
                tracing::info!(path = %path.display(), rows, "trial-match file written");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn record(&self, _event: &MergeEvent) {}
}

impl<D: Diagnostics + ?Sized> Diagnostics for &D {
    fn record(&self, event: &MergeEvent) {
        (**self).record(event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Collect(RefCell<Vec<MergeEvent>>);

    impl Diagnostics for Collect {
        fn record(&self, event: &MergeEvent) {
            self.0.borrow_mut().push(event.clone());
        }
    }

    fn emit<D: Diagnostics>(diagnostics: D) {
        diagnostics.record(&MergeEvent::Joined {
            rows: 3,
            unmatched_samples: 1,
        });
    }

    #[test]
    fn reference_forwards_to_inner_sink() {
        let sink = Collect::default();
        emit(&sink);
        emit(&sink);
        assert_eq!(sink.0.borrow().len(), 2);
    }

    #[test]
    fn table_role_display() {
        assert_eq!(TableRole::Sample.to_string(), "sample");
        assert_eq!(TableRole::Patient.to_string(), "patient");
    }
}
