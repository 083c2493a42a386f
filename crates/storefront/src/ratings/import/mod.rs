//! CSV backfill for interaction logs.
//!
//! Replays an exported interaction log (`Client ID, Product ID, Interaction,
//! Quantity`) through the inference service. Malformed files abort with the
//! offending line; rows the service rejects (unknown clients, bad explicit
//! ratings) are tallied and logged so a partially stale export still
//! backfills everything it can.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::warn;

use super::domain::{InteractionEvent, ProcessOutcome};
use super::service::{RatingInferenceService, RatingServiceError};
use super::store::{RatingStore, SignalPublisher};
use crate::catalog::{ClientDirectory, ProductCatalog};

#[derive(Debug)]
pub enum InteractionImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidEvent { line: u64, reason: String },
    Store(RatingServiceError),
}

impl std::fmt::Display for InteractionImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionImportError::Io(err) => {
                write!(f, "failed to read interaction log: {}", err)
            }
            InteractionImportError::Csv(err) => {
                write!(f, "invalid interaction log data: {}", err)
            }
            InteractionImportError::InvalidEvent { line, reason } => {
                write!(f, "invalid interaction event on line {}: {}", line, reason)
            }
            InteractionImportError::Store(err) => {
                write!(f, "could not persist replayed interaction: {}", err)
            }
        }
    }
}

impl std::error::Error for InteractionImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InteractionImportError::Io(err) => Some(err),
            InteractionImportError::Csv(err) => Some(err),
            InteractionImportError::InvalidEvent { .. } => None,
            InteractionImportError::Store(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for InteractionImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for InteractionImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Tally of one replay run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct InteractionLogImporter;

impl InteractionLogImporter {
    pub fn from_path<Q, C, P, S, O>(
        path: Q,
        service: &RatingInferenceService<C, P, S, O>,
    ) -> Result<ReplaySummary, InteractionImportError>
    where
        Q: AsRef<Path>,
        C: ClientDirectory + 'static,
        P: ProductCatalog + 'static,
        S: RatingStore + 'static,
        O: SignalPublisher + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service)
    }

    pub fn from_reader<R, C, P, S, O>(
        reader: R,
        service: &RatingInferenceService<C, P, S, O>,
    ) -> Result<ReplaySummary, InteractionImportError>
    where
        R: Read,
        C: ClientDirectory + 'static,
        P: ProductCatalog + 'static,
        S: RatingStore + 'static,
        O: SignalPublisher + 'static,
    {
        Self::replay(Self::parse(reader)?, service)
    }

    /// Decode a log without touching the service, for callers that want to
    /// inspect or pre-validate the events first.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<InteractionEvent>, InteractionImportError> {
        parser::parse_events(reader)
    }

    pub fn replay<C, P, S, O>(
        events: Vec<InteractionEvent>,
        service: &RatingInferenceService<C, P, S, O>,
    ) -> Result<ReplaySummary, InteractionImportError>
    where
        C: ClientDirectory + 'static,
        P: ProductCatalog + 'static,
        S: RatingStore + 'static,
        O: SignalPublisher + 'static,
    {
        let mut summary = ReplaySummary::default();

        for event in events {
            summary.processed += 1;
            match service.process(event) {
                Ok(ProcessOutcome::Created(_)) => summary.created += 1,
                Ok(ProcessOutcome::Updated(_)) => summary.updated += 1,
                Ok(ProcessOutcome::Skipped(_)) => summary.skipped += 1,
                Err(err @ RatingServiceError::Store(_)) => {
                    // Not a per-row data problem; stop the run.
                    return Err(InteractionImportError::Store(err));
                }
                Err(err) => {
                    summary.failed += 1;
                    warn!(error = %err, "dropping interaction log row");
                }
            }
        }

        Ok(summary)
    }
}
