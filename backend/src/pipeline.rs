//! Per-upload flow: decode, screen, classify (admitted uploads only), decide.

use std::sync::Arc;

use shared::ScanOutcome;

use crate::classifier::{Classifier, ClassifierError};
use crate::decision::{self, Screened};
use crate::loader::{self, LoadError};
use crate::screening::{self, GateMode, Verdict};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Shared per-request entry point. The classifier handle is built once at
/// startup and cloning a `Scanner` only clones the `Arc`.
#[derive(Clone)]
pub struct Scanner {
    classifier: Arc<dyn Classifier>,
    gate_mode: GateMode,
}

impl Scanner {
    pub fn new(classifier: Arc<dyn Classifier>, gate_mode: GateMode) -> Self {
        Self {
            classifier,
            gate_mode,
        }
    }

    /// Runs one upload through the full flow. The classifier is consulted
    /// only for uploads the screening gate admits.
    pub fn scan(&self, bytes: &[u8]) -> Result<ScanOutcome, ScanError> {
        let image = loader::decode(bytes)?;
        let verdict = screening::evaluate(&image, self.gate_mode);
        log::debug!(
            "screening verdict for {}x{} upload ({} channels): {:?}",
            image.width(),
            image.height(),
            image.channel_count(),
            verdict
        );
        let screened = match verdict {
            Verdict::Reject(reason) => Screened::Rejected(reason),
            Verdict::Admit => Screened::Admitted(self.classifier.predict(&image)?),
        };
        Ok(decision::decide(&screened))
    }
}
