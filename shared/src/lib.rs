use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// Tumor categories the model distinguishes, in the positional order of the
/// model's output vector. Index `i` of a probability vector always refers to
/// `TumorClass::ALL[i]`.
#[derive(Serialize, Deserialize, Display, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TumorClass {
    Glioma,
    Meningioma,
    NoTumor,
    Pituitary,
}

impl TumorClass {
    pub const ALL: [TumorClass; 4] = [
        TumorClass::Glioma,
        TumorClass::Meningioma,
        TumorClass::NoTumor,
        TumorClass::Pituitary,
    ];
}

/// Why the screening gate turned an upload away without classifying it.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Either side of the image is under the minimum legible size.
    BelowMinimumSize,
    /// Green carries too large a share of overall brightness for a
    /// grayscale-style scan.
    GreenDominant,
    /// Channel dispersions are unbalanced (strict gate mode only).
    ChannelImbalance,
}

/// Terminal outcome of one upload. A label is only ever present on
/// `Classified`; rejected and low-confidence uploads carry no prediction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    Rejected { reason: RejectReason },
    LowConfidence,
    Classified { label: TumorClass, confidence: f32 },
}

/// Per-file entry of a scan response.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ScanReport {
    pub file_name: Option<String>,
    pub outcome: ScanOutcome,
    pub message: String,
}
