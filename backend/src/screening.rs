//! MRI plausibility screening.
//!
//! Decides from cheap per-channel statistics whether an upload plausibly is a
//! brain MRI before any inference runs on it. Brain MRI scans are grayscale
//! in nature, even when stored as RGB: the three channels then carry nearly
//! identical data, and no single channel dominates overall brightness.

use serde::{Deserialize, Serialize};
use shared::RejectReason;

use crate::loader::DecodedImage;

/// Tuning constants of the gate. Changing any of these changes which uploads
/// reach the classifier.
pub mod thresholds {
    /// Uploads narrower or shorter than this cannot contain a legible scan.
    pub const MIN_DIMENSION: u32 = 100;
    /// A min/max channel-dispersion ratio above this reads as grayscale
    /// replicated into color channels.
    pub const DISPERSION_BALANCE: f64 = 0.9;
    /// A green share of overall brightness above this is inconsistent with
    /// medical imagery.
    pub const GREEN_DOMINANCE: f64 = 0.5;
    /// Keeps the ratio divisions defined when a channel is perfectly flat.
    pub const EPSILON: f64 = 1e-6;
}

/// Admission rule for three-channel images. The size floor, the grayscale
/// admit, and the exotic-layout fallback are mode-independent.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    /// Admit unless green dominance proves the image is not a scan. Unknown
    /// or ambiguous statistics favor letting the classifier look.
    #[default]
    Permissive,
    /// Admit a color image only when its channel dispersions are balanced
    /// and its green share stays low.
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Admit,
    Reject(RejectReason),
}

impl Verdict {
    pub fn is_admit(&self) -> bool {
        matches!(self, Verdict::Admit)
    }
}

/// Screens a decoded upload. Pure and allocation-free; statistics come from
/// a single pass over the pixel buffer.
pub fn evaluate(image: &DecodedImage, mode: GateMode) -> Verdict {
    if image.width() < thresholds::MIN_DIMENSION || image.height() < thresholds::MIN_DIMENSION {
        return Verdict::Reject(RejectReason::BelowMinimumSize);
    }
    match image {
        // Single-channel data is already grayscale, which is exactly what a
        // scan looks like.
        DecodedImage::Gray(_) => Verdict::Admit,
        DecodedImage::Rgb(rgb) => evaluate_color(&ChannelStats::of(rgb), mode),
        // Alpha-bearing and exotic layouts take the trailing admit: absent
        // evidence against, the upload goes through.
        DecodedImage::Other(_) => Verdict::Admit,
    }
}

fn evaluate_color(stats: &ChannelStats, mode: GateMode) -> Verdict {
    let dispersion_ratio = stats.min_std() / (stats.max_std() + thresholds::EPSILON);
    let green_ratio = stats.mean[1] / (stats.overall_mean() + thresholds::EPSILON);

    match mode {
        GateMode::Permissive => {
            if dispersion_ratio > thresholds::DISPERSION_BALANCE {
                Verdict::Admit
            } else if green_ratio > thresholds::GREEN_DOMINANCE {
                Verdict::Reject(RejectReason::GreenDominant)
            } else {
                Verdict::Admit
            }
        }
        GateMode::Strict => {
            if dispersion_ratio > thresholds::DISPERSION_BALANCE
                && green_ratio < thresholds::GREEN_DOMINANCE
            {
                Verdict::Admit
            } else if green_ratio > thresholds::GREEN_DOMINANCE {
                Verdict::Reject(RejectReason::GreenDominant)
            } else {
                Verdict::Reject(RejectReason::ChannelImbalance)
            }
        }
    }
}

/// Per-channel mean and population standard deviation of an RGB image,
/// accumulated in integer space in one pass.
pub(crate) struct ChannelStats {
    pub mean: [f64; 3],
    pub std: [f64; 3],
}

impl ChannelStats {
    pub fn of(rgb: &image::RgbImage) -> Self {
        let mut sum = [0u64; 3];
        let mut sum_sq = [0u64; 3];
        for pixel in rgb.pixels() {
            for c in 0..3 {
                let v = u64::from(pixel.0[c]);
                sum[c] += v;
                sum_sq[c] += v * v;
            }
        }

        let n = f64::from(rgb.width()) * f64::from(rgb.height());
        let mut mean = [0f64; 3];
        let mut std = [0f64; 3];
        for c in 0..3 {
            mean[c] = sum[c] as f64 / n;
            let variance = sum_sq[c] as f64 / n - mean[c] * mean[c];
            // Rounding can push a flat channel's variance a hair below zero.
            std[c] = variance.max(0.0).sqrt();
        }
        Self { mean, std }
    }

    fn min_std(&self) -> f64 {
        self.std.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_std(&self) -> f64 {
        self.std.iter().copied().fold(0.0, f64::max)
    }

    /// Mean over every sample of every channel, equal to the mean of the
    /// per-channel means since each channel holds the same pixel count.
    fn overall_mean(&self) -> f64 {
        (self.mean[0] + self.mean[1] + self.mean[2]) / 3.0
    }
}
