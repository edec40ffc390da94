//! Confidence-gated outcome policy.
//!
//! Maps a screening verdict and, for admitted uploads, the classifier's
//! probability vector to the terminal outcome of a scan. A below-threshold
//! prediction comes back as low confidence and never carries a label.

use shared::{RejectReason, ScanOutcome, TumorClass};

use crate::classifier::ClassProbabilities;

/// Minimum top-class probability for a prediction to be reported.
pub const CONFIDENCE_THRESHOLD: f32 = 0.6;

/// A screened upload. Probabilities exist only on the admitted variant; a
/// rejected upload never holds an inference result.
#[derive(Clone, Debug, PartialEq)]
pub enum Screened {
    Rejected(RejectReason),
    Admitted(ClassProbabilities),
}

/// Collapses a screened upload into its outcome. Pure; calling it twice on
/// the same input yields the same outcome.
pub fn decide(screened: &Screened) -> ScanOutcome {
    match screened {
        Screened::Rejected(reason) => ScanOutcome::Rejected { reason: *reason },
        Screened::Admitted(probabilities) => {
            let (index, confidence) = probabilities.argmax();
            if confidence < CONFIDENCE_THRESHOLD {
                ScanOutcome::LowConfidence
            } else {
                ScanOutcome::Classified {
                    label: TumorClass::ALL[index],
                    confidence,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admitted(values: [f32; 4]) -> Screened {
        Screened::Admitted(ClassProbabilities::new(values))
    }

    #[test]
    fn rejection_passes_through_untouched() {
        for reason in [
            RejectReason::BelowMinimumSize,
            RejectReason::GreenDominant,
            RejectReason::ChannelImbalance,
        ] {
            assert_eq!(
                decide(&Screened::Rejected(reason)),
                ScanOutcome::Rejected { reason }
            );
        }
    }

    #[test]
    fn confident_prediction_reports_label_and_confidence() {
        assert_eq!(
            decide(&admitted([0.1, 0.15, 0.65, 0.1])),
            ScanOutcome::Classified {
                label: TumorClass::NoTumor,
                confidence: 0.65,
            }
        );
    }

    #[test]
    fn each_index_maps_to_its_class() {
        let expected = [
            TumorClass::Glioma,
            TumorClass::Meningioma,
            TumorClass::NoTumor,
            TumorClass::Pituitary,
        ];
        for (i, class) in expected.into_iter().enumerate() {
            let mut values = [0.1f32; 4];
            values[i] = 0.7;
            match decide(&admitted(values)) {
                ScanOutcome::Classified { label, confidence } => {
                    assert_eq!(label, class);
                    assert_eq!(confidence, 0.7);
                }
                other => panic!("expected a classified outcome, got {other:?}"),
            }
        }
    }

    #[test]
    fn anything_under_the_threshold_is_low_confidence() {
        for values in [
            [0.59, 0.2, 0.11, 0.1],
            [0.1, 0.5, 0.3, 0.1],
            [0.25, 0.25, 0.25, 0.25],
            [0.1, 0.1, 0.21, 0.59],
        ] {
            assert_eq!(decide(&admitted(values)), ScanOutcome::LowConfidence);
        }
    }

    #[test]
    fn exactly_at_the_threshold_is_classified() {
        assert_eq!(
            decide(&admitted([0.6, 0.2, 0.1, 0.1])),
            ScanOutcome::Classified {
                label: TumorClass::Glioma,
                confidence: 0.6,
            }
        );
    }

    #[test]
    fn ties_resolve_to_the_first_index() {
        assert_eq!(
            decide(&admitted([0.7, 0.7, 0.1, 0.1])),
            ScanOutcome::Classified {
                label: TumorClass::Glioma,
                confidence: 0.7,
            }
        );
        assert_eq!(
            decide(&admitted([0.0, 0.8, 0.8, 0.0])),
            ScanOutcome::Classified {
                label: TumorClass::Meningioma,
                confidence: 0.8,
            }
        );
    }

    #[test]
    fn deciding_twice_gives_the_same_outcome() {
        let screened = admitted([0.2, 0.61, 0.09, 0.1]);
        assert_eq!(decide(&screened), decide(&screened));
    }
}
