//! # Risk Engine
//! Pure, testable facade that maps `(profile, weights)` → [`Evaluation`].
//! No I/O, no caching, no memoization: profiles are small and recomputation
//! is cheap, so every call recomputes all four sub-scores and the weighted
//! sum from scratch.
//!
//! The engine raises no errors — out-of-domain categorical values fall back
//! to documented defaults inside the calibration lookups.

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::presets::WeightProfile;
use crate::profile::BusinessProfile;
use crate::scoring::{compute_breakdown, ScoreBreakdown};

/// Final score plus the per-dimension breakdown it was combined from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub final_score: f64,
    pub breakdown: ScoreBreakdown,
}

/// Evaluate a profile under the given weights.
pub fn evaluate(
    profile: &BusinessProfile,
    weights: &WeightProfile,
    cal: &Calibration,
) -> Evaluation {
    let breakdown = compute_breakdown(profile, cal);
    Evaluation {
        final_score: weights.apply(&breakdown),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Location, Measure, ResourceDependency, YearsInBusiness};

    fn sample_profile() -> BusinessProfile {
        let mut p = BusinessProfile::default();
        p.location = Location::Khulna;
        p.years_in_business = YearsInBusiness::FivePlus;
        p.resource_dependency = ResourceDependency::Medium;
        p.employees = 8;
        p.debt_to_equity = 0.6;
        p.yearly_profit = 900_000.0;
        p.is_woman_led = true;
        p.resilience_measures.set_checked(Measure::HasSavings, true);
        p.resilience_measures
            .set_checked(Measure::Diversification, true);
        p
    }

    #[test]
    fn evaluate_is_bit_identical_across_calls() {
        let cal = Calibration::default_seed();
        let p = sample_profile();
        let w = WeightProfile::HIGH_CLIMATE_RISK;

        let a = evaluate(&p, &w, &cal);
        let b = evaluate(&p, &w, &cal);
        assert_eq!(a.final_score.to_bits(), b.final_score.to_bits());
        assert_eq!(a.breakdown, b.breakdown);
    }

    #[test]
    fn evaluate_combines_breakdown_with_given_weights() {
        let cal = Calibration::default_seed();
        let p = sample_profile();
        let w = WeightProfile::BALANCED;

        let out = evaluate(&p, &w, &cal);
        let expected = out.breakdown.financial * 0.25
            + out.breakdown.stability * 0.15
            + out.breakdown.cvi * 0.30
            + out.breakdown.acs * 0.30;
        assert!((out.final_score - expected).abs() < 1e-9);
    }

    #[test]
    fn evaluate_trusts_unnormalized_weights() {
        let cal = Calibration::default_seed();
        let mut p = sample_profile();
        for m in Measure::ALL {
            p.resilience_measures.set_checked(m, true);
        }
        // All-ones weights: the final score is the plain sum of the four
        // dimensions and may exceed 100.
        let w = WeightProfile {
            financial: 1.0,
            stability: 1.0,
            cvi: 1.0,
            acs: 1.0,
        };
        let out = evaluate(&p, &w, &cal);
        let sum = out.breakdown.financial
            + out.breakdown.stability
            + out.breakdown.cvi
            + out.breakdown.acs;
        assert!((out.final_score - sum).abs() < 1e-9);
        assert!(out.final_score > 100.0);
    }

    #[test]
    fn evaluation_serializes_camel_case() {
        let cal = Calibration::default_seed();
        let out = evaluate(&BusinessProfile::default(), &WeightProfile::BALANCED, &cal);
        let json = serde_json::to_value(out).unwrap();
        assert!(json.get("finalScore").is_some());
        assert!(json["breakdown"].get("financial").is_some());
    }
}
