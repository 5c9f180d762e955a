//! # Weight presets
//!
//! Maps a profile's coarse risk context (location, sector, years in
//! business) to one of four named weight presets, and combines a score
//! breakdown with a weight profile into the final score.
//!
//! The selector is a pure classification with fixed precedence; the
//! aggregator trusts its weight input — no normalization is performed, so
//! hand-edited weights that do not sum to 1.0 produce a raw weighted sum.

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::profile::BusinessProfile;
use crate::scoring::ScoreBreakdown;

/// The four named risk-context buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeightPreset {
    HighClimateRisk,
    EstablishedStable,
    NewVenture,
    Balanced,
}

impl WeightPreset {
    pub const ALL: [WeightPreset; 4] = [
        WeightPreset::HighClimateRisk,
        WeightPreset::EstablishedStable,
        WeightPreset::NewVenture,
        WeightPreset::Balanced,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            WeightPreset::HighClimateRisk => "highClimateRisk",
            WeightPreset::EstablishedStable => "establishedStable",
            WeightPreset::NewVenture => "newVenture",
            WeightPreset::Balanced => "balanced",
        }
    }
}

/// One weight per scoring dimension. Authored presets sum to 1.0; the
/// engine never enforces it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightProfile {
    pub financial: f64,
    pub stability: f64,
    pub cvi: f64,
    pub acs: f64,
}

impl WeightProfile {
    pub const HIGH_CLIMATE_RISK: WeightProfile = WeightProfile {
        financial: 0.15,
        stability: 0.10,
        cvi: 0.40,
        acs: 0.35,
    };
    pub const ESTABLISHED_STABLE: WeightProfile = WeightProfile {
        financial: 0.35,
        stability: 0.30,
        cvi: 0.15,
        acs: 0.20,
    };
    pub const NEW_VENTURE: WeightProfile = WeightProfile {
        financial: 0.20,
        stability: 0.15,
        cvi: 0.30,
        acs: 0.35,
    };
    pub const BALANCED: WeightProfile = WeightProfile {
        financial: 0.25,
        stability: 0.15,
        cvi: 0.30,
        acs: 0.30,
    };

    /// The aggregator: weighted sum of the four sub-scores, exactly as
    /// given — out-of-unit-sum weights yield an unbounded result.
    pub fn apply(&self, breakdown: &ScoreBreakdown) -> f64 {
        breakdown.financial * self.financial
            + breakdown.stability * self.stability
            + breakdown.cvi * self.cvi
            + breakdown.acs * self.acs
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Financial => self.financial,
            Dimension::Stability => self.stability,
            Dimension::Cvi => self.cvi,
            Dimension::Acs => self.acs,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: f64) {
        match dimension {
            Dimension::Financial => self.financial = value,
            Dimension::Stability => self.stability = value,
            Dimension::Cvi => self.cvi = value,
            Dimension::Acs => self.acs = value,
        }
    }
}

/// One of the four scoring dimensions; used for single-weight overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Financial,
    Stability,
    Cvi,
    Acs,
}

/// Classify the profile and return the matching preset with its weights.
pub fn select_weight_preset(
    profile: &BusinessProfile,
    cal: &Calibration,
) -> (WeightPreset, WeightProfile) {
    let preset = classify(profile, cal);
    (preset, cal.weights_for(preset))
}

/// Pure classification over (location, sector, yearsInBusiness).
/// Precedence is fixed, first match wins.
fn classify(profile: &BusinessProfile, cal: &Calibration) -> WeightPreset {
    use crate::profile::YearsInBusiness;

    if cal.high_risk_locations.contains(&profile.location)
        || cal.high_risk_sectors.contains(&profile.sector)
    {
        WeightPreset::HighClimateRisk
    } else if profile.years_in_business == YearsInBusiness::FivePlus
        && cal.low_risk_sectors.contains(&profile.sector)
    {
        WeightPreset::EstablishedStable
    } else if profile.years_in_business == YearsInBusiness::UpToOne {
        WeightPreset::NewVenture
    } else {
        WeightPreset::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Location, Sector, YearsInBusiness};

    fn cal() -> Calibration {
        Calibration::default_seed()
    }

    fn profile(location: Location, sector: Sector, years: YearsInBusiness) -> BusinessProfile {
        BusinessProfile {
            location,
            sector,
            years_in_business: years,
            ..BusinessProfile::default()
        }
    }

    #[test]
    fn high_risk_location_wins() {
        let p = profile(Location::Sylhet, Sector::Retail, YearsInBusiness::FivePlus);
        let (preset, _) = select_weight_preset(&p, &cal());
        assert_eq!(preset, WeightPreset::HighClimateRisk);
    }

    #[test]
    fn high_risk_sector_wins_regardless_of_location() {
        for location in [Location::Rajshahi, Location::ChattogramHills, Location::Other] {
            let p = profile(location, Sector::Agriculture, YearsInBusiness::TwoToFive);
            let (preset, _) = select_weight_preset(&p, &cal());
            assert_eq!(preset, WeightPreset::HighClimateRisk);
        }
    }

    #[test]
    fn high_risk_takes_precedence_over_established_stable() {
        // Matches both rule 1 (location) and rule 2 (5+ years, low-risk
        // sector); rule 1 must win.
        let p = profile(Location::Khulna, Sector::Retail, YearsInBusiness::FivePlus);
        let (preset, weights) = select_weight_preset(&p, &cal());
        assert_eq!(preset, WeightPreset::HighClimateRisk);
        assert_eq!(weights, WeightProfile::HIGH_CLIMATE_RISK);
    }

    #[test]
    fn established_stable_needs_both_age_and_low_risk_sector() {
        let p = profile(Location::Rajshahi, Sector::Services, YearsInBusiness::FivePlus);
        let (preset, _) = select_weight_preset(&p, &cal());
        assert_eq!(preset, WeightPreset::EstablishedStable);

        // Same sector, younger business: falls through to balanced.
        let p = profile(Location::Rajshahi, Sector::Services, YearsInBusiness::TwoToFive);
        let (preset, _) = select_weight_preset(&p, &cal());
        assert_eq!(preset, WeightPreset::Balanced);
    }

    #[test]
    fn livestock_counts_as_low_risk() {
        let p = profile(
            Location::ChattogramHills,
            Sector::Livestock,
            YearsInBusiness::FivePlus,
        );
        let (preset, _) = select_weight_preset(&p, &cal());
        assert_eq!(preset, WeightPreset::EstablishedStable);
    }

    #[test]
    fn new_venture_for_young_non_risky_profiles() {
        let p = profile(Location::Rajshahi, Sector::Crafts, YearsInBusiness::UpToOne);
        let (preset, weights) = select_weight_preset(&p, &cal());
        assert_eq!(preset, WeightPreset::NewVenture);
        assert_eq!(weights, WeightProfile::NEW_VENTURE);
    }

    #[test]
    fn selector_is_pure() {
        let p = profile(Location::HaorRegion, Sector::Other, YearsInBusiness::TwoToFive);
        let cal = cal();
        let first = select_weight_preset(&p, &cal);
        for _ in 0..10 {
            assert_eq!(select_weight_preset(&p, &cal), first);
        }
    }

    #[test]
    fn selector_ignores_non_classifying_fields() {
        let a = profile(Location::Rajshahi, Sector::Retail, YearsInBusiness::TwoToFive);
        let mut b = a.clone();
        b.employees = 40;
        b.is_woman_led = true;
        b.debt_to_equity = 2.5;
        let cal = cal();
        assert_eq!(select_weight_preset(&a, &cal), select_weight_preset(&b, &cal));
    }

    #[test]
    fn aggregator_is_a_raw_weighted_sum() {
        let breakdown = ScoreBreakdown {
            financial: 80.0,
            stability: 60.0,
            cvi: 40.0,
            acs: 20.0,
        };
        let w = WeightProfile::BALANCED;
        let expected = 80.0 * 0.25 + 60.0 * 0.15 + 40.0 * 0.30 + 20.0 * 0.30;
        assert!((w.apply(&breakdown) - expected).abs() < 1e-9);

        // Doubled weights double the result; nothing renormalizes.
        let doubled = WeightProfile {
            financial: 0.50,
            stability: 0.30,
            cvi: 0.60,
            acs: 0.60,
        };
        assert!((doubled.apply(&breakdown) - expected * 2.0).abs() < 1e-9);
    }
}
