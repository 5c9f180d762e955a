//! # Sub-score calculators
//!
//! Pure, testable logic mapping a [`BusinessProfile`] to the four [0,100]
//! dimensions of the composite score. No I/O, no hidden state; everything
//! variable comes from the profile, everything constant from the
//! [`Calibration`] tables.
//!
//! All four dimensions read "higher is safer". CVI is inverted from the
//! base vulnerability table for that reason.

use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::profile::BusinessProfile;

/// The four sub-scores composing the final risk score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub financial: f64,
    pub stability: f64,
    pub cvi: f64,
    pub acs: f64,
}

/// Financial health: equal blend of a leverage component and a profit
/// component.
///
/// `debtComponent = max(0, 100 - (debtToEquity / ceiling) * 100)`
/// `profitComponent = min(100, (yearlyProfit / ceiling) * 100)`
pub fn financial_score(profile: &BusinessProfile, cal: &Calibration) -> f64 {
    let debt_component =
        (100.0 - (profile.debt_to_equity / cal.debt_to_equity_ceiling) * 100.0).max(0.0);
    let profit_component = ((profile.yearly_profit / cal.profit_ceiling) * 100.0).min(100.0);
    clamp_score(debt_component * 0.5 + profit_component * 0.5)
}

/// Business stability: additive points for age band, resource dependency
/// (inverted), and a capped per-employee contribution. Maximum 100 by
/// construction of the tables.
pub fn stability_score(profile: &BusinessProfile, cal: &Calibration) -> f64 {
    let years = cal.years_points(profile.years_in_business);
    let dependency = cal.dependency_points(profile.resource_dependency);
    let employees =
        (f64::from(profile.employees) * cal.employee_points_each).min(cal.employee_points_cap);
    clamp_score(years + dependency + employees)
}

/// Climate vulnerability index, inverted so that higher output means lower
/// risk. A location absent from the base table scores the documented
/// fallback vulnerability.
pub fn cvi_score(profile: &BusinessProfile, cal: &Calibration) -> f64 {
    clamp_score(100.0 - cal.base_vulnerability(profile.location))
}

/// Adaptive capacity: points over checked measures, then the woman-led
/// bonus, then the cap. The order (sum, bonus, clamp) is part of the
/// contract: the bonus may push a near-100 sum over the cap, which is then
/// truncated.
pub fn acs_score(profile: &BusinessProfile, cal: &Calibration) -> f64 {
    let mut raw: f64 = profile
        .resilience_measures
        .iter()
        .filter(|(_, state)| state.checked)
        .map(|(measure, _)| cal.measure_points(measure))
        .sum();

    if profile.is_woman_led {
        raw *= cal.woman_led_bonus;
    }
    clamp_score(raw)
}

/// All four sub-scores in one pass.
pub fn compute_breakdown(profile: &BusinessProfile, cal: &Calibration) -> ScoreBreakdown {
    ScoreBreakdown {
        financial: financial_score(profile, cal),
        stability: stability_score(profile, cal),
        cvi: cvi_score(profile, cal),
        acs: acs_score(profile, cal),
    }
}

#[inline]
fn clamp_score(x: f64) -> f64 {
    x.clamp(0.0, 100.0)
}
