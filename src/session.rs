//! # Assessment session
//!
//! Caller-side state holder around the pure engine. The original UI
//! recomputed the score after every field change and re-selected the weight
//! preset whenever location, sector, or years-in-business changed; this
//! module reproduces that behavior as explicit method calls so the engine
//! itself keeps no hidden triggers.
//!
//! Known quirk, kept on purpose: a preset re-selection replaces the whole
//! weight profile, clobbering any hand-overridden weight. Changing a
//! non-classifying field never touches the weights.

use std::sync::Arc;

use crate::calibration::Calibration;
use crate::engine::{evaluate, Evaluation};
use crate::presets::{select_weight_preset, Dimension, WeightPreset, WeightProfile};
use crate::profile::{
    BusinessProfile, Location, Measure, ResourceDependency, Sector, YearsInBusiness,
};

pub struct AssessmentSession {
    profile: BusinessProfile,
    preset: WeightPreset,
    weights: WeightProfile,
    calibration: Arc<Calibration>,
}

impl AssessmentSession {
    /// Start a session from the documented profile defaults. The preset is
    /// selected immediately (the default profile classifies as
    /// high-climate-risk: Khulna + agriculture).
    pub fn new(calibration: Arc<Calibration>) -> Self {
        let profile = BusinessProfile::default();
        let (preset, weights) = select_weight_preset(&profile, &calibration);
        Self {
            profile,
            preset,
            weights,
            calibration,
        }
    }

    pub fn profile(&self) -> &BusinessProfile {
        &self.profile
    }

    pub fn preset(&self) -> WeightPreset {
        self.preset
    }

    pub fn weights(&self) -> WeightProfile {
        self.weights
    }

    // --- Classification-relevant setters: these re-select the preset and
    // replace the current weights, including hand overrides. ---

    pub fn set_location(&mut self, location: Location) {
        self.profile.location = location;
        self.reselect();
    }

    pub fn set_sector(&mut self, sector: Sector) {
        self.profile.sector = sector;
        self.reselect();
    }

    pub fn set_years_in_business(&mut self, years: YearsInBusiness) {
        self.profile.years_in_business = years;
        self.reselect();
    }

    // --- Everything else mutates the profile only. ---

    pub fn set_enterprise_name(&mut self, name: impl Into<String>) {
        self.profile.enterprise_name = name.into();
    }

    pub fn set_woman_led(&mut self, woman_led: bool) {
        self.profile.is_woman_led = woman_led;
    }

    pub fn set_resource_dependency(&mut self, dependency: ResourceDependency) {
        self.profile.resource_dependency = dependency;
    }

    pub fn set_employees(&mut self, employees: u32) {
        self.profile.employees = employees;
    }

    pub fn set_debt_to_equity(&mut self, ratio: f64) {
        self.profile.debt_to_equity = ratio;
    }

    pub fn set_yearly_profit(&mut self, profit: f64) {
        self.profile.yearly_profit = profit;
    }

    pub fn set_monthly_figures(
        &mut self,
        revenue: Option<f64>,
        expenses: Option<f64>,
        cash_on_hand: Option<f64>,
    ) {
        self.profile.monthly_revenue = revenue;
        self.profile.monthly_expenses = expenses;
        self.profile.cash_on_hand = cash_on_hand;
    }

    pub fn set_measure_checked(&mut self, measure: Measure, checked: bool) {
        self.profile.resilience_measures.set_checked(measure, checked);
    }

    pub fn set_measure_details(&mut self, measure: Measure, details: impl Into<String>) {
        self.profile.resilience_measures.set_details(measure, details);
    }

    /// Hand-override one weight. Survives until the next classification-
    /// relevant change, which replaces the whole profile of weights.
    pub fn override_weight(&mut self, dimension: Dimension, value: f64) {
        self.weights.set(dimension, value);
    }

    /// Recompute from scratch under the current profile and weights.
    pub fn evaluate(&self) -> Evaluation {
        evaluate(&self.profile, &self.weights, &self.calibration)
    }

    /// The "start over" path: back to defaults, preset re-selected.
    pub fn reset(&mut self) {
        self.profile = BusinessProfile::default();
        self.reselect();
    }

    fn reselect(&mut self) {
        let (preset, weights) = select_weight_preset(&self.profile, &self.calibration);
        self.preset = preset;
        self.weights = weights;
    }
}
