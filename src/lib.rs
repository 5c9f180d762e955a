// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod advisory;
pub mod api;
pub mod calibration;
pub mod config;
pub mod engine;
pub mod metrics;
pub mod presets;
pub mod profile;
pub mod scoring;
pub mod session;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::calibration::{Calibration, HotReloadCalibration};
pub use crate::engine::{evaluate, Evaluation};
pub use crate::presets::{select_weight_preset, Dimension, WeightPreset, WeightProfile};
pub use crate::profile::{
    BusinessProfile, Location, Measure, MeasureState, ResilienceMeasures, ResourceDependency,
    Sector, YearsInBusiness,
};
pub use crate::scoring::{compute_breakdown, ScoreBreakdown};
pub use crate::session::AssessmentSession;
