use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use metrics::counter;
use tower_http::cors::CorsLayer;

use crate::advisory::{self, build_client_from_config, DynAdvisoryClient};
use crate::calibration::HotReloadCalibration;
use crate::config::advisory::{AdvisoryConfig, DEFAULT_ADVISORY_CONFIG_PATH};
use crate::engine::evaluate;
use crate::presets::{select_weight_preset, WeightPreset, WeightProfile};
use crate::profile::{BusinessProfile, Location, Sector, YearsInBusiness};
use crate::scoring::ScoreBreakdown;

#[derive(Clone)]
pub struct AppState {
    pub calibration: Arc<HotReloadCalibration>,
    pub advisory: DynAdvisoryClient,
}

impl AppState {
    pub fn new(advisory_cfg: &AdvisoryConfig) -> Self {
        Self {
            calibration: Arc::new(HotReloadCalibration::from_env()),
            advisory: build_client_from_config(advisory_cfg),
        }
    }

    /// State the binary and the HTTP tests use: calibration path from env,
    /// advisory from `config/advisory.json` (disabled when absent).
    pub fn from_env() -> Self {
        Self::new(&AdvisoryConfig::load_or_default(
            DEFAULT_ADVISORY_CONFIG_PATH,
        ))
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/score", post(score))
        .route("/preset", post(preset))
        .route("/advise", post(advise))
        .route("/debug/preset", get(debug_preset))
        .route("/admin/reload-calibration", get(admin_reload_calibration))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluateReq {
    profile: BusinessProfile,
    /// Hand-overridden weights; when absent, the preset for the profile
    /// is selected and used.
    #[serde(default)]
    weights: Option<WeightProfile>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoreResp {
    final_score: f64,
    breakdown: ScoreBreakdown,
    preset: WeightPreset,
    weights: WeightProfile,
    evaluated_at: DateTime<Utc>,
}

async fn score(State(state): State<AppState>, Json(body): Json<EvaluateReq>) -> Json<ScoreResp> {
    let cal = state.calibration.current();
    let (preset, preset_weights) = select_weight_preset(&body.profile, &cal);
    let weights = body.weights.unwrap_or(preset_weights);
    let out = evaluate(&body.profile, &weights, &cal);
    counter!("acracs_evaluations_total").increment(1);

    Json(ScoreResp {
        final_score: out.final_score,
        breakdown: out.breakdown,
        preset,
        weights,
        evaluated_at: Utc::now(),
    })
}

#[derive(serde::Serialize)]
struct PresetResp {
    preset: WeightPreset,
    weights: WeightProfile,
}

async fn preset(
    State(state): State<AppState>,
    Json(profile): Json<BusinessProfile>,
) -> Json<PresetResp> {
    let cal = state.calibration.current();
    let (preset, weights) = select_weight_preset(&profile, &cal);
    Json(PresetResp { preset, weights })
}

#[derive(serde::Serialize)]
struct AdviseResp {
    /// `null` signals the caught advisory failure / disabled state; the
    /// score in `/score` stays available regardless.
    analysis: Option<String>,
    provider: &'static str,
}

async fn advise(State(state): State<AppState>, Json(body): Json<EvaluateReq>) -> Json<AdviseResp> {
    let cal = state.calibration.current();
    let (_, preset_weights) = select_weight_preset(&body.profile, &cal);
    let weights = body.weights.unwrap_or(preset_weights);
    let out = evaluate(&body.profile, &weights, &cal);

    let prompt = advisory::build_prompt(&body.profile, &out);
    counter!("acracs_advisory_requests_total").increment(1);

    let provider = state.advisory.provider_name();
    match state.advisory.generate(&prompt).await {
        Some(result) => Json(AdviseResp {
            analysis: Some(result.analysis),
            provider,
        }),
        None => {
            tracing::warn!(provider, "advisory generation unavailable");
            Json(AdviseResp {
                analysis: None,
                provider,
            })
        }
    }
}

async fn debug_preset(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> String {
    let location = Location::from_key(q.get("location").map(String::as_str).unwrap_or(""));
    let sector = Sector::from_key(q.get("sector").map(String::as_str).unwrap_or(""));
    let years = q
        .get("years")
        .and_then(|y| YearsInBusiness::from_key(y))
        .unwrap_or(YearsInBusiness::UpToOne);

    let profile = BusinessProfile {
        location,
        sector,
        years_in_business: years,
        ..BusinessProfile::default()
    };
    let cal = state.calibration.current();
    let (preset, _) = select_weight_preset(&profile, &cal);
    format!(
        "location='{}' sector='{}' years='{}' -> preset={}",
        location.key(),
        sector.key(),
        years.key(),
        preset.key()
    )
}

async fn admin_reload_calibration(State(state): State<AppState>) -> String {
    if state.calibration.force_reload() {
        "reloaded".to_string()
    } else {
        "failed: could not load calibration file".to_string()
    }
}
