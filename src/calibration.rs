//! # Calibration
//!
//! Every constant the scoring formulas and the preset selector consume:
//! CVI base vulnerabilities, ACS measure points, stability point tables,
//! the four weight presets, and the risk-context sets.
//!
//! - Ships with a built-in `default_seed()` reproducing the authored values.
//! - Can be overridden from a JSON file; any read/parse failure falls back
//!   to the seed.
//! - Partial override files are fine: missing fields keep their seed values.
//! - [`HotReloadCalibration`] re-reads the file when its mtime changes.

use serde::{Deserialize, Serialize};
use std::{
    collections::{HashMap, HashSet},
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
    time::SystemTime,
};

use crate::presets::{WeightPreset, WeightProfile};
use crate::profile::{Location, Measure, ResourceDependency, Sector, YearsInBusiness};

/// Fallback base vulnerability for a location missing from the table.
pub const CVI_FALLBACK: f64 = 50.0;

/// Calibration tables, loaded from JSON or seeded in-process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Base climate vulnerability per location (higher = more exposed).
    pub cvi_base: HashMap<Location, f64>,
    /// Points awarded per checked resilience measure. Authored total: 100.
    pub acs_points: HashMap<Measure, f64>,
    /// Stability points per age band.
    pub stability_years: HashMap<YearsInBusiness, f64>,
    /// Stability points per resource-dependency level (inverted).
    pub stability_dependency: HashMap<ResourceDependency, f64>,
    /// Points per employee, capped at `employee_points_cap`.
    pub employee_points_each: f64,
    pub employee_points_cap: f64,
    /// Debt-to-equity ratio at which the debt component reaches zero.
    pub debt_to_equity_ceiling: f64,
    /// Yearly profit (BDT) at which the profit component saturates.
    pub profit_ceiling: f64,
    /// Multiplier applied to the raw ACS sum for woman-led enterprises.
    pub woman_led_bonus: f64,
    /// The four authored weight presets.
    pub presets: HashMap<WeightPreset, WeightProfile>,
    /// Risk-context classification sets.
    pub high_risk_locations: HashSet<Location>,
    pub high_risk_sectors: HashSet<Sector>,
    pub low_risk_sectors: HashSet<Sector>,
}

impl Default for Calibration {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl Calibration {
    /// Built-in copy of the authored tables.
    pub fn default_seed() -> Self {
        let cvi_base = HashMap::from([
            (Location::Khulna, 75.0),
            (Location::Rajshahi, 70.0),
            (Location::Sylhet, 65.0),
            (Location::ChattogramHills, 68.0),
            (Location::HaorRegion, 72.0),
            (Location::Other, 50.0),
        ]);

        let acs_points = HashMap::from([
            (Measure::Diversification, 10.0),
            (Measure::ClimateSmartPractices, 10.0),
            (Measure::ProtectiveInfrastructure, 15.0),
            (Measure::MicroInsurance, 10.0),
            (Measure::ClimateTraining, 5.0),
            (Measure::HasSavings, 10.0),
            (Measure::EarlyWarningAccess, 5.0),
            (Measure::CommunityGroupMember, 5.0),
            (Measure::FormalBusinessPlan, 10.0),
            (Measure::LocalSupplierNetwork, 10.0),
            (Measure::DigitalLiteracy, 10.0),
        ]);

        let stability_years = HashMap::from([
            (YearsInBusiness::UpToOne, 10.0),
            (YearsInBusiness::TwoToFive, 25.0),
            (YearsInBusiness::FivePlus, 40.0),
        ]);

        let stability_dependency = HashMap::from([
            (ResourceDependency::Low, 30.0),
            (ResourceDependency::Medium, 15.0),
            (ResourceDependency::High, 5.0),
        ]);

        let presets = HashMap::from([
            (WeightPreset::HighClimateRisk, WeightProfile::HIGH_CLIMATE_RISK),
            (WeightPreset::EstablishedStable, WeightProfile::ESTABLISHED_STABLE),
            (WeightPreset::NewVenture, WeightProfile::NEW_VENTURE),
            (WeightPreset::Balanced, WeightProfile::BALANCED),
        ]);

        Self {
            cvi_base,
            acs_points,
            stability_years,
            stability_dependency,
            employee_points_each: 2.0,
            employee_points_cap: 30.0,
            debt_to_equity_ceiling: 3.0,
            profit_ceiling: 3_000_000.0,
            woman_led_bonus: 1.15,
            presets,
            high_risk_locations: HashSet::from([
                Location::Khulna,
                Location::Sylhet,
                Location::HaorRegion,
            ]),
            high_risk_sectors: HashSet::from([Sector::Agriculture, Sector::Fisheries]),
            low_risk_sectors: HashSet::from([
                Sector::Retail,
                Sector::Services,
                Sector::Crafts,
                Sector::Other,
                Sector::Livestock,
            ]),
        }
    }

    /// Load from a JSON file.
    /// Falls back to `default_seed()` on any read or parse error.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(path) {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|_| Self::default_seed()),
            Err(_) => Self::default_seed(),
        }
    }

    /// Base vulnerability for a location; `CVI_FALLBACK` when absent.
    pub fn base_vulnerability(&self, location: Location) -> f64 {
        self.cvi_base.get(&location).copied().unwrap_or(CVI_FALLBACK)
    }

    /// Points for one resilience measure; 0 when absent.
    pub fn measure_points(&self, measure: Measure) -> f64 {
        self.acs_points.get(&measure).copied().unwrap_or(0.0)
    }

    pub fn years_points(&self, years: YearsInBusiness) -> f64 {
        self.stability_years.get(&years).copied().unwrap_or(0.0)
    }

    pub fn dependency_points(&self, dependency: ResourceDependency) -> f64 {
        self.stability_dependency
            .get(&dependency)
            .copied()
            .unwrap_or(0.0)
    }

    /// Weights for a preset; balanced weights when absent.
    pub fn weights_for(&self, preset: WeightPreset) -> WeightProfile {
        self.presets
            .get(&preset)
            .copied()
            .unwrap_or(WeightProfile::BALANCED)
    }
}

/// Strict loader for tooling and tests: surfaces IO/parse errors instead of
/// falling back.
pub fn load_calibration_file(path: &Path) -> io::Result<Calibration> {
    let bytes = fs::read(path)?;
    let cal: Calibration = serde_json::from_slice(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(cal)
}

pub const DEFAULT_CALIBRATION_PATH: &str = "config/calibration.json";
pub const ENV_CALIBRATION_PATH: &str = "ACRACS_CALIBRATION_PATH";

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadCalibration {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    calibration: Arc<Calibration>,
    last_modified: Option<SystemTime>,
}

impl HotReloadCalibration {
    /// Create with a path (defaults to `config/calibration.json` if `None`).
    pub fn new(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CALIBRATION_PATH));
        let calibration = Arc::new(Calibration::load_from_file(&path));
        Self {
            path,
            inner: RwLock::new(State {
                calibration,
                last_modified: None,
            }),
        }
    }

    /// Resolve the path from `ACRACS_CALIBRATION_PATH` or the default.
    pub fn from_env() -> Self {
        let path = std::env::var(ENV_CALIBRATION_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CALIBRATION_PATH));
        Self::new(Some(&path))
    }

    /// Get the latest calibration, reloading if the config file changed.
    pub fn current(&self) -> Arc<Calibration> {
        let needs_reload = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => {
                let guard = self.inner.read().expect("calibration lock poisoned");
                guard.last_modified != Some(mtime)
            }
            // File absent: keep whatever we have (seed or last good load).
            Err(_) => false,
        };

        if !needs_reload {
            return self
                .inner
                .read()
                .expect("calibration lock poisoned")
                .calibration
                .clone();
        }

        let mut guard = self.inner.write().expect("calibration lock poisoned");
        // Double-check under the write lock in case of races.
        if let Ok(meta) = fs::metadata(&self.path) {
            if let Ok(mtime) = meta.modified() {
                if guard.last_modified != Some(mtime) {
                    if let Ok(cal) = load_calibration_file(&self.path) {
                        guard.calibration = Arc::new(cal);
                        guard.last_modified = Some(mtime);
                    }
                }
            }
        }
        guard.calibration.clone()
    }

    /// Unconditional reload; used by the admin endpoint.
    pub fn force_reload(&self) -> bool {
        match load_calibration_file(&self.path) {
            Ok(cal) => {
                let mut guard = self.inner.write().expect("calibration lock poisoned");
                guard.calibration = Arc::new(cal);
                guard.last_modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{io::Write, thread, time::Duration};

    /// Create a unique temporary directory in std::env::temp_dir().
    fn unique_tmp_dir() -> PathBuf {
        let mut dir = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("calibration_test_{}", nanos));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn seed_reproduces_authored_values() {
        let cal = Calibration::default_seed();
        assert!((cal.base_vulnerability(Location::Khulna) - 75.0).abs() < 1e-9);
        assert!((cal.base_vulnerability(Location::Other) - 50.0).abs() < 1e-9);
        assert!((cal.measure_points(Measure::ProtectiveInfrastructure) - 15.0).abs() < 1e-9);
        assert!((cal.years_points(YearsInBusiness::FivePlus) - 40.0).abs() < 1e-9);
        assert!((cal.dependency_points(ResourceDependency::High) - 5.0).abs() < 1e-9);

        let total: f64 = Measure::ALL.iter().map(|m| cal.measure_points(*m)).sum();
        assert!((total - 100.0).abs() < 1e-9, "ACS points must total 100");

        for preset in WeightPreset::ALL {
            let w = cal.weights_for(preset);
            let sum = w.financial + w.stability + w.cvi + w.acs;
            assert!((sum - 1.0).abs() < 1e-9, "{preset:?} weights must sum to 1");
        }
    }

    #[test]
    fn missing_file_falls_back_to_seed() {
        let cal = Calibration::load_from_file("does/not/exist.json");
        assert!((cal.base_vulnerability(Location::Sylhet) - 65.0).abs() < 1e-9);
    }

    #[test]
    fn partial_override_keeps_seed_for_missing_fields() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("calibration.json");
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"woman_led_bonus": 1.25}}"#).unwrap();
            f.sync_all().unwrap();
        }

        let cal = Calibration::load_from_file(&path);
        assert!((cal.woman_led_bonus - 1.25).abs() < 1e-9);
        // Untouched fields keep seed values.
        assert!((cal.base_vulnerability(Location::Khulna) - 75.0).abs() < 1e-9);
        assert!((cal.profit_ceiling - 3_000_000.0).abs() < 1e-9);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }

    #[test]
    fn loads_and_hot_reloads() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("calibration.json");
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"cvi_base":{{"khulna": 80.0}}}}"#).unwrap();
            f.sync_all().unwrap();
        }

        let hot = HotReloadCalibration::new(Some(&path));
        let c1 = hot.current();
        assert!((c1.base_vulnerability(Location::Khulna) - 80.0).abs() < 1e-9);
        // The override file replaced the whole table; other locations fall back.
        assert!((c1.base_vulnerability(Location::Sylhet) - CVI_FALLBACK).abs() < 1e-9);

        // Ensure a different mtime (filesystem granularity can be coarse).
        thread::sleep(Duration::from_millis(1100));

        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, r#"{{"cvi_base":{{"khulna": 60.0}}}}"#).unwrap();
            f.sync_all().unwrap();
        }

        let c2 = hot.current();
        assert!((c2.base_vulnerability(Location::Khulna) - 60.0).abs() < 1e-9);

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }

    #[test]
    fn force_reload_reports_parse_failure() {
        let tmpdir = unique_tmp_dir();
        let path = tmpdir.join("calibration.json");
        {
            let mut f = fs::File::create(&path).unwrap();
            write!(f, "not json").unwrap();
            f.sync_all().unwrap();
        }

        let hot = HotReloadCalibration::new(Some(&path));
        // Constructor fell back to the seed.
        assert!((hot.current().base_vulnerability(Location::Khulna) - 75.0).abs() < 1e-9);
        assert!(!hot.force_reload());

        let _ = fs::remove_file(&path);
        let _ = fs::remove_dir_all(&tmpdir);
    }
}
