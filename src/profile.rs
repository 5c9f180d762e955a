//! # Business Profile
//!
//! The input record for the scoring engine, assembled field-by-field by the
//! form layer and handed over as a plain value.
//!
//! - Categorical fields are closed enums; unknown wire strings collapse into
//!   the `Other` buckets so scoring never fails on out-of-domain input.
//! - The eleven resilience measures live in a fixed-size collection indexed
//!   by the closed [`Measure`] enum — no dynamic keys.
//! - Free-text measure details are carried for the advisory prompt and
//!   never affect the score.

use serde::{Deserialize, Serialize};

/// Named regions, each with a fixed base climate vulnerability in the
/// calibration tables.
///
/// Serialized as the original wire keys (`khulna`, `haor_region`, ...);
/// unknown keys deserialize to `Other` so an out-of-domain location falls
/// into the documented CVI fallback instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Khulna,
    Rajshahi,
    Sylhet,
    ChattogramHills,
    HaorRegion,
    Other,
}

impl Location {
    pub fn key(&self) -> &'static str {
        match self {
            Location::Khulna => "khulna",
            Location::Rajshahi => "rajshahi",
            Location::Sylhet => "sylhet",
            Location::ChattogramHills => "chattogram_hills",
            Location::HaorRegion => "haor_region",
            Location::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "khulna" => Location::Khulna,
            "rajshahi" => Location::Rajshahi,
            "sylhet" => Location::Sylhet,
            "chattogram_hills" => Location::ChattogramHills,
            "haor_region" => Location::HaorRegion,
            _ => Location::Other,
        }
    }

    /// Display label used in the advisory prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Location::Khulna => "Khulna (Coastal - Salinity, Cyclone)",
            Location::Rajshahi => "Rajshahi (Drought-prone)",
            Location::Sylhet => "Sylhet (Flash Floods)",
            Location::ChattogramHills => "Chattogram Hill Tracts (Landslides)",
            Location::HaorRegion => "Haor Region (Seasonal Flooding)",
            Location::Other => "Other",
        }
    }
}

impl Serialize for Location {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Location::from_key(&key))
    }
}

/// Business sectors. Used only for risk-context classification, never
/// scored directly. Unknown keys deserialize to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sector {
    Agriculture,
    Fisheries,
    Livestock,
    Crafts,
    Retail,
    Services,
    Other,
}

impl Sector {
    pub fn key(&self) -> &'static str {
        match self {
            Sector::Agriculture => "agriculture",
            Sector::Fisheries => "fisheries",
            Sector::Livestock => "livestock",
            Sector::Crafts => "crafts",
            Sector::Retail => "retail",
            Sector::Services => "services",
            Sector::Other => "other",
        }
    }

    pub fn from_key(key: &str) -> Self {
        match key {
            "agriculture" => Sector::Agriculture,
            "fisheries" => Sector::Fisheries,
            "livestock" => Sector::Livestock,
            "crafts" => Sector::Crafts,
            "retail" => Sector::Retail,
            "services" => Sector::Services,
            _ => Sector::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sector::Agriculture => "Farming (Crops, Vegetables)",
            Sector::Fisheries => "Fishing & Fish Farming",
            Sector::Livestock => "Livestock & Poultry",
            Sector::Crafts => "Handicrafts (e.g., weaving, pottery)",
            Sector::Retail => "Small Shop / Retail",
            Sector::Services => "Services (e.g., repair, transport)",
            Sector::Other => "Other Business",
        }
    }
}

impl Serialize for Sector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for Sector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Sector::from_key(&key))
    }
}

/// Age band of the enterprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YearsInBusiness {
    #[serde(rename = "0-1")]
    UpToOne,
    #[serde(rename = "2-5")]
    TwoToFive,
    #[serde(rename = "5+")]
    FivePlus,
}

impl YearsInBusiness {
    pub fn key(&self) -> &'static str {
        match self {
            YearsInBusiness::UpToOne => "0-1",
            YearsInBusiness::TwoToFive => "2-5",
            YearsInBusiness::FivePlus => "5+",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "0-1" => Some(YearsInBusiness::UpToOne),
            "2-5" => Some(YearsInBusiness::TwoToFive),
            "5+" => Some(YearsInBusiness::FivePlus),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            YearsInBusiness::UpToOne => "New (0-1 Year)",
            YearsInBusiness::TwoToFive => "Growing (2-5 Years)",
            YearsInBusiness::FivePlus => "Established (5+ Years)",
        }
    }
}

/// Dependence on local natural resources. Inverted for stability points:
/// low dependency is the more stable position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceDependency {
    Low,
    Medium,
    High,
}

impl ResourceDependency {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceDependency::Low => "Low (Not very dependent)",
            ResourceDependency::Medium => "Medium (Somewhat dependent)",
            ResourceDependency::High => "High (Very dependent)",
        }
    }
}

/// The closed set of eleven self-reported resilience measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Measure {
    Diversification,
    ClimateSmartPractices,
    ProtectiveInfrastructure,
    MicroInsurance,
    ClimateTraining,
    HasSavings,
    EarlyWarningAccess,
    CommunityGroupMember,
    FormalBusinessPlan,
    LocalSupplierNetwork,
    DigitalLiteracy,
}

impl Measure {
    /// All measures in canonical order. The order fixes the layout of
    /// [`ResilienceMeasures`].
    pub const ALL: [Measure; 11] = [
        Measure::Diversification,
        Measure::ClimateSmartPractices,
        Measure::ProtectiveInfrastructure,
        Measure::MicroInsurance,
        Measure::ClimateTraining,
        Measure::HasSavings,
        Measure::EarlyWarningAccess,
        Measure::CommunityGroupMember,
        Measure::FormalBusinessPlan,
        Measure::LocalSupplierNetwork,
        Measure::DigitalLiteracy,
    ];

    fn index(self) -> usize {
        Measure::ALL
            .iter()
            .position(|m| *m == self)
            .unwrap_or_default()
    }
}

/// One measure entry: whether it is in place, plus an optional free-text
/// description shown to the advisor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureState {
    pub checked: bool,
    pub details: String,
}

/// Fixed-size collection of the eleven measure entries, indexed by
/// [`Measure`]. Serialized as the original camelCase-keyed object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "MeasureRecord", into = "MeasureRecord")]
pub struct ResilienceMeasures {
    entries: [MeasureState; 11],
}

impl ResilienceMeasures {
    pub fn get(&self, measure: Measure) -> &MeasureState {
        &self.entries[measure.index()]
    }

    pub fn set_checked(&mut self, measure: Measure, checked: bool) {
        self.entries[measure.index()].checked = checked;
    }

    pub fn set_details(&mut self, measure: Measure, details: impl Into<String>) {
        self.entries[measure.index()].details = details.into();
    }

    /// Iterate entries in canonical measure order.
    pub fn iter(&self) -> impl Iterator<Item = (Measure, &MeasureState)> {
        Measure::ALL.iter().map(move |m| (*m, self.get(*m)))
    }

    pub fn checked_count(&self) -> usize {
        self.entries.iter().filter(|s| s.checked).count()
    }
}

impl std::ops::Index<Measure> for ResilienceMeasures {
    type Output = MeasureState;
    fn index(&self, measure: Measure) -> &MeasureState {
        self.get(measure)
    }
}

/// Wire shape with one named field per measure; keeps the set structurally
/// closed while matching the original JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct MeasureRecord {
    diversification: MeasureState,
    climate_smart_practices: MeasureState,
    protective_infrastructure: MeasureState,
    micro_insurance: MeasureState,
    climate_training: MeasureState,
    has_savings: MeasureState,
    early_warning_access: MeasureState,
    community_group_member: MeasureState,
    formal_business_plan: MeasureState,
    local_supplier_network: MeasureState,
    digital_literacy: MeasureState,
}

impl From<MeasureRecord> for ResilienceMeasures {
    fn from(r: MeasureRecord) -> Self {
        Self {
            entries: [
                r.diversification,
                r.climate_smart_practices,
                r.protective_infrastructure,
                r.micro_insurance,
                r.climate_training,
                r.has_savings,
                r.early_warning_access,
                r.community_group_member,
                r.formal_business_plan,
                r.local_supplier_network,
                r.digital_literacy,
            ],
        }
    }
}

impl From<ResilienceMeasures> for MeasureRecord {
    fn from(m: ResilienceMeasures) -> Self {
        let [diversification, climate_smart_practices, protective_infrastructure, micro_insurance, climate_training, has_savings, early_warning_access, community_group_member, formal_business_plan, local_supplier_network, digital_literacy] =
            m.entries;
        Self {
            diversification,
            climate_smart_practices,
            protective_infrastructure,
            micro_insurance,
            climate_training,
            has_savings,
            early_warning_access,
            community_group_member,
            formal_business_plan,
            local_supplier_network,
            digital_literacy,
        }
    }
}

/// The full input record.
///
/// `Default` documents the session-start state: location Khulna, sector
/// agriculture, a new not-woman-led business with zero financials and no
/// measures in place. Missing wire fields deserialize to the same defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessProfile {
    /// Display-only; never scored.
    pub enterprise_name: String,
    pub is_woman_led: bool,
    pub location: Location,
    pub sector: Sector,
    /// Debt-to-equity ratio, >= 0.
    pub debt_to_equity: f64,
    /// Yearly profit in BDT, >= 0.
    pub yearly_profit: f64,
    /// Optional figures; excluded from scoring, surfaced in the advisory
    /// prompt when present and positive.
    pub monthly_revenue: Option<f64>,
    pub monthly_expenses: Option<f64>,
    pub cash_on_hand: Option<f64>,
    pub years_in_business: YearsInBusiness,
    pub employees: u32,
    pub resource_dependency: ResourceDependency,
    pub resilience_measures: ResilienceMeasures,
}

impl Default for BusinessProfile {
    fn default() -> Self {
        Self {
            enterprise_name: String::new(),
            is_woman_led: false,
            location: Location::Khulna,
            sector: Sector::Agriculture,
            debt_to_equity: 0.0,
            yearly_profit: 0.0,
            monthly_revenue: None,
            monthly_expenses: None,
            cash_on_hand: None,
            years_in_business: YearsInBusiness::UpToOne,
            employees: 0,
            resource_dependency: ResourceDependency::Low,
            resilience_measures: ResilienceMeasures::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_location_collapses_to_other() {
        let loc: Location = serde_json::from_str("\"dhaka\"").unwrap();
        assert_eq!(loc, Location::Other);
    }

    #[test]
    fn years_band_uses_original_wire_values() {
        let y: YearsInBusiness = serde_json::from_str("\"5+\"").unwrap();
        assert_eq!(y, YearsInBusiness::FivePlus);
        assert_eq!(serde_json::to_string(&y).unwrap(), "\"5+\"");
    }

    #[test]
    fn measures_roundtrip_as_camel_case_object() {
        let mut measures = ResilienceMeasures::default();
        measures.set_checked(Measure::MicroInsurance, true);
        measures.set_details(Measure::MicroInsurance, "covered since 2023");

        let json = serde_json::to_value(&measures).unwrap();
        assert_eq!(json["microInsurance"]["checked"], true);
        assert_eq!(json["microInsurance"]["details"], "covered since 2023");

        let back: ResilienceMeasures = serde_json::from_value(json).unwrap();
        assert_eq!(back, measures);
        assert_eq!(back.checked_count(), 1);
    }

    #[test]
    fn partial_profile_fills_documented_defaults() {
        let p: BusinessProfile =
            serde_json::from_str(r#"{"enterpriseName":"Mita Traders"}"#).unwrap();
        assert_eq!(p.enterprise_name, "Mita Traders");
        assert_eq!(p.location, Location::Khulna);
        assert_eq!(p.sector, Sector::Agriculture);
        assert_eq!(p.years_in_business, YearsInBusiness::UpToOne);
        assert_eq!(p.resource_dependency, ResourceDependency::Low);
        assert_eq!(p.employees, 0);
        assert_eq!(p.resilience_measures.checked_count(), 0);
    }

    #[test]
    fn measure_order_is_stable() {
        assert_eq!(Measure::ALL.len(), 11);
        for (i, m) in Measure::ALL.iter().enumerate() {
            assert_eq!(m.index(), i);
        }
    }
}
