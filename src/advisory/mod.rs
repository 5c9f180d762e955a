//! # Advisory
//!
//! The advisory-text boundary: turns `{profile, finalScore, breakdown}`
//! into a free-text prompt for an external generative-text service, and
//! wraps the call behind a provider abstraction with caching and a daily
//! limit (see [`client`]).
//!
//! The scoring engine never depends on this path; a failed or disabled
//! advisory call surfaces as `None` and leaves the score untouched.

pub mod client;

use std::fmt::Write as _;

use crate::engine::Evaluation;
use crate::profile::{BusinessProfile, Measure};

// Re-export convenient types.
pub use client::{
    build_client_from_config, AdvisoryClient, AdvisoryResult, CachingClient, DisabledClient,
    DynAdvisoryClient, GeminiProvider, MockProvider, Provider,
};

/// One-line summary per measure, phrased for the advisor prompt.
pub fn measure_summary(measure: Measure) -> &'static str {
    match measure {
        Measure::Diversification => "Has multiple sources of income.",
        Measure::ClimateSmartPractices => "Uses climate-smart methods.",
        Measure::ProtectiveInfrastructure => "Invested in stronger infrastructure.",
        Measure::MicroInsurance => "Has business insurance for disasters.",
        Measure::ClimateTraining => "Attended training about climate risks.",
        Measure::HasSavings => "Keeps savings for emergencies.",
        Measure::EarlyWarningAccess => "Receives early weather warnings.",
        Measure::CommunityGroupMember => "Is a member of a local community group.",
        Measure::FormalBusinessPlan => "Has a written business plan.",
        Measure::LocalSupplierNetwork => "Has a strong network of local suppliers.",
        Measure::DigitalLiteracy => "Uses digital tools (e.g., mobile banking).",
    }
}

/// Build the advisor prompt.
///
/// Structure follows the original advisory flow: role and tone, business
/// information, financial health (optional monthly figures only when
/// present and positive), the checked resilience measures with their
/// free-text details, the score results rendered to whole numbers, and the
/// three-part task instruction.
pub fn build_prompt(profile: &BusinessProfile, evaluation: &Evaluation) -> String {
    let mut out = String::with_capacity(2048);

    let _ = writeln!(
        out,
        "Act as a friendly, encouraging business advisor for a small enterprise owner in rural Bangladesh."
    );
    let _ = writeln!(out, "Write a simple, easy-to-understand summary in English.");
    let _ = writeln!(
        out,
        "Avoid complex financial jargon. Use \"BDT\" for the local currency."
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "**Business Information:**");
    let _ = writeln!(out, "- Name: {}", profile.enterprise_name);
    let _ = writeln!(
        out,
        "- Woman-led: {}",
        if profile.is_woman_led { "Yes" } else { "No" }
    );
    let _ = writeln!(out, "- Location: {}", profile.location.label());
    let _ = writeln!(out, "- Business Type: {}", profile.sector.label());
    let _ = writeln!(
        out,
        "- Years in Business: {}",
        profile.years_in_business.label()
    );
    let _ = writeln!(out, "- Number of Employees: {}", profile.employees);
    let _ = writeln!(
        out,
        "- Dependence on local natural resources: {}",
        profile.resource_dependency.label()
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "**Financial Health:**");
    let _ = writeln!(
        out,
        "- Borrowed Money vs. Own Money (Debt-to-Equity): {}",
        profile.debt_to_equity
    );
    let _ = writeln!(out, "- Yearly Profit (BDT): {}", profile.yearly_profit);
    if let Some(revenue) = profile.monthly_revenue.filter(|v| *v > 0.0) {
        let _ = writeln!(out, "- Avg. Monthly Income (BDT): {revenue}");
    }
    if let Some(expenses) = profile.monthly_expenses.filter(|v| *v > 0.0) {
        let _ = writeln!(out, "- Avg. Monthly Expenses (BDT): {expenses}");
    }
    if let Some(cash) = profile.cash_on_hand.filter(|v| *v > 0.0) {
        let _ = writeln!(out, "- Cash / Savings on Hand (BDT): {cash}");
    }
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "**Actions Taken to Protect Business from Climate Change:**"
    );
    let mut any_action = false;
    for (measure, state) in profile.resilience_measures.iter() {
        if !state.checked {
            continue;
        }
        any_action = true;
        let _ = writeln!(out, "- {}", measure_summary(measure));
        if !state.details.is_empty() {
            let _ = writeln!(out, "    - Details: {}", state.details);
        }
    }
    if !any_action {
        let _ = writeln!(out, "- No specific actions reported.");
    }
    let _ = writeln!(out);

    let b = &evaluation.breakdown;
    let _ = writeln!(out, "**ACRACS Score Results:**");
    let _ = writeln!(out, "- Final Score: {:.0} / 100", evaluation.final_score);
    let _ = writeln!(out, "- Score Breakdown:");
    let _ = writeln!(out, "  - Financial Health: {:.0}/100", b.financial);
    let _ = writeln!(out, "  - Business Stability: {:.0}/100", b.stability);
    let _ = writeln!(
        out,
        "  - Climate Vulnerability (higher score is better): {:.0}/100",
        b.cvi
    );
    let _ = writeln!(
        out,
        "  - Actions to Protect Business (Adaptive Capacity): {:.0}/100",
        b.acs
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "**Your Task (in simple language, using Markdown formatting):**"
    );
    let _ = writeln!(
        out,
        "1.  **Overall Summary:** Start with a simple risk level (\"Low Risk,\" \"Medium Risk,\" or \"High Risk\") and briefly explain what the final score means in one sentence. Use **bold** for the risk level."
    );
    let _ = writeln!(
        out,
        "2.  **Your Strengths (What you are doing well):** Create a bulleted list using \"-\" for 2-3 key positive points. If they provided details on their actions, praise their specific efforts."
    );
    let _ = writeln!(
        out,
        "3.  **Areas to Improve (Suggestions to get a better score):** Create a bulleted list using \"-\" for 1-2 friendly, actionable suggestions. Explain *why* these suggestions will help make their business stronger and more loan-ready. Frame this as helpful advice, not criticism."
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::Calibration;
    use crate::engine::evaluate;
    use crate::presets::WeightProfile;
    use crate::profile::{Location, Sector};

    fn prompt_for(profile: &BusinessProfile) -> String {
        let cal = Calibration::default_seed();
        let evaluation = evaluate(profile, &WeightProfile::BALANCED, &cal);
        build_prompt(profile, &evaluation)
    }

    #[test]
    fn prompt_carries_profile_labels_and_scores() {
        let mut p = BusinessProfile::default();
        p.enterprise_name = "Nodi Fish Farm".to_string();
        p.location = Location::Khulna;
        p.sector = Sector::Fisheries;
        p.yearly_profit = 250_000.0;

        let prompt = prompt_for(&p);
        assert!(prompt.contains("- Name: Nodi Fish Farm"));
        assert!(prompt.contains("Khulna (Coastal - Salinity, Cyclone)"));
        assert!(prompt.contains("Fishing & Fish Farming"));
        // Khulna base 75 -> cvi 25, rendered whole.
        assert!(prompt.contains("Climate Vulnerability (higher score is better): 25/100"));
        assert!(prompt.contains("**Your Task"));
    }

    #[test]
    fn checked_measures_and_details_are_listed() {
        let mut p = BusinessProfile::default();
        p.resilience_measures
            .set_checked(Measure::Diversification, true);
        p.resilience_measures
            .set_details(Measure::Diversification, "sells vegetables, drives a rickshaw");
        p.resilience_measures.set_checked(Measure::HasSavings, true);

        let prompt = prompt_for(&p);
        assert!(prompt.contains("- Has multiple sources of income."));
        assert!(prompt.contains("    - Details: sells vegetables, drives a rickshaw"));
        assert!(prompt.contains("- Keeps savings for emergencies."));
        assert!(!prompt.contains("No specific actions reported"));
    }

    #[test]
    fn no_actions_line_when_nothing_is_checked() {
        let prompt = prompt_for(&BusinessProfile::default());
        assert!(prompt.contains("- No specific actions reported."));
    }

    #[test]
    fn optional_financials_appear_only_when_positive() {
        let mut p = BusinessProfile::default();
        p.monthly_revenue = Some(45_000.0);
        p.monthly_expenses = Some(0.0);
        p.cash_on_hand = None;

        let prompt = prompt_for(&p);
        assert!(prompt.contains("Avg. Monthly Income (BDT): 45000"));
        assert!(!prompt.contains("Avg. Monthly Expenses"));
        assert!(!prompt.contains("Cash / Savings on Hand"));
    }
}
