//! Turns whatever came out of storage or an import into a complete
//! [`ApplicationState`].
//!
//! Normalization is total: any JSON value yields a valid state. Field-level
//! mismatches fall back to the field default instead of raising.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::model::ApplicationState;

/// Combined household description written by older builds, e.g. "Couple with kids".
pub const LEGACY_LIFE_SITUATION_KEY: &str = "lifeSituation";

const NEGATED_KIDS_MARKERS: &[&str] = &["no kid", "no child", "without kid", "without child"];
const KIDS_MARKERS: &[&str] = &["kid", "child"];
const RELATIONSHIP_MARKERS: &[&str] = &["Single", "Couple"];

pub fn normalize(raw: &Value) -> ApplicationState {
    let Some(map) = raw.as_object() else {
        return ApplicationState::default();
    };
    let defaults = ApplicationState::default();

    let mut state = ApplicationState {
        onboarded: map.get("onboarded").map(truthy).unwrap_or(false),
        brand: text(map, "brand").unwrap_or(defaults.brand),
        household_name: text(map, "householdName").unwrap_or_default(),
        budget_name: text(map, "budgetName").unwrap_or_default(),
        budget_style: text(map, "budgetStyle").unwrap_or_default(),
        budget_month: text(map, "budgetMonth").unwrap_or_default(),
        safe_to_spend: number(map, "safeToSpend"),
        income_frequency: text(map, "incomeFrequency").unwrap_or_default(),
        income_amount: non_negative(number(map, "incomeAmount")),
        home_status: text(map, "homeStatus").unwrap_or_default(),
        relationship_status: text(map, "relationshipStatus").unwrap_or_default(),
        has_kids: text(map, "hasKids").unwrap_or_default(),
        work_status: text(map, "workStatus").unwrap_or_default(),
        age_range: text(map, "ageRange").unwrap_or_default(),
        primary_goal: text(map, "primaryGoal").unwrap_or_default(),
        onboarding_steps: sequence(map, "onboardingSteps"),
        summary_cards: sequence(map, "summaryCards"),
        categories: sequence(map, "categories"),
        transactions: sequence(map, "transactions"),
        goals: sequence(map, "goals"),
        insights: sequence(map, "insights"),
        reports: sequence(map, "reports"),
    };

    if let Some(legacy) = text(map, LEGACY_LIFE_SITUATION_KEY) {
        if state.has_kids.is_empty() {
            state.has_kids = kids_from_life_situation(&legacy).to_string();
        }
        if state.relationship_status.is_empty() {
            state.relationship_status = relationship_from_life_situation(&legacy).to_string();
        }
    }

    state
}

/// "Yes" for a kids marker, otherwise "". A negated marker ("no kids") is
/// not evidence either way.
pub fn kids_from_life_situation(life_situation: &str) -> &'static str {
    let lowered = life_situation.to_lowercase();
    if NEGATED_KIDS_MARKERS.iter().any(|m| lowered.contains(m)) {
        ""
    } else if KIDS_MARKERS.iter().any(|m| lowered.contains(m)) {
        "Yes"
    } else {
        ""
    }
}

/// Earliest of "Single" / "Couple" in the text wins; case-insensitive.
pub fn relationship_from_life_situation(life_situation: &str) -> &'static str {
    let lowered = life_situation.to_lowercase();
    RELATIONSHIP_MARKERS
        .iter()
        .filter_map(|marker| {
            lowered
                .find(&marker.to_lowercase())
                .map(|pos| (pos, *marker))
        })
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, marker)| marker)
        .unwrap_or("")
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn number(map: &Map<String, Value>, key: &str) -> f64 {
    map.get(key)
        .and_then(Value::as_f64)
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn non_negative(value: f64) -> f64 {
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

// A sequence survives only if every element decodes.
fn sequence<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Vec<T> {
    match map.get(key) {
        Some(value @ Value::Array(_)) => {
            serde_json::from_value(value.clone()).unwrap_or_default()
        }
        _ => Vec::new(),
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
