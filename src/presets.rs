use crate::error::{AppError, AppResult, PRESET_UNKNOWN};
use crate::wizard::WizardForm;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetValues {
    pub household_name: &'static str,
    pub budget_name: &'static str,
    pub budget_style: &'static str,
    pub budget_month: &'static str,
    pub income_frequency: &'static str,
    pub income_amount: f64,
    pub home_status: &'static str,
    pub relationship_status: &'static str,
    pub has_kids: &'static str,
    pub work_status: &'static str,
    pub age_range: &'static str,
    pub primary_goal: &'static str,
}

/// Quick-start profile for the planner form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub values: PresetValues,
}

pub const DEFAULT_PRESET_ID: &str = "starter";

pub const PLANNER_PRESETS: &[PlannerPreset] = &[
    PlannerPreset {
        id: "starter",
        label: "Starter (simple baseline)",
        values: PresetValues {
            household_name: "Household",
            budget_name: "Monthly Budget",
            budget_style: "Custom",
            budget_month: "2026-02",
            income_frequency: "Monthly",
            income_amount: 4000.0,
            home_status: "Renting",
            relationship_status: "Couple",
            has_kids: "No",
            work_status: "Full-time",
            age_range: "35 to 44",
            primary_goal: "Stay on track",
        },
    },
    PlannerPreset {
        id: "renting-kids-fulltime",
        label: "Renting + kids (full-time)",
        values: PresetValues {
            household_name: "Family Household",
            budget_name: "Family Budget",
            budget_style: "Zero-based",
            budget_month: "2026-02",
            income_frequency: "Bi-weekly",
            income_amount: 2100.0,
            home_status: "Renting",
            relationship_status: "Couple",
            has_kids: "Yes",
            work_status: "Full-time",
            age_range: "35 to 44",
            primary_goal: "Save more money",
        },
    },
    PlannerPreset {
        id: "homeowner-no-kids-self-employed",
        label: "Homeowner + no kids (self-employed)",
        values: PresetValues {
            household_name: "Home Household",
            budget_name: "Primary Budget",
            budget_style: "Envelope",
            budget_month: "2026-02",
            income_frequency: "Monthly",
            income_amount: 5200.0,
            home_status: "Homeowner",
            relationship_status: "Couple",
            has_kids: "No",
            work_status: "Self-employed",
            age_range: "45 to 54",
            primary_goal: "Reduce my debt",
        },
    },
    PlannerPreset {
        id: "single-renting-student",
        label: "Single + renting (student)",
        values: PresetValues {
            household_name: "Student Budget",
            budget_name: "Campus Budget",
            budget_style: "50/30/20",
            budget_month: "2026-02",
            income_frequency: "Monthly",
            income_amount: 1200.0,
            home_status: "Renting",
            relationship_status: "Single",
            has_kids: "No",
            work_status: "Student",
            age_range: "18 to 24",
            primary_goal: "Create my first budget",
        },
    },
    PlannerPreset {
        id: "couple-homeowner-retired",
        label: "Couple + homeowner (retired)",
        values: PresetValues {
            household_name: "Retirement Budget",
            budget_name: "Fixed Income Plan",
            budget_style: "Custom",
            budget_month: "2026-02",
            income_frequency: "Monthly",
            income_amount: 3200.0,
            home_status: "Homeowner",
            relationship_status: "Couple",
            has_kids: "Yes",
            work_status: "Retired",
            age_range: "65 to 69",
            primary_goal: "Stay on track",
        },
    },
];

pub fn find_preset(id: &str) -> AppResult<&'static PlannerPreset> {
    PLANNER_PRESETS
        .iter()
        .find(|preset| preset.id == id)
        .ok_or_else(|| {
            AppError::new(PRESET_UNKNOWN, "No planner preset with that id.")
                .with_context("preset", id.to_string())
        })
}

impl PlannerPreset {
    /// Pre-filled wizard form. Only submitting it through the wizard marks the
    /// household onboarded.
    pub fn form(&self) -> WizardForm {
        let v = &self.values;
        WizardForm {
            household_name: v.household_name.to_string(),
            budget_name: v.budget_name.to_string(),
            budget_style: v.budget_style.to_string(),
            budget_month: v.budget_month.to_string(),
            income_frequency: v.income_frequency.to_string(),
            income_amount: v.income_amount,
            home_status: v.home_status.to_string(),
            relationship_status: v.relationship_status.to_string(),
            has_kids: v.has_kids.to_string(),
            work_status: v.work_status.to_string(),
            age_range: v.age_range.to_string(),
            primary_goal: v.primary_goal.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_ids_are_unique() {
        let mut ids: Vec<&str> = PLANNER_PRESETS.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), PLANNER_PRESETS.len());
    }

    #[test]
    fn default_preset_is_starter() {
        assert_eq!(PLANNER_PRESETS[0].id, DEFAULT_PRESET_ID);
        assert_eq!(
            find_preset(DEFAULT_PRESET_ID).expect("starter").label,
            "Starter (simple baseline)"
        );
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = find_preset("luxury-yacht").expect_err("unknown");
        assert_eq!(err.code(), PRESET_UNKNOWN);
        assert_eq!(
            err.context().get("preset"),
            Some(&"luxury-yacht".to_string())
        );
    }

    #[test]
    fn every_preset_passes_wizard_validation() {
        for preset in PLANNER_PRESETS {
            assert!(preset.form().validate().is_ok(), "{} invalid", preset.id);
        }
    }
}
