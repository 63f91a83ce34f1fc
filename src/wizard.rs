use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, VALIDATION_WIZARD};
use crate::model::StatePatch;

/// The onboarding wizard's fields, as the user filled them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardForm {
    pub household_name: String,
    pub budget_name: String,
    pub budget_style: String,
    pub budget_month: String,
    pub income_frequency: String,
    pub income_amount: f64,
    pub home_status: String,
    pub relationship_status: String,
    pub has_kids: String,
    pub work_status: String,
    pub age_range: String,
    pub primary_goal: String,
}

impl WizardForm {
    fn required(&self) -> [(&'static str, &str); 11] {
        [
            ("householdName", self.household_name.as_str()),
            ("budgetName", self.budget_name.as_str()),
            ("budgetStyle", self.budget_style.as_str()),
            ("budgetMonth", self.budget_month.as_str()),
            ("incomeFrequency", self.income_frequency.as_str()),
            ("homeStatus", self.home_status.as_str()),
            ("relationshipStatus", self.relationship_status.as_str()),
            ("hasKids", self.has_kids.as_str()),
            ("workStatus", self.work_status.as_str()),
            ("ageRange", self.age_range.as_str()),
            ("primaryGoal", self.primary_goal.as_str()),
        ]
    }

    /// Every text field is required and income must be a non-negative number.
    pub fn validate(&self) -> AppResult<()> {
        let missing: Vec<&str> = self
            .required()
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect();
        let bad_income = !self.income_amount.is_finite() || self.income_amount < 0.0;

        if missing.is_empty() && !bad_income {
            return Ok(());
        }

        let mut err = AppError::new(VALIDATION_WIZARD, "Please complete the highlighted fields.");
        if !missing.is_empty() {
            err = err.with_context("missing", missing.join(","));
        }
        if bad_income {
            err = err.with_context("incomeAmount", "must be zero or more");
        }
        Err(err)
    }

    /// Patch that stores the answers and marks the household onboarded.
    pub fn into_patch(self) -> StatePatch {
        StatePatch {
            onboarded: Some(true),
            ..self.answers_patch()
        }
    }

    /// The answers alone, leaving `onboarded` untouched.
    pub fn answers_patch(self) -> StatePatch {
        StatePatch {
            household_name: Some(self.household_name),
            budget_name: Some(self.budget_name),
            budget_style: Some(self.budget_style),
            budget_month: Some(self.budget_month),
            income_frequency: Some(self.income_frequency),
            income_amount: Some(self.income_amount),
            home_status: Some(self.home_status),
            relationship_status: Some(self.relationship_status),
            has_kids: Some(self.has_kids),
            work_status: Some(self.work_status),
            age_range: Some(self.age_range),
            primary_goal: Some(self.primary_goal),
            ..StatePatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presets::PLANNER_PRESETS;

    #[test]
    fn blank_form_lists_all_missing_fields() {
        let err = WizardForm::default().validate().expect_err("blank");
        assert_eq!(err.code(), VALIDATION_WIZARD);
        let missing = err.context().get("missing").expect("missing list");
        assert!(missing.starts_with("householdName,budgetName"));
        assert_eq!(missing.split(',').count(), 11);
        assert!(!err.context().contains_key("incomeAmount"));
    }

    #[test]
    fn negative_income_is_rejected() {
        let mut form = PLANNER_PRESETS[0].form();
        form.income_amount = -1.0;
        let err = form.validate().expect_err("negative");
        assert!(err.context().contains_key("incomeAmount"));
        assert!(!err.context().contains_key("missing"));
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut form = PLANNER_PRESETS[0].form();
        form.budget_month = "   ".into();
        let err = form.validate().expect_err("blank month");
        assert_eq!(
            err.context().get("missing"),
            Some(&"budgetMonth".to_string())
        );
    }

    #[test]
    fn patch_marks_onboarded_and_leaves_collections() {
        let patch = PLANNER_PRESETS[1].form().into_patch();
        assert_eq!(patch.onboarded, Some(true));
        assert_eq!(patch.has_kids.as_deref(), Some("Yes"));
        assert!(patch.categories.is_none());
        assert!(patch.brand.is_none());
    }

    #[test]
    fn answers_patch_does_not_touch_onboarding() {
        let patch = PLANNER_PRESETS[2].form().answers_patch();
        assert!(patch.onboarded.is_none());
        assert_eq!(patch.home_status.as_deref(), Some("Homeowner"));
    }
}
