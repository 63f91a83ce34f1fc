use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, VALIDATION_PATCH};

pub const DEFAULT_BRAND: &str = "Budget Forge";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingStep {
    pub title: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryCard {
    pub label: String,
    pub value: String,
    pub note: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTone {
    Mint,
    Ocean,
    Coral,
    Peach,
    Ink,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPlan {
    pub name: String,
    pub target: f64,
    pub spent: f64,
    pub trend: String,
    pub tone: CategoryTone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalItem {
    pub name: String,
    pub target: f64,
    pub saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightItem {
    pub label: String,
    pub value: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportItem {
    pub label: String,
    pub value: String,
    pub hint: String,
}

/// The single persisted record behind the wizard and the planner screens.
///
/// Always fully populated: values read from storage or an import go through
/// [`crate::normalize::normalize`] first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationState {
    pub onboarded: bool,
    pub brand: String,
    pub household_name: String,
    pub budget_name: String,
    pub budget_style: String,
    pub budget_month: String,
    pub safe_to_spend: f64,
    pub income_frequency: String,
    pub income_amount: f64,
    pub home_status: String,
    pub relationship_status: String,
    pub has_kids: String,
    pub work_status: String,
    pub age_range: String,
    pub primary_goal: String,
    pub onboarding_steps: Vec<OnboardingStep>,
    pub summary_cards: Vec<SummaryCard>,
    pub categories: Vec<CategoryPlan>,
    pub transactions: Vec<TransactionItem>,
    pub goals: Vec<GoalItem>,
    pub insights: Vec<InsightItem>,
    pub reports: Vec<ReportItem>,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            onboarded: false,
            brand: DEFAULT_BRAND.to_string(),
            household_name: String::new(),
            budget_name: String::new(),
            budget_style: String::new(),
            budget_month: String::new(),
            safe_to_spend: 0.0,
            income_frequency: String::new(),
            income_amount: 0.0,
            home_status: String::new(),
            relationship_status: String::new(),
            has_kids: String::new(),
            work_status: String::new(),
            age_range: String::new(),
            primary_goal: String::new(),
            onboarding_steps: Vec::new(),
            summary_cards: Vec::new(),
            categories: Vec::new(),
            transactions: Vec::new(),
            goals: Vec::new(),
            insights: Vec::new(),
            reports: Vec::new(),
        }
    }
}

/// Sparse update: `None` leaves the current value in place.
///
/// Merging stores values verbatim. A negative `incomeAmount` or an empty
/// `brand` is therefore kept for the session but rewritten by the normalizer
/// on the next load; [`StatePatch::validate`] rejects such patches up front.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StatePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_month: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safe_to_spend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_kids: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_steps: Option<Vec<OnboardingStep>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_cards: Option<Vec<SummaryCard>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryPlan>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<GoalItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insights: Option<Vec<InsightItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reports: Option<Vec<ReportItem>>,
}

macro_rules! merge_fields {
    ($target:ident, $patch:ident; $( $field:ident ),+ $(,)?) => {
        $(
            if let Some(value) = $patch.$field {
                $target.$field = value;
            }
        )+
    };
}

impl StatePatch {
    pub fn is_empty(&self) -> bool {
        *self == StatePatch::default()
    }

    /// Rejects values that would not survive a reload unchanged.
    pub fn validate(&self) -> AppResult<()> {
        let mut err = AppError::new(VALIDATION_PATCH, "The update contains invalid values.");
        let mut invalid = false;
        if let Some(income) = self.income_amount {
            if !income.is_finite() || income < 0.0 {
                err = err.with_context("incomeAmount", "must be zero or more");
                invalid = true;
            }
        }
        if let Some(safe) = self.safe_to_spend {
            if !safe.is_finite() {
                err = err.with_context("safeToSpend", "must be a number");
                invalid = true;
            }
        }
        if self.brand.as_deref() == Some("") {
            err = err.with_context("brand", "must not be empty");
            invalid = true;
        }
        if invalid {
            Err(err)
        } else {
            Ok(())
        }
    }

    /// Shallow field-by-field overwrite of `current`.
    pub fn merge_into(self, mut current: ApplicationState) -> ApplicationState {
        let patch = self;
        merge_fields!(current, patch;
            onboarded,
            brand,
            household_name,
            budget_name,
            budget_style,
            budget_month,
            safe_to_spend,
            income_frequency,
            income_amount,
            home_status,
            relationship_status,
            has_kids,
            work_status,
            age_range,
            primary_goal,
            onboarding_steps,
            summary_cards,
            categories,
            transactions,
            goals,
            insights,
            reports,
        );
        current
    }
}
