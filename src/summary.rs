//! Read-only projections of the state for the budget-setup screen.

use serde::Serialize;

use crate::model::ApplicationState;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSummary {
    pub household_name: String,
    pub budget_name: String,
    pub budget_style: String,
    pub budget_month: String,
    pub income_frequency: String,
    pub income_amount: f64,
    pub monthly_income: f64,
    pub profile: Vec<String>,
    pub tips: Vec<String>,
}

/// Advisory tips in a fixed order: goal, budget style, income, home status,
/// kids, work status. A blank or unrecognised field contributes nothing.
pub fn build_tips(state: &ApplicationState) -> Vec<String> {
    let rules: [fn(&ApplicationState) -> Option<String>; 6] = [
        goal_tip,
        style_tip,
        income_tip,
        home_tip,
        kids_tip,
        work_tip,
    ];
    rules.iter().filter_map(|rule| rule(state)).collect()
}

pub fn planner_summary(state: &ApplicationState) -> PlannerSummary {
    PlannerSummary {
        household_name: state.household_name.clone(),
        budget_name: state.budget_name.clone(),
        budget_style: state.budget_style.clone(),
        budget_month: state.budget_month.clone(),
        income_frequency: state.income_frequency.clone(),
        income_amount: state.income_amount,
        monthly_income: monthly_income(&state.income_frequency, state.income_amount),
        profile: profile_lines(state),
        tips: build_tips(state),
    }
}

/// Converts a paycheck amount into an approximate monthly figure.
/// Unrecognised frequencies are taken as already monthly.
pub fn monthly_income(frequency: &str, amount: f64) -> f64 {
    let (periods, months) = match key(frequency).as_str() {
        "weekly" => (52.0, 12.0),
        "biweekly" => (26.0, 12.0),
        "semimonthly" | "twicemonthly" => (2.0, 1.0),
        "quarterly" => (1.0, 3.0),
        "annually" | "annual" | "yearly" => (1.0, 12.0),
        _ => (1.0, 1.0),
    };
    amount * periods / months
}

fn profile_lines(state: &ApplicationState) -> Vec<String> {
    [
        ("Home", &state.home_status),
        ("Relationship", &state.relationship_status),
        ("Kids", &state.has_kids),
        ("Work", &state.work_status),
        ("Age", &state.age_range),
        ("Goal", &state.primary_goal),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{label}: {value}"))
    .collect()
}

// Lowercase with spaces, dashes and slashes stripped: "Bi-weekly" -> "biweekly".
fn key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '/'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn goal_tip(state: &ApplicationState) -> Option<String> {
    let tip = match key(&state.primary_goal).as_str() {
        "" => return None,
        "savemoremoney" => "Goal tip: set a savings category and pay it first each month",
        "reducemydebt" => "Goal tip: list every debt and put extra payments on the smallest balance",
        "createmyfirstbudget" => "Goal tip: start with a few broad categories and refine them later",
        "stayontrack" => "Goal tip: review your categories once a week",
        _ => "Goal tip: add a goal with a target amount so progress is visible",
    };
    Some(tip.to_string())
}

fn style_tip(state: &ApplicationState) -> Option<String> {
    let tip = match key(&state.budget_style).as_str() {
        "zerobased" => "Budget style tip: give every unit of income a job until nothing is left to assign",
        "envelope" => "Budget style tip: fund each envelope on payday and stop spending when it is empty",
        "503020" => "Budget style tip: split income into 50% needs, 30% wants and 20% savings",
        "custom" => "Budget style tip: start from last month's spending and adjust targets gradually",
        _ => return None,
    };
    Some(tip.to_string())
}

fn income_tip(state: &ApplicationState) -> Option<String> {
    if state.income_frequency.is_empty() || state.income_amount <= 0.0 {
        return None;
    }
    let monthly = monthly_income(&state.income_frequency, state.income_amount);
    Some(format!(
        "Income tip: plan around roughly {monthly:.2} per month from {} pay",
        state.income_frequency.to_lowercase()
    ))
}

fn home_tip(state: &ApplicationState) -> Option<String> {
    let tip = match key(&state.home_status).as_str() {
        "renting" => "Housing tip: add Rent and Utilities categories",
        "homeowner" => "Housing tip: add Mortgage, Property Tax and Home Maintenance categories",
        "livingwithfamily" => "Housing tip: add a Household Contribution category",
        _ => return None,
    };
    Some(tip.to_string())
}

fn kids_tip(state: &ApplicationState) -> Option<String> {
    if key(&state.has_kids) != "yes" {
        return None;
    }
    Some("Family tip: add Childcare, School and Kids Activities categories".to_string())
}

fn work_tip(state: &ApplicationState) -> Option<String> {
    let tip = match key(&state.work_status).as_str() {
        "fulltime" | "parttime" => "Work tip: add a Commuting category",
        "selfemployed" => "Work tip: set aside a Taxes category for irregular income",
        "student" => "Work tip: add Tuition and Books categories",
        "retired" => "Work tip: add a Healthcare category and track fixed income carefully",
        "unemployed" => "Work tip: build an Emergency Fund category before anything else",
        _ => return None,
    };
    Some(tip.to_string())
}
