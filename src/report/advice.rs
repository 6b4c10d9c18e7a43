//! Rule-based savings advice derived from the aggregation outputs.
//!
//! A single pass over the numbers produces an ordered list of tips, a set of
//! suggested savings-goal templates scaled to the user's monthly income, and
//! a fixed list of saving challenges. No state is kept between invocations.

use crate::report::aggregation::ExpenseDelta;

/// How a tip should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TipSeverity {
    Success,
    Info,
    Warning,
}

/// A single piece of budgeting advice.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Tip {
    pub severity: TipSeverity,
    pub title: String,
    pub description: String,
}

/// The savings rate below which the low-savings warning fires.
const LOW_SAVINGS_RATE_THRESHOLD: f64 = 20.0;

/// Evaluate the advice rules in order and return the resulting tips.
///
/// `sorted_categories` must be the expense totals per category sorted
/// highest-first (see
/// [sorted_category_spending](crate::report::aggregation::sorted_category_spending)).
///
/// The rules:
/// 1. A low savings rate produces a warning, otherwise a success tip echoing
///    the rate.
/// 2. The highest-spending category, when there is one, gets an informational
///    callout.
/// 3. Spending more this month than last month produces a trend warning, but
///    only when last month had any expenses at all. A zero baseline would
///    flag every first month of data as a spending increase.
pub(crate) fn tips(
    savings_rate: f64,
    sorted_categories: &[(String, f64)],
    expense_delta: &ExpenseDelta,
) -> Vec<Tip> {
    let mut tips = Vec::new();

    if savings_rate < LOW_SAVINGS_RATE_THRESHOLD {
        tips.push(Tip {
            severity: TipSeverity::Warning,
            title: "Increase Your Savings".to_owned(),
            description: "Aim to save at least 20% of your income. Try the 50/30/20 rule: \
                50% for needs, 30% for wants, and 20% for savings."
                .to_owned(),
        });
    } else {
        tips.push(Tip {
            severity: TipSeverity::Success,
            title: "Great Saving Habits!".to_owned(),
            description: format!(
                "You're saving {savings_rate:.1}% of your income. Keep up the good work!"
            ),
        });
    }

    if let Some((highest_category, _)) = sorted_categories.first() {
        tips.push(Tip {
            severity: TipSeverity::Info,
            title: format!("High {highest_category} Spending"),
            description: format!(
                "Your highest expense category is {highest_category}. \
                Consider setting a budget limit for this category."
            ),
        });
    }

    if expense_delta.current_month > expense_delta.previous_month
        && expense_delta.previous_month > 0.0
    {
        tips.push(Tip {
            severity: TipSeverity::Warning,
            title: "Spending Trend Alert".to_owned(),
            description: "Your spending this month is higher than last month. \
                Review your expenses to stay on track."
                .to_owned(),
        });
    }

    tips
}

/// A suggested savings goal scaled from the monthly income estimate.
///
/// These are display suggestions only; they are distinct from the persisted
/// savings goals a user creates themselves.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GoalTemplate {
    pub title: &'static str,
    pub target: f64,
    pub description: &'static str,
    pub priority: &'static str,
}

/// The three suggested savings goals: an emergency fund of six months of
/// income, a retirement fund of twelve, and a short-term fund of three.
pub(crate) fn goal_templates(monthly_income: f64) -> [GoalTemplate; 3] {
    [
        GoalTemplate {
            title: "Emergency Fund",
            target: monthly_income * 6.0,
            description: "Aim to save 6 months of expenses for emergencies.",
            priority: "High",
        },
        GoalTemplate {
            title: "Retirement Fund",
            target: monthly_income * 12.0,
            description: "Start building your retirement savings early.",
            priority: "Medium",
        },
        GoalTemplate {
            title: "Short-term Savings",
            target: monthly_income * 3.0,
            description: "Save for short-term goals like vacations or purchases.",
            priority: "Low",
        },
    ]
}

/// A money-saving challenge. Fixed content, no computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Challenge {
    pub title: &'static str,
    pub description: &'static str,
    pub difficulty: &'static str,
}

/// The fixed list of money-saving challenges shown on the insights page.
pub(crate) fn challenges() -> [Challenge; 3] {
    [
        Challenge {
            title: "52-Week Challenge",
            description: "Save $1 in week 1, $2 in week 2, and so on. \
                You'll have $1,378 by the end of the year!",
            difficulty: "Easy",
        },
        Challenge {
            title: "No-Spend Days",
            description: "Challenge yourself to have 2 no-spend days each week.",
            difficulty: "Medium",
        },
        Challenge {
            title: "1% Improvement",
            description: "Try to reduce each category of spending by 1% each month.",
            difficulty: "Hard",
        },
    ]
}

#[cfg(test)]
mod tests {
    use crate::report::aggregation::ExpenseDelta;

    use super::{TipSeverity, challenges, goal_templates, tips};

    const NO_DELTA: ExpenseDelta = ExpenseDelta {
        current_month: 0.0,
        previous_month: 0.0,
    };

    #[test]
    fn low_savings_rate_emits_exactly_one_warning() {
        let result = tips(15.0, &[], &NO_DELTA);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].severity, TipSeverity::Warning);
        assert_eq!(result[0].title, "Increase Your Savings");
    }

    #[test]
    fn good_savings_rate_emits_exactly_one_success() {
        let result = tips(25.0, &[], &NO_DELTA);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].severity, TipSeverity::Success);
        assert!(
            result[0].description.contains("25.0%"),
            "success tip should echo the rate, got {:?}",
            result[0].description
        );
    }

    #[test]
    fn boundary_savings_rate_counts_as_good() {
        let result = tips(20.0, &[], &NO_DELTA);

        assert_eq!(result[0].severity, TipSeverity::Success);
    }

    #[test]
    fn highest_category_gets_an_info_tip() {
        let categories = vec![
            ("Groceries".to_owned(), 400.0),
            ("Transport".to_owned(), 100.0),
        ];

        let result = tips(25.0, &categories, &NO_DELTA);

        assert_eq!(result.len(), 2);
        assert_eq!(result[1].severity, TipSeverity::Info);
        assert_eq!(result[1].title, "High Groceries Spending");
    }

    #[test]
    fn no_category_tip_without_expenses() {
        let result = tips(25.0, &[], &NO_DELTA);

        assert_eq!(result.len(), 1);
    }

    #[test]
    fn trend_tip_requires_positive_previous_month() {
        // A zero previous-month baseline never triggers the trend warning.
        let delta = ExpenseDelta {
            current_month: 500.0,
            previous_month: 0.0,
        };

        let result = tips(25.0, &[], &delta);

        assert!(
            !result
                .iter()
                .any(|tip| tip.title == "Spending Trend Alert"),
            "zero baseline should not emit a trend tip"
        );
    }

    #[test]
    fn trend_tip_fires_on_increased_spending() {
        let delta = ExpenseDelta {
            current_month: 500.0,
            previous_month: 300.0,
        };

        let result = tips(25.0, &[], &delta);

        let trend_tip = result
            .iter()
            .find(|tip| tip.title == "Spending Trend Alert")
            .expect("expected a trend tip");
        assert_eq!(trend_tip.severity, TipSeverity::Warning);
    }

    #[test]
    fn trend_tip_not_emitted_on_decreased_spending() {
        let delta = ExpenseDelta {
            current_month: 200.0,
            previous_month: 300.0,
        };

        let result = tips(25.0, &[], &delta);

        assert!(
            !result
                .iter()
                .any(|tip| tip.title == "Spending Trend Alert")
        );
    }

    #[test]
    fn goal_templates_scale_with_monthly_income() {
        let templates = goal_templates(1000.0);

        assert_eq!(templates[0].title, "Emergency Fund");
        assert_eq!(templates[0].target, 6000.0);
        assert_eq!(templates[0].priority, "High");
        assert_eq!(templates[1].title, "Retirement Fund");
        assert_eq!(templates[1].target, 12000.0);
        assert_eq!(templates[1].priority, "Medium");
        assert_eq!(templates[2].title, "Short-term Savings");
        assert_eq!(templates[2].target, 3000.0);
        assert_eq!(templates[2].priority, "Low");
    }

    #[test]
    fn challenges_are_fixed() {
        let result = challenges();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].title, "52-Week Challenge");
        assert_eq!(result[1].difficulty, "Medium");
        assert_eq!(result[2].title, "1% Improvement");
    }
}
