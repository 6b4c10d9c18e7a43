//! The shared form fields for creating and editing savings goals.

use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    savings_goal::GoalFields,
};

/// The form data for creating or editing a savings goal.
#[derive(Debug, Deserialize)]
pub struct GoalForm {
    /// What the user is saving for.
    pub name: String,
    /// The amount the user wants to reach.
    pub target_amount: f64,
    /// Optional detail about the goal.
    #[serde(default)]
    pub description: Option<String>,
    /// The date the user wants to reach the goal by, if any.
    #[serde(default)]
    pub deadline: Option<Date>,
    /// How much has been put aside so far. Absent on the create form.
    #[serde(default)]
    pub progress: Option<f64>,
}

impl GoalForm {
    /// Convert the raw form data into validated-on-write goal fields.
    pub fn into_fields(self) -> GoalFields {
        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|description| !description.is_empty())
            .map(|description| description.to_owned());

        GoalFields {
            name: self.name,
            target_amount: self.target_amount,
            description,
            deadline: self.deadline,
            progress: self.progress.unwrap_or(0.0),
        }
    }
}

/// The values the goal form fields start out with.
pub(super) struct GoalFormDefaults<'a> {
    pub name: &'a str,
    pub target_amount: Option<f64>,
    pub description: Option<&'a str>,
    pub deadline: Option<Date>,
    /// `None` hides the progress input (used on the create form).
    pub progress: Option<f64>,
}

impl Default for GoalFormDefaults<'_> {
    fn default() -> Self {
        Self {
            name: "",
            target_amount: None,
            description: None,
            deadline: None,
            progress: None,
        }
    }
}

pub(super) fn goal_form_fields(defaults: &GoalFormDefaults<'_>) -> Markup {
    let target_str = defaults
        .target_amount
        .map(|target_amount| format!("{target_amount:.2}"));

    html! {
        div
        {
            label for="name" class=(FORM_LABEL_STYLE) { "Name" }

            input
                name="name"
                id="name"
                type="text"
                placeholder="e.g. Emergency Fund"
                required
                autofocus
                value=(defaults.name)
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="target_amount" class=(FORM_LABEL_STYLE) { "Target amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="target_amount"
                    id="target_amount"
                    type="number"
                    step="0.01"
                    min="0.01"
                    placeholder="0.01"
                    required
                    value=[target_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                name="description"
                id="description"
                type="text"
                placeholder="Optional description"
                value=[defaults.description]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="deadline" class=(FORM_LABEL_STYLE) { "Deadline" }

            input
                name="deadline"
                id="deadline"
                type="date"
                value=[defaults.deadline.map(|deadline| deadline.to_string())]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        @if let Some(progress) = defaults.progress {
            div
            {
                label for="progress" class=(FORM_LABEL_STYLE) { "Saved so far" }

                div class="input-wrapper w-full"
                {
                    input
                        name="progress"
                        id="progress"
                        type="number"
                        step="0.01"
                        min="0"
                        value=(format!("{progress:.2}"))
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }
        }
    }
}
