//! Alert partials for displaying success and error messages to users.
//!
//! Alerts are rendered into the `#alert-container` element via HTMX
//! response targeting, so endpoints can surface errors without a full page
//! reload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone)]
pub enum AlertType {
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_markup(self) -> Markup {
        let (container_style, icon) = match self.alert_type {
            AlertType::Success => (
                "flex items-start gap-3 p-4 mb-4 text-sm text-green-800 rounded-lg \
                bg-green-50 dark:bg-gray-800 dark:text-green-400 shadow-lg",
                "✓",
            ),
            AlertType::Error => (
                "flex items-start gap-3 p-4 mb-4 text-sm text-red-800 rounded-lg \
                bg-red-50 dark:bg-gray-800 dark:text-red-400 shadow-lg",
                "!",
            ),
        };

        html!(
            div
                role="alert"
                class=(container_style)
                onclick="this.parentElement.classList.add('hidden')"
            {
                span class="font-bold" { (icon) }

                div
                {
                    p class="font-semibold" { (self.message) }

                    @if !self.details.is_empty() {
                        p { (self.details) }
                    }
                }
            }
        )
    }

    /// Render the alert with `status_code`, unhiding the alert container.
    pub fn into_response(self, status_code: StatusCode) -> Response {
        let markup = html!(
            div
                id="alert-container"
                hx-swap-oob="outerHTML"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                (self.into_markup())
            }
        );

        (status_code, markup).into_response()
    }
}
