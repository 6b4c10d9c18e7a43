//! Trackify is a web app for tracking personal income and expenses, setting
//! savings goals, and getting rule-based budgeting tips.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod insights;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod profile;
mod report;
mod routing;
mod savings_goal;
mod timezone;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, ValidatedPassword};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use user::{User, UserId};

use crate::{
    alert::AlertTemplate,
    internal_server_error::{InternalServerErrorPageTemplate, render_internal_server_error},
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no auth cookie in the cookie jar")]
    CookieMissing,

    /// There was an error parsing a date or creating a new expiry date time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not parse or format date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The user's email already exists in the database. The client should try
    /// again with a different email address.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The category ID used to create a transaction did not match a valid category.
    #[error("the category ID does not refer to a valid category")]
    InvalidCategory(Option<database_id::CategoryId>),

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// An empty string was used as a savings goal name.
    #[error("Goal name cannot be empty")]
    EmptyGoalName,

    /// A savings goal was given a target amount of zero or less.
    #[error("Goal target must be greater than zero")]
    InvalidGoalTarget,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a transaction that does not exist for the current user.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a savings goal that does not exist for the current user.
    #[error("tried to update a savings goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a savings goal that does not exist for the current user.
    #[error("tried to delete a savings goal that is not in the database")]
    DeleteMissingGoal,

    /// The multipart form could not be parsed as an image upload.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The uploaded file is not a supported image format.
    #[error("File is not a PNG, JPEG or WebP image")]
    NotAnImage,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => {
                render_internal_server_error(InternalServerErrorPageTemplate {
                    description: "Invalid Timezone Settings",
                    fix: &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                })
            }
            Error::DatabaseLockError => render_internal_server_error(Default::default()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => AlertTemplate::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
            Error::FutureDate(date) => AlertTemplate::error(
                "Invalid transaction date",
                &format!("{date} is a date in the future, which is not allowed."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::InvalidCategory(category_id) => AlertTemplate::error(
                "Invalid category ID",
                &format!("Could not find a category with the ID {category_id:?}"),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::EmptyCategoryName => {
                AlertTemplate::error("Invalid category name", "The category name cannot be empty.")
                    .into_response(StatusCode::BAD_REQUEST)
            }
            Error::EmptyGoalName => {
                AlertTemplate::error("Invalid goal name", "The goal name cannot be empty.")
                    .into_response(StatusCode::BAD_REQUEST)
            }
            Error::InvalidGoalTarget => AlertTemplate::error(
                "Invalid goal target",
                "The goal target must be an amount greater than zero.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::DeleteMissingTransaction => AlertTemplate::error(
                "Could not delete transaction",
                "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::UpdateMissingGoal => AlertTemplate::error(
                "Could not update savings goal",
                "The savings goal could not be found.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::DeleteMissingGoal => AlertTemplate::error(
                "Could not delete savings goal",
                "The savings goal could not be found. \
                    Try refreshing the page to see if the goal has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::DuplicateEmail => AlertTemplate::error(
                "Email already registered",
                "That email address already has an account. Log in instead, \
                    or register with a different email address.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::NotAnImage => AlertTemplate::error(
                "Unsupported image",
                "The profile picture must be a PNG, JPEG or WebP image.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::MultipartError(details) => {
                AlertTemplate::error("Could not read upload", &details)
                    .into_response(StatusCode::BAD_REQUEST)
            }
            _ => AlertTemplate::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
