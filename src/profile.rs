//! The profile page for viewing and editing the user's details, including
//! the profile picture upload.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use axum::{
    Extension,
    extract::{FromRef, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::AlertTemplate,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, dollar_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
    user::{ProfileUpdate, User, UserId, get_user_by_id, set_profile_picture, update_profile},
};

/// The state needed to display and update the profile page.
#[derive(Debug, Clone)]
pub struct ProfileState {
    /// The database connection for reading and updating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ProfileState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the user's profile with the edit form.
pub async fn get_profile_page(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user = get_user_by_id(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get user: {error}"))?;

    let nav_bar = NavBar::new(endpoints::PROFILE_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto max-w-md text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "Profile" }

            (picture_section(&user))
            (profile_form(&user))
        }
    );

    Ok(base("Profile", &[dollar_input_styles()], &content).into_response())
}

fn picture_section(user: &User) -> Markup {
    html!(
        div class="flex flex-col items-center mb-6 w-full"
        {
            @if let Some(picture) = &user.picture {
                img
                    src=(format!("{}/{picture}", endpoints::UPLOADS))
                    alt="Profile picture"
                    class="w-24 h-24 rounded-full object-cover mb-3";
            } @else {
                div
                    class="w-24 h-24 rounded-full bg-gray-200 dark:bg-gray-700 flex
                        items-center justify-center text-3xl font-bold mb-3"
                {
                    (user.name.chars().next().unwrap_or('?'))
                }
            }

            form
                hx-post=(endpoints::PROFILE_PICTURE_API)
                hx-encoding="multipart/form-data"
                hx-target-error="#alert-container"
                class="flex flex-col items-center gap-2"
            {
                input
                    type="file"
                    name="picture"
                    id="picture"
                    accept="image/png,image/jpeg,image/webp"
                    required
                    class="text-sm";

                button
                    type="submit"
                    class="text-sm text-blue-600 hover:text-blue-500 dark:text-blue-500 underline"
                {
                    "Upload picture"
                }
            }
        }
    )
}

fn profile_form(user: &User) -> Markup {
    html!(
        form
            hx-post=(endpoints::PROFILE_API)
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="space-y-4 w-full"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                input
                    name="name"
                    id="name"
                    type="text"
                    value=(user.name)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="email" class=(FORM_LABEL_STYLE) { "Email" }

                input
                    name="email"
                    id="email"
                    type="email"
                    required
                    value=(user.email)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="monthly_income" class=(FORM_LABEL_STYLE) { "Monthly income" }

                div class="input-wrapper w-full"
                {
                    input
                        name="monthly_income"
                        id="monthly_income"
                        type="number"
                        step="0.01"
                        min="0"
                        value=(format!("{:.2}", user.monthly_income))
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="target_savings" class=(FORM_LABEL_STYLE) { "Target savings per month" }

                div class="input-wrapper w-full"
                {
                    input
                        name="target_savings"
                        id="target_savings"
                        type="number"
                        step="0.01"
                        min="0"
                        value=(format!("{:.2}", user.target_savings))
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="bio" class=(FORM_LABEL_STYLE) { "Bio" }

                textarea
                    name="bio"
                    id="bio"
                    rows="3"
                    placeholder="A little about you"
                    class=(FORM_TEXT_INPUT_STYLE)
                {
                    (user.bio)
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Save Profile"
            }
        }
    )
}

/// The form data for updating the profile.
///
/// The numeric fields fall back to zero when left empty, matching the
/// zero-means-unset convention on the user model.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    #[serde(default)]
    pub monthly_income: Option<f64>,
    #[serde(default)]
    pub target_savings: Option<f64>,
    #[serde(default)]
    pub bio: Option<String>,
}

/// A route handler for saving the profile form. Redirects back to the
/// profile page on success.
pub async fn update_profile_endpoint(
    State(state): State<ProfileState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<ProfileForm>,
) -> Response {
    let email = form.email.trim();

    if email.is_empty() || !email.contains('@') {
        return AlertTemplate::error("Invalid email", "Enter a valid email address.")
            .into_response(StatusCode::BAD_REQUEST);
    }

    let profile = ProfileUpdate {
        name: form.name.as_deref().unwrap_or_default().trim().to_owned(),
        email: email.to_owned(),
        monthly_income: form.monthly_income.unwrap_or(0.0),
        target_savings: form.target_savings.unwrap_or(0.0),
        bio: form.bio.as_deref().unwrap_or_default().trim().to_owned(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = update_profile(user_id, &profile, &connection) {
        tracing::error!("could not update profile: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

/// The state needed to store an uploaded profile picture.
#[derive(Debug, Clone)]
pub struct PictureUploadState {
    /// The database connection for updating the user's picture reference.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The directory where uploaded pictures are written.
    pub uploads_dir: PathBuf,
}

impl FromRef<AppState> for PictureUploadState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            uploads_dir: state.uploads_dir.clone(),
        }
    }
}

/// The file extension for a supported image content type.
fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/png" => Some("png"),
        "image/jpeg" => Some("jpg"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Read the picture field out of the multipart form.
async fn read_picture_field(
    mut multipart: Multipart,
) -> Result<(&'static str, axum::body::Bytes), Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        if field.name() != Some("picture") {
            continue;
        }

        let extension = field
            .content_type()
            .and_then(image_extension)
            .ok_or(Error::NotAnImage)?;

        let data = field
            .bytes()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?;

        return Ok((extension, data));
    }

    Err(Error::MultipartError(
        "the form did not contain a picture field".to_owned(),
    ))
}

/// A route handler for uploading a profile picture.
///
/// The image is written to the uploads directory as `user_<id>.<ext>` and the
/// file name is stored on the user row. Redirects back to the profile page on
/// success.
pub async fn upload_profile_picture(
    State(state): State<PictureUploadState>,
    Extension(user_id): Extension<UserId>,
    multipart: Multipart,
) -> Response {
    let (extension, data) = match read_picture_field(multipart).await {
        Ok(picture) => picture,
        Err(error) => {
            tracing::error!("could not read picture upload: {error}");
            return error.into_alert_response();
        }
    };

    let file_name = format!("user_{}.{extension}", user_id.as_i64());

    if let Err(error) = std::fs::create_dir_all(&state.uploads_dir) {
        tracing::error!("could not create uploads directory: {error}");
        return Error::MultipartError(error.to_string()).into_alert_response();
    }

    if let Err(error) = std::fs::write(state.uploads_dir.join(&file_name), &data) {
        tracing::error!("could not write profile picture: {error}");
        return Error::MultipartError(error.to_string()).into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = set_profile_picture(user_id, &file_name, &connection) {
        tracing::error!("could not store picture reference: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::PROFILE_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod profile_page_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        test_utils::{
            assert_hx_endpoint, assert_valid_html, insert_test_user, parse_html_document,
        },
    };

    use super::{ProfileState, get_profile_page};

    #[tokio::test]
    async fn page_prefills_profile_fields() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = insert_test_user(&conn);

        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_profile_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form_selector = scraper::Selector::parse("form[hx-post='/api/profile']").unwrap();
        let form = document
            .select(&form_selector)
            .next()
            .expect("expected profile form");
        assert_hx_endpoint(&form, endpoints::PROFILE_API, "hx-post");

        let email_selector = scraper::Selector::parse("input[name=email]").unwrap();
        let email = form
            .select(&email_selector)
            .next()
            .expect("expected email input");
        assert_eq!(email.value().attr("value"), Some(user.email.as_str()));
    }

    #[tokio::test]
    async fn page_has_picture_upload_form() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let user = insert_test_user(&conn);

        let state = ProfileState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_profile_page(State(state), Extension(user.id))
            .await
            .unwrap();

        let document = parse_html_document(response).await;
        let upload_selector =
            scraper::Selector::parse("form[hx-encoding='multipart/form-data'] input[type=file]")
                .unwrap();
        assert!(
            document.select(&upload_selector).next().is_some(),
            "expected a multipart picture upload form"
        );
    }
}
