use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::{
    AppState,
    error::AppError,
    forms,
    models::ModelError,
    routes::{render, template_data},
    session,
};

use super::model::{UserLoginForm, UserSignupForm};

pub async fn signup(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let data = template_data(&session)
        .await?
        .with_form(UserSignupForm::default());
    render(&state, StatusCode::OK, "signup.tmpl.html", &data)
}

pub async fn signup_post(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut form: UserSignupForm = forms::decode(&pairs)?;

    if form.validate() {
        match state
            .users
            .insert(&form.name, &form.email, &form.password)
            .await
        {
            Ok(()) => {
                session::put_flash(&session, "Your signup was successful. Please log in.")
                    .await?;
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(ModelError::DuplicateEmail) => {
                form.validator
                    .add_field_error("email", "Email address is already in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = template_data(&session).await?.with_form(form);
    render(
        &state,
        StatusCode::UNPROCESSABLE_ENTITY,
        "signup.tmpl.html",
        &data,
    )
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let data = template_data(&session)
        .await?
        .with_form(UserLoginForm::default());
    render(&state, StatusCode::OK, "login.tmpl.html", &data)
}

pub async fn login_post(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut form: UserLoginForm = forms::decode(&pairs)?;

    if form.validate() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(user_id) => {
                session::log_in(&session, user_id).await?;
                tracing::info!("User {} logged in", user_id);
                return Ok(Redirect::to("/snippet/create").into_response());
            }
            Err(ModelError::InvalidCredentials) => {
                form.validator
                    .add_non_field_error("Email or password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = template_data(&session).await?.with_form(form);
    render(
        &state,
        StatusCode::UNPROCESSABLE_ENTITY,
        "login.tmpl.html",
        &data,
    )
}

pub async fn logout_post(session: Session) -> Result<Response, AppError> {
    session::log_out(&session).await?;
    session::put_flash(&session, "You've been logged out successfully!").await?;

    Ok(Redirect::to("/").into_response())
}
