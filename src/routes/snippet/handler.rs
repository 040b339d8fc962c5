use axum::{
    extract::{Form, Path, State},
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

use super::model::SnippetCreateForm;

pub async fn home(State(state): State<AppState>, session: Session) -> Result<Response, AppError> {
    let snippets = state.snippets.latest().await?;

    let data = template_data::<()>(&session).await?.with_snippets(snippets);
    render(&state, StatusCode::OK, "home.tmpl.html", &data)
}

pub async fn view(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = match id.parse::<i32>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::not_found()),
    };

    let snippet = match state.snippets.get(id).await {
        Ok(snippet) => snippet,
        Err(ModelError::NoRecord) => return Err(AppError::not_found()),
        Err(e) => return Err(e.into()),
    };

    let data = template_data::<()>(&session)
        .await?
        .with_snippet(snippet.with_line_breaks());
    render(&state, StatusCode::OK, "view.tmpl.html", &data)
}

pub async fn create(
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let data = template_data(&session)
        .await?
        .with_form(SnippetCreateForm::new());
    render(&state, StatusCode::OK, "create.tmpl.html", &data)
}

pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    Form(pairs): Form<Vec<(String, String)>>,
) -> Result<Response, AppError> {
    let mut form: SnippetCreateForm = forms::decode(&pairs)?;

    if !form.validate() {
        let data = template_data(&session).await?.with_form(form);
        return render(
            &state,
            StatusCode::UNPROCESSABLE_ENTITY,
            "create.tmpl.html",
            &data,
        );
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;

    session::put_flash(&session, "Snippet successfully created!").await?;

    Ok(Redirect::to(&format!("/snippet/view/{}", id)).into_response())
}
