use axum::{
    extract::State,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;

use crate::auth::flow::{self, LoginOutcome, RegisterOutcome};
use crate::auth::session::Severity;
use crate::error::AppResult;
use crate::pages;
use crate::routes::AppState;

/// Missing fields deserialize to empty strings so the flow can answer with a
/// flash message instead of a 422.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn home(State(state): State<AppState>, jar: SignedCookieJar) -> AppResult<Redirect> {
    if state.sessions.authenticate(&jar)?.is_some() {
        Ok(Redirect::to("/list_items"))
    } else {
        Ok(Redirect::to("/login"))
    }
}

pub async fn register_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.open(&jar)?;
    let flash = state.sessions.drain_flash(&session)?;
    let page = pages::register(&flash, session.username());
    Ok((state.sessions.apply(&session, jar), page))
}

pub async fn register(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> AppResult<impl IntoResponse> {
    let mut session = state.sessions.open(&jar)?;

    let (severity, message, target) = match flow::register(&state.db, &form.username, &form.password)? {
        RegisterOutcome::Registered => (
            Severity::Success,
            "✅ Cadastro realizado com sucesso! Faça login.".to_string(),
            "/login",
        ),
        RegisterOutcome::MissingFields => (
            Severity::Warning,
            "Preencha todos os campos.".to_string(),
            "/register",
        ),
        RegisterOutcome::UsernameTaken => (
            Severity::Error,
            "⚠️ Usuário já existe.".to_string(),
            "/register",
        ),
        RegisterOutcome::Failed(err) => {
            (Severity::Error, format!("Erro ao cadastrar: {err}"), "/register")
        }
    };

    state.sessions.push_flash(&mut session, severity, message)?;
    Ok((state.sessions.apply(&session, jar), Redirect::to(target)))
}

pub async fn login_form(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<impl IntoResponse> {
    let session = state.sessions.open(&jar)?;
    let flash = state.sessions.drain_flash(&session)?;
    let page = pages::login(&flash, session.username());
    Ok((state.sessions.apply(&session, jar), page))
}

pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<CredentialsForm>,
) -> AppResult<impl IntoResponse> {
    let mut session = state.sessions.open(&jar)?;

    let outcome = flow::login(
        &state.db,
        &state.sessions,
        &mut session,
        &form.username,
        &form.password,
    )?;
    let (severity, message, target) = match outcome {
        LoginOutcome::Authenticated { username } => (
            Severity::Success,
            format!("Bem-vindo, {username}!"),
            "/list_items",
        ),
        LoginOutcome::MissingFields => (
            Severity::Warning,
            "Preencha todos os campos.".to_string(),
            "/login",
        ),
        LoginOutcome::InvalidCredentials => (
            Severity::Error,
            "Usuário ou senha inválidos.".to_string(),
            "/login",
        ),
    };

    state.sessions.push_flash(&mut session, severity, message)?;
    Ok((state.sessions.apply(&session, jar), Redirect::to(target)))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> AppResult<impl IntoResponse> {
    let jar = state.sessions.destroy(jar)?;
    Ok((jar, Redirect::to("/login")))
}
