use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
    Extension, Form,
};
use serde::Deserialize;

use crate::auth::session::{SessionHandle, Severity};
use crate::error::AppResult;
use crate::pages;
use crate::routes::AppState;
use crate::store::items as item_store;

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default)]
    pub preco: String,
}

pub async fn add_form(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> AppResult<Html<String>> {
    let flash = state.sessions.drain_flash(&session)?;
    Ok(pages::add_item(&flash, session.username()))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<ItemForm>,
) -> AppResult<impl IntoResponse> {
    let mut session = session;
    let Some(user_id) = session.user_id() else {
        return Ok(Redirect::to("/login"));
    };

    let Some(price) = parse_price(&form.preco) else {
        state
            .sessions
            .push_flash(&mut session, Severity::Warning, "Preço inválido.")?;
        return Ok(Redirect::to("/items"));
    };

    match item_store::create(&state.db, user_id, &form.nome, &form.descricao, price) {
        Ok(_) => {
            state.sessions.push_flash(
                &mut session,
                Severity::Success,
                "✅ Item adicionado com sucesso!",
            )?;
            Ok(Redirect::to("/list_items"))
        }
        Err(err) => {
            state.sessions.push_flash(
                &mut session,
                Severity::Error,
                format!("Erro ao adicionar: {err}"),
            )?;
            Ok(Redirect::to("/items"))
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> AppResult<Html<String>> {
    let flash = state.sessions.drain_flash(&session)?;
    let items = item_store::list_newest_first(&state.db)?;
    Ok(pages::list_items(&flash, session.username(), &items))
}

/// Accept a comma as decimal separator, then require a finite, non-negative
/// number.
fn parse_price(raw: &str) -> Option<f64> {
    let normalized = raw.trim().replace(',', ".");
    let price: f64 = normalized.parse().ok()?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

#[cfg(test)]
mod tests {
    use super::parse_price;

    #[test]
    fn comma_is_a_decimal_separator() {
        assert_eq!(parse_price("12,50"), Some(12.50));
        assert_eq!(parse_price(" 7,0 "), Some(7.0));
    }

    #[test]
    fn plain_decimals_still_parse() {
        assert_eq!(parse_price("12.50"), Some(12.50));
        assert_eq!(parse_price("0"), Some(0.0));
    }

    #[test]
    fn junk_negative_and_non_finite_are_rejected() {
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-1"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("NaN"), None);
    }
}
