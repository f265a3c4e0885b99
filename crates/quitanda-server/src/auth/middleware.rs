use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::SignedCookieJar;

use crate::error::AppError;
use crate::routes::AppState;

/// Gate for the item routes. Anonymous requests are redirected to the login
/// page without touching the session store; authenticated requests carry
/// their [`SessionHandle`](crate::auth::session::SessionHandle) in the
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(session) = state.sessions.authenticate(&jar)? else {
        return Ok(Redirect::to("/login").into_response());
    };

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
