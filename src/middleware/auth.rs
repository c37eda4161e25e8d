use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{verify_password, AuthError, Credentials};
use crate::database::service::find_account_by_username;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated account, available to handlers as `Extension<AuthAccount>`
#[derive(Clone, Debug)]
pub struct AuthAccount {
    pub id: i64,
    pub username: String,
}

/// HTTP Basic authentication gate. Runs before any handler touches data;
/// only active accounts with a matching password get through.
pub async fn basic_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(account) => {
            tracing::debug!("Authenticated '{}' for {}", account.username, request.uri());
            request.extensions_mut().insert(account);
            next.run(request).await
        }
        Err(err) => challenge(err, &state.config.security.auth_realm),
    }
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthAccount, ApiError> {
    let header_value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::MalformedBasicHeader)?;

    let credentials = Credentials::from_authorization(header_value)?;

    let Some(account) = find_account_by_username(&state.pool, &credentials.username).await? else {
        tracing::warn!("Authentication failed: unknown account '{}'", credentials.username);
        return Err(AuthError::InvalidCredentials.into());
    };

    // argon2 is CPU bound; keep it off the async workers
    let hash = account.password_hash.clone();
    let password = credentials.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            tracing::error!("Password verification task failed: {}", e);
            ApiError::internal_server_error("Failed to verify credentials")
        })?;

    if !matches {
        tracing::warn!("Authentication failed: bad password for '{}'", account.username);
        return Err(AuthError::InvalidCredentials.into());
    }
    if !account.is_active {
        tracing::warn!("Authentication failed: account '{}' is inactive", account.username);
        return Err(AuthError::InactiveAccount.into());
    }

    Ok(AuthAccount {
        id: account.id,
        username: account.username,
    })
}

/// Error response; 401s carry a `WWW-Authenticate` challenge
fn challenge(err: ApiError, realm: &str) -> Response {
    let is_unauthorized = matches!(err, ApiError::Unauthorized(_));
    let mut response = err.into_response();

    if is_unauthorized {
        let value = format!("Basic realm=\"{}\"", realm.replace('"', ""));
        if let Ok(value) = HeaderValue::from_str(&value) {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
    }
    response
}
