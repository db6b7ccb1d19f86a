use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use store::{NewAccount, UserInfo};
use tracing::{debug, info};

use super::{payload, JsonBody, MessageResponse};
use crate::auth::{password, Identity};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{LoginPayload, SignupPayload};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    body: JsonBody<SignupPayload>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let signup = payload(body)?.validate()?;

    if state.accounts.find_by_email(&signup.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered"));
    }

    let password_hash = password::hash(signup.password).await?;
    let account = state
        .accounts
        .create_account(NewAccount {
            full_name: signup.full_name,
            email: signup.email,
            password_hash,
        })
        .await?;
    info!(account = %account.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Signup successful. You can now log in.")),
    ))
}

/// POST /api/auth/login
///
/// An unknown email and a wrong password produce the same 401, after the same
/// amount of Argon2 work.
pub async fn login(
    State(state): State<AppState>,
    body: JsonBody<LoginPayload>,
) -> Result<Json<LoginResponse>, ApiError> {
    let login = payload(body)?.validate()?;

    let Some(account) = state.accounts.find_by_email(&login.email).await? else {
        password::verify_dummy(login.password).await;
        debug!("login for unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    };

    if !password::verify(login.password, account.password_hash.clone()).await? {
        debug!(account = %account.id, "login with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS));
    }

    let token = state.tokens.issue(account.id, &account.email)?;
    info!(account = %account.id, "login");

    Ok(Json(LoginResponse {
        token,
        user: account.to_info(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserInfo>, ApiError> {
    let account = state
        .accounts
        .find_by_id(identity.account_id)
        .await?
        .ok_or(ApiError::NotFound("Account not found"))?;
    Ok(Json(account.to_info()))
}
