//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for signup, email verification, login, and logout.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use interntrack_core::domain::{NewUser, Role};
use interntrack_core::ports::{DatabaseService, PortError, PortResult};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::BootstrapAdmin;
use crate::error::http_error;
use crate::web::middleware::{session_token, SESSION_COOKIE};
use crate::web::protocol::{
    AuthResponse, LoginRequest, MessageResponse, SignupRequest, SignupResponse,
    VerifyEmailRequest,
};
use crate::web::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 8;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid")
});

//=========================================================================================
// Helpers
//=========================================================================================

/// Hashes a password with Argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// A signup that passed validation.
#[derive(Debug, PartialEq)]
struct ValidSignup {
    email: String,
    full_name: String,
    role: Role,
}

fn validate_signup(req: &SignupRequest) -> PortResult<ValidSignup> {
    let email = normalize_email(&req.email);
    if !EMAIL_RE.is_match(&email) {
        return Err(PortError::Validation("Invalid email address".to_string()));
    }
    let full_name = req.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(PortError::Validation("Full name is required".to_string()));
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PortError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    // Admins are only ever created by bootstrap.
    let role = match req.role.trim().to_uppercase().parse::<Role>() {
        Ok(role @ (Role::Intern | Role::Supervisor)) => role,
        _ => {
            return Err(PortError::Validation(
                "role must be INTERN or SUPERVISOR".to_string(),
            ))
        }
    };
    Ok(ValidSignup {
        email,
        full_name,
        role,
    })
}

fn session_cookie(session_id: &str, max_age: Duration) -> String {
    format!(
        "{}={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        session_id,
        max_age.num_seconds()
    )
}

/// Creates the configured admin account unless a user with that email already exists.
pub async fn ensure_admin(db: &dyn DatabaseService, admin: &BootstrapAdmin) -> PortResult<()> {
    let email = normalize_email(&admin.email);
    match db.get_user_by_email(&email).await {
        Ok(_) => return Ok(()),
        Err(PortError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }

    let hashed_password =
        hash_password(&admin.password).map_err(|e| PortError::Unexpected(e.to_string()))?;
    let user = db
        .create_user(NewUser {
            email,
            full_name: "Administrator".to_string(),
            role: Role::Admin,
            hashed_password,
            is_verified: true,
        })
        .await?;
    info!("Bootstrap admin {} created", user.email);
    Ok(())
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new, unverified account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created; email verification pending", body = SignupResponse),
        (status = 400, description = "Invalid request or email already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // 1. Validate input
    let signup = validate_signup(&req).map_err(http_error)?;

    // 2. Hash the password
    let hashed_password = hash_password(&req.password).map_err(|e| {
        error!("Failed to hash password: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
    })?;

    // 3. Create user in database
    let user = state
        .db
        .create_user(NewUser {
            email: signup.email,
            full_name: signup.full_name,
            role: signup.role,
            hashed_password,
            is_verified: false,
        })
        .await
        .map_err(http_error)?;

    // 4. Issue the verification token. Delivery is out of band.
    let token = Uuid::new_v4().simple().to_string();
    state
        .db
        .create_verification_token(user.id, &token)
        .await
        .map_err(http_error)?;
    info!("Verification token for {}: {}", user.email, token);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            user_id: user.id,
            email: user.email,
            message: "Account created. Verify your email before logging in.".to_string(),
        }),
    ))
}

/// POST /auth/verify-email - Consume a verification token
#[utoipa::path(
    post,
    path = "/auth/verify-email",
    request_body = VerifyEmailRequest,
    responses(
        (status = 200, description = "Email verified", body = MessageResponse),
        (status = 400, description = "Invalid or already used token")
    )
)]
pub async fn verify_email_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, (StatusCode, String)> {
    let user_id = state
        .db
        .consume_verification_token(req.token.trim())
        .await
        .map_err(http_error)?;
    info!("User {} verified their email", user_id);
    Ok(Json(MessageResponse::new("Email verified. You can now log in.")))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let invalid = || (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string());

    // 1. Get user by email
    let user_creds = match state.db.get_user_by_email(&normalize_email(&req.email)).await {
        Ok(creds) => creds,
        Err(PortError::NotFound(_)) => return Err(invalid()),
        Err(e) => return Err(http_error(e)),
    };

    // 2. Verify password
    let parsed_hash = PasswordHash::new(&user_creds.hashed_password).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication error".to_string())
    })?;

    let valid = Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_ok();

    if !valid {
        warn!("Failed login for {}", user_creds.email);
        return Err(invalid());
    }

    // 3. Unverified accounts cannot log in
    if !user_creds.is_verified {
        return Err((StatusCode::FORBIDDEN, "Email not verified".to_string()));
    }

    // 4. Create auth session in database
    let auth_session_id = Uuid::new_v4().to_string();
    let ttl = Duration::days(state.config.session_ttl_days);
    state
        .db
        .create_auth_session(&auth_session_id, user_creds.user_id, Utc::now() + ttl)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session".to_string())
        })?;

    // 5. Return response with cookie
    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie(&auth_session_id, ttl))],
        Json(response),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let auth_session_id =
        session_token(&headers).ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    state
        .db
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
        })?;

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session_cookie("", Duration::zero()))],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(email: &str, full_name: &str, password: &str, role: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            full_name: full_name.to_string(),
            password: password.to_string(),
            role: role.to_string(),
        }
    }

    #[test]
    fn signup_normalises_email_and_role() {
        let valid = validate_signup(&signup(" Asha@Example.COM ", "Asha", "longenough", "intern"))
            .unwrap();
        assert_eq!(
            valid,
            ValidSignup {
                email: "asha@example.com".to_string(),
                full_name: "Asha".to_string(),
                role: Role::Intern,
            }
        );
    }

    #[test]
    fn signup_rejections() {
        let cases = [
            signup("not-an-email", "A", "longenough", "INTERN"),
            signup("a@b.co", " ", "longenough", "INTERN"),
            signup("a@b.co", "A", "short", "INTERN"),
            signup("a@b.co", "A", "longenough", "ADMIN"),
            signup("a@b.co", "A", "longenough", "MANAGER"),
        ];
        for req in cases {
            assert!(matches!(validate_signup(&req), Err(PortError::Validation(_))));
        }
    }

    #[test]
    fn hashed_password_verifies() {
        let hash = hash_password("correct horse").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(Argon2::default()
            .verify_password(b"correct horse", &parsed)
            .is_ok());
        assert!(Argon2::default().verify_password(b"wrong", &parsed).is_err());
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let cookie = session_cookie("", Duration::zero());
        assert!(cookie.starts_with("session=;"));
        assert!(cookie.ends_with("Max-Age=0"));
        assert!(session_cookie("abc", Duration::days(7)).contains("Max-Age=604800"));
    }
}
