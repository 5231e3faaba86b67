//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use interntrack_core::domain::{Actor, Role};
use interntrack_core::policy;
use std::sync::Arc;
use tracing::{debug, error};

use crate::error::http_error;
use crate::web::state::AppState;

/// Name of the cookie carrying the auth session id.
pub const SESSION_COOKIE: &str = "session";

/// Pulls the session id from the `session` cookie, falling back to an
/// `Authorization: Bearer <id>` header for non-browser clients.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|c| {
                c.trim()
                    .strip_prefix(SESSION_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
            })
        })
        .filter(|token| !token.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
    })
}

/// Middleware that validates the auth session and resolves the caller's `Actor`.
///
/// If valid, inserts the `Actor` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract the session id
    let auth_session_id = session_token(req.headers())
        .ok_or(StatusCode::UNAUTHORIZED)?
        .to_string();

    // 2. Validate auth session in database, get user_id
    let user_id = state
        .db
        .validate_auth_session(&auth_session_id)
        .await
        .map_err(|e| {
            debug!("Rejected auth session: {:?}", e);
            StatusCode::UNAUTHORIZED
        })?;

    // 3. Load the user so handlers see the current role
    let user = state.db.get_user(user_id).await.map_err(|e| {
        error!("Session {} points at an unknown user: {:?}", user_id, e);
        StatusCode::UNAUTHORIZED
    })?;

    // 4. Insert the actor into request extensions
    req.extensions_mut().insert(user.actor());

    // 5. Continue to the handler
    Ok(next.run(req).await)
}

/// Rejects callers whose role is not `role`. Must run inside `require_auth`.
async fn require_role(
    role: Role,
    req: Request,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let actor = req
        .extensions()
        .get::<Actor>()
        .copied()
        .ok_or((StatusCode::UNAUTHORIZED, "Not logged in".to_string()))?;
    policy::require_role(&actor, role).map_err(http_error)?;
    Ok(next.run(req).await)
}

pub async fn admin_only(req: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    require_role(Role::Admin, req, next).await
}

pub async fn supervisor_only(req: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    require_role(Role::Supervisor, req, next).await
}

pub async fn intern_only(req: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    require_role(Role::Intern, req, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::HeaderValue, routing::get, Extension, Router};
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt; // For oneshot()
    use uuid::Uuid;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn reads_session_cookie_among_others() {
        let map = headers(&[(header::COOKIE, "theme=dark; session=abc123; lang=en")]);
        assert_eq!(session_token(&map), Some("abc123"));
    }

    #[test]
    fn ignores_cookies_with_similar_names() {
        let map = headers(&[(header::COOKIE, "session_token=nope")]);
        assert_eq!(session_token(&map), None);
    }

    #[test]
    fn falls_back_to_bearer_header() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer xyz")]);
        assert_eq!(session_token(&map), Some("xyz"));

        let map = headers(&[
            (header::COOKIE, "session="),
            (header::AUTHORIZATION, "Bearer xyz"),
        ]);
        assert_eq!(session_token(&map), Some("xyz"));
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let map = headers(&[
            (header::COOKIE, "session=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(session_token(&map), Some("from-cookie"));
    }

    #[test]
    fn missing_or_malformed_credentials() {
        assert_eq!(session_token(&HeaderMap::new()), None);
        let map = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(session_token(&map), None);
    }

    /// A one-route app behind the `gate` role layer, with `actor` (if any) injected the way
    /// `require_auth` would. `reached` flips once the handler runs.
    fn gated_app(gate: Role, actor: Option<Actor>, reached: Arc<AtomicBool>) -> Router {
        let app = Router::new().route(
            "/gate",
            get(move || {
                let reached = reached.clone();
                async move {
                    reached.store(true, Ordering::SeqCst);
                    "ok"
                }
            }),
        );
        let app = match gate {
            Role::Admin => app.route_layer(axum::middleware::from_fn(admin_only)),
            Role::Supervisor => app.route_layer(axum::middleware::from_fn(supervisor_only)),
            Role::Intern => app.route_layer(axum::middleware::from_fn(intern_only)),
        };
        match actor {
            Some(actor) => app.layer(Extension(actor)),
            None => app,
        }
    }

    async fn call(gate: Role, caller: Option<Role>) -> (StatusCode, bool) {
        let reached = Arc::new(AtomicBool::new(false));
        let actor = caller.map(|role| Actor::new(Uuid::new_v4(), role));
        let response = gated_app(gate, actor, reached.clone())
            .oneshot(
                axum::http::Request::builder()
                    .uri("/gate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        (response.status(), reached.load(Ordering::SeqCst))
    }

    const ROLES: [Role; 3] = [Role::Admin, Role::Supervisor, Role::Intern];

    #[tokio::test]
    async fn role_gate_rejects_wrong_role_before_handler() {
        for gate in ROLES {
            for caller in ROLES.into_iter().filter(|r| *r != gate) {
                let (status, reached) = call(gate, Some(caller)).await;
                assert_eq!(status, StatusCode::FORBIDDEN, "{:?} gate, {:?} caller", gate, caller);
                assert!(!reached, "handler ran for {:?} behind {:?} gate", caller, gate);
            }
        }
    }

    #[tokio::test]
    async fn role_gate_lets_matching_role_through() {
        for role in ROLES {
            let (status, reached) = call(role, Some(role)).await;
            assert_eq!(status, StatusCode::OK, "{:?}", role);
            assert!(reached);
        }
    }

    #[tokio::test]
    async fn role_gate_without_actor_is_unauthorized() {
        for gate in ROLES {
            let (status, reached) = call(gate, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(!reached);
        }
    }
}
