//! 인증 핸들러
//!
//! OAuth 리다이렉트 플로우(connect/check)와 로컬 로그인, 로그아웃,
//! 로그인 페이지를 처리합니다.
//!
//! OAuth 플로우의 결과는 JSON이 아니라 리다이렉트입니다:
//!
//! - 성공: 저장된 target path(없으면 사이트 루트)로 302
//! - 실패: 에러 메시지를 세션에 남기고 로그인 페이지로 302

use actix_web::{cookie::Cookie, get, post, web, HttpRequest, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::config::{SecurityPaths, SessionConfig, SocialProvider};
use crate::domain::{LocalLoginRequest, OAuthCallbackQuery, OAuthConnectQuery, UserResponse};
use crate::errors::errors::AppError;
use crate::services::auth::{oauth_client, OAuth2Client, SocialAuthService};
use crate::services::session::SessionService;
use crate::services::users::UserService;

/// 요청 쿠키에서 세션 ID를 추출합니다.
fn session_id_from(req: &HttpRequest) -> Option<String> {
    req.cookie(SessionConfig::COOKIE_NAME)
        .map(|c| c.value().to_string())
}

/// 쿼리로 전달된 target path를 검증합니다.
///
/// 사이트 내부 경로만 허용합니다: `/`로 시작하고 `//`나 `/\`로 시작하지
/// 않아야 합니다. 절대 URL 등 그 외의 값은 오픈 리다이렉트가 되므로
/// 버려지고 기본 경로가 사용됩니다.
fn sanitize_target_path(path: &str) -> Option<&str> {
    if path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\") {
        Some(path)
    } else {
        None
    }
}

/// 세션 쿠키를 만듭니다.
fn session_cookie(session_id: &str) -> Cookie<'static> {
    Cookie::build(SessionConfig::COOKIE_NAME, session_id.to_string())
        .path("/")
        .http_only(true)
        .finish()
}

/// OAuth 인가 플로우 시작
///
/// 세션에 target path와 CSRF state를 기록한 뒤 프로바이더 인증 페이지로
/// 리다이렉트합니다. 지원하지 않는 프로바이더 이름은 404로 처리됩니다.
#[get("/connect/{service}")]
pub async fn oauth_connect(
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<OAuthConnectQuery>,
    session_service: web::Data<SessionService>,
    oauth_client_svc: web::Data<OAuth2Client>,
) -> Result<HttpResponse, AppError> {
    let provider = SocialProvider::from_str(&path.into_inner())
        .map_err(AppError::NotFound)?;

    // 기존 세션을 재사용하고, 없으면 새로 발급
    let session_id =
        session_id_from(&req).unwrap_or_else(SessionService::generate_session_id);

    if let Some(target_path) = query.target_path.as_deref().and_then(sanitize_target_path) {
        session_service
            .set_target_path(&session_id, target_path)
            .await?;
    }

    let state = oauth_client::generate_oauth_state()?;
    session_service.set_oauth_state(&session_id, &state).await?;

    let location = oauth_client_svc.authorization_url(provider, &state);

    log::info!("{} OAuth 플로우 시작: session={}", provider, session_id);

    Ok(HttpResponse::Found()
        .append_header(("Location", location))
        .cookie(session_cookie(&session_id))
        .finish())
}

/// OAuth 콜백 처리
///
/// 네 프로바이더가 공유하는 콜백 라우트입니다. `service` 쿼리 파라미터로
/// 프로바이더를 식별하고, state 검증 → 토큰 교환 → 프로필 조회 → 재조정
/// → 세션 로그인 순서로 처리합니다.
///
/// 어떤 단계에서든 실패하면 에러 메시지를 세션에 남기고 로그인 페이지로
/// 리다이렉트합니다. 파이프라인 에러가 HTTP 에러 응답으로 노출되지
/// 않습니다.
#[get("/check")]
pub async fn oauth_check(
    req: HttpRequest,
    query: web::Query<OAuthCallbackQuery>,
    session_service: web::Data<SessionService>,
    social_auth: web::Data<SocialAuthService>,
) -> Result<HttpResponse, AppError> {
    let Some(session_id) = session_id_from(&req) else {
        // 플로우를 시작한 적 없는 콜백
        return Ok(redirect_to_login());
    };

    match run_callback(&query, &session_id, &session_service, &social_auth).await {
        Ok(user_id) => {
            // 인증 전 세션에서 target path를 회수하고, 저장 시점과 동일한
            // 검증을 한 번 더 거칩니다
            let target = match session_service.take_target_path(&session_id).await {
                Ok(stored) => stored
                    .filter(|p| sanitize_target_path(p).is_some())
                    .unwrap_or_else(SecurityPaths::default_target_path),
                Err(e) => {
                    log::warn!("target path 조회 실패: {}", e);
                    SecurityPaths::default_target_path()
                }
            };

            // 세션 고정 방지: 인증 전 세션 ID를 재사용하지 않고 회전
            if let Err(e) = session_service.destroy(&session_id).await {
                log::warn!("인증 전 세션 파기 실패: {}", e);
            }

            let new_session_id = SessionService::generate_session_id();
            if let Err(e) = session_service.set_user(&new_session_id, &user_id).await {
                log::warn!("세션 로그인 기록 실패: {}", e);
                return Ok(redirect_to_login());
            }

            Ok(HttpResponse::Found()
                .append_header(("Location", target))
                .cookie(session_cookie(&new_session_id))
                .finish())
        }
        Err(e) => {
            log::warn!("{} OAuth 콜백 실패: {}", query.service, e);
            if let Err(redis_err) = session_service
                .set_auth_error(&session_id, &e.to_string())
                .await
            {
                log::warn!("인증 에러 저장 실패: {}", redis_err);
            }
            Ok(redirect_to_login())
        }
    }
}

/// 콜백 파이프라인의 실패 가능 구간
///
/// 성공 시 로그인시킬 사용자 ID를 반환합니다.
async fn run_callback(
    query: &OAuthCallbackQuery,
    session_id: &str,
    session_service: &SessionService,
    social_auth: &SocialAuthService,
) -> Result<String, AppError> {
    // 사용자가 동의를 거부했거나 프로바이더 측 오류
    if let Some(ref error) = query.error {
        let message = query
            .error_description
            .as_deref()
            .unwrap_or("인증이 취소되었거나 실패했습니다");
        return Err(AppError::AuthenticationError(format!(
            "{}: {}",
            error, message
        )));
    }

    let code = query.code.as_deref().ok_or_else(|| {
        AppError::AuthenticationError("인가 코드가 없습니다".to_string())
    })?;

    let state = query.state.as_deref().ok_or_else(|| {
        AppError::AuthenticationError("state 파라미터가 없습니다".to_string())
    })?;

    session_service.verify_oauth_state(session_id, state).await?;

    let user = social_auth.authenticate(query.service, code).await?;

    user.id_string()
        .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))
}

fn redirect_to_login() -> HttpResponse {
    HttpResponse::Found()
        .append_header(("Location", SecurityPaths::login_path()))
        .finish()
}

/// 로컬 로그인 (이메일/패스워드)
#[post("/login")]
pub async fn local_login(
    req: HttpRequest,
    payload: web::Json<LocalLoginRequest>,
    session_service: web::Data<SessionService>,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    // 유효성 검사
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = user_service
        .authenticate(&payload.email, &payload.password)
        .await?;

    let user_id = user
        .id_string()
        .ok_or_else(|| AppError::InternalError("사용자 ID가 없습니다".to_string()))?;

    // 세션 고정 방지: 쿠키로 들어온 세션 ID는 재사용하지 않고 회전
    if let Some(old_session_id) = session_id_from(&req) {
        session_service.destroy(&old_session_id).await?;
    }

    let session_id = SessionService::generate_session_id();
    session_service.set_user(&session_id, &user_id).await?;

    log::info!("로컬 로그인 성공 - 사용자: {}, ID: {}", payload.email, user_id);

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session_id))
        .json(json!({
            "user": UserResponse::from(user)
        })))
}

/// 로그아웃
///
/// 세션의 모든 슬롯을 파기하고 쿠키를 만료시킵니다.
#[post("/logout")]
pub async fn logout(
    req: HttpRequest,
    session_service: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    if let Some(session_id) = session_id_from(&req) {
        session_service.destroy(&session_id).await?;
        log::info!("로그아웃 완료: session={}", session_id);
    }

    let mut expired = session_cookie("");
    expired.make_removal();

    Ok(HttpResponse::Ok()
        .cookie(expired)
        .json(json!({ "message": "로그아웃되었습니다" })))
}

/// 로그인 페이지
///
/// 프론트엔드가 로그인 화면을 렌더링할 때 호출합니다. 직전 인증 실패
/// 메시지가 있으면 한 번만 포함되고 소비됩니다.
#[get("/login")]
pub async fn login_page(
    req: HttpRequest,
    session_service: web::Data<SessionService>,
) -> Result<HttpResponse, AppError> {
    let auth_error = match session_id_from(&req) {
        Some(session_id) => session_service.take_auth_error(&session_id).await?,
        None => None,
    };

    let providers = SocialProvider::ALL
        .iter()
        .map(|p| {
            json!({
                "name": p.as_str(),
                "connect_url": format!("/oauth/connect/{}", p.as_str()),
            })
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(json!({
        "providers": providers,
        "error": auth_error,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_target_path_allows_local_paths() {
        assert_eq!(sanitize_target_path("/"), Some("/"));
        assert_eq!(sanitize_target_path("/account"), Some("/account"));
        assert_eq!(sanitize_target_path("/a/b?c=d"), Some("/a/b?c=d"));
    }

    #[test]
    fn test_sanitize_target_path_rejects_external_redirects() {
        // 절대 URL이나 스킴 상대 URL로의 리다이렉트는 허용하지 않음
        assert_eq!(sanitize_target_path("https://evil.example"), None);
        assert_eq!(sanitize_target_path("http://evil.example/login"), None);
        assert_eq!(sanitize_target_path("//evil.example"), None);
        assert_eq!(sanitize_target_path("/\\evil.example"), None);
        assert_eq!(sanitize_target_path("javascript:alert(1)"), None);
        assert_eq!(sanitize_target_path("evil.example"), None);
        assert_eq!(sanitize_target_path(""), None);
    }

    #[test]
    fn test_login_session_id_is_rotated() {
        // 로그인 경로는 쿠키로 들어온 세션 ID를 절대 재사용하지 않음
        let incoming = "attacker-chosen-session-id";
        let rotated = SessionService::generate_session_id();

        assert_ne!(rotated, incoming);
        assert_ne!(rotated, SessionService::generate_session_id());
    }
}
