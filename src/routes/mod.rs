//! 라우트 구성 모듈
//!
//! 전체 라우트 트리:
//!
//! ```text
//! GET  /health                     - 헬스체크
//! GET  /login                      - 로그인 페이지 (직전 인증 에러 포함)
//! GET  /oauth/connect/{service}    - OAuth 플로우 시작 (302)
//! GET  /oauth/check                - OAuth 콜백 (302)
//! POST /api/v1/auth/login          - 로컬 로그인
//! POST /api/v1/auth/logout         - 로그아웃
//! POST /api/v1/users               - 회원가입
//! GET  /api/v1/me                  - 현재 사용자 (세션 가드)
//! ```

use actix_web::web;
use serde_json::json;

use crate::handlers;
use crate::middlewares::SessionGuard;

pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    // Health check endpoint
    cfg.service(health_check);

    // 로그인 페이지 (인증 실패 리다이렉트의 목적지)
    cfg.service(handlers::auth::login_page);

    configure_oauth_routes(cfg);
    configure_auth_routes(cfg);
    configure_user_routes(cfg);
}

fn configure_oauth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/oauth")
            .service(handlers::auth::oauth_connect)
            .service(handlers::auth::oauth_check),
    );
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(handlers::auth::local_login)
            .service(handlers::auth::logout),
    );
}

fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    // Public routes
    cfg.service(web::scope("/api/v1/users").service(handlers::users::create_user));

    // Protected routes
    cfg.service(
        web::scope("/api/v1/me")
            .wrap(SessionGuard::new())
            .service(handlers::users::get_me),
    );
}

#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "social_login_backend",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "session_store": "Redis",
            "providers": ["github", "google", "facebook", "instagram"]
        }
    }))
}
