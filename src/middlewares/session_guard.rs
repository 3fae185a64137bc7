//! 세션 가드 미들웨어
//!
//! ActixWeb 요청 파이프라인에서 세션 쿠키를 검증하고 사용자 정보를 추출합니다.
//!
//! 미인증 요청은 로그인 페이지로 302 리다이렉트됩니다. API 클라이언트에게
//! 401을 돌려주는 대신 리다이렉트하는 것은 브라우저 중심의 소셜 로그인
//! 플로우를 전제로 한 선택입니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
};

use crate::middlewares::session_inner::SessionGuardService;

/// 세션 기반 인증 가드
///
/// `session_id` 쿠키가 로그인된 세션을 가리키는지 확인하고,
/// 아니면 로그인 페이지로 리다이렉트합니다.
pub struct SessionGuard;

impl SessionGuard {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// ActixWeb Transform trait 구현
impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SessionGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardService {
            service: Rc::new(service),
        }))
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    use super::*;
    use crate::config::SessionConfig;

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_guard_redirects_to_login_without_cookie() {
        let app = test::init_service(
            App::new().service(
                web::scope("/api/v1/me")
                    .wrap(SessionGuard::new())
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/v1/me").to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res
            .headers()
            .get("Location")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        assert_eq!(location, "/login");
    }

    #[actix_web::test]
    async fn test_guard_redirects_with_unresolvable_session() {
        // 쿠키는 있지만 세션 저장소에서 사용자를 찾을 수 없는 경우
        let app = test::init_service(
            App::new().service(
                web::scope("/api/v1/me")
                    .wrap(SessionGuard::new())
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/me")
            .cookie(actix_web::cookie::Cookie::new(
                SessionConfig::COOKIE_NAME,
                "no-such-session",
            ))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res
            .headers()
            .get("Location")
            .and_then(|h| h.to_str().ok())
            .unwrap_or_default();
        assert_eq!(location, "/login");
    }
}
