//! SessionGuard 검증 로직의 핵심적인 기능

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;

use crate::config::{SecurityPaths, SessionConfig};
use crate::domain::models::auth::AuthenticatedSession;
use crate::services::session::SessionService;

/// 실제 세션 검증을 수행하는 서비스
pub struct SessionGuardService<S> {
    pub service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let auth_result = authenticate_session(&req).await;

            match auth_result {
                Some(session) => {
                    log::debug!("세션 인증 성공: 사용자 ID {}", session.user_id);
                    req.extensions_mut().insert(session);
                }
                None => {
                    // 미인증 접근은 로그인 페이지로 보냅니다
                    let response = HttpResponse::Found()
                        .append_header(("Location", SecurityPaths::login_path()))
                        .finish();
                    let (req, _) = req.into_parts();
                    let res = ServiceResponse::new(req, response).map_into_right_body();
                    return Ok(res);
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 요청의 세션 쿠키를 Redis 세션과 대조합니다.
async fn authenticate_session(req: &ServiceRequest) -> Option<AuthenticatedSession> {
    let session_id = req.cookie(SessionConfig::COOKIE_NAME)?.value().to_string();

    let session_service = req.app_data::<web::Data<SessionService>>()?;

    match session_service.current_user(&session_id).await {
        Ok(Some(user_id)) => Some(AuthenticatedSession {
            session_id,
            user_id,
        }),
        Ok(None) => None,
        Err(e) => {
            log::warn!("세션 조회 실패: {}", e);
            None
        }
    }
}
