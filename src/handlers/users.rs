//! 사용자 핸들러

use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::domain::dto::auth::request::SignupRequest;
use crate::domain::models::auth::AuthenticatedSession;
use crate::domain::UserResponse;
use crate::errors::errors::AppError;
use crate::services::users::UserService;

/// 회원가입
#[post("")]
pub async fn create_user(
    payload: web::Json<SignupRequest>,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = user_service.create_user(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// 현재 로그인된 사용자 조회
///
/// 세션 가드가 적용된 라우트입니다. 가드가 검증한 세션 정보를
/// request extension에서 꺼내 사용자를 조회합니다.
#[get("")]
pub async fn get_me(
    req: HttpRequest,
    user_service: web::Data<UserService>,
) -> Result<HttpResponse, AppError> {
    let session = AuthenticatedSession::from_request(&req).ok_or_else(|| {
        AppError::AuthenticationError("인증된 세션이 없습니다".to_string())
    })?;

    let user = user_service.find_by_id(&session.user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
