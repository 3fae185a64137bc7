//! 인증된 세션 정보
//!
//! 세션 가드 미들웨어가 검증을 마친 뒤 request extension에 저장하는
//! 구조체입니다. 핸들러는 이를 꺼내 현재 사용자를 식별합니다.

use actix_web::HttpMessage;

/// 검증이 끝난 세션의 사용자 정보
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    /// 세션 ID (쿠키 값)
    pub session_id: String,
    /// 로그인된 사용자의 ObjectId 문자열
    pub user_id: String,
}

impl AuthenticatedSession {
    /// request extension에서 인증 세션을 꺼냅니다.
    ///
    /// 세션 가드가 적용된 라우트에서만 `Some`을 반환합니다.
    pub fn from_request(req: &actix_web::HttpRequest) -> Option<Self> {
        req.extensions().get::<Self>().cloned()
    }
}
