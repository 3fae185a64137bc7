//! 미들웨어 모듈
//!
//! ActixWeb 애플리케이션의 요청 처리 파이프라인에서 사용되는 미들웨어들을
//! 제공합니다. 횡단 관심사(Cross-cutting concerns)를 처리합니다.
//!
//! # 제공 미들웨어
//!
//! ### 세션 가드 (SessionGuard)
//! - `session_id` 쿠키 기반 세션 검증
//! - 미인증 요청을 로그인 페이지로 302 리다이렉트
//! - 사용자 정보를 request extension에 저장
//!
//! # 사용 방법
//!
//! ```rust,ignore
//! use actix_web::{web, App};
//! use crate::middlewares::SessionGuard;
//!
//! App::new()
//!     .service(
//!         web::scope("/api/v1/me")
//!             .wrap(SessionGuard::new())
//!             .route("", web::get().to(get_me))
//!     )
//! ```

pub mod session_guard;
mod session_inner;

pub use session_guard::SessionGuard;
