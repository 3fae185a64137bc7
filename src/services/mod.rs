//! 비즈니스 로직 서비스 계층
//!
//! - [`auth`] - OAuth 클라이언트와 소셜 인증 파이프라인
//! - [`session`] - Redis 기반 브라우저 세션
//! - [`users`] - 회원가입과 로컬 로그인

pub mod auth;
pub mod session;
pub mod users;
