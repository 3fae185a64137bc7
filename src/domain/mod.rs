//! 도메인 계층 모듈
//!
//! 엔티티, 일시적 모델, 요청/응답 DTO를 정의합니다.
//!
//! - [`entities`] - MongoDB에 영구 저장되는 도메인 엔티티 (User)
//! - [`models`] - 저장되지 않는 일시적 모델 (소셜 아이덴티티, 프로바이더 프로필)
//! - [`dto`] - HTTP 요청/응답 데이터 전송 객체

pub mod entities;
pub mod models;
pub mod dto;

pub use dto::auth::request::{LocalLoginRequest, OAuthCallbackQuery, OAuthConnectQuery, SignupRequest};
pub use dto::auth::response::UserResponse;
