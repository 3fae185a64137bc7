//! # Configuration Module
//!
//! 백엔드 서비스의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값들을 중앙집중식으로 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 서버, 환경, 패스워드, 세션 관련 설정
//! - [`auth_config`] - 소셜 프로바이더, OAuth 보안 관련 설정
//!
//! ## 설계 원칙
//!
//! - 민감한 정보는 환경 변수로만 제공
//! - 기본값은 개발 환경에서만 안전
//! - 프로바이더별 설정은 명시적 `match` 분기로 해석 (문자열 조합 금지)

pub mod data_config;
pub mod auth_config;

pub use data_config::*;
pub use auth_config::*;
