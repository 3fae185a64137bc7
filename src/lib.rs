//! 소셜 로그인 백엔드
//!
//! OAuth 2.0 소셜 로그인(GitHub, Google, Facebook, Instagram)과
//! 로컬 계정을 하나의 사용자 모델로 재조정하는 인증 서비스입니다.
//! Redis 세션 기반의 브라우저 인증과 명시적 의존성 주입을 사용합니다.
//!
//! # Features
//!
//! - **소셜 로그인**: 네 프로바이더 공통 OAuth 2.0 Authorization Code 플로우
//! - **아이덴티티 재조정**: 외부 ID 또는 이메일로 기존 계정을 찾아 연결(백필)
//! - **로컬 계정**: 이메일/패스워드 가입과 로그인, 해시 비용 자동 업그레이드
//! - **세션 인증**: Redis 슬롯 기반 세션, 쿠키 `session_id`
//! - **MongoDB**: 사용자 데이터 영구 저장
//! - **Redis**: 세션과 조회 캐싱
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API + 리다이렉트 엔드포인트
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리, 리다이렉트 결정
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← OAuth 파이프라인, 세션, 계정 로직
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 재조정 결정과 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use social_login_backend::repositories::users::UserRepository;
//! use social_login_backend::services::auth::{OAuth2Client, SocialAuthService};
//!
//! // 명시적 의존성 주입
//! let user_repo = Arc::new(UserRepository::new(db, redis));
//! let oauth_client = Arc::new(OAuth2Client::new());
//! let social_auth = SocialAuthService::new(oauth_client, user_repo);
//!
//! // OAuth 콜백의 인가 코드로 인증
//! let user = social_auth.authenticate(provider, &code).await?;
//! ```

pub mod caching;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
