//! 캐싱 및 세션 저장 백엔드 모듈
//!
//! Redis 기반의 키-값 저장을 제공합니다. 세션 서비스와
//! 사용자 리포지토리의 조회 캐시가 이 모듈을 사용합니다.

pub mod redis;
