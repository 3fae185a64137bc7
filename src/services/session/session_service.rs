//! # 세션 서비스
//!
//! Redis 기반 브라우저 세션을 관리합니다. 세션 ID는 `session_id` 쿠키로
//! 전달되는 UUID v4이며, 세션 데이터는 슬롯별 키로 저장됩니다:
//!
//! ```text
//! session:{sid}:user_id      - 로그인된 사용자 ID (로그인 상태의 기준)
//! session:{sid}:target_path  - 로그인 후 돌아갈 경로 (일회성)
//! session:{sid}:auth_error   - 마지막 인증 실패 메시지 (일회성)
//! session:{sid}:oauth_state  - 진행 중인 OAuth 플로우의 CSRF state
//! ```
//!
//! target path와 auth error는 읽을 때 소비(삭제)되는 일회성 슬롯입니다.
//! PRG(Post/Redirect/Get) 패턴에서 플래시 메시지처럼 동작합니다.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    caching::redis::RedisClient,
    config::{OAuthConfig, SessionConfig},
    errors::errors::AppError,
};

/// Redis 기반 세션 서비스
pub struct SessionService {
    redis: Arc<RedisClient>,
}

impl SessionService {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    /// 새 세션 ID를 생성합니다.
    ///
    /// 쿠키에 담기 전까지는 아무 데이터도 저장되지 않습니다.
    pub fn generate_session_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn slot_key(session_id: &str, slot: &str) -> String {
        format!("session:{}:{}", session_id, slot)
    }

    /// 로그인 완료를 기록합니다.
    ///
    /// 세션 TTL 동안 `user_id` 슬롯이 유지되며, 이 슬롯의 존재가
    /// "로그인됨"의 기준입니다.
    pub async fn set_user(&self, session_id: &str, user_id: &str) -> Result<(), AppError> {
        let key = Self::slot_key(session_id, "user_id");
        self.redis
            .set_with_expiry(&key, &user_id.to_string(), SessionConfig::ttl_seconds() as usize)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    /// 현재 로그인된 사용자 ID를 조회합니다.
    pub async fn current_user(&self, session_id: &str) -> Result<Option<String>, AppError> {
        let key = Self::slot_key(session_id, "user_id");
        self.redis
            .get::<String>(&key)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    /// 인증 후 돌아갈 경로를 저장합니다.
    ///
    /// OAuth 플로우 시작 시 저장되며, 플로우 TTL이 지나면 만료됩니다.
    pub async fn set_target_path(&self, session_id: &str, path: &str) -> Result<(), AppError> {
        let key = Self::slot_key(session_id, "target_path");
        self.redis
            .set_with_expiry(&key, &path.to_string(), OAuthConfig::flow_ttl_seconds() as usize)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    /// 저장된 target path를 소비합니다.
    ///
    /// 한 번 읽으면 삭제되므로 다음 로그인 플로우에 영향을 주지 않습니다.
    pub async fn take_target_path(&self, session_id: &str) -> Result<Option<String>, AppError> {
        let key = Self::slot_key(session_id, "target_path");
        let path = self
            .redis
            .get::<String>(&key)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        if path.is_some() {
            let _ = self.redis.del(&key).await;
        }

        Ok(path)
    }

    /// 인증 실패 메시지를 저장합니다.
    ///
    /// 로그인 페이지가 렌더링될 때 한 번 표시되고 사라집니다.
    pub async fn set_auth_error(&self, session_id: &str, message: &str) -> Result<(), AppError> {
        let key = Self::slot_key(session_id, "auth_error");
        self.redis
            .set_with_expiry(&key, &message.to_string(), OAuthConfig::flow_ttl_seconds() as usize)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    /// 저장된 인증 실패 메시지를 소비합니다.
    pub async fn take_auth_error(&self, session_id: &str) -> Result<Option<String>, AppError> {
        let key = Self::slot_key(session_id, "auth_error");
        let message = self
            .redis
            .get::<String>(&key)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        if message.is_some() {
            let _ = self.redis.del(&key).await;
        }

        Ok(message)
    }

    /// OAuth CSRF state를 저장합니다.
    pub async fn set_oauth_state(&self, session_id: &str, state: &str) -> Result<(), AppError> {
        let key = Self::slot_key(session_id, "oauth_state");
        self.redis
            .set_with_expiry(&key, &state.to_string(), OAuthConfig::flow_ttl_seconds() as usize)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }

    /// 콜백에서 받은 state를 세션에 저장된 값과 비교합니다.
    ///
    /// 일치하면 state 슬롯을 소비합니다. Authorization Code와 마찬가지로
    /// state도 일회성이어야 합니다.
    pub async fn verify_oauth_state(
        &self,
        session_id: &str,
        received: &str,
    ) -> Result<(), AppError> {
        let key = Self::slot_key(session_id, "oauth_state");
        let stored = self
            .redis
            .get::<String>(&key)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))?;

        match stored {
            Some(expected) if expected == received => {
                let _ = self.redis.del(&key).await;
                Ok(())
            }
            _ => Err(AppError::AuthenticationError(
                "OAuth state 검증에 실패했습니다".to_string(),
            )),
        }
    }

    /// 세션을 파기합니다 (로그아웃).
    ///
    /// 해당 세션의 모든 슬롯을 한 번에 삭제합니다.
    pub async fn destroy(&self, session_id: &str) -> Result<(), AppError> {
        let keys = ["user_id", "target_path", "auth_error", "oauth_state"]
            .iter()
            .map(|slot| Self::slot_key(session_id, slot))
            .collect::<Vec<_>>();

        self.redis
            .del_multiple(&keys)
            .await
            .map_err(|e| AppError::RedisError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_id_is_uuid() {
        let sid = SessionService::generate_session_id();
        assert!(Uuid::parse_str(&sid).is_ok());
        assert_ne!(sid, SessionService::generate_session_id());
    }

    #[test]
    fn test_slot_key_layout() {
        assert_eq!(
            SessionService::slot_key("abc", "user_id"),
            "session:abc:user_id"
        );
        assert_eq!(
            SessionService::slot_key("abc", "target_path"),
            "session:abc:target_path"
        );
    }
}
