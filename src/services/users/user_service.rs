//! # 사용자 서비스
//!
//! 회원가입과 로컬(이메일/패스워드) 로그인의 비즈니스 로직을 담당합니다.
//!
//! ## 패스워드 업그레이드
//!
//! 로그인 성공 시 저장된 해시의 비용 인자가 현재 설정보다 낮으면
//! 같은 평문으로 재해싱하여 저장합니다. 해시 비용 정책을 올려도
//! 기존 사용자들이 다음 로그인 때 자동으로 따라오게 됩니다.

use std::sync::Arc;

use log::{info, warn};
use validator::Validate;

use crate::{
    config::PasswordConfig,
    domain::dto::auth::request::SignupRequest,
    domain::entities::users::user::User,
    errors::errors::AppError,
    repositories::users::user_repo::UserRepository,
};

/// 사용자 계정 서비스
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// 새 로컬 사용자를 생성합니다 (회원가입).
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 생성된 사용자
    /// * `Err(AppError::ValidationError)` - 입력 검증 실패
    /// * `Err(AppError::ConflictError)` - 이메일 중복
    pub async fn create_user(&self, request: SignupRequest) -> Result<User, AppError> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let password_hash = bcrypt::hash(&request.password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        let user = self
            .user_repo
            .create(User::new_local(request.email, password_hash))
            .await?;

        info!(
            "신규 사용자 가입 완료: user={}",
            user.id_string().unwrap_or_default()
        );

        Ok(user)
    }

    /// 이메일/패스워드로 사용자를 인증합니다.
    ///
    /// 소셜 전용 계정(비밀번호 없음)은 로컬 로그인이 불가능하며,
    /// 존재하지 않는 이메일과 동일한 인증 실패로 처리합니다.
    ///
    /// 인증 성공 시 해시 비용이 낮으면 재해싱을 시도합니다. 업그레이드
    /// 실패는 로그인 자체를 막지 않습니다.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| {
                AppError::AuthenticationError("이메일 또는 비밀번호가 올바르지 않습니다".to_string())
            })?;

        let Some(ref stored_hash) = user.password_hash else {
            return Err(AppError::AuthenticationError(
                "이메일 또는 비밀번호가 올바르지 않습니다".to_string(),
            ));
        };

        let valid = bcrypt::verify(password, stored_hash)
            .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))?;

        if !valid {
            return Err(AppError::AuthenticationError(
                "이메일 또는 비밀번호가 올바르지 않습니다".to_string(),
            ));
        }

        if Self::needs_rehash(stored_hash) {
            if let Err(e) = self.upgrade_password_hash(&user, password).await {
                warn!("비밀번호 해시 업그레이드 실패 (로그인은 계속 진행): {}", e);
            }
        }

        Ok(user)
    }

    /// ID로 사용자를 조회합니다.
    pub async fn find_by_id(&self, id: &str) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))
    }

    /// 저장된 해시가 현재 비용 정책보다 약한지 판정합니다.
    ///
    /// bcrypt 해시 포맷: `$2b$<cost>$<salt+hash>`
    fn needs_rehash(stored_hash: &str) -> bool {
        let cost = stored_hash
            .split('$')
            .nth(2)
            .and_then(|c| c.parse::<u32>().ok());

        match cost {
            Some(cost) => cost < PasswordConfig::bcrypt_cost(),
            // 포맷을 해석할 수 없으면 그대로 둡니다
            None => false,
        }
    }

    async fn upgrade_password_hash(&self, user: &User, password: &str) -> Result<(), AppError> {
        let new_hash = bcrypt::hash(password, PasswordConfig::bcrypt_cost())
            .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;

        self.user_repo.upgrade_password(user, new_hash).await?;

        info!(
            "비밀번호 해시 업그레이드 완료: user={}",
            user.id_string().unwrap_or_default()
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_rehash_detects_low_cost() {
        // 현재 정책 비용보다 낮은 비용으로 만들어진 해시
        let current = PasswordConfig::bcrypt_cost();
        let low_cost_hash = format!("$2b${:02}$abcdefghijklmnopqrstuv", current - 1);
        let same_cost_hash = format!("$2b${:02}$abcdefghijklmnopqrstuv", current);

        assert!(UserService::needs_rehash(&low_cost_hash));
        assert!(!UserService::needs_rehash(&same_cost_hash));
    }

    #[test]
    fn test_needs_rehash_ignores_malformed_hash() {
        assert!(!UserService::needs_rehash("not-a-bcrypt-hash"));
        assert!(!UserService::needs_rehash(""));
    }
}
