//! # 소셜 인증 서비스
//!
//! OAuth 콜백 처리의 핵심 서비스입니다. Authorization Code를 받아
//! 토큰 교환 → 프로필 조회 → 로컬 사용자 재조정까지의 파이프라인을
//! 실행합니다.
//!
//! state 검증과 세션 기록은 HTTP 계층(핸들러)의 책임이고, 이 서비스는
//! 코드에서 사용자 엔티티까지만 책임집니다.

use std::sync::Arc;

use log::info;

use crate::{
    config::SocialProvider,
    domain::entities::users::user::User,
    errors::errors::AppError,
    repositories::users::user_repo::UserRepository,
    services::auth::oauth_client::OAuth2Client,
};

/// 소셜 로그인 인증 서비스
///
/// ## 주요 책임
///
/// 1. **토큰 교환**: Authorization Code를 액세스 토큰으로 교환
/// 2. **프로필 조회**: 프로바이더 API에서 사용자 프로필 획득
/// 3. **아이덴티티 추출**: 프로바이더별 프로필을 공통 아이덴티티로 변환
/// 4. **재조정**: 로컬 사용자 조회/백필/생성
pub struct SocialAuthService {
    oauth_client: Arc<OAuth2Client>,
    user_repo: Arc<UserRepository>,
}

impl SocialAuthService {
    /// 명시적 의존성으로 서비스를 생성합니다.
    pub fn new(oauth_client: Arc<OAuth2Client>, user_repo: Arc<UserRepository>) -> Self {
        Self {
            oauth_client,
            user_repo,
        }
    }

    /// Authorization Code로 사용자를 인증합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 재조정이 완료된 로컬 사용자 (신규 또는 기존)
    /// * `Err(AppError::ExternalServiceError)` - 프로바이더 통신 오류
    /// * `Err(AppError::NotVerifiedEmail)` - 프로필에 이메일/닉네임 없음
    /// * `Err(AppError::NonUniqueResult)` - 재조정 결과가 모호함
    pub async fn authenticate(
        &self,
        provider: SocialProvider,
        code: &str,
    ) -> Result<User, AppError> {
        let token = self.oauth_client.fetch_access_token(provider, code).await?;

        let profile = self
            .oauth_client
            .fetch_user_from_token(provider, &token.access_token)
            .await?;

        let identity = profile.into_identity()?;

        let user = self
            .user_repo
            .find_or_create_from_oauth(provider, &identity)
            .await?;

        info!(
            "{} 소셜 로그인 성공: user={}",
            provider,
            user.id_string().unwrap_or_default()
        );

        Ok(user)
    }
}
