//! # OAuth 2.0 클라이언트
//!
//! RFC 6749 Authorization Code Grant 플로우의 프로바이더 통신 부분을
//! 담당합니다. 네 프로바이더(GitHub, Google, Facebook, Instagram)가 같은
//! 플로우를 공유하므로 엔드포인트와 파라미터 차이만 [`SocialProvider`]로
//! 분기합니다.
//!
//! ## OAuth 2.0 Authorization Code Flow
//!
//! ```text
//! 1. GET /oauth/connect/{service}
//!    → state 생성, 세션에 저장, 프로바이더 인증 페이지로 302
//! 2. 사용자가 프로바이더에서 인증
//! 3. 프로바이더가 /oauth/check?service=...&code=...&state=... 으로 리다이렉트
//! 4. state 검증 후 code를 액세스 토큰으로 교환 (이 모듈)
//! 5. 액세스 토큰으로 프로필 조회 (이 모듈)
//! 6. 프로필을 로컬 사용자에 재조정
//! ```

use log::debug;
use serde::Deserialize;

use crate::{
    config::{OAuthConfig, SocialProvider},
    domain::models::oauth::provider_profiles::{
        FacebookProfile, GithubProfile, GoogleProfile, InstagramProfile, ProviderProfile,
    },
    errors::errors::AppError,
};

/// 토큰 교환 응답
///
/// 프로바이더마다 부가 필드가 다르지만 재조정에는 액세스 토큰만 필요합니다.
#[derive(Debug, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// 프로바이더 공통 OAuth 2.0 클라이언트
///
/// 재사용 가능한 `reqwest::Client`(커넥션 풀)를 보유하며, 토큰 교환과
/// 프로필 조회를 수행합니다. 어느 사용자 계정과 묶을지는 알지 못합니다.
/// 재조정은 [`super::social_auth_service::SocialAuthService`]의 책임입니다.
pub struct OAuth2Client {
    http: reqwest::Client,
}

impl OAuth2Client {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// 프로바이더 인증 페이지로 보낼 Authorization URL을 생성합니다.
    ///
    /// # 생성되는 URL 구조
    ///
    /// ```text
    /// {auth_uri}?client_id=...&redirect_uri=...&scope=...&response_type=code&state=...
    /// ```
    ///
    /// `redirect_uri`는 네 프로바이더가 공유하는 콜백 라우트이며,
    /// `service` 쿼리 파라미터로 돌아온 프로바이더를 식별합니다.
    pub fn authorization_url(&self, provider: SocialProvider, state: &str) -> String {
        let redirect_uri = format!(
            "{}?service={}",
            OAuthConfig::redirect_uri(),
            provider.as_str()
        );

        let params = [
            ("client_id", provider.client_id()),
            ("redirect_uri", redirect_uri),
            ("scope", provider.scopes().to_string()),
            ("response_type", "code".to_string()),
            ("state", state.to_string()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", provider.auth_uri(), query_string)
    }

    /// Authorization Code를 액세스 토큰으로 교환합니다.
    ///
    /// GitHub은 기본적으로 `application/x-www-form-urlencoded`로 응답하므로
    /// `Accept: application/json` 헤더를 명시합니다. 나머지 프로바이더는
    /// 이 헤더를 무시하고 JSON으로 응답합니다.
    pub async fn fetch_access_token(
        &self,
        provider: SocialProvider,
        code: &str,
    ) -> Result<AccessTokenResponse, AppError> {
        let redirect_uri = format!(
            "{}?service={}",
            OAuthConfig::redirect_uri(),
            provider.as_str()
        );

        let params = [
            ("code", code.to_string()),
            ("client_id", provider.client_id()),
            ("client_secret", provider.client_secret()),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code".to_string()),
        ];

        let response = self
            .http
            .post(provider.token_uri())
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("{} 토큰 요청 실패: {}", provider, e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 토큰 교환 실패: {}",
                provider, error_text
            )));
        }

        response.json::<AccessTokenResponse>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("{} 토큰 응답 파싱 실패: {}", provider, e))
        })
    }

    /// 액세스 토큰으로 프로바이더 프로필을 조회합니다.
    ///
    /// 응답 스키마가 프로바이더마다 다르므로 프로바이더별 DTO로 파싱한 뒤
    /// [`ProviderProfile`]로 감싸 반환합니다.
    pub async fn fetch_user_from_token(
        &self,
        provider: SocialProvider,
        access_token: &str,
    ) -> Result<ProviderProfile, AppError> {
        // GitHub API는 User-Agent 없는 요청을 403으로 거부합니다.
        let response = self
            .http
            .get(provider.user_info_uri())
            .bearer_auth(access_token)
            .header("User-Agent", "social-login-backend")
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("{} 프로필 요청 실패: {}", provider, e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "{} 프로필 조회 실패: {}",
                provider, error_text
            )));
        }

        debug!("{} 프로필 조회 성공", provider);

        let profile = match provider {
            SocialProvider::Github => {
                ProviderProfile::Github(response.json::<GithubProfile>().await.map_err(|e| {
                    AppError::ExternalServiceError(format!("GitHub 프로필 파싱 실패: {}", e))
                })?)
            }
            SocialProvider::Google => {
                ProviderProfile::Google(response.json::<GoogleProfile>().await.map_err(|e| {
                    AppError::ExternalServiceError(format!("Google 프로필 파싱 실패: {}", e))
                })?)
            }
            SocialProvider::Facebook => {
                ProviderProfile::Facebook(response.json::<FacebookProfile>().await.map_err(
                    |e| AppError::ExternalServiceError(format!("Facebook 프로필 파싱 실패: {}", e)),
                )?)
            }
            SocialProvider::Instagram => {
                ProviderProfile::Instagram(response.json::<InstagramProfile>().await.map_err(
                    |e| {
                        AppError::ExternalServiceError(format!(
                            "Instagram 프로필 파싱 실패: {}",
                            e
                        ))
                    },
                )?)
            }
        };

        Ok(profile)
    }
}

impl Default for OAuth2Client {
    fn default() -> Self {
        Self::new()
    }
}

/// CSRF 방지용 OAuth state 값을 생성합니다.
///
/// `timestamp:secret`을 해시한 값으로, 세션에 저장해 두었다가 콜백에서
/// 받은 state와 비교합니다.
pub fn generate_oauth_state() -> Result<String, AppError> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalError(format!("시간 계산 실패: {}", e)))?
        .as_nanos();

    let state_data = format!("{}:{}", timestamp, OAuthConfig::state_secret());

    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    state_data.hash(&mut hasher);

    Ok(format!("{:x}", hasher.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url_contains_required_params() {
        // SAFETY: 테스트 프로세스 내에서만 설정되는 환경 변수
        unsafe {
            std::env::set_var("GITHUB_CLIENT_ID", "test-client-id");
            std::env::set_var("OAUTH_REDIRECT_URI", "http://localhost:8080/oauth/check");
        }

        let client = OAuth2Client::new();
        let url = client.authorization_url(SocialProvider::Github, "state-123");

        assert!(url.starts_with("https://github.com/login/oauth/authorize?"));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=state-123"));
        // redirect_uri 안의 쿼리는 인코딩되어야 함
        assert!(url.contains(&urlencoding::encode("?service=github").into_owned()));
    }

    #[test]
    fn test_generate_oauth_state_is_unique() {
        let a = generate_oauth_state().unwrap();
        let b = generate_oauth_state().unwrap();

        assert!(!a.is_empty());
        // 나노초 타임스탬프 기반이므로 연속 호출은 다른 값을 생성
        assert_ne!(a, b);
    }

    #[test]
    fn test_access_token_response_parsing() {
        // GitHub 스타일 응답
        let json = r#"{"access_token":"gho_abc","token_type":"bearer","scope":"read:user"}"#;
        let parsed: AccessTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.access_token, "gho_abc");

        // 부가 필드가 없는 최소 응답
        let minimal = r#"{"access_token":"tok"}"#;
        let parsed: AccessTokenResponse = serde_json::from_str(minimal).unwrap();
        assert_eq!(parsed.access_token, "tok");
        assert!(parsed.token_type.is_none());
    }
}
