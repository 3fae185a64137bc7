//! # Authentication Configuration Module
//!
//! OAuth 프로바이더와 세션 보안 관련 설정을 관리하는 모듈입니다.
//! GitHub, Google, Facebook, Instagram 네 개의 소셜 로그인 프로바이더를
//! 지원하며, 프로바이더별 자격 증명과 엔드포인트를 환경 변수 기반으로
//! 제공합니다.
//!
//! 프로바이더별 설정은 문자열 조합이 아니라 [`SocialProvider`]에 대한
//! 명시적 `match` 분기로 해석됩니다. 지원하지 않는 프로바이더 이름은
//! 컴파일 타임 혹은 역직렬화 시점에 걸러집니다.
//!
//! ## 필수 환경 변수 설정
//!
//! ```bash
//! # 프로바이더별 자격 증명 (사용하는 프로바이더만)
//! export GITHUB_CLIENT_ID="..."
//! export GITHUB_CLIENT_SECRET="..."
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export FACEBOOK_CLIENT_ID="..."
//! export FACEBOOK_CLIENT_SECRET="..."
//! export INSTAGRAM_CLIENT_ID="..."
//! export INSTAGRAM_CLIENT_SECRET="..."
//!
//! # 콜백 URI (oauth_check 라우트, service 쿼리 파라미터 포함)
//! export OAUTH_REDIRECT_URI="http://localhost:8080/oauth/check"
//!
//! # CSRF state 서명용 시크릿
//! export OAUTH_STATE_SECRET="your-oauth-state-secret"
//! ```

use std::env;
use serde::{Deserialize, Serialize};

/// 지원하는 소셜 로그인 프로바이더
///
/// 재조정 시 어느 프로바이더 외부 ID 필드를 읽고 쓸지 선택하는 키이며,
/// OAuth 클라이언트가 토큰 교환/프로필 조회 엔드포인트를 고르는 키이기도
/// 합니다. 콜백 요청의 `service` 쿼리 파라미터에서 역직렬화됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialProvider {
    /// GitHub OAuth (닉네임 기반 프로필)
    Github,
    /// Google OAuth 2.0 (이메일 기반 프로필)
    Google,
    /// Facebook OAuth (이메일 기반 프로필)
    Facebook,
    /// Instagram OAuth (닉네임 기반 프로필)
    Instagram,
}

impl SocialProvider {
    /// 지원하는 모든 프로바이더
    pub const ALL: [SocialProvider; 4] = [
        SocialProvider::Github,
        SocialProvider::Google,
        SocialProvider::Facebook,
        SocialProvider::Instagram,
    ];

    /// 문자열에서 SocialProvider를 생성합니다.
    ///
    /// # Arguments
    ///
    /// * `s` - 프로바이더 이름 (대소문자 무관)
    ///
    /// # Returns
    ///
    /// * `Ok(SocialProvider)` - 유효한 프로바이더인 경우
    /// * `Err(String)` - 지원하지 않는 프로바이더인 경우
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "github" => Ok(SocialProvider::Github),
            "google" => Ok(SocialProvider::Google),
            "facebook" => Ok(SocialProvider::Facebook),
            "instagram" => Ok(SocialProvider::Instagram),
            _ => Err(format!("Unsupported social provider: {}", s)),
        }
    }

    /// SocialProvider를 문자열로 변환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            SocialProvider::Github => "github",
            SocialProvider::Google => "google",
            SocialProvider::Facebook => "facebook",
            SocialProvider::Instagram => "instagram",
        }
    }

    /// 사용자 문서에서 이 프로바이더의 외부 ID가 저장되는 필드 이름
    ///
    /// 재조정 조회의 `$or` 필터와 backfill 업데이트에서 사용됩니다.
    pub fn id_field(&self) -> &'static str {
        match self {
            SocialProvider::Github => "github_id",
            SocialProvider::Google => "google_id",
            SocialProvider::Facebook => "facebook_id",
            SocialProvider::Instagram => "instagram_id",
        }
    }

    /// OAuth Client ID를 반환합니다.
    ///
    /// # Panics
    ///
    /// 해당 프로바이더의 `*_CLIENT_ID` 환경 변수가 설정되지 않은 경우
    /// 패닉이 발생합니다.
    pub fn client_id(&self) -> String {
        let var = match self {
            SocialProvider::Github => "GITHUB_CLIENT_ID",
            SocialProvider::Google => "GOOGLE_CLIENT_ID",
            SocialProvider::Facebook => "FACEBOOK_CLIENT_ID",
            SocialProvider::Instagram => "INSTAGRAM_CLIENT_ID",
        };
        env::var(var).unwrap_or_else(|_| panic!("{} must be set", var))
    }

    /// OAuth Client Secret을 반환합니다.
    ///
    /// 서버 사이드에서만 사용되는 민감 정보입니다. 로그에 출력하지 마세요.
    ///
    /// # Panics
    ///
    /// 해당 프로바이더의 `*_CLIENT_SECRET` 환경 변수가 설정되지 않은 경우
    /// 패닉이 발생합니다.
    pub fn client_secret(&self) -> String {
        let var = match self {
            SocialProvider::Github => "GITHUB_CLIENT_SECRET",
            SocialProvider::Google => "GOOGLE_CLIENT_SECRET",
            SocialProvider::Facebook => "FACEBOOK_CLIENT_SECRET",
            SocialProvider::Instagram => "INSTAGRAM_CLIENT_SECRET",
        };
        env::var(var).unwrap_or_else(|_| panic!("{} must be set", var))
    }

    /// 프로바이더 인증 페이지(Authorization Endpoint) URI
    pub fn auth_uri(&self) -> &'static str {
        match self {
            SocialProvider::Github => "https://github.com/login/oauth/authorize",
            SocialProvider::Google => "https://accounts.google.com/o/oauth2/auth",
            SocialProvider::Facebook => "https://www.facebook.com/v19.0/dialog/oauth",
            SocialProvider::Instagram => "https://api.instagram.com/oauth/authorize",
        }
    }

    /// Authorization Code를 액세스 토큰으로 교환하는 엔드포인트 URI
    pub fn token_uri(&self) -> &'static str {
        match self {
            SocialProvider::Github => "https://github.com/login/oauth/access_token",
            SocialProvider::Google => "https://oauth2.googleapis.com/token",
            SocialProvider::Facebook => "https://graph.facebook.com/v19.0/oauth/access_token",
            SocialProvider::Instagram => "https://api.instagram.com/oauth/access_token",
        }
    }

    /// 액세스 토큰으로 프로필을 조회하는 엔드포인트 URI
    pub fn user_info_uri(&self) -> &'static str {
        match self {
            SocialProvider::Github => "https://api.github.com/user",
            SocialProvider::Google => "https://www.googleapis.com/oauth2/v2/userinfo",
            SocialProvider::Facebook => "https://graph.facebook.com/me?fields=id,name,email",
            SocialProvider::Instagram => "https://graph.instagram.com/me?fields=id,username",
        }
    }

    /// 인증 요청 시 사용할 OAuth 스코프
    pub fn scopes(&self) -> &'static str {
        match self {
            SocialProvider::Github => "read:user user:email",
            SocialProvider::Google => "openid email profile",
            SocialProvider::Facebook => "public_profile email",
            SocialProvider::Instagram => "user_profile",
        }
    }
}

impl std::fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OAuth 일반 설정을 관리하는 구조체
///
/// 모든 프로바이더에 공통으로 적용되는 보안 설정을 관리합니다.
pub struct OAuthConfig;

impl OAuthConfig {
    /// OAuth 콜백 URI를 반환합니다.
    ///
    /// 네 프로바이더 모두 동일한 콜백 라우트(`/oauth/check`)를 공유하며,
    /// 어느 프로바이더에서 돌아왔는지는 `service` 쿼리 파라미터가 식별합니다.
    ///
    /// # Panics
    ///
    /// `OAUTH_REDIRECT_URI` 환경 변수가 설정되지 않은 경우 패닉이 발생합니다.
    pub fn redirect_uri() -> String {
        env::var("OAUTH_REDIRECT_URI")
            .expect("OAUTH_REDIRECT_URI must be set")
    }

    /// OAuth State 생성용 비밀키를 반환합니다.
    ///
    /// CSRF 공격 방지를 위한 state 매개변수 생성에 사용됩니다.
    pub fn state_secret() -> String {
        env::var("OAUTH_STATE_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("OAUTH_STATE_SECRET not set, using default (not secure for production!)");
                "oauth-state-secret".to_string()
            })
    }

    /// 진행 중인 OAuth 플로우(state, target path)의 수명을 초 단위로 반환합니다.
    ///
    /// 사용자가 인증을 시작한 후 콜백까지 걸리는 최대 시간을 제한합니다.
    /// 기본값: 600초 (10분)
    pub fn flow_ttl_seconds() -> u64 {
        env::var("OAUTH_FLOW_TTL_SECONDS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .unwrap_or(600)
    }
}

/// 인증 관련 사이트 경로 설정
///
/// 인증 실패 및 미인증 접근 시 리다이렉트할 로그인 페이지와,
/// 저장된 target path가 없을 때 돌아갈 기본 경로입니다.
pub struct SecurityPaths;

impl SecurityPaths {
    /// 로그인 페이지 경로. 기본값: "/login"
    pub fn login_path() -> String {
        env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string())
    }

    /// 로그인 성공 시 target path가 없을 때 사용할 기본 경로 (사이트 루트)
    pub fn default_target_path() -> String {
        env::var("DEFAULT_TARGET_PATH").unwrap_or_else(|_| "/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_provider_from_string() {
        assert_eq!(
            SocialProvider::from_str("github").unwrap(),
            SocialProvider::Github
        );
        assert_eq!(
            SocialProvider::from_str("google").unwrap(),
            SocialProvider::Google
        );
        assert_eq!(
            SocialProvider::from_str("facebook").unwrap(),
            SocialProvider::Facebook
        );
        assert_eq!(
            SocialProvider::from_str("instagram").unwrap(),
            SocialProvider::Instagram
        );

        // 대소문자 무관 테스트
        assert_eq!(
            SocialProvider::from_str("GitHub").unwrap(),
            SocialProvider::Github
        );

        // 지원하지 않는 프로바이더 테스트
        assert!(SocialProvider::from_str("twitter").is_err());
        assert!(SocialProvider::from_str("").is_err());
    }

    #[test]
    fn test_social_provider_roundtrip() {
        for provider in SocialProvider::ALL {
            assert_eq!(
                SocialProvider::from_str(provider.as_str()).unwrap(),
                provider
            );
        }
    }

    #[test]
    fn test_social_provider_id_field() {
        assert_eq!(SocialProvider::Github.id_field(), "github_id");
        assert_eq!(SocialProvider::Google.id_field(), "google_id");
        assert_eq!(SocialProvider::Facebook.id_field(), "facebook_id");
        assert_eq!(SocialProvider::Instagram.id_field(), "instagram_id");
    }

    #[test]
    fn test_social_provider_query_deserialization() {
        // 콜백 쿼리 파라미터 역직렬화와 동일한 경로
        let provider: SocialProvider = serde_json::from_str("\"github\"").unwrap();
        assert_eq!(provider, SocialProvider::Github);

        let invalid: Result<SocialProvider, _> = serde_json::from_str("\"twitter\"");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_endpoints_are_https() {
        for provider in SocialProvider::ALL {
            assert!(provider.auth_uri().starts_with("https://"));
            assert!(provider.token_uri().starts_with("https://"));
            assert!(provider.user_info_uri().starts_with("https://"));
        }
    }
}
