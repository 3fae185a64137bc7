//! 인증 관련 요청 DTO
//!
//! 로컬 로그인, 회원가입, OAuth 리다이렉트 플로우의
//! HTTP 요청 데이터 구조를 정의합니다.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::SocialProvider;

/// 로컬 로그인 요청 DTO
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LocalLoginRequest {
    /// 사용자 이메일 주소
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    /// 계정 비밀번호
    #[validate(length(min = 1, message = "비밀번호를 입력해주세요"))]
    pub password: String,
}

/// 새로운 사용자 계정 생성(회원가입) 요청 DTO
///
/// JSON 역직렬화와 입력 검증을 자동으로 수행합니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    /// 사용자 이메일 주소 (RFC 5322 표준)
    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    /// 계정 비밀번호 (최소 8자, 대소문자+숫자 포함)
    #[validate(length(
        min = 8,
        message = "비밀번호는 최소 8자 이상이어야 합니다"
    ))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

/// 비밀번호 보안 강도 검증 (대문자, 소문자, 숫자 필수 포함)
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_uppercase = password.chars().any(|c| c.is_uppercase());
    let has_lowercase = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_digit(10));

    if !(has_uppercase && has_lowercase && has_digit) {
        return Err(ValidationError::new("weak_password")
            .with_message("비밀번호는 대문자, 소문자, 숫자를 포함해야 합니다".into()));
    }

    Ok(())
}

/// OAuth 인가 시작(`GET /oauth/connect/{service}`) 쿼리 파라미터
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthConnectQuery {
    /// 인증 완료 후 돌아갈 경로 (미지정 시 기본 경로 사용)
    pub target_path: Option<String>,
}

/// OAuth 콜백(`GET /oauth/check`) 쿼리 파라미터
///
/// 프로바이더가 리다이렉트로 되돌려주는 파라미터 전체를 담습니다.
/// 사용자가 동의를 거부한 경우 `code` 없이 `error`만 전달됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    /// 어떤 소셜 프로바이더의 콜백인지 식별
    pub service: SocialProvider,

    /// 인가 코드 (성공 시)
    pub code: Option<String>,

    /// CSRF 방지용 state 토큰
    pub state: Option<String>,

    /// 프로바이더 측 오류 코드 (예: access_denied)
    pub error: Option<String>,

    /// 프로바이더 측 오류 설명
    pub error_description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            email: "user@example.com".to_string(),
            password: "Passw0rd!".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignupRequest {
            email: "not-an-email".to_string(),
            password: "Passw0rd!".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let weak_password = SignupRequest {
            email: "user@example.com".to_string(),
            password: "alllowercase".to_string(),
        };
        assert!(weak_password.validate().is_err());
    }

    #[test]
    fn test_oauth_callback_query_parsing() {
        let query = "service=github&code=abc123&state=xyz";
        let parsed: OAuthCallbackQuery = serde_urlencoded::from_str(query).unwrap();
        assert_eq!(parsed.service, SocialProvider::Github);
        assert_eq!(parsed.code.as_deref(), Some("abc123"));
        assert_eq!(parsed.state.as_deref(), Some("xyz"));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_oauth_callback_query_denied() {
        let query = "service=google&error=access_denied&error_description=User+denied";
        let parsed: OAuthCallbackQuery = serde_urlencoded::from_str(query).unwrap();
        assert_eq!(parsed.service, SocialProvider::Google);
        assert!(parsed.code.is_none());
        assert_eq!(parsed.error.as_deref(), Some("access_denied"));
    }
}
