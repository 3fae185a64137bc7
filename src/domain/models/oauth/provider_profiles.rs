//! # 프로바이더별 프로필 응답 모델
//!
//! 각 프로바이더의 user-info 엔드포인트가 반환하는 JSON을 역직렬화하는
//! 구조체들과, 이를 [`SocialIdentity`]로 변환하는 로직을 정의합니다.
//!
//! 변환 시점에 프로필이 사용 가능한 식별자(이메일 또는 닉네임)를
//! 가지는지 검증합니다. 없으면 [`AppError::NotVerifiedEmail`]로 실패하며,
//! 재조정은 시도되지 않습니다.

use serde::Deserialize;
use crate::errors::errors::AppError;
use super::social_identity::SocialIdentity;

/// GitHub `/user` 응답
///
/// GitHub는 프로필 공개 설정에 따라 email이 null일 수 있으므로
/// 닉네임(login)을 식별자로 사용합니다.
#[derive(Debug, Deserialize)]
pub struct GithubProfile {
    /// GitHub 사용자 고유 ID (숫자)
    pub id: i64,
    /// GitHub 로그인 닉네임
    pub login: Option<String>,
    /// 공개 이메일 (비공개 설정 시 null)
    pub email: Option<String>,
}

/// Google OAuth2 `userinfo` 응답
#[derive(Debug, Deserialize)]
pub struct GoogleProfile {
    /// Google 사용자 고유 ID
    pub id: String,
    /// 계정 이메일 (email 스코프 누락 시 null)
    pub email: Option<String>,
    /// 이메일 검증 여부
    #[serde(default)]
    pub verified_email: bool,
}

/// Facebook Graph API `/me` 응답
#[derive(Debug, Deserialize)]
pub struct FacebookProfile {
    /// Facebook 사용자 고유 ID
    pub id: String,
    /// 계정 이메일 (전화번호 가입 계정은 null)
    pub email: Option<String>,
}

/// Instagram Graph API `/me` 응답
#[derive(Debug, Deserialize)]
pub struct InstagramProfile {
    /// Instagram 사용자 고유 ID
    pub id: String,
    /// Instagram 계정 username
    pub username: Option<String>,
}

/// 프로바이더별 원본 프로필의 합
///
/// OAuth 클라이언트가 어느 프로바이더에서 가져왔는지에 따라 해당
/// variant로 역직렬화하여 반환합니다.
#[derive(Debug)]
pub enum ProviderProfile {
    Github(GithubProfile),
    Google(GoogleProfile),
    Facebook(FacebookProfile),
    Instagram(InstagramProfile),
}

impl ProviderProfile {
    /// 원본 프로필을 재조정용 [`SocialIdentity`]로 변환합니다.
    ///
    /// 프로필 형태에 맞는 식별자가 없으면 `NotVerifiedEmail`로 실패합니다.
    ///
    /// # Returns
    ///
    /// * `Ok(SocialIdentity)` - 검증된 아이덴티티
    /// * `Err(AppError::NotVerifiedEmail)` - 이메일/닉네임 누락
    pub fn into_identity(self) -> Result<SocialIdentity, AppError> {
        match self {
            ProviderProfile::Github(profile) => {
                let nickname = profile.login.ok_or_else(|| {
                    AppError::NotVerifiedEmail("github profile has no login".to_string())
                })?;
                Ok(SocialIdentity::Nickname {
                    id: profile.id.to_string(),
                    nickname,
                })
            }
            ProviderProfile::Google(profile) => {
                let email = profile.email.ok_or_else(|| {
                    AppError::NotVerifiedEmail("google profile has no email".to_string())
                })?;
                Ok(SocialIdentity::Email {
                    id: profile.id,
                    email,
                })
            }
            ProviderProfile::Facebook(profile) => {
                let email = profile.email.ok_or_else(|| {
                    AppError::NotVerifiedEmail("facebook profile has no email".to_string())
                })?;
                Ok(SocialIdentity::Email {
                    id: profile.id,
                    email,
                })
            }
            ProviderProfile::Instagram(profile) => {
                let nickname = profile.username.ok_or_else(|| {
                    AppError::NotVerifiedEmail("instagram profile has no username".to_string())
                })?;
                Ok(SocialIdentity::Nickname {
                    id: profile.id,
                    nickname,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_github_profile_to_identity() {
        let profile = ProviderProfile::Github(GithubProfile {
            id: 123,
            login: Some("octocat".to_string()),
            email: None,
        });

        let identity = profile.into_identity().unwrap();
        assert_eq!(
            identity,
            SocialIdentity::Nickname {
                id: "123".to_string(),
                nickname: "octocat".to_string(),
            }
        );
    }

    #[test]
    fn test_github_profile_without_login_fails() {
        let profile = ProviderProfile::Github(GithubProfile {
            id: 123,
            login: None,
            email: Some("octo@example.com".to_string()),
        });

        assert!(matches!(
            profile.into_identity(),
            Err(AppError::NotVerifiedEmail(_))
        ));
    }

    #[test]
    fn test_google_profile_to_identity() {
        let profile = ProviderProfile::Google(GoogleProfile {
            id: "456".to_string(),
            email: Some("a@example.com".to_string()),
            verified_email: true,
        });

        let identity = profile.into_identity().unwrap();
        assert_eq!(identity.provider_id(), "456");
        assert_eq!(identity.email_or_nickname(), "a@example.com");
    }

    #[test]
    fn test_google_profile_without_email_fails() {
        let profile = ProviderProfile::Google(GoogleProfile {
            id: "456".to_string(),
            email: None,
            verified_email: false,
        });

        assert!(matches!(
            profile.into_identity(),
            Err(AppError::NotVerifiedEmail(_))
        ));
    }

    #[test]
    fn test_facebook_profile_without_email_fails() {
        let profile = ProviderProfile::Facebook(FacebookProfile {
            id: "789".to_string(),
            email: None,
        });

        assert!(matches!(
            profile.into_identity(),
            Err(AppError::NotVerifiedEmail(_))
        ));
    }

    #[test]
    fn test_instagram_profile_to_identity() {
        let profile = ProviderProfile::Instagram(InstagramProfile {
            id: "1010".to_string(),
            username: Some("insta_user".to_string()),
        });

        let identity = profile.into_identity().unwrap();
        assert_eq!(identity.email_or_nickname(), "insta_user");
    }

    #[test]
    fn test_github_json_deserialization() {
        let json = r#"{"id": 583231, "login": "octocat", "email": null, "name": "The Octocat"}"#;
        let profile: GithubProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.id, 583231);
        assert_eq!(profile.login.as_deref(), Some("octocat"));
        assert_eq!(profile.email, None);
    }
}
