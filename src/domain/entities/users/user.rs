//! User Entity Implementation
//!
//! 사용자 엔티티의 핵심 구현체입니다.
//! 로컬 인증(이메일/패스워드)과 소셜 로그인을 모두 지원하는
//! 통합된 사용자 모델을 제공합니다.
//!
//! 소셜 로그인 계정은 프로바이더별 외부 ID 필드(github_id, google_id,
//! facebook_id, instagram_id)로 식별되며, 한 사용자가 여러 프로바이더를
//! 연결할 수 있습니다. 프로바이더 필드 접근은 문자열로 조립한 접근자가
//! 아니라 [`SocialProvider`]에 대한 명시적 `match`로 디스패치됩니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::SocialProvider;
use crate::domain::models::oauth::social_identity::SocialIdentity;

/// 신규 사용자에게 부여되는 기본 역할
pub const DEFAULT_ROLE: &str = "USER";

/// 사용자 엔티티
///
/// 시스템의 모든 사용자를 표현하는 핵심 도메인 엔티티입니다.
/// 재조정 규칙상 사용자는 `(프로바이더, 외부 ID)` 일치 또는 이메일 일치로
/// 유일하게 식별됩니다. 두 경로가 서로 배타적이지 않다는 점은 저장 계층의
/// 이메일 유니크 인덱스가 완화합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 사용자 이메일 (unique). 닉네임 기반 프로바이더로 생성된 계정은
    /// 닉네임이 이 필드에 저장됩니다.
    pub email: String,
    /// 해시된 비밀번호 (소셜 전용 계정의 경우 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// 사용자 역할
    pub roles: Vec<String>,
    /// GitHub 외부 사용자 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_id: Option<String>,
    /// Google 외부 사용자 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    /// Facebook 외부 사용자 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook_id: Option<String>,
    /// Instagram 외부 사용자 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_id: Option<String>,
    /// 생성 시간
    pub created_at: DateTime,
    /// 수정 시간
    pub updated_at: DateTime,
}

impl User {
    /// 새 로컬 사용자 생성 (이메일/패스워드)
    pub fn new_local(email: String, password_hash: String) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            email,
            password_hash: Some(password_hash),
            roles: vec![DEFAULT_ROLE.to_string()],
            github_id: None,
            google_id: None,
            facebook_id: None,
            instagram_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// 소셜 프로필로부터 새 사용자 생성
    ///
    /// 재조정이 일치하는 로컬 사용자를 찾지 못한 경우의 생성 경로입니다.
    /// 기본 역할 "USER"가 부여되고, 해당 프로바이더의 외부 ID 필드와
    /// 이메일(또는 닉네임)이 채워집니다. 비밀번호는 없습니다.
    pub fn from_social_identity(identity: &SocialIdentity, provider: SocialProvider) -> Self {
        let now = DateTime::now();

        let mut user = Self {
            id: None,
            email: identity.email_or_nickname().to_string(),
            password_hash: None,
            roles: vec![DEFAULT_ROLE.to_string()],
            github_id: None,
            google_id: None,
            facebook_id: None,
            instagram_id: None,
            created_at: now,
            updated_at: now,
        };
        user.set_provider_id(provider, identity.provider_id().to_string());
        user
    }

    /// 해당 프로바이더의 외부 사용자 ID를 반환합니다.
    pub fn provider_id(&self, provider: SocialProvider) -> Option<&str> {
        match provider {
            SocialProvider::Github => self.github_id.as_deref(),
            SocialProvider::Google => self.google_id.as_deref(),
            SocialProvider::Facebook => self.facebook_id.as_deref(),
            SocialProvider::Instagram => self.instagram_id.as_deref(),
        }
    }

    /// 해당 프로바이더의 외부 사용자 ID를 설정합니다.
    pub fn set_provider_id(&mut self, provider: SocialProvider, external_id: String) {
        match provider {
            SocialProvider::Github => self.github_id = Some(external_id),
            SocialProvider::Google => self.google_id = Some(external_id),
            SocialProvider::Facebook => self.facebook_id = Some(external_id),
            SocialProvider::Instagram => self.instagram_id = Some(external_id),
        }
    }

    /// ID 문자열로 변환
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    /// 비밀번호 인증이 가능한 사용자인지 확인
    ///
    /// 소셜 전용 계정은 비밀번호 해시가 없으므로 로컬 로그인과
    /// 패스워드 업그레이드 경로에서 제외됩니다.
    pub fn can_authenticate_with_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// 연결된 소셜 프로바이더 목록
    pub fn connected_providers(&self) -> Vec<SocialProvider> {
        SocialProvider::ALL
            .into_iter()
            .filter(|p| self.provider_id(*p).is_some())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_local_user_defaults() {
        let user = User::new_local("alice@example.com".to_string(), "$2b$04$hash".to_string());

        assert_eq!(user.roles, vec!["USER".to_string()]);
        assert!(user.can_authenticate_with_password());
        assert!(user.connected_providers().is_empty());
    }

    #[test]
    fn test_from_social_identity_sets_provider_field() {
        let identity = SocialIdentity::Email {
            id: "123".to_string(),
            email: "a@example.com".to_string(),
        };
        let user = User::from_social_identity(&identity, SocialProvider::Github);

        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.github_id.as_deref(), Some("123"));
        assert_eq!(user.google_id, None);
        assert_eq!(user.roles, vec!["USER".to_string()]);
        assert!(!user.can_authenticate_with_password());
    }

    #[test]
    fn test_provider_id_dispatch() {
        let identity = SocialIdentity::Nickname {
            id: "456".to_string(),
            nickname: "bob".to_string(),
        };
        let mut user = User::from_social_identity(&identity, SocialProvider::Instagram);

        assert_eq!(user.provider_id(SocialProvider::Instagram), Some("456"));
        assert_eq!(user.provider_id(SocialProvider::Google), None);

        user.set_provider_id(SocialProvider::Google, "789".to_string());
        assert_eq!(user.provider_id(SocialProvider::Google), Some("789"));
        assert_eq!(
            user.connected_providers(),
            vec![SocialProvider::Google, SocialProvider::Instagram]
        );
    }
}
