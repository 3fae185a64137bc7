//! 인증 관련 응답 DTO

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};

use crate::config::SocialProvider;
use crate::domain::entities::users::user::User;

/// 사용자 응답 DTO
///
/// 비밀번호 해시 등 내부 필드를 제외한 공개 가능한 정보만 담습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,

    /// 이 계정에 연결된 소셜 프로바이더 목록
    pub connected_providers: Vec<SocialProvider>,

    /// 비밀번호 로그인 가능 여부
    pub has_password: bool,

    pub roles: Vec<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let id = user.id_string().unwrap_or_default();
        let connected_providers = user.connected_providers();
        let has_password = user.can_authenticate_with_password();

        Self {
            id,
            email: user.email,
            connected_providers,
            has_password,
            roles: user.roles,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::oauth::SocialIdentity;

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::new_local("user@example.com".to_string(), "$2b$04$hash".to_string());
        let response = UserResponse::from(user);

        assert_eq!(response.email, "user@example.com");
        assert!(response.has_password);
        assert!(response.connected_providers.is_empty());

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("hash"));
    }

    #[test]
    fn test_user_response_for_social_account() {
        let identity = SocialIdentity::Nickname {
            id: "42".to_string(),
            nickname: "octocat".to_string(),
        };
        let user = User::from_social_identity(&identity, SocialProvider::Github);
        let response = UserResponse::from(user);

        assert!(!response.has_password);
        assert_eq!(response.connected_providers, vec![SocialProvider::Github]);
        assert_eq!(response.roles, vec!["USER".to_string()]);
    }
}
