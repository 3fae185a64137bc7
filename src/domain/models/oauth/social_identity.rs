//! # 소셜 아이덴티티 모델
//!
//! 프로바이더가 반환한 프로필에서 재조정에 필요한 최소 정보만 담는
//! 일시적(transient) 모델입니다. 영구 저장되지 않으며, 한 번의 인증
//! 시도 동안만 유효합니다.
//!
//! 프로바이더 프로필은 두 가지 형태로 나뉩니다. 이메일을 제공하는
//! 프로바이더(Google, Facebook)와 닉네임만 제공하는 프로바이더
//! (GitHub, Instagram)입니다. 런타임 존재 여부 검사 대신 두 경우를
//! 명시적인 variant로 구분합니다.

use serde::{Deserialize, Serialize};

/// 프로바이더가 반환한 인증된 최종 사용자의 프로필 데이터
///
/// 두 variant 모두 프로바이더 쪽 고유 외부 ID를 가지며, 보조 식별자로
/// 이메일 또는 닉네임 중 하나를 가집니다. 재조정 조회에서는
/// [`Self::email_or_nickname`]이 이메일 일치 경로의 비교값으로 쓰입니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocialIdentity {
    /// 이메일 기반 프로필 (Google, Facebook)
    Email {
        /// 프로바이더 쪽 고유 사용자 ID
        id: String,
        /// 프로바이더가 검증한 이메일 주소
        email: String,
    },
    /// 닉네임 기반 프로필 (GitHub, Instagram)
    Nickname {
        /// 프로바이더 쪽 고유 사용자 ID
        id: String,
        /// 프로바이더 계정의 닉네임 (GitHub login, Instagram username)
        nickname: String,
    },
}

impl SocialIdentity {
    /// 프로바이더 쪽 고유 외부 ID
    pub fn provider_id(&self) -> &str {
        match self {
            SocialIdentity::Email { id, .. } => id,
            SocialIdentity::Nickname { id, .. } => id,
        }
    }

    /// 이메일 또는 닉네임 (프로필 형태에 따라)
    ///
    /// 재조정 시 로컬 사용자의 `email` 필드와 비교되는 값입니다.
    pub fn email_or_nickname(&self) -> &str {
        match self {
            SocialIdentity::Email { email, .. } => email,
            SocialIdentity::Nickname { nickname, .. } => nickname,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_identity_accessors() {
        let identity = SocialIdentity::Email {
            id: "123".to_string(),
            email: "a@example.com".to_string(),
        };

        assert_eq!(identity.provider_id(), "123");
        assert_eq!(identity.email_or_nickname(), "a@example.com");
    }

    #[test]
    fn test_nickname_identity_accessors() {
        let identity = SocialIdentity::Nickname {
            id: "456".to_string(),
            nickname: "bob".to_string(),
        };

        assert_eq!(identity.provider_id(), "456");
        assert_eq!(identity.email_or_nickname(), "bob");
    }
}
