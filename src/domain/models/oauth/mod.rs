//! OAuth 관련 일시적 모델
//!
//! 프로바이더 프로필 응답과 재조정용 소셜 아이덴티티를 정의합니다.

pub mod social_identity;
pub mod provider_profiles;

pub use social_identity::SocialIdentity;
pub use provider_profiles::ProviderProfile;
