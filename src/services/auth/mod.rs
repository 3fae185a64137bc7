pub mod oauth_client;
pub mod social_auth_service;

pub use oauth_client::OAuth2Client;
pub use social_auth_service::SocialAuthService;
