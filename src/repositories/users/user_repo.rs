//! # 사용자 리포지토리 구현
//!
//! 사용자 엔티티의 데이터 액세스 계층을 담당하는 리포지토리입니다.
//! MongoDB를 주 저장소로 사용하고, Redis를 통한 캐싱을 지원합니다.
//!
//! ## 특징
//!
//! - **하이브리드 스토리지**: MongoDB + Redis 캐싱
//! - **명시적 의존성 주입**: 생성자를 통한 DI
//! - **소셜 재조정**: OAuth 프로필을 로컬 사용자 계정에 재조정
//! - **데이터 무결성**: 유니크 제약 조건 및 인덱스 관리

use std::sync::Arc;

use futures_util::TryStreamExt;
use log::info;
use mongodb::{
    bson::{doc, oid::ObjectId, DateTime},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    caching::redis::RedisClient,
    config::SocialProvider,
    db::Database,
    domain::entities::users::user::User,
    domain::models::oauth::social_identity::SocialIdentity,
    errors::errors::AppError,
};

/// 사용자 조회 캐시 TTL (초)
const USER_CACHE_TTL: usize = 600;

/// 소셜 재조정 결과
///
/// 순수 함수 [`reconcile`]이 내리는 결정입니다. 실제 DB 쓰기는
/// [`UserRepository::find_or_create_from_oauth`]가 이 결정을 해석하여
/// 수행합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// 일치하는 사용자가 있고 프로바이더 ID도 이미 연결됨. 쓰기 없음.
    Existing(User),
    /// 이메일로 일치했지만 프로바이더 ID가 비어 있음. `$set`으로 채워야 함.
    Backfill(User),
    /// 일치하는 사용자 없음. 새로 생성해야 함.
    Create(User),
}

/// OAuth 프로필과 조회 결과를 재조정합니다.
///
/// 결정 규칙:
///
/// 1. 일치 사용자가 2명 이상이면 [`AppError::NonUniqueResult`].
///    데이터 무결성 문제이므로 임의의 한 명을 선택하지 않습니다.
/// 2. 정확히 1명이면 그 사용자를 재사용합니다. 해당 프로바이더의
///    외부 ID가 아직 비어 있는 경우에만 채웁니다(백필). 이미 값이
///    있으면 덮어쓰지 않습니다.
/// 3. 0명이면 프로필로부터 새 사용자를 만듭니다. 기본 역할은 "USER"
///    이고 비밀번호는 없습니다.
pub fn reconcile(
    mut matches: Vec<User>,
    identity: &SocialIdentity,
    provider: SocialProvider,
) -> Result<Reconciliation, AppError> {
    if matches.len() > 1 {
        return Err(AppError::NonUniqueResult(format!(
            "{}명의 사용자가 {} 프로필(외부 ID {})과 일치합니다",
            matches.len(),
            provider,
            identity.provider_id()
        )));
    }

    match matches.pop() {
        Some(mut user) => {
            if user.provider_id(provider).is_some() {
                Ok(Reconciliation::Existing(user))
            } else {
                user.set_provider_id(provider, identity.provider_id().to_string());
                Ok(Reconciliation::Backfill(user))
            }
        }
        None => Ok(Reconciliation::Create(User::from_social_identity(
            identity, provider,
        ))),
    }
}

/// 사용자 데이터 액세스 리포지토리
///
/// 이 리포지토리는 사용자 엔티티의 CRUD 연산과 OAuth 재조정을 담당하며,
/// MongoDB 컬렉션과 Redis 캐시를 통합하여 최적화된 데이터 액세스를 제공합니다.
///
/// ## 캐싱 전략
///
/// - **TTL**: 10분 (600초)
/// - **키 패턴**:
///   - 개별 사용자: `user:{user_id}`
///   - 이메일 조회: `user:email:{email}`
/// - **쓰기 후 무효화**: 백필, 패스워드 업그레이드 시 관련 키 제거
pub struct UserRepository {
    /// MongoDB 데이터베이스 연결
    db: Arc<Database>,

    /// Redis 캐시 클라이언트
    redis: Arc<RedisClient>,
}

impl UserRepository {
    /// 명시적 의존성으로 리포지토리를 생성합니다.
    pub fn new(db: Arc<Database>, redis: Arc<RedisClient>) -> Self {
        Self { db, redis }
    }

    /// `users` 컬렉션 핸들
    fn collection(&self) -> Collection<User> {
        self.db.get_database().collection::<User>("users")
    }

    /// 이메일 주소로 사용자 조회
    ///
    /// 캐시 우선 조회를 통해 성능을 최적화합니다.
    ///
    /// # 캐싱 정책
    ///
    /// - **캐시 키**: `user:email:{email}`
    /// - **TTL**: 600초 (10분)
    /// - **캐시 미스**: MongoDB에서 조회 후 캐시에 저장
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        // 캐시에서 먼저 확인
        let cache_key = format!("user:email:{}", email);

        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        // DB 에서 조회
        let user = self
            .collection()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시에 저장 (10분)
        if let Some(ref user) = user {
            let _ = self
                .redis
                .set_with_expiry(&cache_key, user, USER_CACHE_TTL)
                .await;
        }

        Ok(user)
    }

    /// ID로 사용자 조회
    ///
    /// 세션 기반 인증에서 매 요청마다 호출되므로 적극적인 캐싱을 적용합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(Some(User))` - 사용자를 찾은 경우
    /// * `Ok(None)` - 해당 ID의 사용자가 없는 경우
    /// * `Err(AppError::ValidationError)` - 잘못된 ObjectId 형식
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = ObjectId::parse_str(id)
            .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))?;

        let cache_key = format!("user:{}", id);

        // 캐시 확인
        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        // DB 조회
        let user = self
            .collection()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시 저장
        if let Some(ref user) = user {
            let _ = self
                .redis
                .set_with_expiry(&cache_key, user, USER_CACHE_TTL)
                .await;
        }

        Ok(user)
    }

    /// 새 사용자 생성
    ///
    /// 이메일 중복 여부를 사전에 검증하고, 생성된 사용자(ID 포함)를
    /// 반환합니다.
    ///
    /// # 반환값
    ///
    /// * `Ok(User)` - 생성된 사용자 (ID 포함)
    /// * `Err(AppError::ConflictError)` - 이메일 중복
    /// * `Err(AppError::DatabaseError)` - 데이터베이스 오류
    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        // 중복 확인
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError(
                "이미 사용 중인 이메일입니다".to_string(),
            ));
        }

        // DB에 저장
        let result = self
            .collection()
            .insert_one(&user)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        user.id = result.inserted_id.as_object_id();

        Ok(user)
    }

    /// OAuth 프로필로 사용자를 찾거나 생성합니다.
    ///
    /// 소셜 로그인의 핵심 재조정 연산입니다. 다음 순서로 동작합니다:
    ///
    /// 1. **조회**: `(프로바이더 ID 필드 = 외부 ID) OR (email = 이메일/닉네임)`
    ///    조건으로 최대 2건을 조회합니다. 2건이면 모호한 상태이므로
    ///    쓰기 없이 [`AppError::NonUniqueResult`]를 반환합니다.
    /// 2. **결정**: [`reconcile`]이 기존 재사용 / 백필 / 생성을 결정합니다.
    /// 3. **쓰기**: 백필은 `$set`으로 프로바이더 ID 필드만 갱신하고
    ///    관련 캐시를 무효화합니다. 생성은 새 문서를 삽입합니다.
    ///
    /// 닉네임 기반 프로바이더(GitHub, Instagram)의 경우 닉네임이 `email`
    /// 필드와 비교됩니다. 이는 로컬 가입 시 닉네임을 이메일 자리에 쓰는
    /// 레거시 계정을 같은 사용자로 묶기 위한 규칙입니다.
    pub async fn find_or_create_from_oauth(
        &self,
        provider: SocialProvider,
        identity: &SocialIdentity,
    ) -> Result<User, AppError> {
        let id_field = provider.id_field();
        let filter = doc! {
            "$or": [
                { id_field: identity.provider_id() },
                { "email": identity.email_or_nickname() },
            ]
        };

        // 모호성 판정에는 2건이면 충분하므로 그 이상 읽지 않습니다.
        let mut cursor = self
            .collection()
            .find(filter)
            .limit(2)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let mut matches = Vec::new();
        while let Some(user) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?
        {
            matches.push(user);
        }

        match reconcile(matches, identity, provider)? {
            Reconciliation::Existing(user) => Ok(user),
            Reconciliation::Backfill(user) => {
                let object_id = user.id.ok_or_else(|| {
                    AppError::InternalError("백필 대상 사용자에 ID가 없습니다".to_string())
                })?;

                self.collection()
                    .update_one(
                        doc! { "_id": object_id },
                        doc! { "$set": {
                            id_field: identity.provider_id(),
                            "updated_at": DateTime::now(),
                        } },
                    )
                    .await
                    .map_err(|e| AppError::DatabaseError(e.to_string()))?;

                // 이전 상태가 캐시에 남지 않도록 무효화
                let _ = self
                    .redis
                    .del_multiple(&[
                        format!("user:{}", object_id.to_hex()),
                        format!("user:email:{}", user.email),
                    ])
                    .await;

                info!(
                    "{} 계정 백필 완료: user={}",
                    provider,
                    object_id.to_hex()
                );

                Ok(user)
            }
            Reconciliation::Create(user) => {
                let created = self.create(user).await?;

                info!(
                    "{} 프로필로 신규 사용자 생성: user={}",
                    provider,
                    created.id_string().unwrap_or_default()
                );

                Ok(created)
            }
        }
    }

    /// 비밀번호 해시를 교체합니다.
    ///
    /// 로그인 성공 시 해시 비용이 현재 설정보다 낮은 경우 재해싱하는
    /// 업그레이드 경로에서 호출됩니다. 비밀번호가 없는 소셜 전용 계정은
    /// 이 경로의 대상이 아니므로 [`AppError::UnsupportedUser`]를 반환합니다.
    pub async fn upgrade_password(
        &self,
        user: &User,
        new_password_hash: String,
    ) -> Result<(), AppError> {
        if !user.can_authenticate_with_password() {
            return Err(AppError::UnsupportedUser(
                "비밀번호가 없는 소셜 전용 계정입니다".to_string(),
            ));
        }

        let object_id = user.id.ok_or_else(|| {
            AppError::InternalError("업그레이드 대상 사용자에 ID가 없습니다".to_string())
        })?;

        self.collection()
            .update_one(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "password_hash": new_password_hash,
                    "updated_at": DateTime::now(),
                } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시 무효화
        let _ = self
            .redis
            .del_multiple(&[
                format!("user:{}", object_id.to_hex()),
                format!("user:email:{}", user.email),
            ])
            .await;

        Ok(())
    }

    /// 데이터베이스 인덱스 생성
    ///
    /// 애플리케이션 초기화 시점에 한 번 실행하여 쿼리 성능을 최적화합니다.
    ///
    /// # 생성되는 인덱스
    ///
    /// 1. **이메일 유니크 인덱스**: 중복 이메일 방지 및 재조정 조회 최적화
    /// 2. **프로바이더 ID 인덱스**: 프로바이더별 sparse 인덱스.
    ///    소셜 계정이 아닌 문서에는 해당 필드가 없으므로 sparse로 만듭니다.
    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection();

        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("email_unique".to_string())
                    .build(),
            )
            .build();

        let mut indexes = vec![email_index];

        // 프로바이더별 외부 ID sparse 인덱스
        for provider in SocialProvider::ALL {
            let id_field = provider.id_field();
            indexes.push(
                IndexModel::builder()
                    .keys(doc! { id_field: 1 })
                    .options(
                        IndexOptions::builder()
                            .sparse(true)
                            .name(format!("{}_sparse", id_field))
                            .build(),
                    )
                    .build(),
            );
        }

        collection
            .create_indexes(indexes)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        info!("✅ users 컬렉션 인덱스 생성 완료");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_identity(id: &str, email: &str) -> SocialIdentity {
        SocialIdentity::Email {
            id: id.to_string(),
            email: email.to_string(),
        }
    }

    fn nickname_identity(id: &str, nickname: &str) -> SocialIdentity {
        SocialIdentity::Nickname {
            id: id.to_string(),
            nickname: nickname.to_string(),
        }
    }

    fn stored_user(email: &str) -> User {
        let mut user = User::new_local(email.to_string(), "$2b$04$hash".to_string());
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_reconcile_creates_new_user_when_no_match() {
        let identity = email_identity("123", "a@example.com");
        let result = reconcile(vec![], &identity, SocialProvider::Github).unwrap();

        match result {
            Reconciliation::Create(user) => {
                assert_eq!(user.email, "a@example.com");
                assert_eq!(user.github_id.as_deref(), Some("123"));
                assert_eq!(user.roles, vec!["USER".to_string()]);
                assert!(user.password_hash.is_none());
            }
            other => panic!("Create를 기대했지만 {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_backfills_unset_provider_id() {
        // 로컬 가입 시 닉네임을 이메일 자리에 쓴 레거시 계정
        let existing = stored_user("bob");
        let identity = nickname_identity("456", "bob");

        let result = reconcile(vec![existing.clone()], &identity, SocialProvider::Google).unwrap();

        match result {
            Reconciliation::Backfill(user) => {
                assert_eq!(user.id, existing.id);
                assert_eq!(user.google_id.as_deref(), Some("456"));
                // 다른 필드는 변경하지 않음
                assert_eq!(user.email, "bob");
                assert_eq!(user.password_hash, existing.password_hash);
            }
            other => panic!("Backfill을 기대했지만 {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_reuses_user_without_overwriting() {
        let mut existing = stored_user("alice@example.com");
        existing.set_provider_id(SocialProvider::Github, "123".to_string());

        let identity = nickname_identity("123", "alice");
        let result = reconcile(vec![existing.clone()], &identity, SocialProvider::Github).unwrap();

        // 프로바이더 ID가 이미 연결되어 있으면 쓰기 없이 그대로 재사용
        assert_eq!(result, Reconciliation::Existing(existing));
    }

    #[test]
    fn test_reconcile_preserves_existing_id_on_mismatch() {
        // 이메일로 일치했지만 이미 다른 외부 ID가 연결된 경우 덮어쓰지 않음
        let mut existing = stored_user("carol@example.com");
        existing.set_provider_id(SocialProvider::Facebook, "old-id".to_string());

        let identity = email_identity("new-id", "carol@example.com");
        let result = reconcile(vec![existing], &identity, SocialProvider::Facebook).unwrap();

        match result {
            Reconciliation::Existing(user) => {
                assert_eq!(user.facebook_id.as_deref(), Some("old-id"));
            }
            other => panic!("Existing을 기대했지만 {:?}", other),
        }
    }

    #[test]
    fn test_reconcile_rejects_ambiguous_match() {
        // 외부 ID로 한 명, 이메일로 다른 한 명이 일치하는 모호한 상태
        let by_provider_id = {
            let mut user = stored_user("dave@example.com");
            user.set_provider_id(SocialProvider::Instagram, "789".to_string());
            user
        };
        let by_email = stored_user("dave");

        let identity = nickname_identity("789", "dave");
        let result = reconcile(
            vec![by_provider_id, by_email],
            &identity,
            SocialProvider::Instagram,
        );

        assert!(matches!(result, Err(AppError::NonUniqueResult(_))));
    }

    #[test]
    fn test_reconcile_new_user_has_no_other_provider_ids() {
        let identity = email_identity("999", "eve@example.com");
        let result = reconcile(vec![], &identity, SocialProvider::Facebook).unwrap();

        match result {
            Reconciliation::Create(user) => {
                assert_eq!(user.facebook_id.as_deref(), Some("999"));
                assert_eq!(user.github_id, None);
                assert_eq!(user.google_id, None);
                assert_eq!(user.instagram_id, None);
            }
            other => panic!("Create를 기대했지만 {:?}", other),
        }
    }
}
