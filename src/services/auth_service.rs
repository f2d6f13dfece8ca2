//! 认证服务
//!
//! 访问令牌 + 刷新令牌模式：刷新令牌落库只存 SHA-256 哈希，
//! 刷新时旧令牌吊销并记录轮换链。

use crate::{
    auth::{JwtService, PasswordHasher, TokenPair},
    config::SecurityConfig,
    error::AppError,
    models::{
        auth::{LoginRequest, LoginResponse},
        user::{ChangePasswordRequest, CreateUserRequest, User, UserResponse, UserRole},
    },
    repository::{AuthRepository, UserRepository},
};
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

pub struct AuthService {
    users: Arc<UserRepository>,
    tokens: Arc<AuthRepository>,
    jwt: Arc<JwtService>,
    hasher: PasswordHasher,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(
        users: Arc<UserRepository>,
        tokens: Arc<AuthRepository>,
        jwt: Arc<JwtService>,
        security: SecurityConfig,
    ) -> Self {
        Self {
            users,
            tokens,
            jwt,
            hasher: PasswordHasher::new(),
            security,
        }
    }

    /// 用户名密码登录
    pub async fn login(
        &self,
        req: &LoginRequest,
        user_agent: Option<&str>,
        ip_address: &str,
    ) -> Result<LoginResponse, AppError> {
        let user = self
            .users
            .get_by_username(&req.username)
            .await?
            .ok_or_else(|| {
                // 不区分用户不存在与密码错误
                AppError::authentication("Invalid username or password")
            })?;

        if user.status != "enabled" {
            tracing::warn!(username = %req.username, "Login attempt for disabled account");
            return Err(AppError::authentication("Account is disabled"));
        }

        self.hasher
            .verify(&req.password, &user.password_hash)
            .map_err(|_| AppError::authentication("Invalid username or password"))?;

        let pair = self.issue_tokens(&user, user_agent, ip_address).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User logged in");
        metrics::counter!("auth.login.success").increment(1);

        Ok(LoginResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.expires_in,
            user: user.into(),
        })
    }

    /// 刷新令牌轮换：旧令牌吊销并指向新令牌
    pub async fn refresh(
        &self,
        refresh_token: &str,
        user_agent: Option<&str>,
        ip_address: &str,
    ) -> Result<TokenPair, AppError> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        let stored = self
            .tokens
            .find_by_hash(&hash_token(refresh_token))
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !stored.is_valid(Utc::now()) {
            // 已吊销令牌被重用，吊销该用户全部会话
            if stored.revoked_at.is_some() {
                tracing::warn!(user_id = %stored.user_id, "Revoked refresh token reused");
                self.tokens.revoke_all_for_user(stored.user_id).await?;
            }
            return Err(AppError::Unauthorized);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if user.status != "enabled" {
            return Err(AppError::Unauthorized);
        }

        let pair = self.issue_tokens(&user, user_agent, ip_address).await?;

        let new_id = jti_of(&self.jwt.validate_refresh_token(&pair.refresh_token)?)?;
        self.tokens.revoke(stored.id, Some(new_id)).await?;

        Ok(pair)
    }

    /// 登出：吊销刷新令牌
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        if let Some(stored) = self.tokens.find_by_hash(&hash_token(refresh_token)).await? {
            self.tokens.revoke(stored.id, None).await?;
        }
        // 未知令牌的登出静默成功
        Ok(())
    }

    /// 创建用户（管理员操作）
    pub async fn create_user(
        &self,
        organisation_id: Uuid,
        req: &CreateUserRequest,
        created_by: Uuid,
    ) -> Result<UserResponse, AppError> {
        if req.username.trim().is_empty() {
            return Err(AppError::validation("Username must not be empty"));
        }

        let role = match &req.role {
            Some(r) => UserRole::parse(r)
                .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", r)))?,
            None => UserRole::User,
        };

        PasswordHasher::validate_password_policy(&req.password, &self.security)?;

        if self.users.get_by_username(&req.username).await?.is_some() {
            return Err(AppError::validation("Username already taken"));
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .users
            .create(
                organisation_id,
                req.username.trim(),
                req.email.as_deref(),
                &password_hash,
                role.as_str(),
                req.full_name.as_deref(),
                Some(created_by),
            )
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user.into())
    }

    /// 修改密码，成功后吊销全部刷新令牌
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: &ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.hasher
            .verify(&req.old_password, &user.password_hash)
            .map_err(|_| AppError::authentication("Old password is incorrect"))?;

        PasswordHasher::validate_password_policy(&req.new_password, &self.security)?;

        let new_hash = self.hasher.hash(&req.new_password)?;
        self.users.update_password(user_id, &new_hash).await?;
        self.tokens.revoke_all_for_user(user_id).await?;

        tracing::info!(user_id = %user_id, "Password changed, sessions revoked");
        Ok(())
    }

    async fn issue_tokens(
        &self,
        user: &User,
        user_agent: Option<&str>,
        ip_address: &str,
    ) -> Result<TokenPair, AppError> {
        let pair = self.jwt.generate_token_pair(
            &user.id,
            &user.username,
            &user.role,
            &user.organisation_id,
        )?;

        let claims = self.jwt.validate_refresh_token(&pair.refresh_token)?;
        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .unwrap_or_else(|| Utc::now() + Duration::days(7));

        self.tokens
            .insert_refresh_token(
                jti_of(&claims)?,
                &hash_token(&pair.refresh_token),
                user.id,
                user_agent,
                ip_address,
                expires_at,
            )
            .await?;

        Ok(pair)
    }
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

fn jti_of(claims: &crate::auth::Claims) -> Result<Uuid, AppError> {
    Uuid::parse_str(&claims.jti)
        .map_err(|_| AppError::internal_error("Malformed token identifier"))
}
