//! 认证服务：登录、注册

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher, AuthError},
    config::SecurityConfig,
    error::AppError,
    models::{auth::*, user::*},
    repository::UserStore,
};
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    store: Arc<dyn UserStore>,
    jwt_service: Arc<JwtService>,
    hasher: PasswordHasher,
    password_min_length: usize,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn UserStore>,
        jwt_service: Arc<JwtService>,
        config: &SecurityConfig,
    ) -> Self {
        Self {
            store,
            jwt_service,
            hasher: PasswordHasher::new(),
            password_min_length: config.password_min_length,
        }
    }

    /// 用户登录
    ///
    /// Unknown identifier and wrong secret both end in `InvalidCredential`.
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let identifier = normalize_identifier(&req.identifier);

        let user = match self.store.find_by_email(&identifier).await? {
            Some(user) => user,
            None => {
                self.hasher.verify_dummy(&req.secret);
                tracing::debug!("Login failed: unknown identifier");
                return Err(AuthError::InvalidCredential.into());
            }
        };

        if !self.hasher.verify(&req.secret, &user.password_hash) {
            tracing::info!(user_id = user.user_id, "Login failed: secret mismatch");
            return Err(AuthError::InvalidCredential.into());
        }

        let issued = self.jwt_service.issue(&user.email, user.user_id)?;

        tracing::info!(user_id = user.user_id, "Login succeeded");

        Ok(LoginResponse {
            token: issued.token,
            expires_in: issued.expires_in,
            user_id: user.user_id,
        })
    }

    /// 创建用户
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<CreateUserResponse, AppError> {
        let req = req.normalized();
        req.validate()?;
        PasswordHasher::validate_password_policy(&req.password, self.password_min_length)?;

        let password_hash = self.hasher.hash(&req.password)?;

        let new_user = NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password_hash,
            condition: req.condition,
            color: req.color,
        };

        let user = self.store.insert(&new_user).await.inspect_err(|e| {
            if matches!(e, AppError::DuplicateIdentifier) {
                tracing::debug!("User creation rejected: duplicate identifier");
            }
        })?;

        tracing::info!(user_id = user.user_id, "User created");

        Ok(CreateUserResponse {
            identifier: user.email,
            user_id: user.user_id,
        })
    }
}
