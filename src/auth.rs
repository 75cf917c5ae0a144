//! Sign-in, registration and the persisted session token.

use crate::api::{ApiClient, ApiError, AuthSession, LoginRequest, RegisterRequest};
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use crate::types::{UserProfile, UserRole};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill all fields.")]
    MissingFields,

    #[error("Please fill all required fields.")]
    MissingRequired,

    #[error("Please provide soil / land type.")]
    MissingSoilType,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("could not save session: {0}")]
    Storage(#[from] StorageError),
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginForm {
    pub role: UserRole,
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterForm {
    pub role: UserRole,
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub soil_type: String,
    pub pincode: String,
    pub state: String,
    pub district: String,
    pub city: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty()
        {
            return Err(FormError::MissingRequired);
        }
        if self.role == UserRole::Farmer && self.soil_type.trim().is_empty() {
            return Err(FormError::MissingSoilType);
        }
        Ok(RegisterRequest {
            role: self.role,
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: non_blank(&self.phone),
            soil_type: non_blank(&self.soil_type),
            pincode: non_blank(&self.pincode),
            state: non_blank(&self.state),
            district: non_blank(&self.district),
            city: non_blank(&self.city),
        })
    }
}

/// The token and user profile kept between launches. Nothing here expires
/// them; a later sign-in overwrites both.
#[derive(Clone, Debug, Default)]
pub struct AuthStore {
    store: KeyValueStore,
}

impl AuthStore {
    pub fn new(store: KeyValueStore) -> Self {
        Self { store }
    }

    pub fn save(&self, session: &AuthSession) -> StorageResult<()> {
        self.store.set(TOKEN_KEY, &session.token)?;
        self.store_user(&session.user)
    }

    pub fn store_user(&self, user: &UserProfile) -> StorageResult<()> {
        self.store.set_json(USER_KEY, user)
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    pub fn cached_user(&self) -> Option<UserProfile> {
        self.store.get_json(USER_KEY)
    }

    pub fn sign_out(&self) -> StorageResult<()> {
        self.store.delete(TOKEN_KEY)?;
        self.store.delete(USER_KEY)
    }
}

pub async fn login(
    client: &ApiClient,
    store: &AuthStore,
    form: &LoginForm,
) -> Result<UserProfile, AuthError> {
    let request = form.validate()?;
    let session = client.login(&request).await?;
    store.save(&session)?;
    tracing::info!(role = ?form.role, "signed in");
    Ok(session.user)
}

pub async fn register(
    client: &ApiClient,
    store: &AuthStore,
    form: &RegisterForm,
) -> Result<UserProfile, AuthError> {
    let request = form.validate()?;
    let session = client.register(&request).await?;
    store.save(&session)?;
    tracing::info!(role = ?form.role, "registered");
    Ok(session.user)
}

/// Loads the signed-in user: `None` without a token, the fresh profile when
/// the backend answers, otherwise whatever profile was cached.
pub async fn load_profile(client: &ApiClient, store: &AuthStore) -> Option<UserProfile> {
    let token = store.token()?;
    match client.me(&token).await {
        Ok(user) => {
            if let Err(err) = store.store_user(&user) {
                tracing::warn!(error = %err, "could not cache profile");
            }
            Some(user)
        }
        Err(err) => {
            tracing::warn!(error = %err, "profile fetch failed, using cached profile");
            store.cached_user()
        }
    }
}
