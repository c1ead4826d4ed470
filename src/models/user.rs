use crate::entities::{UserRole, user_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "Budi Santoso")]
    pub name: String,
    #[schema(example = "budi@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
    pub role: Option<UserRole>,
    #[schema(example = "081234567890")]
    pub phone: Option<String>,
    /// Required when registering as a seller.
    pub store_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "budi@example.com")]
    pub email: String,
    #[schema(example = "Password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    #[schema(example = "12190")]
    pub postal_code: Option<String>,
    pub store_name: Option<String>,
}

impl UpdateProfileRequest {
    pub fn touches_location(&self) -> bool {
        self.address.is_some() || self.city.is_some() || self.postal_code.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub store_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            role: m.role,
            phone: m.phone,
            address: m.address,
            city: m.city,
            postal_code: m.postal_code,
            store_name: m.store_name,
            latitude: m.latitude,
            longitude: m.longitude,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Public view of a seller shown next to their meals.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SellerSummary {
    pub id: i64,
    pub name: String,
    pub store_name: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&user_entity::Model> for SellerSummary {
    fn from(m: &user_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name.clone(),
            store_name: m.store_name.clone(),
            city: m.city.clone(),
            latitude: m.latitude,
            longitude: m.longitude,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}
