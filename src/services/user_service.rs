use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::external::OpenCageService;
use crate::models::*;
use crate::utils::*;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    geocoder: OpenCageService,
}

impl UserService {
    pub fn new(pool: DatabaseConnection, geocoder: OpenCageService) -> Self {
        Self { pool, geocoder }
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_profile(&self, user_id: i64) -> AppResult<UserResponse> {
        Ok(self.get_user_by_id(user_id).await?.into())
    }

    /// Updates the profile. A seller whose address changes is geocoded;
    /// a failed lookup leaves the previous coordinates in place.
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<UserResponse> {
        let user = self.get_user_by_id(user_id).await?;
        let relocate = user.role == UserRole::Seller && request.touches_location();

        let mut am = user.clone().into_active_model();

        if let Some(name) = &request.name {
            am.name = Set(require_text("Name", name, 100)?);
        }
        if let Some(phone) = &request.phone {
            am.phone = Set(match phone.trim() {
                "" => None,
                p => {
                    validate_phone(p)?;
                    Some(normalize_phone(p))
                }
            });
        }
        if let Some(address) = &request.address {
            am.address = Set(optional_text("Address", Some(address), 255)?);
        }
        if let Some(city) = &request.city {
            am.city = Set(optional_text("City", Some(city), 100)?);
        }
        if let Some(postal_code) = &request.postal_code {
            let postal_code = postal_code.trim();
            if postal_code.is_empty() {
                am.postal_code = Set(None);
            } else {
                validate_postal_code(postal_code)?;
                am.postal_code = Set(Some(postal_code.to_string()));
            }
        }
        if let Some(store_name) = &request.store_name {
            if user.role != UserRole::Seller {
                return Err(AppError::ValidationError(
                    "Only sellers have a store name".to_string(),
                ));
            }
            am.store_name = Set(Some(require_text("Store name", store_name, 120)?));
        }

        if relocate {
            let query = location_query(
                am.address.as_ref().as_deref(),
                am.city.as_ref().as_deref(),
                am.postal_code.as_ref().as_deref(),
            );
            if let Some(query) = query {
                match self.geocoder.geocode_with_fallback(&query).await {
                    Ok(Some(hit)) => {
                        am.latitude = Set(Some(hit.latitude));
                        am.longitude = Set(Some(hit.longitude));
                    }
                    Ok(None) => log::warn!("No coordinates found for seller {user_id}"),
                    Err(e) => log::warn!("Geocoding seller {user_id} failed: {e}"),
                }
            }
        }

        am.updated_at = Set(Some(Utc::now()));
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }
}

/// "address, city, postal_code" with blanks skipped.
fn location_query(
    address: Option<&str>,
    city: Option<&str>,
    postal_code: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [address, city, postal_code]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_query() {
        assert_eq!(
            location_query(Some("Jl. Braga 10"), Some("Bandung"), Some("40111")).as_deref(),
            Some("Jl. Braga 10, Bandung, 40111")
        );
        assert_eq!(
            location_query(None, Some(" Bandung "), Some("")).as_deref(),
            Some("Bandung")
        );
        assert_eq!(location_query(None, None, None), None);
    }
}
