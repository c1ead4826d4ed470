use crate::entities::meal_entity;
use crate::models::SellerSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMealRequest {
    #[schema(example = "Nasi Goreng Spesial")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = "rice")]
    pub category: Option<String>,
    /// Selling price in Rupiah.
    #[schema(example = 15000)]
    pub price: i64,
    #[schema(example = 30000)]
    pub original_price: Option<i64>,
    #[schema(example = 10)]
    pub stock: i32,
    pub image_url: Option<String>,
    pub pickup_address: Option<String>,
    pub available_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<i64>,
    pub original_price: Option<i64>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
    pub pickup_address: Option<String>,
    pub is_active: Option<bool>,
    pub available_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct MealQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub seller_id: Option<i64>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SellerMealQuery {
    pub include_inactive: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MealResponse {
    pub id: i64,
    pub seller_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    /// Whole-percent saving against the original price.
    pub discount_percent: Option<i64>,
    pub stock: i32,
    pub image_url: Option<String>,
    pub pickup_address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_active: bool,
    pub available_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u64>,
}

impl MealResponse {
    pub fn with_seller(mut self, seller: Option<SellerSummary>) -> Self {
        self.seller = seller;
        self
    }

    pub fn with_rating(mut self, average_rating: Option<f64>, review_count: u64) -> Self {
        self.average_rating = average_rating;
        self.review_count = Some(review_count);
        self
    }
}

pub fn discount_percent(price: i64, original_price: Option<i64>) -> Option<i64> {
    match original_price {
        Some(orig) if orig > price && orig > 0 => Some((orig - price) * 100 / orig),
        _ => None,
    }
}

impl From<meal_entity::Model> for MealResponse {
    fn from(m: meal_entity::Model) -> Self {
        Self {
            id: m.id,
            seller_id: m.seller_id,
            discount_percent: discount_percent(m.price, m.original_price),
            name: m.name,
            description: m.description,
            category: m.category,
            price: m.price,
            original_price: m.original_price,
            stock: m.stock,
            image_url: m.image_url,
            pickup_address: m.pickup_address,
            latitude: m.latitude,
            longitude: m.longitude,
            is_active: m.is_active,
            available_until: m.available_until,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            seller: None,
            average_rating: None,
            review_count: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookmarkResponse {
    pub meal: MealResponse,
    pub bookmarked_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookmarkQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(15000, Some(30000)), Some(50));
        assert_eq!(discount_percent(20000, Some(30000)), Some(33));
        assert_eq!(discount_percent(30000, Some(30000)), None);
        assert_eq!(discount_percent(15000, None), None);
    }
}
