use crate::entities::review_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub order_id: i64,
    #[schema(example = 5, minimum = 1, maximum = 5)]
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewQuery {
    pub meal_id: i64,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i64,
    pub order_id: i64,
    pub meal_id: i64,
    pub buyer_id: i64,
    pub buyer_name: Option<String>,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReviewResponse {
    pub fn build(m: review_entity::Model, buyer_name: Option<String>) -> Self {
        Self {
            id: m.id,
            order_id: m.order_id,
            meal_id: m.meal_id,
            buyer_id: m.buyer_id,
            buyer_name,
            rating: m.rating,
            comment: m.comment,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MealReviewsResponse {
    pub meal_id: i64,
    pub average_rating: Option<f64>,
    pub review_count: u64,
    pub reviews: Vec<ReviewResponse>,
    pub page: u32,
    pub total_pages: u64,
}
