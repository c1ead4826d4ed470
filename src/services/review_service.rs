use crate::entities::{order_entity as orders, review_entity as reviews, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::order_status::{self, DisplayStatus, OrderState};
use crate::utils::optional_text;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};
use std::collections::HashMap;

const COMMENT_MAX: usize = 1000;

fn already_reviewed() -> AppError {
    AppError::InvalidState("This order has already been reviewed".to_string())
}

/// A concurrent review of the same order trips the unique index on
/// `order_id`; report it like the pre-insert check does.
fn classify_insert_error(sql_err: Option<SqlErr>, err: DbErr) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => already_reviewed(),
        _ => err.into(),
    }
}

/// Mean of the ratings rounded to one decimal, `None` when there are none.
pub fn average_rating(ratings: &[i16]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let sum: i64 = ratings.iter().map(|r| i64::from(*r)).sum();
    let mean = sum as f64 / ratings.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}

/// Average rating and review count for a meal.
pub async fn rating_summary<C: ConnectionTrait>(
    db: &C,
    meal_id: i64,
) -> AppResult<(Option<f64>, u64)> {
    let ratings: Vec<i16> = reviews::Entity::find()
        .filter(reviews::Column::MealId.eq(meal_id))
        .select_only()
        .column(reviews::Column::Rating)
        .into_tuple()
        .all(db)
        .await?;

    Ok((average_rating(&ratings), ratings.len() as u64))
}

#[derive(Clone)]
pub struct ReviewService {
    pool: DatabaseConnection,
}

impl ReviewService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_review(
        &self,
        buyer_id: i64,
        request: CreateReviewRequest,
    ) -> AppResult<ReviewResponse> {
        if !(1..=5).contains(&request.rating) {
            return Err(AppError::ValidationError(
                "Rating must be between 1 and 5".to_string(),
            ));
        }
        let comment = optional_text("Comment", request.comment.as_deref(), COMMENT_MAX)?;

        let order = orders::Entity::find_by_id(request.order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        if order.buyer_id != buyer_id {
            return Err(AppError::Forbidden);
        }

        let display = order_status::display_status(OrderState::of(&order));
        if display != DisplayStatus::Completed {
            return Err(AppError::InvalidState(format!(
                "Only completed orders can be reviewed (order is {display})"
            )));
        }

        let existing = reviews::Entity::find()
            .filter(reviews::Column::OrderId.eq(order.id))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(already_reviewed());
        }

        let review = reviews::ActiveModel {
            order_id: Set(order.id),
            meal_id: Set(order.meal_id),
            buyer_id: Set(buyer_id),
            seller_id: Set(order.seller_id),
            rating: Set(request.rating),
            comment: Set(comment),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await
        .map_err(|e| classify_insert_error(e.sql_err(), e))?;

        Ok(ReviewResponse::build(review, Some(order.buyer_name)))
    }

    pub async fn list_meal_reviews(&self, query: &ReviewQuery) -> AppResult<MealReviewsResponse> {
        let params = PaginationParams::new(query.page, query.per_page);
        let (average_rating, review_count) = rating_summary(&self.pool, query.meal_id).await?;

        let base_query = reviews::Entity::find().filter(reviews::Column::MealId.eq(query.meal_id));
        let total = base_query.clone().count(&self.pool).await?;
        let items = base_query
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let mut buyer_ids: Vec<i64> = items.iter().map(|r| r.buyer_id).collect();
        buyer_ids.sort_unstable();
        buyer_ids.dedup();
        let names: HashMap<i64, String> = if buyer_ids.is_empty() {
            HashMap::new()
        } else {
            users::Entity::find()
                .filter(users::Column::Id.is_in(buyer_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        let page = PaginatedResponse::new(items, &params, total);
        Ok(MealReviewsResponse {
            meal_id: query.meal_id,
            average_rating,
            review_count,
            page: page.page,
            total_pages: page.total_pages,
            reviews: page
                .data
                .into_iter()
                .map(|r| {
                    let name = names.get(&r.buyer_id).cloned();
                    ReviewResponse::build(r, name)
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_review_insert_is_a_conflict() {
        let err = classify_insert_error(
            Some(SqlErr::UniqueConstraintViolation(
                "duplicate key value violates unique constraint".to_string(),
            )),
            DbErr::Custom("duplicate".to_string()),
        );
        assert!(matches!(err, AppError::InvalidState(_)));

        let err = classify_insert_error(None, DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        assert_eq!(average_rating(&[5]), Some(5.0));
        assert_eq!(average_rating(&[5, 4, 4]), Some(4.3));
        assert_eq!(average_rating(&[1, 2]), Some(1.5));
    }
}
