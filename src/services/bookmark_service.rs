use crate::entities::{bookmark_entity as bookmarks, meal_entity as meals};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

#[derive(Clone)]
pub struct BookmarkService {
    pool: DatabaseConnection,
}

impl BookmarkService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Adding an existing bookmark is a no-op.
    pub async fn add_bookmark(&self, user_id: i64, meal_id: i64) -> AppResult<()> {
        meals::Entity::find_by_id(meal_id)
            .one(&self.pool)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;

        if self.find(user_id, meal_id).await?.is_some() {
            return Ok(());
        }

        bookmarks::ActiveModel {
            user_id: Set(user_id),
            meal_id: Set(meal_id),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove_bookmark(&self, user_id: i64, meal_id: i64) -> AppResult<()> {
        let bookmark = self
            .find(user_id, meal_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Bookmark not found".to_string()))?;
        bookmark.delete(&self.pool).await?;
        Ok(())
    }

    pub async fn list_bookmarks(
        &self,
        user_id: i64,
        query: &BookmarkQuery,
    ) -> AppResult<PaginatedResponse<BookmarkResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query = bookmarks::Entity::find().filter(bookmarks::Column::UserId.eq(user_id));
        let total = base_query.clone().count(&self.pool).await?;
        let items = base_query
            .order_by_desc(bookmarks::Column::CreatedAt)
            .order_by_desc(bookmarks::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let meal_ids: Vec<i64> = items.iter().map(|b| b.meal_id).collect();
        let mut meal_map: HashMap<i64, meals::Model> = if meal_ids.is_empty() {
            HashMap::new()
        } else {
            meals::Entity::find()
                .filter(meals::Column::Id.is_in(meal_ids))
                .all(&self.pool)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };

        let data = items
            .into_iter()
            .filter_map(|b| {
                let meal = meal_map.remove(&b.meal_id)?;
                Some(BookmarkResponse {
                    meal: meal.into(),
                    bookmarked_at: b.created_at.unwrap_or_else(Utc::now),
                })
            })
            .collect();

        Ok(PaginatedResponse::new(data, &params, total))
    }

    async fn find(&self, user_id: i64, meal_id: i64) -> AppResult<Option<bookmarks::Model>> {
        Ok(bookmarks::Entity::find()
            .filter(bookmarks::Column::UserId.eq(user_id))
            .filter(bookmarks::Column::MealId.eq(meal_id))
            .one(&self.pool)
            .await?)
    }
}
