use crate::entities::{meal_entity as meals, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::review_service::rating_summary;
use crate::utils::*;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

const NAME_MAX: usize = 120;
const DESCRIPTION_MAX: usize = 2000;

#[derive(Clone)]
pub struct MealService {
    pool: DatabaseConnection,
}

impl MealService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    /// Public catalogue: active, in-stock, still-available meals, newest first.
    pub async fn list_meals(&self, query: &MealQuery) -> AppResult<PaginatedResponse<MealResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let base_query = meals::Entity::find().filter(catalogue_condition(query, Utc::now()));
        let total = base_query.clone().count(&self.pool).await?;

        let items = base_query
            .order_by_desc(meals::Column::CreatedAt)
            .order_by_desc(meals::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let sellers = self.load_sellers(items.iter().map(|m| m.seller_id)).await?;
        let data = items
            .into_iter()
            .map(|m| {
                let seller = sellers.get(&m.seller_id).map(SellerSummary::from);
                MealResponse::from(m).with_seller(seller)
            })
            .collect();

        Ok(PaginatedResponse::new(data, &params, total))
    }

    /// Public detail. Inactive meals are hidden from everyone but their seller.
    pub async fn get_meal(&self, meal_id: i64, viewer_id: Option<i64>) -> AppResult<MealResponse> {
        let meal = self.find_meal(meal_id).await?;
        if !meal.is_active && viewer_id != Some(meal.seller_id) {
            return Err(AppError::NotFound("Meal not found".to_string()));
        }

        let seller = users::Entity::find_by_id(meal.seller_id)
            .one(&self.pool)
            .await?
            .as_ref()
            .map(SellerSummary::from);
        let (average, count) = rating_summary(&self.pool, meal.id).await?;

        Ok(MealResponse::from(meal)
            .with_seller(seller)
            .with_rating(average, count))
    }

    pub async fn find_meal(&self, meal_id: i64) -> AppResult<meals::Model> {
        meals::Entity::find_by_id(meal_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))
    }

    pub async fn list_seller_meals(
        &self,
        seller_id: i64,
        query: &SellerMealQuery,
    ) -> AppResult<PaginatedResponse<MealResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let mut base_query = meals::Entity::find().filter(meals::Column::SellerId.eq(seller_id));
        if !query.include_inactive.unwrap_or(true) {
            base_query = base_query.filter(meals::Column::IsActive.eq(true));
        }

        let total = base_query.clone().count(&self.pool).await?;
        let items = base_query
            .order_by_desc(meals::Column::CreatedAt)
            .order_by_desc(meals::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        Ok(PaginatedResponse::new(
            items.into_iter().map(MealResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn create_meal(
        &self,
        seller_id: i64,
        request: CreateMealRequest,
    ) -> AppResult<MealResponse> {
        let seller = users::Entity::find_by_id(seller_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Seller not found".to_string()))?;

        let name = require_text("Name", &request.name, NAME_MAX)?;
        validate_pricing(request.price, request.original_price, request.stock)?;

        let now = Utc::now();
        let meal = meals::ActiveModel {
            seller_id: Set(seller_id),
            name: Set(name),
            description: Set(optional_text(
                "Description",
                request.description.as_deref(),
                DESCRIPTION_MAX,
            )?),
            category: Set(optional_text("Category", request.category.as_deref(), 50)?
                .map(|c| normalize_category(&c))),
            price: Set(request.price),
            original_price: Set(request.original_price),
            stock: Set(request.stock),
            image_url: Set(optional_text("Image URL", request.image_url.as_deref(), 500)?),
            pickup_address: Set(optional_text(
                "Pickup address",
                request.pickup_address.as_deref(),
                255,
            )?),
            // meals are placed at the seller's store until moved
            latitude: Set(seller.latitude),
            longitude: Set(seller.longitude),
            is_active: Set(true),
            available_until: Set(request.available_until),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Seller {} created meal {}", seller_id, meal.id);
        Ok(meal.into())
    }

    pub async fn update_meal(
        &self,
        seller_id: i64,
        meal_id: i64,
        request: UpdateMealRequest,
    ) -> AppResult<MealResponse> {
        let meal = self.find_owned_meal(seller_id, meal_id).await?;
        let am = meal_changes(meal, &request, Utc::now())?;
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// Soft delete; past orders keep pointing at the row.
    pub async fn delete_meal(&self, seller_id: i64, meal_id: i64) -> AppResult<()> {
        let meal = self.find_owned_meal(seller_id, meal_id).await?;
        let mut am = meal.into_active_model();
        am.is_active = Set(false);
        am.updated_at = Set(Some(Utc::now()));
        am.update(&self.pool).await?;

        log::info!("Seller {seller_id} deactivated meal {meal_id}");
        Ok(())
    }

    async fn find_owned_meal(&self, seller_id: i64, meal_id: i64) -> AppResult<meals::Model> {
        let meal = self.find_meal(meal_id).await?;
        if meal.seller_id != seller_id {
            return Err(AppError::Forbidden);
        }
        Ok(meal)
    }

    async fn load_sellers(
        &self,
        ids: impl Iterator<Item = i64>,
    ) -> AppResult<HashMap<i64, users::Model>> {
        let mut ids: Vec<i64> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let sellers = users::Entity::find()
            .filter(users::Column::Id.is_in(ids))
            .all(&self.pool)
            .await?;
        Ok(sellers.into_iter().map(|u| (u.id, u)).collect())
    }
}

fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

/// Filter for the public catalogue: active, in-stock, still-available meals
/// matching the optional query filters.
fn catalogue_condition(query: &MealQuery, now: DateTime<Utc>) -> Condition {
    let mut condition = Condition::all()
        .add(meals::Column::IsActive.eq(true))
        .add(meals::Column::Stock.gt(0))
        .add(
            Condition::any()
                .add(meals::Column::AvailableUntil.is_null())
                .add(meals::Column::AvailableUntil.gt(now)),
        );

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = like_pattern(search);
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(meals::Column::Name))).like(pattern.clone()))
                .add(Expr::expr(Func::lower(Expr::col(meals::Column::Description))).like(pattern)),
        );
    }
    // stored lower-cased
    if let Some(category) = query.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(meals::Column::Category.eq(normalize_category(category)));
    }
    if let Some(seller_id) = query.seller_id {
        condition = condition.add(meals::Column::SellerId.eq(seller_id));
    }
    if let Some(min) = query.min_price {
        condition = condition.add(meals::Column::Price.gte(min));
    }
    if let Some(max) = query.max_price {
        condition = condition.add(meals::Column::Price.lte(max));
    }
    condition
}

/// Columns an edit writes. Fields the request leaves out are not part of the
/// UPDATE; stock in particular is only written when the seller sets it.
fn meal_changes(
    meal: meals::Model,
    request: &UpdateMealRequest,
    now: DateTime<Utc>,
) -> AppResult<meals::ActiveModel> {
    let price = request.price.unwrap_or(meal.price);
    let original_price = request.original_price.or(meal.original_price);
    validate_pricing(price, original_price, request.stock.unwrap_or(0))?;

    let mut am = meal.into_active_model();
    if let Some(name) = &request.name {
        am.name = Set(require_text("Name", name, NAME_MAX)?);
    }
    if let Some(description) = &request.description {
        am.description = Set(optional_text("Description", Some(description), DESCRIPTION_MAX)?);
    }
    if let Some(category) = &request.category {
        am.category = Set(optional_text("Category", Some(category), 50)?.map(|c| normalize_category(&c)));
    }
    if let Some(image_url) = &request.image_url {
        am.image_url = Set(optional_text("Image URL", Some(image_url), 500)?);
    }
    if let Some(pickup_address) = &request.pickup_address {
        am.pickup_address = Set(optional_text("Pickup address", Some(pickup_address), 255)?);
    }
    if let Some(is_active) = request.is_active {
        am.is_active = Set(is_active);
    }
    if request.available_until.is_some() {
        am.available_until = Set(request.available_until);
    }
    if let Some(price) = request.price {
        am.price = Set(price);
    }
    if let Some(original_price) = request.original_price {
        am.original_price = Set(Some(original_price));
    }
    if let Some(stock) = request.stock {
        am.stock = Set(stock);
    }
    am.updated_at = Set(Some(now));
    Ok(am)
}

fn validate_pricing(price: i64, original_price: Option<i64>, stock: i32) -> AppResult<()> {
    if price <= 0 {
        return Err(AppError::ValidationError(
            "Price must be greater than zero".to_string(),
        ));
    }
    if original_price.is_some_and(|orig| orig < price) {
        return Err(AppError::ValidationError(
            "Original price cannot be lower than the selling price".to_string(),
        ));
    }
    if stock < 0 {
        return Err(AppError::ValidationError(
            "Stock cannot be negative".to_string(),
        ));
    }
    Ok(())
}

/// Lower-cased `%term%` with LIKE wildcards escaped.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn meal() -> meals::Model {
        meals::Model {
            id: 7,
            seller_id: 3,
            name: "Nasi Uduk".to_string(),
            description: None,
            category: Some("rice".to_string()),
            price: 15000,
            original_price: Some(30000),
            stock: 5,
            image_url: None,
            pickup_address: None,
            latitude: None,
            longitude: None,
            is_active: true,
            available_until: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn update_sql(am: meals::ActiveModel) -> String {
        meals::Entity::update(am)
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn test_edit_without_stock_leaves_stock_column_alone() {
        let request = UpdateMealRequest {
            name: Some("Nasi Goreng".to_string()),
            ..Default::default()
        };
        let am = meal_changes(meal(), &request, Utc::now()).unwrap();
        assert!(!am.stock.is_set());
        assert!(!am.price.is_set());
        assert!(!am.original_price.is_set());

        let sql = update_sql(am);
        assert!(sql.contains(r#""name" = 'Nasi Goreng'"#), "{sql}");
        assert!(!sql.contains(r#""stock""#), "{sql}");
    }

    #[test]
    fn test_edit_with_stock_writes_it() {
        let request = UpdateMealRequest {
            stock: Some(12),
            ..Default::default()
        };
        let sql = update_sql(meal_changes(meal(), &request, Utc::now()).unwrap());
        assert!(sql.contains(r#""stock" = 12"#), "{sql}");
    }

    #[test]
    fn test_edit_validates_against_stored_prices() {
        // stored original price is 30000
        let request = UpdateMealRequest {
            price: Some(35000),
            ..Default::default()
        };
        assert!(meal_changes(meal(), &request, Utc::now()).is_err());

        let request = UpdateMealRequest {
            stock: Some(-1),
            ..Default::default()
        };
        assert!(meal_changes(meal(), &request, Utc::now()).is_err());
    }

    #[test]
    fn test_category_filter_is_case_insensitive() {
        assert_eq!(normalize_category("  Dessert "), "dessert");

        let query = MealQuery {
            category: Some("Dessert".to_string()),
            ..Default::default()
        };
        let sql = meals::Entity::find()
            .filter(catalogue_condition(&query, Utc::now()))
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.contains(r#""category" = 'dessert'"#), "{sql}");
    }

    #[test]
    fn test_validate_pricing() {
        assert!(validate_pricing(15000, Some(30000), 5).is_ok());
        assert!(validate_pricing(15000, None, 0).is_ok());
        assert!(validate_pricing(0, None, 1).is_err());
        assert!(validate_pricing(15000, Some(10000), 1).is_err());
        assert!(validate_pricing(15000, None, -1).is_err());
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("Nasi"), "%nasi%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}
