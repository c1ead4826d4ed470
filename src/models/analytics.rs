use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsQuery {
    /// Window size in days, 1-365 (default 30).
    pub days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopMeal {
    pub meal_id: i64,
    pub meal_name: Option<String>,
    pub quantity_sold: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: i64,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SellerAnalytics {
    pub window_days: u32,
    pub total_orders: u64,
    /// Sum over orders whose payment has been received.
    pub revenue: i64,
    pub items_sold: i64,
    pub average_order_value: i64,
    /// Order count keyed by display status.
    pub status_counts: BTreeMap<String, u64>,
    pub top_meals: Vec<TopMeal>,
    pub daily_revenue: Vec<DailyRevenue>,
}
