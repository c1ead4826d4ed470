use crate::entities::{PaymentStatus, meal_entity as meals, order_entity as orders};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::order_status::{self, DisplayStatus, OrderState};
use chrono::{Days, NaiveDate, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const MAX_WINDOW_DAYS: u32 = 365;
const TOP_MEALS: usize = 5;

pub fn window_days(requested: Option<u32>) -> AppResult<u32> {
    let days = requested.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(AppError::ValidationError(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(days)
}

/// First day of a `days`-long window ending on `today` (inclusive).
fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

/// Aggregates a seller's orders over the window ending on `today`. Orders
/// outside the window are skipped. Revenue counts paid orders only.
pub fn aggregate_seller_analytics(
    all: &[orders::Model],
    meal_names: &HashMap<i64, String>,
    today: NaiveDate,
    days: u32,
) -> SellerAnalytics {
    let start = window_start(today, days);

    let mut status_counts: BTreeMap<String, u64> = DisplayStatus::ALL
        .iter()
        .map(|d| (d.as_str().to_string(), 0))
        .collect();
    let mut daily: BTreeMap<NaiveDate, (i64, u64)> = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|d| (d, (0, 0)))
        .collect();
    let mut per_meal: HashMap<i64, (i64, i64)> = HashMap::new();

    let mut total_orders = 0u64;
    let mut paid_orders = 0i64;
    let mut revenue = 0i64;
    let mut items_sold = 0i64;

    for order in all {
        let Some(created) = order.created_at.map(|at| at.date_naive()) else {
            continue;
        };
        if created < start || created > today {
            continue;
        }

        total_orders += 1;
        let display = order_status::resolve(OrderState::of(order)).display;
        *status_counts.entry(display.as_str().to_string()).or_insert(0) += 1;

        let day = daily.entry(created).or_insert((0, 0));
        day.1 += 1;

        if order.payment_status == PaymentStatus::Paid {
            paid_orders += 1;
            revenue += order.total_price;
            items_sold += i64::from(order.quantity);
            day.0 += order.total_price;

            let meal = per_meal.entry(order.meal_id).or_insert((0, 0));
            meal.0 += i64::from(order.quantity);
            meal.1 += order.total_price;
        }
    }

    let mut top_meals: Vec<TopMeal> = per_meal
        .into_iter()
        .map(|(meal_id, (quantity_sold, revenue))| TopMeal {
            meal_id,
            meal_name: meal_names.get(&meal_id).cloned(),
            quantity_sold,
            revenue,
        })
        .collect();
    top_meals.sort_by(|a, b| {
        b.quantity_sold
            .cmp(&a.quantity_sold)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.meal_id.cmp(&b.meal_id))
    });
    top_meals.truncate(TOP_MEALS);

    SellerAnalytics {
        window_days: days,
        total_orders,
        revenue,
        items_sold,
        average_order_value: if paid_orders > 0 { revenue / paid_orders } else { 0 },
        status_counts,
        top_meals,
        daily_revenue: daily
            .into_iter()
            .map(|(date, (revenue, orders))| DailyRevenue {
                date,
                revenue,
                orders,
            })
            .collect(),
    }
}

#[derive(Clone)]
pub struct AnalyticsService {
    pool: DatabaseConnection,
}

impl AnalyticsService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn seller_analytics(
        &self,
        seller_id: i64,
        query: &AnalyticsQuery,
    ) -> AppResult<SellerAnalytics> {
        let days = window_days(query.days)?;
        let today = Utc::now().date_naive();
        let since = window_start(today, days)
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .ok_or_else(|| AppError::InternalError("Invalid analytics window".to_string()))?;

        let seller_orders = orders::Entity::find()
            .filter(orders::Column::SellerId.eq(seller_id))
            .filter(orders::Column::CreatedAt.gte(since))
            .all(&self.pool)
            .await?;

        let meal_names: HashMap<i64, String> = meals::Entity::find()
            .filter(meals::Column::SellerId.eq(seller_id))
            .select_only()
            .column(meals::Column::Id)
            .column(meals::Column::Name)
            .into_tuple::<(i64, String)>()
            .all(&self.pool)
            .await?
            .into_iter()
            .collect();

        Ok(aggregate_seller_analytics(
            &seller_orders,
            &meal_names,
            today,
            days,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{OrderStatus, PaymentMethod};
    use crate::models::order::fixtures::order;
    use chrono::{Datelike, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 10).unwrap()
    }

    fn placed(
        id: i64,
        meal_id: i64,
        day: u32,
        quantity: i32,
        status: OrderStatus,
        payment: PaymentStatus,
        method: PaymentMethod,
    ) -> orders::Model {
        let mut o = order(id, status, payment, method);
        o.meal_id = meal_id;
        o.quantity = quantity;
        o.total_price = 10_000 * i64::from(quantity);
        o.created_at = Some(Utc.with_ymd_and_hms(2025, 9, day, 10, 0, 0).unwrap());
        o
    }

    #[test]
    fn test_window_days() {
        assert_eq!(window_days(None).unwrap(), 30);
        assert_eq!(window_days(Some(7)).unwrap(), 7);
        assert!(window_days(Some(0)).is_err());
        assert!(window_days(Some(366)).is_err());
    }

    #[test]
    fn test_aggregate_seller_analytics() {
        use OrderStatus as S;
        use PaymentMethod as M;
        use PaymentStatus as P;

        let orders = vec![
            placed(1, 1, 10, 2, S::Completed, P::Paid, M::Midtrans),
            placed(2, 1, 9, 1, S::Processing, P::Paid, M::CashOnDelivery),
            placed(3, 2, 9, 3, S::Pending, P::PendingCod, M::CashOnDelivery),
            placed(4, 2, 8, 1, S::Cancelled, P::Expired, M::Midtrans),
            placed(5, 3, 8, 1, S::Completed, P::Paid, M::Midtrans),
            // outside a 3-day window
            placed(6, 3, 1, 5, S::Completed, P::Paid, M::Midtrans),
        ];
        let names = HashMap::from([(1, "Nasi Goreng".to_string()), (3, "Soto".to_string())]);

        let a = aggregate_seller_analytics(&orders, &names, today(), 3);

        assert_eq!(a.window_days, 3);
        assert_eq!(a.total_orders, 5);
        assert_eq!(a.revenue, 40_000);
        assert_eq!(a.items_sold, 4);
        assert_eq!(a.average_order_value, 13_333);

        assert_eq!(a.status_counts["completed"], 2);
        assert_eq!(a.status_counts["processing"], 1);
        assert_eq!(a.status_counts["pending_cod"], 1);
        assert_eq!(a.status_counts["cancelled"], 1);
        assert_eq!(a.status_counts["confirmed_cod"], 0);
        assert_eq!(a.status_counts.len(), DisplayStatus::ALL.len());

        assert_eq!(a.top_meals.len(), 2);
        assert_eq!(a.top_meals[0].meal_id, 1);
        assert_eq!(a.top_meals[0].quantity_sold, 3);
        assert_eq!(a.top_meals[0].meal_name.as_deref(), Some("Nasi Goreng"));
        assert_eq!(a.top_meals[1].meal_id, 3);

        let days: Vec<_> = a.daily_revenue.iter().map(|d| (d.date.day0() + 1, d.revenue, d.orders)).collect();
        assert_eq!(days, vec![(8, 10_000, 2), (9, 10_000, 2), (10, 20_000, 1)]);
    }

    #[test]
    fn test_empty_window_is_zero_filled() {
        let a = aggregate_seller_analytics(&[], &HashMap::new(), today(), 7);
        assert_eq!(a.total_orders, 0);
        assert_eq!(a.average_order_value, 0);
        assert_eq!(a.daily_revenue.len(), 7);
        assert!(a.daily_revenue.iter().all(|d| d.revenue == 0 && d.orders == 0));
        assert!(a.top_meals.is_empty());
    }
}
