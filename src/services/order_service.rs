use crate::entities::{
    OrderStatus, PaymentMethod, PaymentStatus, meal_entity as meals, order_entity as orders,
};
use crate::error::{AppError, AppResult};
use crate::external::*;
use crate::models::*;
use crate::utils::order_status::{
    self, Actor, DisplayStatus, GatewayDecision, GatewayOutcome, OrderAction, OrderState,
    Transition,
};
use crate::utils::*;
use chrono::{DateTime, Duration, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
    TransactionTrait,
};
use std::collections::HashMap;

const MAX_QUANTITY: i32 = 50;

/// What the gateway reported about an order, from a notification, a status
/// poll or a local decision (expiry, failed Snap call).
#[derive(Debug, Clone)]
pub struct GatewayReport {
    pub outcome: GatewayOutcome,
    pub transaction_id: Option<String>,
    pub payment_type: Option<String>,
}

impl GatewayReport {
    pub fn local(outcome: GatewayOutcome) -> Self {
        Self {
            outcome,
            transaction_id: None,
            payment_type: None,
        }
    }
}

/// Checkout input after trimming and validation.
#[derive(Debug, Clone, PartialEq)]
struct ValidatedCheckout {
    quantity: i32,
    buyer_name: String,
    buyer_email: String,
    buyer_phone: String,
    address: Option<String>,
    city: Option<String>,
    postal_code: Option<String>,
    special_instructions: Option<String>,
}

fn validate_checkout(request: &CheckoutRequest) -> AppResult<ValidatedCheckout> {
    if !(1..=MAX_QUANTITY).contains(&request.quantity) {
        return Err(AppError::ValidationError(format!(
            "Quantity must be between 1 and {MAX_QUANTITY}"
        )));
    }

    let buyer_name = require_text("Name", &request.buyer_name, 100)?;
    let buyer_email = request.buyer_email.trim().to_lowercase();
    validate_email(&buyer_email)?;
    validate_phone(&request.buyer_phone)?;
    let buyer_phone = normalize_phone(request.buyer_phone.trim());

    let address = optional_text("Address", request.address.as_deref(), 255)?;
    let city = optional_text("City", request.city.as_deref(), 100)?;
    let postal_code = optional_text("Postal code", request.postal_code.as_deref(), 5)?;
    if let Some(code) = &postal_code {
        validate_postal_code(code)?;
    }

    if request.order_type.needs_address()
        && (address.is_none() || city.is_none() || postal_code.is_none())
    {
        return Err(AppError::ValidationError(
            "Address, city and postal code are required for delivery".to_string(),
        ));
    }

    Ok(ValidatedCheckout {
        quantity: request.quantity,
        buyer_name,
        buyer_email,
        buyer_phone,
        address,
        city,
        postal_code,
        special_instructions: optional_text(
            "Special instructions",
            request.special_instructions.as_deref(),
            500,
        )?,
    })
}

/// Starting persisted state for a new order.
fn initial_state(method: PaymentMethod) -> OrderState {
    match method {
        PaymentMethod::CashOnDelivery => {
            OrderState::new(OrderStatus::Pending, PaymentStatus::PendingCod, method)
        }
        PaymentMethod::Midtrans => {
            OrderState::new(OrderStatus::AwaitingPayment, PaymentStatus::Pending, method)
        }
    }
}

/// `GMS-YYYYMMDD-XXXXXXXXXXXX`, also used as the gateway order id.
fn generate_order_code(now: DateTime<Utc>) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    format!("GMS-{}-{}", now.format("%Y%m%d"), &suffix[..12])
}

fn actor_of(order: &orders::Model, user_id: i64) -> AppResult<Actor> {
    if order.seller_id == user_id {
        Ok(Actor::Seller)
    } else if order.buyer_id == user_id {
        Ok(Actor::Buyer)
    } else {
        Err(AppError::Forbidden)
    }
}

/// Query condition matching every stored triple that displays as `display`.
fn display_condition(display: DisplayStatus) -> Condition {
    order_status::states_for(display)
        .into_iter()
        .fold(Condition::any(), |any, state| {
            any.add(
                Condition::all()
                    .add(orders::Column::Status.eq(state.status))
                    .add(orders::Column::PaymentStatus.eq(state.payment_status))
                    .add(orders::Column::PaymentMethod.eq(state.payment_method)),
            )
        })
}

/// Writes a planned transition (and the stock it returns) on `db`.
async fn persist_transition<C: ConnectionTrait>(
    db: &C,
    order: orders::Model,
    transition: &Transition,
    report: Option<&GatewayReport>,
) -> AppResult<orders::Model> {
    let now = Utc::now();
    let meal_id = order.meal_id;
    let quantity = order.quantity;

    let mut am = order.into_active_model();
    am.status = Set(transition.status);
    am.payment_status = Set(transition.payment_status);
    if transition.mark_paid {
        am.paid_at = Set(Some(now));
    }
    if transition.mark_confirmed {
        am.confirmed_at = Set(Some(now));
    }
    if let Some(report) = report {
        if report.transaction_id.is_some() {
            am.gateway_transaction_id = Set(report.transaction_id.clone());
        }
        if report.payment_type.is_some() {
            am.gateway_payment_type = Set(report.payment_type.clone());
        }
    }
    am.updated_at = Set(Some(now));
    let updated = am.update(db).await?;

    if transition.restock {
        meals::Entity::update_many()
            .col_expr(
                meals::Column::Stock,
                Expr::col(meals::Column::Stock).add(quantity),
            )
            .filter(meals::Column::Id.eq(meal_id))
            .exec(db)
            .await?;
    }

    log::info!(
        "Order {} moved to status={} payment_status={}",
        updated.order_code,
        updated.status,
        updated.payment_status
    );
    Ok(updated)
}

/// What the expiry job does with a stale unpaid order, given the gateway's
/// view of it.
#[derive(Debug)]
enum ExpiryStep {
    /// Paid without us hearing about it.
    Settle(GatewayReport),
    /// Still payable at the gateway; close it there before expiring.
    CancelAtGateway,
    Expire,
    /// Unknown gateway state; look again next round.
    Retry,
}

fn expiry_step(gateway: AppResult<MidtransNotification>) -> ExpiryStep {
    match gateway {
        Ok(status) => match status.outcome() {
            Some(GatewayOutcome::Settled) => ExpiryStep::Settle(GatewayReport {
                outcome: GatewayOutcome::Settled,
                transaction_id: status.transaction_id,
                payment_type: status.payment_type,
            }),
            Some(GatewayOutcome::Pending) => ExpiryStep::CancelAtGateway,
            Some(_) => ExpiryStep::Expire,
            None => ExpiryStep::Retry,
        },
        // the buyer never opened the payment page
        Err(AppError::NotFound(_)) => ExpiryStep::Expire,
        Err(_) => ExpiryStep::Retry,
    }
}

#[derive(Clone)]
pub struct OrderService {
    pool: DatabaseConnection,
    midtrans: MidtransService,
    payment_window_minutes: i64,
}

impl OrderService {
    /// Online orders can be paid for `payment_window_minutes`, both at the
    /// gateway and before the expiry job cancels them.
    pub fn new(
        pool: DatabaseConnection,
        midtrans: MidtransService,
        payment_window_minutes: i64,
    ) -> Self {
        Self {
            pool,
            midtrans,
            payment_window_minutes,
        }
    }

    pub async fn checkout(&self, buyer_id: i64, request: CheckoutRequest) -> AppResult<CheckoutResponse> {
        let input = validate_checkout(&request)?;
        let method = request.payment_method;
        if method == PaymentMethod::Midtrans && !self.midtrans.is_enabled() {
            return Err(AppError::ValidationError(
                "Online payment is currently unavailable".to_string(),
            ));
        }

        let now = Utc::now();
        let txn = self.pool.begin().await?;

        let meal = meals::Entity::find_by_id(request.meal_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;
        if meal.seller_id == buyer_id {
            return Err(AppError::ValidationError(
                "You cannot order your own meal".to_string(),
            ));
        }
        if !meal.is_purchasable(now) {
            return Err(AppError::ValidationError(
                "This meal is no longer available".to_string(),
            ));
        }

        let total_price = meal
            .price
            .checked_mul(i64::from(input.quantity))
            .ok_or_else(|| AppError::ValidationError("Order total is too large".to_string()))?;

        // conditional decrement; a concurrent checkout may have taken the stock
        let reserved = meals::Entity::update_many()
            .col_expr(
                meals::Column::Stock,
                Expr::col(meals::Column::Stock).sub(input.quantity),
            )
            .filter(meals::Column::Id.eq(meal.id))
            .filter(meals::Column::Stock.gte(input.quantity))
            .exec(&txn)
            .await?;
        if reserved.rows_affected != 1 {
            return Err(AppError::ValidationError(format!(
                "Only {} portion(s) left",
                meal.stock
            )));
        }

        let state = initial_state(method);
        let order = orders::ActiveModel {
            order_code: Set(generate_order_code(now)),
            buyer_id: Set(buyer_id),
            seller_id: Set(meal.seller_id),
            meal_id: Set(meal.id),
            buyer_name: Set(input.buyer_name),
            buyer_email: Set(input.buyer_email),
            buyer_phone: Set(input.buyer_phone),
            address: Set(input.address),
            city: Set(input.city),
            postal_code: Set(input.postal_code),
            quantity: Set(input.quantity),
            total_price: Set(total_price),
            status: Set(state.status),
            payment_status: Set(state.payment_status),
            payment_method: Set(method),
            order_type: Set(request.order_type),
            special_instructions: Set(input.special_instructions),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        log::info!(
            "Order {} placed by buyer {} for meal {} ({} x {})",
            order.order_code,
            buyer_id,
            meal.id,
            order.quantity,
            meal.price
        );

        if method.is_cod() {
            return Ok(CheckoutResponse {
                order: OrderResponse::build(order, Some(meal.name), Actor::Buyer),
                snap_token: None,
                redirect_url: None,
            });
        }

        let snap_request = SnapTransactionRequest {
            transaction_details: TransactionDetails {
                order_id: order.order_code.clone(),
                gross_amount: total_price,
            },
            item_details: vec![ItemDetail::new(
                meal.id.to_string(),
                meal.price,
                order.quantity,
                &meal.name,
            )],
            customer_details: CustomerDetails {
                first_name: order.buyer_name.clone(),
                email: order.buyer_email.clone(),
                phone: order.buyer_phone.clone(),
            },
            callbacks: self.midtrans.finish_callback(),
            expiry: Some(SnapExpiry::minutes(self.payment_window_minutes)),
        };

        let snap = match self.midtrans.create_snap_transaction(&snap_request).await {
            Ok(snap) => snap,
            Err(e) => {
                log::error!("Snap transaction for order {} failed: {e}", order.order_code);
                if let Err(cancel_err) = self
                    .apply_gateway_report(&order.order_code, GatewayReport::local(GatewayOutcome::Failed))
                    .await
                {
                    log::error!(
                        "Could not cancel order {} after payment failure: {cancel_err}",
                        order.order_code
                    );
                }
                return Err(AppError::ExternalApiError(
                    "Payment could not be initiated, please try again".to_string(),
                ));
            }
        };

        let mut am = order.into_active_model();
        am.snap_token = Set(Some(snap.token.clone()));
        am.snap_redirect_url = Set(Some(snap.redirect_url.clone()));
        am.updated_at = Set(Some(Utc::now()));
        let order = am.update(&self.pool).await?;

        Ok(CheckoutResponse {
            order: OrderResponse::build(order, Some(meal.name), Actor::Buyer),
            snap_token: Some(snap.token),
            redirect_url: Some(snap.redirect_url),
        })
    }

    pub async fn list_seller_orders(
        &self,
        seller_id: i64,
        query: &OrderListQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let base = orders::Entity::find().filter(orders::Column::SellerId.eq(seller_id));
        self.list_orders(base, query, Actor::Seller).await
    }

    pub async fn list_buyer_orders(
        &self,
        buyer_id: i64,
        query: &OrderListQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let base = orders::Entity::find().filter(orders::Column::BuyerId.eq(buyer_id));
        self.list_orders(base, query, Actor::Buyer).await
    }

    async fn list_orders(
        &self,
        mut base_query: Select<orders::Entity>,
        query: &OrderListQuery,
        viewer: Actor,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        if let Some(filter) = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let display: DisplayStatus = filter.parse()?;
            base_query = base_query.filter(display_condition(display));
        }

        let total = base_query.clone().count(&self.pool).await?;
        let items = base_query
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;

        let names = self.meal_names(items.iter().map(|o| o.meal_id)).await?;
        let data = items
            .into_iter()
            .map(|o| {
                let name = names.get(&o.meal_id).cloned();
                OrderResponse::build(o, name, viewer)
            })
            .collect();

        Ok(PaginatedResponse::new(data, &params, total))
    }

    /// Order detail for its buyer or seller.
    pub async fn get_order(&self, order_id: i64, user_id: i64) -> AppResult<OrderResponse> {
        let order = self.find_order(order_id).await?;
        let viewer = actor_of(&order, user_id)?;
        self.respond(order, viewer).await
    }

    pub async fn perform_action(
        &self,
        order_id: i64,
        user_id: i64,
        action: OrderAction,
    ) -> AppResult<OrderResponse> {
        let txn = self.pool.begin().await?;

        let order = orders::Entity::find_by_id(order_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;
        let actor = actor_of(&order, user_id)?;

        let transition = order_status::plan_action(OrderState::of(&order), action, actor)?;
        let updated = persist_transition(&txn, order, &transition, None).await?;
        txn.commit().await?;

        log::info!("User {user_id} performed {action} on order {order_id}");
        self.respond(updated, actor).await
    }

    /// Generic status update from the seller dashboard.
    pub async fn update_status(
        &self,
        order_id: i64,
        user_id: i64,
        request: UpdateOrderStatusRequest,
    ) -> AppResult<OrderResponse> {
        let target: OrderStatus = request
            .status
            .trim()
            .parse()
            .map_err(AppError::ValidationError)?;
        let action = order_status::action_for_target(target)?;
        self.perform_action(order_id, user_id, action).await
    }

    /// Pulls the gateway status for an online order and applies it.
    pub async fn sync_payment(&self, order_id: i64, user_id: i64) -> AppResult<OrderResponse> {
        let order = self.find_order(order_id).await?;
        let viewer = actor_of(&order, user_id)?;
        if order.payment_method.is_cod() {
            return Err(AppError::InvalidState(
                "Cash on delivery orders have no online payment to sync".to_string(),
            ));
        }

        let status = match self.midtrans.get_transaction_status(&order.order_code).await {
            Ok(status) => status,
            // the buyer never opened the payment page
            Err(AppError::NotFound(_)) => return self.respond(order, viewer).await,
            Err(e) => return Err(e),
        };

        let Some(outcome) = status.outcome() else {
            log::warn!(
                "Unhandled gateway status '{}' for order {}",
                status.transaction_status,
                order.order_code
            );
            return self.respond(order, viewer).await;
        };

        let report = GatewayReport {
            outcome,
            transaction_id: status.transaction_id,
            payment_type: status.payment_type,
        };
        let (updated, _) = self.apply_gateway_report(&order.order_code, report).await?;
        self.respond(updated, viewer).await
    }

    /// Applies a gateway outcome to the order with `order_code`, locking the
    /// row for the duration.
    pub async fn apply_gateway_report(
        &self,
        order_code: &str,
        report: GatewayReport,
    ) -> AppResult<(orders::Model, GatewayDecision)> {
        let txn = self.pool.begin().await?;

        let order = orders::Entity::find()
            .filter(orders::Column::OrderCode.eq(order_code))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {order_code} not found")))?;

        let decision = order_status::plan_gateway_outcome(OrderState::of(&order), report.outcome)?;
        let order = match decision {
            GatewayDecision::Apply(transition) => {
                persist_transition(&txn, order, &transition, Some(&report)).await?
            }
            GatewayDecision::Ignore => {
                log::debug!(
                    "Ignoring {:?} for order {} (status={}, payment_status={})",
                    report.outcome,
                    order.order_code,
                    order.status,
                    order.payment_status
                );
                order
            }
            GatewayDecision::PaidAfterCancellation => {
                log::error!(
                    "Payment settled for cancelled order {} (transaction {:?}); refund required",
                    order.order_code,
                    report.transaction_id
                );
                order
            }
        };

        txn.commit().await?;
        Ok((order, decision))
    }

    /// Cancels online orders left unpaid past the payment window. The gateway
    /// is checked first: a settled payment is applied instead, and a still
    /// open transaction is cancelled there before the order is expired.
    pub async fn expire_unpaid_orders(&self) -> AppResult<usize> {
        let cutoff = Utc::now() - Duration::minutes(self.payment_window_minutes);
        let stale = orders::Entity::find()
            .filter(orders::Column::PaymentMethod.eq(PaymentMethod::Midtrans))
            .filter(orders::Column::PaymentStatus.eq(PaymentStatus::Pending))
            .filter(
                orders::Column::Status.is_in([OrderStatus::Pending, OrderStatus::AwaitingPayment]),
            )
            .filter(orders::Column::CreatedAt.lt(cutoff))
            .order_by_asc(orders::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        let mut expired = 0;
        for order in stale {
            let gateway = self.midtrans.get_transaction_status(&order.order_code).await;
            let report = match expiry_step(gateway) {
                ExpiryStep::Settle(report) => report,
                ExpiryStep::Expire => GatewayReport::local(GatewayOutcome::Expired),
                ExpiryStep::CancelAtGateway => {
                    if let Err(e) = self.midtrans.cancel_transaction(&order.order_code).await {
                        log::warn!("Keeping order {} open: {e}", order.order_code);
                        continue;
                    }
                    GatewayReport::local(GatewayOutcome::Expired)
                }
                ExpiryStep::Retry => {
                    log::warn!(
                        "Gateway state of order {} unknown, retrying later",
                        order.order_code
                    );
                    continue;
                }
            };
            let outcome = report.outcome;

            match self.apply_gateway_report(&order.order_code, report).await {
                Ok((_, GatewayDecision::Apply(_))) if outcome == GatewayOutcome::Expired => {
                    expired += 1
                }
                Ok(_) => {}
                Err(e) => log::error!("Failed to expire order {}: {e}", order.order_code),
            }
        }
        Ok(expired)
    }

    async fn find_order(&self, order_id: i64) -> AppResult<orders::Model> {
        orders::Entity::find_by_id(order_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }

    async fn respond(&self, order: orders::Model, viewer: Actor) -> AppResult<OrderResponse> {
        let meal_name = meals::Entity::find_by_id(order.meal_id)
            .one(&self.pool)
            .await?
            .map(|m| m.name);
        Ok(OrderResponse::build(order, meal_name, viewer))
    }

    async fn meal_names(&self, ids: impl Iterator<Item = i64>) -> AppResult<HashMap<i64, String>> {
        let mut ids: Vec<i64> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i64, String)> = meals::Entity::find()
            .filter(meals::Column::Id.is_in(ids))
            .select_only()
            .column(meals::Column::Id)
            .column(meals::Column::Name)
            .into_tuple()
            .all(&self.pool)
            .await?;
        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderType;
    use crate::models::order::fixtures::order;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            meal_id: 1,
            quantity: 2,
            buyer_name: " Budi Santoso ".to_string(),
            buyer_email: "Budi@Example.com".to_string(),
            buyer_phone: "0812-3456-7890".to_string(),
            address: None,
            city: None,
            postal_code: None,
            payment_method: PaymentMethod::CashOnDelivery,
            order_type: OrderType::Pickup,
            special_instructions: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_validate_checkout_normalizes_contact_fields() {
        let input = validate_checkout(&request()).unwrap();
        assert_eq!(input.buyer_name, "Budi Santoso");
        assert_eq!(input.buyer_email, "budi@example.com");
        assert_eq!(input.buyer_phone, "081234567890");
        assert_eq!(input.special_instructions, None);
    }

    #[test]
    fn test_validate_checkout_quantity_bounds() {
        for quantity in [0, -1, MAX_QUANTITY + 1] {
            let mut req = request();
            req.quantity = quantity;
            assert!(validate_checkout(&req).is_err(), "{quantity}");
        }
        let mut req = request();
        req.quantity = MAX_QUANTITY;
        assert!(validate_checkout(&req).is_ok());
    }

    #[test]
    fn test_validate_checkout_delivery_needs_address() {
        let mut req = request();
        req.order_type = OrderType::Delivery;
        req.address = Some("Jl. Braga 10".to_string());
        req.city = Some("Bandung".to_string());
        assert!(validate_checkout(&req).is_err());

        req.postal_code = Some("4011".to_string());
        assert!(validate_checkout(&req).is_err());

        req.postal_code = Some("40111".to_string());
        assert!(validate_checkout(&req).is_ok());
    }

    #[test]
    fn test_validate_checkout_rejects_bad_contacts() {
        let mut req = request();
        req.buyer_email = "not-an-email".to_string();
        assert!(validate_checkout(&req).is_err());

        let mut req = request();
        req.buyer_phone = "12345".to_string();
        assert!(validate_checkout(&req).is_err());

        let mut req = request();
        req.buyer_name = "   ".to_string();
        assert!(validate_checkout(&req).is_err());
    }

    #[test]
    fn test_initial_states() {
        assert_eq!(
            order_status::display_status(initial_state(PaymentMethod::CashOnDelivery)),
            DisplayStatus::PendingCod
        );
        assert_eq!(
            order_status::display_status(initial_state(PaymentMethod::Midtrans)),
            DisplayStatus::Pending
        );
    }

    #[test]
    fn test_order_code_format() {
        let now = Utc::now();
        let code = generate_order_code(now);
        assert!(code.starts_with(&format!("GMS-{}-", now.format("%Y%m%d"))));
        assert_eq!(code.len(), "GMS-".len() + 8 + 1 + 12);
        assert_ne!(code, generate_order_code(now));
    }

    fn gateway_status(transaction_status: &str) -> MidtransNotification {
        MidtransNotification {
            order_id: "GMS-20250901-ABCDEF123456".to_string(),
            status_code: "201".to_string(),
            gross_amount: "30000.00".to_string(),
            signature_key: None,
            transaction_status: transaction_status.to_string(),
            fraud_status: None,
            payment_type: Some("bank_transfer".to_string()),
            transaction_id: Some("tx-1".to_string()),
        }
    }

    #[test]
    fn test_expiry_step_follows_gateway_state() {
        assert!(matches!(
            expiry_step(Ok(gateway_status("pending"))),
            ExpiryStep::CancelAtGateway
        ));
        let ExpiryStep::Settle(report) = expiry_step(Ok(gateway_status("settlement"))) else {
            panic!("settlement must be applied");
        };
        assert_eq!(report.transaction_id.as_deref(), Some("tx-1"));

        assert!(matches!(
            expiry_step(Ok(gateway_status("expire"))),
            ExpiryStep::Expire
        ));
        assert!(matches!(
            expiry_step(Err(AppError::NotFound("missing".to_string()))),
            ExpiryStep::Expire
        ));
        assert!(matches!(
            expiry_step(Ok(gateway_status("authorize"))),
            ExpiryStep::Retry
        ));
        assert!(matches!(
            expiry_step(Err(AppError::ExternalApiError("down".to_string()))),
            ExpiryStep::Retry
        ));
    }

    #[test]
    fn test_actor_of() {
        let o = order(1, OrderStatus::Pending, PaymentStatus::PendingCod, PaymentMethod::CashOnDelivery);
        assert_eq!(actor_of(&o, o.buyer_id).unwrap(), Actor::Buyer);
        assert_eq!(actor_of(&o, o.seller_id).unwrap(), Actor::Seller);
        assert!(matches!(actor_of(&o, 999), Err(AppError::Forbidden)));
    }
}
