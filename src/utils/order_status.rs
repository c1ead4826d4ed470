//! Order status resolution and transition rules.
//!
//! Every view of an order (seller dashboard, buyer transaction list and
//! detail, analytics, payment reconciliation) derives its user-facing status
//! from [`resolve`], and every state change goes through [`plan_action`] or
//! [`plan_gateway_outcome`]. Nothing else writes `status` / `payment_status`.

use crate::entities::{OrderStatus, PaymentMethod, PaymentStatus, order_entity};
use crate::error::{AppError, AppResult};
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The single status shown to buyers and sellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    /// Online order waiting for the gateway.
    Pending,
    /// COD order waiting for the seller to confirm it.
    PendingCod,
    /// COD order confirmed, cash not received yet.
    ConfirmedCod,
    Processing,
    Completed,
    Cancelled,
}

impl DisplayStatus {
    pub const ALL: [DisplayStatus; 6] = [
        DisplayStatus::Pending,
        DisplayStatus::PendingCod,
        DisplayStatus::ConfirmedCod,
        DisplayStatus::Processing,
        DisplayStatus::Completed,
        DisplayStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::PendingCod => "pending_cod",
            DisplayStatus::ConfirmedCod => "confirmed_cod",
            DisplayStatus::Processing => "processing",
            DisplayStatus::Completed => "completed",
            DisplayStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DisplayStatus::Completed | DisplayStatus::Cancelled)
    }
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DisplayStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DisplayStatus::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown order status filter: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderAction {
    /// Open (or reopen) the gateway payment page.
    Pay,
    ConfirmCod,
    AcceptCodPayment,
    MarkCompleted,
    Cancel,
    Review,
}

impl OrderAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderAction::Pay => "pay",
            OrderAction::ConfirmCod => "confirm_cod",
            OrderAction::AcceptCodPayment => "accept_cod_payment",
            OrderAction::MarkCompleted => "mark_completed",
            OrderAction::Cancel => "cancel",
            OrderAction::Review => "review",
        }
    }
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the order is asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Buyer,
    Seller,
}

/// The persisted triple the display status is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrderState {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: PaymentMethod,
}

impl OrderState {
    pub fn new(
        status: OrderStatus,
        payment_status: PaymentStatus,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            status,
            payment_status,
            payment_method,
        }
    }

    pub fn of(order: &order_entity::Model) -> Self {
        Self::new(order.status, order.payment_status, order.payment_method)
    }

    /// Every combination the schema can hold.
    pub fn all() -> impl Iterator<Item = OrderState> {
        OrderStatus::iter().flat_map(|status| {
            PaymentStatus::iter().flat_map(move |payment_status| {
                PaymentMethod::iter()
                    .map(move |payment_method| OrderState::new(status, payment_status, payment_method))
            })
        })
    }
}

/// A stored combination that should not occur in a well-behaved flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anomaly {
    CompletedWithFailedPayment,
    CompletedWithoutPayment,
    CodPaidBeforeConfirmation,
    FulfilmentWithoutPayment,
    CodMarkerOnOnlineOrder,
}

impl Anomaly {
    pub fn describe(&self) -> &'static str {
        match self {
            Anomaly::CompletedWithFailedPayment => "order completed but payment failed",
            Anomaly::CompletedWithoutPayment => "order completed without recorded payment",
            Anomaly::CodPaidBeforeConfirmation => "COD payment accepted before confirmation",
            Anomaly::FulfilmentWithoutPayment => "online order in fulfilment without payment",
            Anomaly::CodMarkerOnOnlineOrder => "online order carries a COD payment status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub display: DisplayStatus,
    pub anomaly: Option<Anomaly>,
}

impl Resolution {
    fn clean(display: DisplayStatus) -> Self {
        Self {
            display,
            anomaly: None,
        }
    }

    fn flagged(display: DisplayStatus, anomaly: Anomaly) -> Self {
        Self {
            display,
            anomaly: Some(anomaly),
        }
    }
}

/// Maps the persisted triple to exactly one display status.
///
/// Precedence: an explicit cancellation wins, then a dead payment, then an
/// explicit completion; the remaining cases split on the payment method.
pub fn resolve(state: OrderState) -> Resolution {
    use DisplayStatus as D;

    if state.status == OrderStatus::Cancelled {
        return Resolution::clean(D::Cancelled);
    }

    if state.payment_status.is_terminal_failure() {
        return if state.status == OrderStatus::Completed {
            Resolution::flagged(D::Cancelled, Anomaly::CompletedWithFailedPayment)
        } else {
            Resolution::clean(D::Cancelled)
        };
    }

    if state.status == OrderStatus::Completed {
        return if state.payment_status == PaymentStatus::Paid {
            Resolution::clean(D::Completed)
        } else {
            Resolution::flagged(D::Completed, Anomaly::CompletedWithoutPayment)
        };
    }

    // remaining payment statuses: pending, pending_cod, paid
    let paid = state.payment_status == PaymentStatus::Paid;

    if state.payment_method.is_cod() {
        if paid {
            return if state.status.is_initial() {
                Resolution::flagged(D::Processing, Anomaly::CodPaidBeforeConfirmation)
            } else {
                Resolution::clean(D::Processing)
            };
        }
        return if state.status.is_initial() {
            Resolution::clean(D::PendingCod)
        } else {
            Resolution::clean(D::ConfirmedCod)
        };
    }

    if paid {
        return Resolution::clean(D::Processing);
    }
    if state.payment_status == PaymentStatus::PendingCod {
        return Resolution::flagged(D::Pending, Anomaly::CodMarkerOnOnlineOrder);
    }
    if state.status.is_in_fulfilment() {
        return Resolution::flagged(D::Pending, Anomaly::FulfilmentWithoutPayment);
    }
    Resolution::clean(D::Pending)
}

/// [`resolve`] for callers that only need the status; anomalies are logged.
pub fn display_status(state: OrderState) -> DisplayStatus {
    let resolution = resolve(state);
    if let Some(anomaly) = resolution.anomaly {
        log::warn!(
            "Inconsistent order state (status={}, payment_status={}, payment_method={}): {}; showing {}",
            state.status,
            state.payment_status,
            state.payment_method,
            anomaly.describe(),
            resolution.display
        );
    }
    resolution.display
}

/// Actions offered to `actor` for an order in `display`.
pub fn actions_for(display: DisplayStatus, actor: Actor) -> &'static [OrderAction] {
    use DisplayStatus as D;
    use OrderAction as A;

    match (display, actor) {
        (D::Pending, Actor::Buyer) => &[A::Pay, A::Cancel],
        (D::Pending, Actor::Seller) => &[A::Cancel],
        (D::PendingCod, Actor::Buyer) => &[A::Cancel],
        (D::PendingCod, Actor::Seller) => &[A::ConfirmCod, A::Cancel],
        (D::ConfirmedCod, Actor::Buyer) => &[],
        (D::ConfirmedCod, Actor::Seller) => &[A::AcceptCodPayment, A::Cancel],
        (D::Processing, Actor::Buyer) => &[],
        (D::Processing, Actor::Seller) => &[A::MarkCompleted],
        (D::Completed, Actor::Buyer) => &[A::Review],
        (D::Completed, Actor::Seller) => &[],
        (D::Cancelled, _) => &[],
    }
}

fn ever_offered(action: OrderAction, actor: Actor) -> bool {
    DisplayStatus::ALL
        .iter()
        .any(|display| actions_for(*display, actor).contains(&action))
}

/// All stored triples that display as `display`, for query filters.
pub fn states_for(display: DisplayStatus) -> Vec<OrderState> {
    OrderState::all()
        .filter(|state| resolve(*state).display == display)
        .collect()
}

/// New persisted values produced by a legal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub mark_paid: bool,
    pub mark_confirmed: bool,
    /// Return the ordered quantity to the meal's stock.
    pub restock: bool,
}

impl Transition {
    fn to(status: OrderStatus, payment_status: PaymentStatus) -> Self {
        Self {
            status,
            payment_status,
            mark_paid: false,
            mark_confirmed: false,
            restock: false,
        }
    }

    fn paid(mut self) -> Self {
        self.mark_paid = true;
        self
    }

    fn confirmed(mut self) -> Self {
        self.mark_confirmed = true;
        self
    }

    fn restocked(mut self) -> Self {
        self.restock = true;
        self
    }

    pub fn apply_to(&self, state: OrderState) -> OrderState {
        OrderState::new(self.status, self.payment_status, state.payment_method)
    }
}

/// Validates `action` by `actor` against the current state and returns the
/// values to persist.
pub fn plan_action(state: OrderState, action: OrderAction, actor: Actor) -> AppResult<Transition> {
    let display = display_status(state);

    if !actions_for(display, actor).contains(&action) {
        // 403 only for actions this side never has; otherwise the state is wrong
        if !ever_offered(action, actor) {
            return Err(AppError::PermissionDenied);
        }
        return Err(AppError::InvalidState(format!(
            "Cannot {action} an order that is {display}"
        )));
    }

    let transition = match action {
        OrderAction::ConfirmCod => {
            Transition::to(OrderStatus::Confirmed, PaymentStatus::PendingCod).confirmed()
        }
        OrderAction::AcceptCodPayment => {
            Transition::to(OrderStatus::Processing, PaymentStatus::Paid).paid()
        }
        OrderAction::MarkCompleted => Transition::to(OrderStatus::Completed, PaymentStatus::Paid),
        OrderAction::Cancel => {
            Transition::to(OrderStatus::Cancelled, PaymentStatus::Cancelled).restocked()
        }
        OrderAction::Pay | OrderAction::Review => {
            return Err(AppError::ValidationError(format!(
                "{action} does not change the order status"
            )));
        }
    };
    Ok(transition)
}

/// Maps a requested target status (generic update-status endpoint) to the
/// action that produces it.
pub fn action_for_target(target: OrderStatus) -> AppResult<OrderAction> {
    match target {
        OrderStatus::Confirmed => Ok(OrderAction::ConfirmCod),
        OrderStatus::Processing => Ok(OrderAction::AcceptCodPayment),
        OrderStatus::Completed => Ok(OrderAction::MarkCompleted),
        OrderStatus::Cancelled => Ok(OrderAction::Cancel),
        other => Err(AppError::ValidationError(format!(
            "Status {other} cannot be set directly"
        ))),
    }
}

/// Normalised result reported by the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOutcome {
    Settled,
    Pending,
    Failed,
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayDecision {
    Apply(Transition),
    /// Duplicate or stale notification.
    Ignore,
    /// Money arrived for an order that is already cancelled.
    PaidAfterCancellation,
}

pub fn plan_gateway_outcome(
    state: OrderState,
    outcome: GatewayOutcome,
) -> AppResult<GatewayDecision> {
    if state.payment_method.is_cod() {
        return Err(AppError::InvalidState(
            "Cash on delivery orders are not settled by the gateway".to_string(),
        ));
    }

    let display = display_status(state);
    let decision = match (display, outcome) {
        (DisplayStatus::Pending, GatewayOutcome::Settled) => GatewayDecision::Apply(
            Transition::to(OrderStatus::Processing, PaymentStatus::Paid).paid(),
        ),
        (DisplayStatus::Pending, GatewayOutcome::Pending) => GatewayDecision::Ignore,
        (DisplayStatus::Pending, GatewayOutcome::Failed) => GatewayDecision::Apply(
            Transition::to(OrderStatus::Cancelled, PaymentStatus::Failed).restocked(),
        ),
        (DisplayStatus::Pending, GatewayOutcome::Expired) => GatewayDecision::Apply(
            Transition::to(OrderStatus::Cancelled, PaymentStatus::Expired).restocked(),
        ),
        (DisplayStatus::Pending, GatewayOutcome::Cancelled) => GatewayDecision::Apply(
            Transition::to(OrderStatus::Cancelled, PaymentStatus::Cancelled).restocked(),
        ),
        (DisplayStatus::Cancelled, GatewayOutcome::Settled) => {
            GatewayDecision::PaidAfterCancellation
        }
        _ => GatewayDecision::Ignore,
    };
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cod(status: OrderStatus, payment: PaymentStatus) -> OrderState {
        OrderState::new(status, payment, PaymentMethod::CashOnDelivery)
    }

    fn online(status: OrderStatus, payment: PaymentStatus) -> OrderState {
        OrderState::new(status, payment, PaymentMethod::Midtrans)
    }

    fn apply(state: OrderState, action: OrderAction, actor: Actor) -> OrderState {
        plan_action(state, action, actor).unwrap().apply_to(state)
    }

    #[test]
    fn test_every_state_resolves_to_one_display_status() {
        let states: Vec<_> = OrderState::all().collect();
        assert_eq!(states.len(), 8 * 6 * 2);

        let mut covered = HashMap::new();
        for state in &states {
            let r = resolve(*state);
            assert!(DisplayStatus::ALL.contains(&r.display));
            assert_eq!(resolve(*state), r);
            *covered.entry(r.display).or_insert(0) += 1;
        }
        for d in DisplayStatus::ALL {
            assert!(covered.contains_key(&d), "{d} is unreachable");
        }
    }

    #[test]
    fn test_states_for_partitions_all_states() {
        let total: usize = DisplayStatus::ALL.iter().map(|d| states_for(*d).len()).sum();
        assert_eq!(total, OrderState::all().count());
        assert!(
            states_for(DisplayStatus::ConfirmedCod)
                .iter()
                .all(|s| s.payment_method.is_cod())
        );
        assert!(
            states_for(DisplayStatus::Pending)
                .iter()
                .all(|s| !s.payment_method.is_cod())
        );
    }

    #[test]
    fn test_cancellation_dominates() {
        for method in PaymentMethod::iter() {
            for payment in PaymentStatus::iter() {
                let state = OrderState::new(OrderStatus::Cancelled, payment, method);
                assert_eq!(resolve(state), Resolution::clean(DisplayStatus::Cancelled));
            }
            for status in OrderStatus::iter() {
                for payment in [
                    PaymentStatus::Failed,
                    PaymentStatus::Expired,
                    PaymentStatus::Cancelled,
                ] {
                    let state = OrderState::new(status, payment, method);
                    assert_eq!(resolve(state).display, DisplayStatus::Cancelled);
                }
            }
        }
    }

    #[test]
    fn test_methods_only_diverge_on_cod_specific_states() {
        // Outside the unpaid COD window, both methods show the same status.
        for status in OrderStatus::iter() {
            for payment in [
                PaymentStatus::Paid,
                PaymentStatus::Failed,
                PaymentStatus::Expired,
                PaymentStatus::Cancelled,
            ] {
                assert_eq!(
                    resolve(cod(status, payment)).display,
                    resolve(online(status, payment)).display,
                    "{status}/{payment}"
                );
            }
        }
        assert_eq!(
            resolve(cod(OrderStatus::Pending, PaymentStatus::PendingCod)).display,
            DisplayStatus::PendingCod
        );
        assert_eq!(
            resolve(online(OrderStatus::Pending, PaymentStatus::Pending)).display,
            DisplayStatus::Pending
        );
    }

    #[test]
    fn test_inconsistent_states_are_flagged() {
        let r = resolve(online(OrderStatus::Completed, PaymentStatus::Failed));
        assert_eq!(r.display, DisplayStatus::Cancelled);
        assert_eq!(r.anomaly, Some(Anomaly::CompletedWithFailedPayment));

        let r = resolve(cod(OrderStatus::Completed, PaymentStatus::PendingCod));
        assert_eq!(r.display, DisplayStatus::Completed);
        assert_eq!(r.anomaly, Some(Anomaly::CompletedWithoutPayment));

        let r = resolve(cod(OrderStatus::Pending, PaymentStatus::Paid));
        assert_eq!(r.display, DisplayStatus::Processing);
        assert_eq!(r.anomaly, Some(Anomaly::CodPaidBeforeConfirmation));

        let r = resolve(online(OrderStatus::Ready, PaymentStatus::Pending));
        assert_eq!(r.anomaly, Some(Anomaly::FulfilmentWithoutPayment));

        let r = resolve(online(OrderStatus::AwaitingPayment, PaymentStatus::PendingCod));
        assert_eq!(r.anomaly, Some(Anomaly::CodMarkerOnOnlineOrder));
    }

    #[test]
    fn test_well_formed_flow_states_are_not_flagged() {
        for state in [
            online(OrderStatus::AwaitingPayment, PaymentStatus::Pending),
            online(OrderStatus::Processing, PaymentStatus::Paid),
            online(OrderStatus::Completed, PaymentStatus::Paid),
            online(OrderStatus::Cancelled, PaymentStatus::Expired),
            cod(OrderStatus::Pending, PaymentStatus::PendingCod),
            cod(OrderStatus::Confirmed, PaymentStatus::PendingCod),
            cod(OrderStatus::Processing, PaymentStatus::Paid),
            cod(OrderStatus::Completed, PaymentStatus::Paid),
        ] {
            assert_eq!(resolve(state).anomaly, None, "{state:?}");
        }
    }

    #[test]
    fn test_cod_walk_through() {
        let mut state = cod(OrderStatus::Pending, PaymentStatus::PendingCod);
        assert_eq!(display_status(state), DisplayStatus::PendingCod);

        state = apply(state, OrderAction::ConfirmCod, Actor::Seller);
        assert_eq!(display_status(state), DisplayStatus::ConfirmedCod);

        state = apply(state, OrderAction::AcceptCodPayment, Actor::Seller);
        assert_eq!(display_status(state), DisplayStatus::Processing);

        state = apply(state, OrderAction::MarkCompleted, Actor::Seller);
        assert_eq!(display_status(state), DisplayStatus::Completed);
        assert_eq!(state.payment_status, PaymentStatus::Paid);
        assert_eq!(actions_for(DisplayStatus::Completed, Actor::Buyer), &[OrderAction::Review]);
    }

    #[test]
    fn test_transition_flags() {
        let state = cod(OrderStatus::Pending, PaymentStatus::PendingCod);
        let t = plan_action(state, OrderAction::ConfirmCod, Actor::Seller).unwrap();
        assert!(t.mark_confirmed && !t.mark_paid && !t.restock);

        let t = plan_action(state, OrderAction::Cancel, Actor::Buyer).unwrap();
        assert!(t.restock);
        assert_eq!(t.status, OrderStatus::Cancelled);

        let confirmed = cod(OrderStatus::Confirmed, PaymentStatus::PendingCod);
        let t = plan_action(confirmed, OrderAction::AcceptCodPayment, Actor::Seller).unwrap();
        assert!(t.mark_paid);
    }

    #[test]
    fn test_illegal_actions_are_rejected() {
        let pending_cod = cod(OrderStatus::Pending, PaymentStatus::PendingCod);
        // seller-only action requested by the buyer
        assert!(matches!(
            plan_action(pending_cod, OrderAction::ConfirmCod, Actor::Buyer),
            Err(AppError::PermissionDenied)
        ));
        // skipping the confirmation step
        assert!(matches!(
            plan_action(pending_cod, OrderAction::AcceptCodPayment, Actor::Seller),
            Err(AppError::InvalidState(_))
        ));

        let processing = online(OrderStatus::Processing, PaymentStatus::Paid);
        assert!(matches!(
            plan_action(processing, OrderAction::Cancel, Actor::Seller),
            Err(AppError::InvalidState(_))
        ));

        // the buyer may cancel earlier, but not once the seller confirmed
        let confirmed = cod(OrderStatus::Confirmed, PaymentStatus::PendingCod);
        assert!(matches!(
            plan_action(confirmed, OrderAction::Cancel, Actor::Buyer),
            Err(AppError::InvalidState(_))
        ));
        assert!(matches!(
            plan_action(confirmed, OrderAction::AcceptCodPayment, Actor::Buyer),
            Err(AppError::PermissionDenied)
        ));
        assert!(matches!(
            plan_action(pending_cod, OrderAction::Pay, Actor::Seller),
            Err(AppError::PermissionDenied)
        ));

        let done = online(OrderStatus::Completed, PaymentStatus::Paid);
        for action in [OrderAction::MarkCompleted, OrderAction::Cancel] {
            assert!(plan_action(done, action, Actor::Seller).is_err());
        }
        assert!(matches!(
            plan_action(done, OrderAction::Review, Actor::Buyer),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_action_for_target() {
        assert_eq!(
            action_for_target(OrderStatus::Completed).unwrap(),
            OrderAction::MarkCompleted
        );
        assert_eq!(
            action_for_target(OrderStatus::Cancelled).unwrap(),
            OrderAction::Cancel
        );
        assert!(action_for_target(OrderStatus::Ready).is_err());
        assert!(action_for_target(OrderStatus::AwaitingPayment).is_err());
    }

    #[test]
    fn test_online_payment_settles_into_processing() {
        let state = online(OrderStatus::AwaitingPayment, PaymentStatus::Pending);
        let GatewayDecision::Apply(t) = plan_gateway_outcome(state, GatewayOutcome::Settled).unwrap()
        else {
            panic!("settlement should apply");
        };
        assert!(t.mark_paid);
        let state = t.apply_to(state);
        assert_eq!(display_status(state), DisplayStatus::Processing);

        // repeated notification
        assert_eq!(
            plan_gateway_outcome(state, GatewayOutcome::Settled).unwrap(),
            GatewayDecision::Ignore
        );
        // late failure after settlement
        assert_eq!(
            plan_gateway_outcome(state, GatewayOutcome::Expired).unwrap(),
            GatewayDecision::Ignore
        );

        let state = apply(state, OrderAction::MarkCompleted, Actor::Seller);
        assert_eq!(display_status(state), DisplayStatus::Completed);
    }

    #[test]
    fn test_online_payment_failures_cancel_and_restock() {
        for (outcome, payment) in [
            (GatewayOutcome::Failed, PaymentStatus::Failed),
            (GatewayOutcome::Expired, PaymentStatus::Expired),
            (GatewayOutcome::Cancelled, PaymentStatus::Cancelled),
        ] {
            let state = online(OrderStatus::AwaitingPayment, PaymentStatus::Pending);
            let GatewayDecision::Apply(t) = plan_gateway_outcome(state, outcome).unwrap() else {
                panic!("{outcome:?} should apply");
            };
            assert!(t.restock);
            assert_eq!(t.payment_status, payment);
            let next = t.apply_to(state);
            assert_eq!(display_status(next), DisplayStatus::Cancelled);
            assert_eq!(
                plan_gateway_outcome(next, outcome).unwrap(),
                GatewayDecision::Ignore
            );
        }
    }

    #[test]
    fn test_gateway_edge_cases() {
        let pending = online(OrderStatus::AwaitingPayment, PaymentStatus::Pending);
        assert_eq!(
            plan_gateway_outcome(pending, GatewayOutcome::Pending).unwrap(),
            GatewayDecision::Ignore
        );

        let cancelled = online(OrderStatus::Cancelled, PaymentStatus::Cancelled);
        assert_eq!(
            plan_gateway_outcome(cancelled, GatewayOutcome::Settled).unwrap(),
            GatewayDecision::PaidAfterCancellation
        );

        let cod_order = cod(OrderStatus::Pending, PaymentStatus::PendingCod);
        assert!(plan_gateway_outcome(cod_order, GatewayOutcome::Settled).is_err());
    }

    #[test]
    fn test_display_status_parse() {
        assert_eq!(
            "confirmed_cod".parse::<DisplayStatus>().unwrap(),
            DisplayStatus::ConfirmedCod
        );
        assert!("awaiting_payment".parse::<DisplayStatus>().is_err());
    }
}
