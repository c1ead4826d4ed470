use crate::entities::{meal_entity as meals, message_entity as messages, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::require_text;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::collections::HashMap;

const BODY_MAX: usize = 2000;

/// A conversation before partner names are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationDigest {
    pub partner_id: i64,
    pub last_message: messages::Model,
    pub unread_count: u64,
}

/// Groups `user_id`'s messages by partner, newest conversation first.
pub fn summarize_conversations(
    user_id: i64,
    all: Vec<messages::Model>,
) -> Vec<ConversationDigest> {
    let mut by_partner: HashMap<i64, ConversationDigest> = HashMap::new();

    for m in all {
        let partner_id = m.partner_of(user_id);
        let unread = u64::from(m.recipient_id == user_id && m.read_at.is_none());
        match by_partner.get_mut(&partner_id) {
            Some(digest) => {
                digest.unread_count += unread;
                if (m.created_at, m.id) > (digest.last_message.created_at, digest.last_message.id) {
                    digest.last_message = m;
                }
            }
            None => {
                by_partner.insert(
                    partner_id,
                    ConversationDigest {
                        partner_id,
                        last_message: m,
                        unread_count: unread,
                    },
                );
            }
        }
    }

    let mut digests: Vec<_> = by_partner.into_values().collect();
    digests.sort_by(|a, b| {
        (b.last_message.created_at, b.last_message.id)
            .cmp(&(a.last_message.created_at, a.last_message.id))
    });
    digests
}

/// Messages in `page` sent to `user_id` and not read yet.
fn unread_incoming_ids(user_id: i64, page: &[messages::Model]) -> Vec<i64> {
    page.iter()
        .filter(|m| m.recipient_id == user_id && m.read_at.is_none())
        .map(|m| m.id)
        .collect()
}

fn between(a: i64, b: i64) -> Condition {
    Condition::any()
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(a))
                .add(messages::Column::RecipientId.eq(b)),
        )
        .add(
            Condition::all()
                .add(messages::Column::SenderId.eq(b))
                .add(messages::Column::RecipientId.eq(a)),
        )
}

#[derive(Clone)]
pub struct MessageService {
    pool: DatabaseConnection,
}

impl MessageService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn send_message(
        &self,
        sender_id: i64,
        request: SendMessageRequest,
    ) -> AppResult<MessageResponse> {
        if request.recipient_id == sender_id {
            return Err(AppError::ValidationError(
                "You cannot message yourself".to_string(),
            ));
        }
        let body = require_text("Message", &request.body, BODY_MAX)?;

        users::Entity::find_by_id(request.recipient_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Recipient not found".to_string()))?;

        if let Some(meal_id) = request.meal_id {
            meals::Entity::find_by_id(meal_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Meal not found".to_string()))?;
        }

        let message = messages::ActiveModel {
            sender_id: Set(sender_id),
            recipient_id: Set(request.recipient_id),
            meal_id: Set(request.meal_id),
            body: Set(body),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        Ok(message.into())
    }

    /// One page of the thread with `query.with`, oldest first. Messages on
    /// this page addressed to `user_id` are marked read.
    pub async fn get_conversation(
        &self,
        user_id: i64,
        query: &ConversationQuery,
    ) -> AppResult<PaginatedResponse<MessageResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let base_query = messages::Entity::find().filter(between(user_id, query.with));
        let total = base_query.clone().count(&self.pool).await?;
        // page 1 is the most recent page
        let mut items = base_query
            .order_by_desc(messages::Column::CreatedAt)
            .order_by_desc(messages::Column::Id)
            .limit(params.get_limit())
            .offset(params.get_offset())
            .all(&self.pool)
            .await?;
        items.reverse();

        let unread = unread_incoming_ids(user_id, &items);
        if !unread.is_empty() {
            let now = Utc::now();
            messages::Entity::update_many()
                .col_expr(messages::Column::ReadAt, Expr::value(now))
                .filter(messages::Column::Id.is_in(unread))
                .filter(messages::Column::ReadAt.is_null())
                .exec(&self.pool)
                .await?;
            for m in items.iter_mut() {
                if m.recipient_id == user_id && m.read_at.is_none() {
                    m.read_at = Some(now);
                }
            }
        }

        Ok(PaginatedResponse::new(
            items.into_iter().map(MessageResponse::from).collect(),
            &params,
            total,
        ))
    }

    pub async fn list_conversations(&self, user_id: i64) -> AppResult<Vec<ConversationSummary>> {
        let all = messages::Entity::find()
            .filter(
                Condition::any()
                    .add(messages::Column::SenderId.eq(user_id))
                    .add(messages::Column::RecipientId.eq(user_id)),
            )
            .all(&self.pool)
            .await?;

        let digests = summarize_conversations(user_id, all);
        if digests.is_empty() {
            return Ok(Vec::new());
        }

        let partner_ids: Vec<i64> = digests.iter().map(|d| d.partner_id).collect();
        let names: HashMap<i64, String> = users::Entity::find()
            .filter(users::Column::Id.is_in(partner_ids))
            .select_only()
            .column(users::Column::Id)
            .column(users::Column::Name)
            .into_tuple::<(i64, String)>()
            .all(&self.pool)
            .await?
            .into_iter()
            .collect();

        Ok(digests
            .into_iter()
            .map(|d| ConversationSummary {
                partner_name: names.get(&d.partner_id).cloned(),
                partner_id: d.partner_id,
                last_message: d.last_message.into(),
                unread_count: d.unread_count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn msg(id: i64, from: i64, to: i64, minute: i64, read: bool) -> messages::Model {
        let at = Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0).unwrap() + Duration::minutes(minute);
        messages::Model {
            id,
            sender_id: from,
            recipient_id: to,
            meal_id: None,
            body: format!("message {id}"),
            read_at: read.then_some(at),
            created_at: Some(at),
        }
    }

    #[test]
    fn test_summarize_conversations() {
        let me = 1;
        let all = vec![
            msg(1, 2, me, 0, true),
            msg(2, me, 2, 1, false),
            msg(3, 3, me, 2, false),
            msg(4, 3, me, 3, false),
            msg(5, 2, me, 4, false),
        ];

        let digests = summarize_conversations(me, all);
        assert_eq!(digests.len(), 2);

        assert_eq!(digests[0].partner_id, 2);
        assert_eq!(digests[0].last_message.id, 5);
        assert_eq!(digests[0].unread_count, 1);

        assert_eq!(digests[1].partner_id, 3);
        assert_eq!(digests[1].last_message.id, 4);
        assert_eq!(digests[1].unread_count, 2);
    }

    #[test]
    fn test_only_the_opened_page_is_marked_read() {
        let me = 1;
        // page of the thread as loaded: one read, one mine, two unread
        let page = vec![
            msg(10, 2, me, 0, true),
            msg(11, me, 2, 1, false),
            msg(12, 2, me, 2, false),
            msg(13, 2, me, 3, false),
        ];
        assert_eq!(unread_incoming_ids(me, &page), vec![12, 13]);
        assert!(unread_incoming_ids(me, &page[..2]).is_empty());
    }

    #[test]
    fn test_own_unread_messages_are_not_counted() {
        let digests = summarize_conversations(1, vec![msg(1, 1, 2, 0, false)]);
        assert_eq!(digests[0].unread_count, 0);
        assert!(summarize_conversations(1, Vec::new()).is_empty());
    }
}
