use sea_orm_migration::prelude::extension::postgres::{Type, TypeCreateStatement};
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    OrderCode,
    BuyerId,
    SellerId,
    MealId,
    BuyerName,
    BuyerEmail,
    BuyerPhone,
    Address,
    City,
    PostalCode,
    Quantity,
    TotalPrice,
    Status,
    PaymentStatus,
    PaymentMethod,
    OrderType,
    SpecialInstructions,
    SnapToken,
    SnapRedirectUrl,
    GatewayTransactionId,
    GatewayPaymentType,
    CreatedAt,
    PaidAt,
    ConfirmedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Meals {
    Table,
    Id,
}

fn enum_type(name: &str, values: &[&str]) -> TypeCreateStatement {
    Type::create()
        .as_enum(Alias::new(name))
        .values(values.iter().map(|v| Alias::new(*v)).collect::<Vec<_>>())
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(enum_type(
                "order_status",
                &[
                    "pending",
                    "awaiting_payment",
                    "confirmed",
                    "in_progress",
                    "processing",
                    "ready",
                    "completed",
                    "cancelled",
                ],
            ))
            .await?;
        manager
            .create_type(enum_type(
                "payment_status",
                &["pending", "paid", "failed", "expired", "cancelled", "pending_cod"],
            ))
            .await?;
        manager
            .create_type(enum_type("payment_method", &["midtrans", "cash_on_delivery"]))
            .await?;
        manager
            .create_type(enum_type(
                "order_type",
                &["pickup", "delivery", "dine_in", "takeaway"],
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderCode)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Orders::BuyerId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::SellerId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::MealId).big_integer().not_null())
                    .col(ColumnDef::new(Orders::BuyerName).string_len(120).not_null())
                    .col(ColumnDef::new(Orders::BuyerEmail).string_len(255).not_null())
                    .col(ColumnDef::new(Orders::BuyerPhone).string_len(32).not_null())
                    .col(ColumnDef::new(Orders::Address).text().null())
                    .col(ColumnDef::new(Orders::City).string_len(120).null())
                    .col(ColumnDef::new(Orders::PostalCode).string_len(16).null())
                    .col(ColumnDef::new(Orders::Quantity).integer().not_null())
                    .col(ColumnDef::new(Orders::TotalPrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(Orders::Status)
                            .custom(Alias::new("order_status"))
                            .not_null()
                            .default(Expr::cust("'pending'::order_status")),
                    )
                    .col(
                        ColumnDef::new(Orders::PaymentStatus)
                            .custom(Alias::new("payment_status"))
                            .not_null()
                            .default(Expr::cust("'pending'::payment_status")),
                    )
                    .col(
                        ColumnDef::new(Orders::PaymentMethod)
                            .custom(Alias::new("payment_method"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Orders::OrderType)
                            .custom(Alias::new("order_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Orders::SpecialInstructions).text().null())
                    .col(ColumnDef::new(Orders::SnapToken).string_len(255).null())
                    .col(ColumnDef::new(Orders::SnapRedirectUrl).text().null())
                    .col(
                        ColumnDef::new(Orders::GatewayTransactionId)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::GatewayPaymentType)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(ColumnDef::new(Orders::PaidAt).timestamp_with_time_zone().null())
                    .col(
                        ColumnDef::new(Orders::ConfirmedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Orders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_buyer")
                            .from(Orders::Table, Orders::BuyerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_seller")
                            .from(Orders::Table, Orders::SellerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_meal")
                            .from(Orders::Table, Orders::MealId)
                            .to(Meals::Table, Meals::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, col) in [
            ("idx_orders_buyer", Orders::BuyerId),
            ("idx_orders_seller", Orders::SellerId),
            ("idx_orders_payment_status", Orders::PaymentStatus),
        ] {
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name(name)
                        .table(Orders::Table)
                        .col(col)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Orders::Table).to_owned())
            .await?;
        for name in ["order_type", "payment_method", "payment_status", "order_status"] {
            manager
                .drop_type(Type::drop().name(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}
