//! Orders Repository

use async_trait::async_trait;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use sqlx::{PgPool, query_scalar};

use timeart::orders::{Fulfilment, NewOrder};

use crate::domain::orders::errors::OrdersRepositoryError;

const CREATE_ORDER_IF_ABSENT_SQL: &str = include_str!("sql/create_order_if_absent.sql");

/// Result of a conditional order insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOrderOutcome {
    Created,

    /// An order with the same session id was already stored; nothing was written.
    AlreadyExists,
}

/// Durable order storage keyed by payment session id.
#[automock]
#[async_trait]
pub trait OrdersRepository: Send + Sync {
    /// Insert `order` unless one with the same session id exists.
    async fn create_order_if_absent(
        &self,
        order: NewOrder,
    ) -> Result<CreateOrderOutcome, OrdersRepositoryError>;
}

#[derive(Debug, Clone)]
pub struct PgOrdersRepository {
    pool: PgPool,
}

impl PgOrdersRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrdersRepository for PgOrdersRepository {
    async fn create_order_if_absent(
        &self,
        order: NewOrder,
    ) -> Result<CreateOrderOutcome, OrdersRepositoryError> {
        let (download_url, download_expires_at, shipping_address) = match order.fulfilment {
            Fulfilment::Download(grant) => (
                Some(grant.url),
                Some(SqlxTimestamp::from(grant.expires_at)),
                None,
            ),
            Fulfilment::Ship { address } => (None, None, address),
        };

        let inserted = query_scalar::<_, String>(CREATE_ORDER_IF_ABSENT_SQL)
            .bind(&order.session_id)
            .bind(&order.customer_email)
            .bind(&order.customer_name)
            .bind(order.photo.into_uuid())
            .bind(order.purchase_type.as_str())
            .bind(&order.license_label)
            .bind(order.order_total)
            .bind(order.commission_rate)
            .bind(order.split.artist_commission)
            .bind(order.split.platform_fee)
            .bind(order.status.as_str())
            .bind(&order.payment_intent)
            .bind(SqlxTimestamp::from(order.purchased_at))
            .bind(download_url)
            .bind(download_expires_at)
            .bind(shipping_address)
            .bind(&order.notes)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match inserted {
            Some(_) => CreateOrderOutcome::Created,
            None => CreateOrderOutcome::AlreadyExists,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use jiff::Timestamp;
    use sqlx::query_scalar;
    use testresult::TestResult;

    use timeart::{orders::CompletedCheckout, photos::PhotoUuid};

    use crate::test::TestContext;

    use super::*;

    fn order(session_id: &str, purchase_type: &str) -> TestResult<NewOrder> {
        let checkout = CompletedCheckout {
            session_id: session_id.to_string(),
            amount_total: Some(10_000),
            metadata: BTreeMap::from([
                ("photoId".to_string(), PhotoUuid::new().to_string()),
                ("type".to_string(), purchase_type.to_string()),
            ]),
            ..CompletedCheckout::default()
        };

        Ok(NewOrder::derive(
            &checkout,
            Timestamp::now(),
            "https://downloads.example.com",
            "token",
        )?)
    }

    async fn count_orders(ctx: &TestContext, session_id: &str) -> TestResult<i64> {
        Ok(
            query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(ctx.db.pool())
                .await?,
        )
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn first_insert_creates_the_order() -> TestResult {
        let ctx = TestContext::new().await;

        let outcome = ctx
            .orders
            .create_order_if_absent(order("cs_first", "digital")?)
            .await?;

        assert_eq!(outcome, CreateOrderOutcome::Created);
        assert_eq!(count_orders(&ctx, "cs_first").await?, 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn repeated_session_is_suppressed() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.orders
            .create_order_if_absent(order("cs_repeat", "print")?)
            .await?;

        let outcome = ctx
            .orders
            .create_order_if_absent(order("cs_repeat", "print")?)
            .await?;

        assert_eq!(outcome, CreateOrderOutcome::AlreadyExists);
        assert_eq!(count_orders(&ctx, "cs_repeat").await?, 1);

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon"]
    async fn concurrent_inserts_create_one_order() -> TestResult {
        let ctx = TestContext::new().await;

        let first = order("cs_race", "digital")?;
        let second = order("cs_race", "digital")?;

        let (a, b) = tokio::join!(
            ctx.orders.create_order_if_absent(first),
            ctx.orders.create_order_if_absent(second),
        );

        let mut outcomes = [a?, b?];
        outcomes.sort_by_key(|outcome| *outcome == CreateOrderOutcome::AlreadyExists);

        assert_eq!(
            outcomes,
            [CreateOrderOutcome::Created, CreateOrderOutcome::AlreadyExists]
        );
        assert_eq!(count_orders(&ctx, "cs_race").await?, 1);

        Ok(())
    }
}
