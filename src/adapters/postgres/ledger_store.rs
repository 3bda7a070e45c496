//! PostgreSQL implementation of the ledger store.
//!
//! Atomicity comes from one transaction per batch. Per-user serialization
//! comes from the conditional `UPDATE wallets ... RETURNING balance`, which
//! takes the wallet row lock for the remainder of the transaction; a second
//! batch for the same user blocks until the first commits and then sees the
//! updated balance. The payment transition is a conditional update on
//! `status = 'pending'`, which makes callback reconciliation exactly-once.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entitlement::Entitlement;
use crate::domain::foundation::{EpisodeId, LedgerEntryId, PaymentId, Timestamp, UserId};
use crate::domain::ledger::{EntryDraft, EntryKind, LedgerEntry, LedgerError};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::ports::{AppliedBatch, LedgerBatch, LedgerStore, PaymentTransition};

pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the entry's delta to the wallet, locking the row.
    ///
    /// `None` from the conditional update means either no wallet or not
    /// enough balance; a follow-up select tells them apart.
    async fn debit_or_credit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        amount: i64,
    ) -> Result<i64, LedgerError> {
        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE wallets
            SET balance = balance + $2, updated_at = NOW()
            WHERE user_id = $1 AND balance + $2 >= 0
            RETURNING balance
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(amount)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;

        if let Some((balance,)) = updated {
            return Ok(balance);
        }

        let available: Option<(i64,)> = sqlx::query_as(
            "SELECT balance FROM wallets WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;

        match available {
            Some((balance,)) => Err(LedgerError::InsufficientFunds {
                needed: -amount,
                available: balance,
            }),
            None => Err(LedgerError::WalletNotFound(user_id)),
        }
    }

    async fn insert_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        draft: &EntryDraft,
        balance_after: i64,
    ) -> Result<LedgerEntryId, LedgerError> {
        let entry_id = LedgerEntryId::new();
        sqlx::query(
            r#"
            INSERT INTO ledger_entries (
                id, user_id, kind, amount, balance_after, description, reference_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            "#,
        )
        .bind(entry_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(draft.kind.as_str())
        .bind(draft.amount)
        .bind(balance_after)
        .bind(&draft.description)
        .bind(draft.reference_id)
        .execute(&mut **tx)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(entry_id)
    }

    async fn insert_entitlement(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entitlement: &Entitlement,
    ) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO entitlements (
                id, user_id, episode_id, amount_paid, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entitlement.id.as_uuid())
        .bind(entitlement.user_id.as_uuid())
        .bind(entitlement.episode_id.as_uuid())
        .bind(entitlement.amount_paid)
        .bind(entitlement.status.as_str())
        .bind(entitlement.created_at.as_datetime())
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("entitlements_user_episode_completed_key") {
                    return LedgerError::DuplicateEntitlement {
                        user_id: entitlement.user_id,
                        episode_id: entitlement.episode_id,
                    };
                }
            }
            LedgerError::storage(e.to_string())
        })?;
        Ok(())
    }

    async fn apply_transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        transition: &PaymentTransition,
    ) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(transition.payment_id.as_uuid())
        .bind(transition.to.as_str())
        .execute(&mut **tx)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::PaymentNotPending);
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LedgerEntryRow {
    id: Uuid,
    user_id: Uuid,
    kind: String,
    amount: i64,
    balance_after: i64,
    description: String,
    reference_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<LedgerEntryRow> for LedgerEntry {
    type Error = LedgerError;

    fn try_from(row: LedgerEntryRow) -> Result<Self, Self::Error> {
        let kind = EntryKind::parse(&row.kind)
            .ok_or_else(|| LedgerError::storage(format!("invalid entry kind: {}", row.kind)))?;
        Ok(LedgerEntry {
            id: LedgerEntryId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            kind,
            amount: row.amount,
            balance_after: row.balance_after,
            description: row.description,
            reference_id: row.reference_id,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    user_id: Uuid,
    amount: i64,
    currency: String,
    coins: i64,
    gateway: Option<String>,
    gateway_ref: Option<String>,
    status: String,
    gateway_payload: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = LedgerError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status = PaymentStatus::parse(&row.status).ok_or_else(|| {
            LedgerError::storage(format!("invalid payment status: {}", row.status))
        })?;
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            amount: row.amount,
            currency: crate::domain::catalog::Currency::new(&row.currency),
            coins: row.coins,
            gateway: row.gateway,
            gateway_ref: row.gateway_ref,
            status,
            gateway_payload: row.gateway_payload,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn create_wallet(
        &self,
        user_id: UserId,
        welcome: EntryDraft,
    ) -> Result<AppliedBatch, LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO wallets (user_id, balance, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(welcome.amount)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("wallets_pkey") {
                    return LedgerError::WalletExists(user_id);
                }
            }
            LedgerError::storage(e.to_string())
        })?;

        let entry_id = self
            .insert_entry(&mut tx, user_id, &welcome, welcome.amount)
            .await?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(AppliedBatch {
            entry_id,
            new_balance: welcome.amount,
        })
    }

    async fn read_balance(&self, user_id: UserId) -> Result<i64, LedgerError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT balance FROM wallets WHERE user_id = $1",
        )
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;
        row.map(|(balance,)| balance)
            .ok_or(LedgerError::WalletNotFound(user_id))
    }

    async fn apply_atomic(
        &self,
        user_id: UserId,
        batch: LedgerBatch,
    ) -> Result<AppliedBatch, LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(e.to_string()))?;

        let new_balance = self.debit_or_credit(&mut tx, user_id, batch.entry.amount).await?;
        let entry_id = self
            .insert_entry(&mut tx, user_id, &batch.entry, new_balance)
            .await?;
        for entitlement in &batch.entitlements {
            self.insert_entitlement(&mut tx, entitlement).await?;
        }
        if let Some(transition) = &batch.payment_transition {
            self.apply_transition(&mut tx, transition).await?;
        }

        tx.commit()
            .await
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(AppliedBatch {
            entry_id,
            new_balance,
        })
    }

    async fn ledger_entries(&self, user_id: UserId) -> Result<Vec<LedgerEntry>, LedgerError> {
        // Distinguishes an empty history from a missing wallet.
        self.read_balance(user_id).await?;

        let rows: Vec<LedgerEntryRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, kind, amount, balance_after, description, reference_id, created_at
            FROM ledger_entries
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;

        rows.into_iter().map(LedgerEntry::try_from).collect()
    }

    async fn owns(&self, user_id: UserId, episode_id: EpisodeId) -> Result<bool, LedgerError> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM entitlements
                WHERE user_id = $1 AND episode_id = $2 AND status = 'completed'
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(episode_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(exists)
    }

    async fn owned_episodes(
        &self,
        user_id: UserId,
        episode_ids: &[EpisodeId],
    ) -> Result<Vec<EpisodeId>, LedgerError> {
        let ids: Vec<Uuid> = episode_ids.iter().map(|id| *id.as_uuid()).collect();
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT episode_id FROM entitlements
            WHERE user_id = $1 AND status = 'completed' AND episode_id = ANY($2)
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|(id,)| EpisodeId::from_uuid(id))
            .collect())
    }

    async fn create_payment(&self, payment: &Payment) -> Result<(), LedgerError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, user_id, amount, currency, coins, gateway, gateway_ref,
                status, gateway_payload, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.user_id.as_uuid())
        .bind(payment.amount)
        .bind(payment.currency.as_str())
        .bind(payment.coins)
        .bind(&payment.gateway)
        .bind(&payment.gateway_ref)
        .bind(payment.status.as_str())
        .bind(&payment.gateway_payload)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;
        Ok(())
    }

    async fn attach_payment_reference(&self, payment: &Payment) -> Result<(), LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET gateway = $2, gateway_ref = $3, gateway_payload = $4, updated_at = NOW()
            WHERE id = $1 AND status = 'pending' AND gateway_ref IS NULL
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(&payment.gateway)
        .bind(&payment.gateway_ref)
        .bind(&payment.gateway_payload)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("payments_gateway_ref_key") {
                    return LedgerError::Conflict;
                }
            }
            LedgerError::storage(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::PaymentNotPending);
        }
        Ok(())
    }

    async fn find_payment_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Payment>, LedgerError> {
        let row: Option<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, amount, currency, coins, gateway, gateway_ref,
                   status, gateway_payload, created_at, updated_at
            FROM payments
            WHERE gateway_ref = $1
            "#,
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| LedgerError::storage(e.to_string()))?;
        row.map(Payment::try_from).transpose()
    }

    async fn transition_payment(
        &self,
        transition: PaymentTransition,
    ) -> Result<(), LedgerError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::storage(e.to_string()))?;
        self.apply_transition(&mut tx, &transition).await?;
        tx.commit()
            .await
            .map_err(|e| LedgerError::storage(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_row_converts_to_domain() {
        let row = LedgerEntryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "purchase".to_string(),
            amount: -10,
            balance_after: 40,
            description: "Purchased episode: The Heist".to_string(),
            reference_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        };
        let entry = LedgerEntry::try_from(row).unwrap();
        assert_eq!(entry.kind, EntryKind::Purchase);
        assert_eq!(entry.balance_after, 40);
    }

    #[test]
    fn entry_row_rejects_unknown_kind() {
        let row = LedgerEntryRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            kind: "bonus".to_string(),
            amount: 5,
            balance_after: 55,
            description: String::new(),
            reference_id: None,
            created_at: Utc::now(),
        };
        assert!(LedgerEntry::try_from(row).is_err());
    }

    #[test]
    fn payment_row_converts_to_domain() {
        let row = PaymentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: 9900,
            currency: "INR".to_string(),
            coins: 120,
            gateway: Some("razorpay".to_string()),
            gateway_ref: Some("order_abc".to_string()),
            status: "pending".to_string(),
            gateway_payload: Some(serde_json::json!({"order_id": "order_abc"})),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let payment = Payment::try_from(row).unwrap();
        assert_eq!(payment.status, PaymentStatus::Pending);
        assert_eq!(payment.coins, 120);
    }

    #[test]
    fn payment_row_rejects_unknown_status() {
        let row = PaymentRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: 9900,
            currency: "INR".to_string(),
            coins: 120,
            gateway: None,
            gateway_ref: None,
            status: "refunded".to_string(),
            gateway_payload: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Payment::try_from(row).is_err());
    }
}
