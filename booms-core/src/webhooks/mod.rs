//! Payment-provider webhook reconciliation (C9). Signature
//! verification lives in `booms-providers`; this module owns the
//! idempotent matching and crediting logic once a callback has been
//! authenticated.

use crate::db::schema::payment_transactions;
use crate::errors::BoomsResult;
use crate::ledger;
use crate::models::PaymentStatus;
use bigdecimal::BigDecimal;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

/// A provider callback, already signature-verified, describing the
/// outcome of a previously-initiated deposit or withdrawal.
#[derive(Debug, Clone)]
pub struct ProviderCallback {
    pub transaction_id: String,
    pub provider_reference: String,
    pub succeeded: bool,
    pub settled_amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Credited,
    MarkedFailed,
    AlreadyReconciled,
    /// No local record matches this callback's transaction id; treated
    /// as a no-op rather than an error so retried webhooks from the
    /// provider never fail loudly.
    NoMatch,
}

/// Reconciles a single provider callback against the locally persisted
/// `payment_transactions` row. Matching is keyed on the platform's own
/// transaction id, not the provider's reference, since the reference is
/// only assigned once the provider accepts the request.
pub async fn reconcile(
    conn: &mut AsyncPgConnection,
    callback: &ProviderCallback,
) -> BoomsResult<ReconcileOutcome> {
    let existing: Option<(PaymentStatus, i64, BigDecimal, String)> = payment_transactions::table
        .filter(payment_transactions::id.eq(&callback.transaction_id))
        .select((
            payment_transactions::status,
            payment_transactions::user_id,
            payment_transactions::net_amount,
            payment_transactions::kind,
        ))
        .for_update()
        .get_result(conn)
        .await
        .optional()?;

    let Some((status, user_id, net_amount, kind)) = existing else {
        return Ok(ReconcileOutcome::NoMatch);
    };

    if status != PaymentStatus::Pending {
        return Ok(ReconcileOutcome::AlreadyReconciled);
    }

    if !callback.succeeded {
        diesel::update(payment_transactions::table.filter(payment_transactions::id.eq(&callback.transaction_id)))
            .set((
                payment_transactions::status.eq(PaymentStatus::Failed),
                payment_transactions::provider_reference.eq(&callback.provider_reference),
            ))
            .execute(conn)
            .await?;
        return Ok(ReconcileOutcome::MarkedFailed);
    }

    diesel::update(payment_transactions::table.filter(payment_transactions::id.eq(&callback.transaction_id)))
        .set((
            payment_transactions::status.eq(PaymentStatus::Completed),
            payment_transactions::provider_reference.eq(&callback.provider_reference),
        ))
        .execute(conn)
        .await?;

    if kind == "deposit" {
        ledger::credit_real(
            conn,
            user_id,
            &net_amount,
            "deposit_real",
            &callback.provider_reference,
            "provider deposit settled",
        )
        .await?;
    }

    Ok(ReconcileOutcome::Credited)
}

/// Parses the platform-generated reference format
/// `BOOMS_DEPOSIT_<user_id>_<unix_ms>` / `BOOMS_WITHDRAWAL_<user_id>_<unix_ms>`
/// used to correlate a provider's own reference back to a local
/// transaction before the callback arrives.
pub fn parse_reference(reference: &str) -> Option<(&'static str, i64, i64)> {
    let (kind, rest) = if let Some(rest) = reference.strip_prefix("BOOMS_DEPOSIT_") {
        ("deposit", rest)
    } else if let Some(rest) = reference.strip_prefix("BOOMS_WITHDRAWAL_") {
        ("withdrawal", rest)
    } else {
        return None;
    };
    let mut parts = rest.splitn(2, '_');
    let user_id: i64 = parts.next()?.parse().ok()?;
    let unix_ms: i64 = parts.next()?.parse().ok()?;
    Some((kind, user_id, unix_ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deposit_reference() {
        let (kind, user_id, ms) = parse_reference("BOOMS_DEPOSIT_42_1704067200000").unwrap();
        assert_eq!(kind, "deposit");
        assert_eq!(user_id, 42);
        assert_eq!(ms, 1704067200000);
    }

    #[test]
    fn rejects_unrecognized_reference() {
        assert!(parse_reference("SOMETHING_ELSE_1_2").is_none());
    }
}
