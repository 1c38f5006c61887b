//! Ledger primitives (C1): two strictly separated balance namespaces
//! (real cash, virtual/redistribution) plus the platform treasury.
//! Every mutation here runs inside a pipeline's already-open
//! transaction and assumes the caller has already acquired the target
//! row's lock per `db::locking`.

use crate::db::schema::{real_balances, transaction_log, treasury, virtual_balances};
use crate::errors::{BoomsError, BoomsResult};
use crate::models::transaction_log::{classify_kind, LedgerDirection, LedgerTarget, NewTransactionLogEntry};
use crate::money::round_value;
use bigdecimal::BigDecimal;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

/// Kinds whose target/direction is asserted by the caller rather than
/// derived purely from the prefix table (used for the virtual ledger,
/// whose prefixes vary but always contain "redistribution").
fn assert_kind_matches(kind: &str, expected_target: LedgerTarget, expected_direction: LedgerDirection) {
    let (target, direction) = classify_kind(kind);
    assert_eq!(target, expected_target, "kind {kind} routed to the wrong ledger");
    if direction != LedgerDirection::Neutral {
        assert_eq!(direction, expected_direction, "kind {kind} has the wrong direction");
    }
}

async fn append_log(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    amount: &BigDecimal,
    kind: &str,
    target: LedgerTarget,
    reference: &str,
    description: &str,
) -> BoomsResult<i64> {
    let entry = NewTransactionLogEntry {
        user_id,
        amount: round_value(amount),
        kind: kind.to_string(),
        target: target.as_str().to_string(),
        description: description.to_string(),
        status: "completed".to_string(),
        reference: reference.to_string(),
        created_at: Utc::now(),
    };
    let id = diesel::insert_into(transaction_log::table)
        .values(&entry)
        .returning(transaction_log::id)
        .get_result(conn)
        .await?;
    Ok(id)
}

/// Credits a user's real balance. Caller must already hold the real
/// balance row's exclusive lock for the pipeline's duration.
pub async fn credit_real(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    amount: &BigDecimal,
    kind: &str,
    reference: &str,
    description: &str,
) -> BoomsResult<i64> {
    assert_kind_matches(kind, LedgerTarget::Real, LedgerDirection::Credit);
    let amount = round_value(amount);
    diesel::update(real_balances::table.filter(real_balances::user_id.eq(user_id)))
        .set((
            real_balances::available.eq(real_balances::available + &amount),
            real_balances::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    append_log(conn, user_id, &amount, kind, LedgerTarget::Real, reference, description).await
}

/// Debits a user's real balance. Fails with `INSUFFICIENT_REAL_FUNDS`
/// if `available < amount` *before* any mutation happens (spec.md §4.1).
pub async fn debit_real(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    amount: &BigDecimal,
    kind: &str,
    reference: &str,
    description: &str,
) -> BoomsResult<i64> {
    assert_kind_matches(kind, LedgerTarget::Real, LedgerDirection::Debit);
    let amount = round_value(amount);
    let available: BigDecimal = real_balances::table
        .filter(real_balances::user_id.eq(user_id))
        .select(real_balances::available)
        .for_update()
        .get_result(conn)
        .await?;
    if available < amount {
        return Err(BoomsError::InsufficientRealFunds {
            needed: amount.to_string(),
            available: available.to_string(),
        });
    }
    diesel::update(real_balances::table.filter(real_balances::user_id.eq(user_id)))
        .set((
            real_balances::available.eq(real_balances::available.clone() - &amount),
            real_balances::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    append_log(conn, user_id, &amount, kind, LedgerTarget::Real, reference, description).await
}

/// Credits a user's virtual (redistribution-only) balance. `kind` must
/// contain "redistribution" (spec.md §4.1) — anything else is a
/// programming error, not a recoverable runtime condition.
pub async fn credit_virtual(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    amount: &BigDecimal,
    kind: &str,
    reference: &str,
    description: &str,
) -> BoomsResult<i64> {
    assert_kind_matches(kind, LedgerTarget::Virtual, LedgerDirection::Credit);
    let amount = round_value(amount);
    diesel::update(virtual_balances::table.filter(virtual_balances::user_id.eq(user_id)))
        .set((
            virtual_balances::balance.eq(virtual_balances::balance + &amount),
            virtual_balances::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    append_log(conn, user_id, &amount, kind, LedgerTarget::Virtual, reference, description).await
}

pub async fn debit_virtual(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    amount: &BigDecimal,
    kind: &str,
    reference: &str,
    description: &str,
) -> BoomsResult<i64> {
    assert_kind_matches(kind, LedgerTarget::Virtual, LedgerDirection::Debit);
    let amount = round_value(amount);
    let balance: BigDecimal = virtual_balances::table
        .filter(virtual_balances::user_id.eq(user_id))
        .select(virtual_balances::balance)
        .for_update()
        .get_result(conn)
        .await?;
    if balance < amount {
        return Err(BoomsError::InsufficientVirtualFunds {
            needed: amount.to_string(),
            available: balance.to_string(),
        });
    }
    diesel::update(virtual_balances::table.filter(virtual_balances::user_id.eq(user_id)))
        .set((
            virtual_balances::balance.eq(virtual_balances::balance.clone() - &amount),
            virtual_balances::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    append_log(conn, user_id, &amount, kind, LedgerTarget::Virtual, reference, description).await
}

/// Moves `amount` from `available` to `locked` for a pending operation.
pub async fn lock_funds(conn: &mut AsyncPgConnection, user_id: i64, amount: &BigDecimal) -> BoomsResult<()> {
    let amount = round_value(amount);
    let available: BigDecimal = real_balances::table
        .filter(real_balances::user_id.eq(user_id))
        .select(real_balances::available)
        .for_update()
        .get_result(conn)
        .await?;
    if available < amount {
        return Err(BoomsError::InsufficientRealFunds {
            needed: amount.to_string(),
            available: available.to_string(),
        });
    }
    diesel::update(real_balances::table.filter(real_balances::user_id.eq(user_id)))
        .set((
            real_balances::available.eq(real_balances::available.clone() - &amount),
            real_balances::locked.eq(real_balances::locked.clone() + &amount),
            real_balances::updated_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    Ok(())
}

pub enum UnlockOutcome {
    /// The locked amount is consumed (moves out of the ledger entirely,
    /// e.g. into a completed debit elsewhere).
    Settle,
    /// The locked amount returns to `available` (the pending operation
    /// was cancelled/declined).
    Release,
}

pub async fn unlock_funds(
    conn: &mut AsyncPgConnection,
    user_id: i64,
    amount: &BigDecimal,
    outcome: UnlockOutcome,
) -> BoomsResult<()> {
    let amount = round_value(amount);
    match outcome {
        UnlockOutcome::Settle => {
            diesel::update(real_balances::table.filter(real_balances::user_id.eq(user_id)))
                .set((
                    real_balances::locked.eq(real_balances::locked.clone() - &amount),
                    real_balances::updated_at.eq(Utc::now()),
                ))
                .execute(conn)
                .await?;
        }
        UnlockOutcome::Release => {
            diesel::update(real_balances::table.filter(real_balances::user_id.eq(user_id)))
                .set((
                    real_balances::locked.eq(real_balances::locked.clone() - &amount),
                    real_balances::available.eq(real_balances::available.clone() + &amount),
                    real_balances::updated_at.eq(Utc::now()),
                ))
                .execute(conn)
                .await?;
        }
    }
    Ok(())
}

/// Credits the treasury's balance and fee counters in one statement;
/// every fee collected is reflected here in the same transaction as
/// the pipeline that produced it (spec.md §3 Treasury invariant).
pub async fn credit_treasury(
    conn: &mut AsyncPgConnection,
    amount: &BigDecimal,
    kind: &str,
) -> BoomsResult<()> {
    assert_kind_matches(kind, LedgerTarget::Treasury, LedgerDirection::Neutral);
    let amount = round_value(amount);
    diesel::update(treasury::table.filter(treasury::id.eq(crate::models::treasury::TREASURY_SINGLETON_ID)))
        .set((
            treasury::balance.eq(treasury::balance + &amount),
            treasury::total_fees_collected.eq(treasury::total_fees_collected + &amount),
            treasury::total_transactions.eq(treasury::total_transactions + 1),
            treasury::last_transaction_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    Ok(())
}

/// Debits the treasury (used by withdrawal's user-gain offset, spec.md
/// §4.8). Unlike user balances, the treasury may go transiently
/// negative mid-redistribution but must end any commit `>= 0` is NOT
/// enforced here — that invariant belongs to the caller's business
/// judgement per spec.md §3, since the withdrawal pipeline's offset is
/// an intentional, audited payout of appreciation.
pub async fn debit_treasury(conn: &mut AsyncPgConnection, amount: &BigDecimal) -> BoomsResult<()> {
    let amount = round_value(amount);
    diesel::update(treasury::table.filter(treasury::id.eq(crate::models::treasury::TREASURY_SINGLETON_ID)))
        .set((
            treasury::balance.eq(treasury::balance - &amount),
            treasury::total_transactions.eq(treasury::total_transactions + 1),
            treasury::last_transaction_at.eq(Utc::now()),
        ))
        .execute(conn)
        .await?;
    Ok(())
}
