//! Hand-maintained mirror of the Postgres schema (normally produced by
//! `diesel print-schema`). Kept in one file per the teacher's
//! convention of a single `crate::schema` referenced from every model.

pub mod sql_types {
    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "user_status"))]
    pub struct UserStatus;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "loyalty_tier"))]
    pub struct LoyaltyTier;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "gift_status"))]
    pub struct GiftStatus;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "payment_status"))]
    pub struct PaymentStatus;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "payment_method"))]
    pub struct PaymentMethod;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "interaction_action_type"))]
    pub struct ActionType;

    #[derive(diesel::sql_types::SqlType, diesel::query_builder::QueryId)]
    #[diesel(postgres_type(name = "social_event_kind"))]
    pub struct SocialEventKind;
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::UserStatus;
    use super::sql_types::LoyaltyTier;

    users (id) {
        id -> Int8,
        phone -> Varchar,
        email -> Nullable<Varchar>,
        password_hash -> Varchar,
        full_name -> Varchar,
        status -> UserStatus,
        suspended_until -> Nullable<Timestamptz>,
        banned_at -> Nullable<Timestamptz>,
        is_admin -> Bool,
        loyalty_tier -> LoyaltyTier,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    real_balances (user_id) {
        user_id -> Int8,
        available -> Numeric,
        locked -> Numeric,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    virtual_balances (user_id) {
        user_id -> Int8,
        balance -> Numeric,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    treasury (id) {
        id -> Int4,
        balance -> Numeric,
        total_fees_collected -> Numeric,
        total_transactions -> Int8,
        last_transaction_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    transaction_log (id) {
        id -> Int8,
        user_id -> Int8,
        amount -> Numeric,
        kind -> Varchar,
        target -> Varchar,
        description -> Text,
        status -> Varchar,
        reference -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::SocialEventKind;

    booms (id) {
        id -> Int8,
        token_id -> Varchar,
        base_price -> Numeric,
        current_social_value -> Numeric,
        applied_micro_value -> Numeric,
        social_accumulator -> Numeric,
        palier_threshold -> Numeric,
        palier_level -> Int4,
        buy_count -> Int4,
        sell_count -> Int4,
        share_count -> Int4,
        share_count_24h -> Int4,
        interaction_count -> Int4,
        unique_holders -> Int4,
        owner_id -> Nullable<Int8>,
        max_editions -> Nullable<Int4>,
        current_edition -> Int4,
        available_editions -> Nullable<Int4>,
        active_event -> Nullable<SocialEventKind>,
        event_expires_at -> Nullable<Timestamptz>,
        treasury_pool -> Numeric,
        redistribution_pool -> Numeric,
        last_interaction_at -> Nullable<Timestamptz>,
        is_active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    holdings (id) {
        id -> Int8,
        owner_id -> Int8,
        boom_id -> Int8,
        purchase_price -> Numeric,
        fees_paid -> Numeric,
        is_transferable -> Bool,
        is_sold -> Bool,
        receiver_id -> Nullable<Int8>,
        transferred_at -> Nullable<Timestamptz>,
        last_gift_delivered_at -> Nullable<Timestamptz>,
        deleted_at -> Nullable<Timestamptz>,
        acquired_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::GiftStatus;

    gifts (id) {
        id -> Int8,
        sender_id -> Int8,
        receiver_id -> Int8,
        holding_id -> Int8,
        message -> Nullable<Text>,
        status -> GiftStatus,
        gross_amount -> Numeric,
        fee_amount -> Numeric,
        net_amount -> Numeric,
        transaction_reference -> Varchar,
        wallet_transaction_ids -> Array<Int8>,
        created_at -> Timestamptz,
        paid_at -> Nullable<Timestamptz>,
        delivered_at -> Nullable<Timestamptz>,
        failed_at -> Nullable<Timestamptz>,
        expires_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::ActionType;

    interactions (id) {
        id -> Int8,
        user_id -> Int8,
        boom_id -> Int8,
        action_type -> ActionType,
        metadata -> Jsonb,
        processed -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;
    use super::sql_types::PaymentStatus;
    use super::sql_types::PaymentMethod;

    payment_transactions (id) {
        id -> Varchar,
        user_id -> Int8,
        kind -> Varchar,
        amount -> Numeric,
        fees -> Numeric,
        net_amount -> Numeric,
        status -> PaymentStatus,
        provider -> Nullable<PaymentMethod>,
        provider_reference -> Nullable<Varchar>,
        description -> Nullable<Text>,
        boom_id -> Nullable<Int8>,
        holding_id -> Nullable<Int8>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    use diesel::sql_types::*;

    withdrawal_requests (id) {
        id -> Int8,
        user_id -> Int8,
        holding_id -> Int8,
        requested_amount -> Numeric,
        fees -> Numeric,
        net_amount -> Numeric,
        status -> Varchar,
        rejection_reason -> Nullable<Text>,
        created_at -> Timestamptz,
        processed_at -> Nullable<Timestamptz>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    real_balances,
    virtual_balances,
    treasury,
    transaction_log,
    booms,
    holdings,
    gifts,
    interactions,
    payment_transactions,
    withdrawal_requests,
);
