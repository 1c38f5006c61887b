//! Fee calculator (C4): provider transaction fees and platform
//! commissions. Every rate is expressed as a fraction (e.g. `0.015` for
//! 1.5%) and every amount flowing through here is FCFA, 2-decimal.

use crate::models::{LoyaltyTier, PaymentMethod};
use crate::money::{clamp, decimal, round_value};
use bigdecimal::BigDecimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderDirection {
    Deposit,
    Withdraw,
}

/// Provider-side transaction fee rate, charged by the payment rail
/// itself rather than the platform.
pub fn provider_fee_rate(provider: PaymentMethod, direction: ProviderDirection) -> BigDecimal {
    use ProviderDirection::*;
    match (provider, direction) {
        (PaymentMethod::Wave, Deposit) => decimal("0.015"),
        (PaymentMethod::Wave, Withdraw) => decimal("0.02"),
        (PaymentMethod::MtnMomo, Deposit) => decimal("0.025"),
        (PaymentMethod::MtnMomo, Withdraw) => decimal("0.03"),
        (PaymentMethod::OrangeMoney, Deposit) => decimal("0.02"),
        (PaymentMethod::OrangeMoney, Withdraw) => decimal("0.025"),
        (PaymentMethod::Stripe, Deposit) => decimal("0.03"),
        (PaymentMethod::Stripe, Withdraw) => decimal("0.035"),
        (PaymentMethod::System, _) => decimal("0"),
    }
}

pub fn provider_fee(provider: PaymentMethod, direction: ProviderDirection, amount: &BigDecimal) -> BigDecimal {
    round_value(&(amount * provider_fee_rate(provider, direction)))
}

/// Platform commission on a deposit, independent of the provider fee.
pub fn deposit_commission(amount: &BigDecimal) -> BigDecimal {
    round_value(&(amount * decimal("0.015")))
}

pub fn withdrawal_commission(amount: &BigDecimal) -> BigDecimal {
    round_value(&(amount * decimal("0.02")))
}

/// Platform commission on a primary-market purchase: 5% of the social
/// price, scaled down by the buyer's loyalty tier the same way the
/// gift sharing fee is (spec.md §4.3/§4.4 step 3).
pub fn boom_purchase_commission(market_value: &BigDecimal, tier: LoyaltyTier) -> BigDecimal {
    round_value(&(market_value * decimal("0.05") * tier.fee_reduction()))
}

pub fn boom_withdrawal_commission(amount: &BigDecimal) -> BigDecimal {
    round_value(&(amount * decimal("0.03")))
}

/// Gift fee: 3% of the gift's gross value, clamped to `[10, 1000]` FCFA.
pub fn gift_fee(amount: &BigDecimal) -> BigDecimal {
    let raw = amount * decimal("0.03");
    round_value(&clamp(raw, &decimal("10"), &decimal("1000")))
}

/// Sharing fee: 2% of the holding's market value, reduced by the
/// sender's loyalty tier and clamped to `[100, 5000]` FCFA.
pub fn sharing_fee(market_value: &BigDecimal, tier: LoyaltyTier) -> BigDecimal {
    let raw = market_value * decimal("0.02") * tier.fee_reduction();
    round_value(&clamp(raw, &decimal("100"), &decimal("5000")))
}

/// Admins never pay platform commissions; provider fees (if any) still
/// apply since those are charged by the rail, not the platform.
pub fn admin_commission(_amount: &BigDecimal) -> BigDecimal {
    decimal("0")
}

/// Whether crediting `gross` minus `total_fees` still leaves the
/// platform with a non-negative margin on this transaction, i.e. the
/// provider fee alone hasn't exceeded the commission collected.
pub fn is_profitable(commission: &BigDecimal, provider_fee: &BigDecimal) -> bool {
    commission >= provider_fee
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gift_fee_respects_floor_and_ceiling() {
        assert_eq!(gift_fee(&decimal("100")), decimal("10.00"));
        assert_eq!(gift_fee(&decimal("100000")), decimal("1000.00"));
        assert_eq!(gift_fee(&decimal("10000")), decimal("300.00"));
    }

    #[test]
    fn sharing_fee_scales_down_with_tier() {
        let base = decimal("100000");
        let bronze = sharing_fee(&base, LoyaltyTier::Bronze);
        let platinum = sharing_fee(&base, LoyaltyTier::Platinum);
        assert!(platinum < bronze);
        assert_eq!(bronze, decimal("2000.00"));
        assert_eq!(platinum, decimal("1600.00"));
    }

    #[test]
    fn purchase_commission_matches_worked_example() {
        assert_eq!(boom_purchase_commission(&decimal("1000"), LoyaltyTier::Bronze), decimal("50.00"));
    }

    #[test]
    fn purchase_commission_scales_down_with_tier() {
        let base = decimal("1000");
        let bronze = boom_purchase_commission(&base, LoyaltyTier::Bronze);
        let platinum = boom_purchase_commission(&base, LoyaltyTier::Platinum);
        assert!(platinum < bronze);
        assert_eq!(platinum, decimal("40.00"));
    }

    #[test]
    fn withdrawal_commission_matches_worked_example() {
        assert_eq!(boom_withdrawal_commission(&decimal("8000")), decimal("240.00"));
    }

    #[test]
    fn admin_commission_is_always_zero() {
        assert_eq!(admin_commission(&decimal("999999")), decimal("0"));
    }

    #[test]
    fn provider_fee_rates_differ_by_direction() {
        assert!(provider_fee_rate(PaymentMethod::Wave, ProviderDirection::Withdraw)
            > provider_fee_rate(PaymentMethod::Wave, ProviderDirection::Deposit));
    }

    #[test]
    fn profitability_flags_underwater_transactions() {
        assert!(is_profitable(&decimal("100"), &decimal("50")));
        assert!(!is_profitable(&decimal("50"), &decimal("100")));
    }
}
