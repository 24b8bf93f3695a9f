//! Rate sets, the provider abstraction and re-basing arithmetic.

use crate::core::error::RateError;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::debug;

/// ISO-4217 code to rate, all relative to one implicit base currency.
pub type RateMap = BTreeMap<String, Decimal>;

/// What a provider does when the requested base has no usable rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingBase {
    /// Report "nothing to update" with an empty rate set.
    Empty,
    /// Fail the fetch with [`RateError::RebaseUndefined`].
    Fail,
}

/// Rates exactly as a provider published them.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedRates {
    pub provider: &'static str,
    /// Currency the rates are expressed against.
    pub base: String,
    pub rates: RateMap,
    /// The base currency's own rate in `rates` terms, usually 1.
    pub base_rate: Decimal,
    pub published: Option<NaiveDate>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    fn id(&self) -> &'static str;

    fn on_missing_base(&self) -> MissingBase;

    async fn fetch_latest(&self) -> Result<FetchedRates, RateError>;
}

/// Re-expresses `rates` (quoted against `former_base`) against `target`.
///
/// Every rate is scaled by `base_rate / rates[target]`. The former base gets
/// its own entry, and `target` is dropped since it is now the implicit base.
/// Values keep the full `Decimal` precision so tiny rates survive. Returns
/// `None` if `target` is missing, non-positive, or the arithmetic overflows.
pub fn rebase(
    rates: &RateMap,
    former_base: &str,
    base_rate: Decimal,
    target: &str,
) -> Option<RateMap> {
    let target_rate = rates.get(target).copied()?;
    if target_rate <= Decimal::ZERO {
        return None;
    }
    let factor = base_rate.checked_div(target_rate)?;

    let mut rebased = RateMap::new();
    for (code, rate) in rates {
        if code == target {
            continue;
        }
        let value = rate.checked_mul(factor)?;
        rebased.insert(code.clone(), value.normalize());
    }
    rebased.insert(former_base.to_string(), factor.normalize());
    Some(rebased)
}

/// Turns a provider's rate set into one based on `default_iso4217`.
pub fn normalize(
    fetched: FetchedRates,
    default_iso4217: &str,
    policy: MissingBase,
) -> Result<RateMap, RateError> {
    if fetched.base.eq_ignore_ascii_case(default_iso4217) {
        debug!(
            provider = fetched.provider,
            base = %fetched.base,
            "Provider base matches default currency, returning rates unmodified"
        );
        return Ok(fetched.rates);
    }

    match rebase(
        &fetched.rates,
        &fetched.base,
        fetched.base_rate,
        default_iso4217,
    ) {
        Some(rebased) => Ok(rebased),
        None => match policy {
            MissingBase::Empty => {
                debug!(
                    provider = fetched.provider,
                    "No usable {} rate, nothing to update", default_iso4217
                );
                Ok(RateMap::new())
            }
            MissingBase::Fail => Err(RateError::RebaseUndefined {
                provider: fetched.provider.to_string(),
                currency: default_iso4217.to_string(),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ecb_rates() -> RateMap {
        RateMap::from([
            ("USD".to_string(), dec!(1.1)),
            ("JPY".to_string(), dec!(130.0)),
        ])
    }

    fn fetched(base: &str, rates: RateMap) -> FetchedRates {
        FetchedRates {
            provider: "TEST",
            base: base.to_string(),
            rates,
            base_rate: Decimal::ONE,
            published: None,
        }
    }

    #[test]
    fn test_rebase_to_usd() {
        let rebased = rebase(&ecb_rates(), "EUR", Decimal::ONE, "USD").unwrap();

        assert_eq!(rebased.len(), 2);
        assert!(!rebased.contains_key("USD"));
        assert_eq!(rebased["JPY"].round_dp(2), dec!(118.18));
        assert_eq!(rebased["EUR"].round_dp(4), dec!(0.9091));
    }

    #[test]
    fn test_rebase_round_trip() {
        let original = RateMap::from([
            ("USD".to_string(), dec!(1.0934)),
            ("JPY".to_string(), dec!(163.45)),
            ("GBP".to_string(), dec!(0.85623)),
            ("CHF".to_string(), dec!(0.9421)),
            ("IRR".to_string(), dec!(46018.21)),
            ("IDR".to_string(), dec!(17012.4)),
            ("XAU".to_string(), dec!(0.00041234)),
            ("BTC".to_string(), dec!(0.0000153)),
        ]);

        for target in ["USD", "JPY", "GBP", "CHF", "IRR", "IDR", "XAU", "BTC"] {
            let there = rebase(&original, "EUR", Decimal::ONE, target).unwrap();
            let back = rebase(&there, target, Decimal::ONE, "EUR").unwrap();

            assert_eq!(back.len(), original.len(), "key set differs for {target}");
            for (code, rate) in &original {
                let relative = (back[code] - rate).abs() / rate;
                assert!(
                    relative < dec!(0.000001),
                    "{code} via {target}: {} vs {rate}",
                    back[code]
                );
            }
        }
    }

    #[test]
    fn test_rebase_keeps_small_rates() {
        let rates = RateMap::from([
            ("IRR".to_string(), dec!(42087.5)),
            ("XAU".to_string(), dec!(0.00041234)),
            ("BTC".to_string(), dec!(0.0000153)),
        ]);
        let rebased = rebase(&rates, "USD", Decimal::ONE, "IRR").unwrap();

        for (code, rate) in [("XAU", dec!(0.00041234)), ("BTC", dec!(0.0000153))] {
            let exact = rate / dec!(42087.5);
            let relative = (rebased[code] - exact).abs() / exact;
            assert!(
                relative < dec!(0.000000000001),
                "{code}: {} vs {exact}",
                rebased[code]
            );
        }
        assert!(rebased["USD"] > Decimal::ZERO);
        assert!(rebased["BTC"] < dec!(0.000000001));
    }

    #[test]
    fn test_rebase_undefined_target() {
        assert!(rebase(&ecb_rates(), "EUR", Decimal::ONE, "GBP").is_none());

        let mut rates = ecb_rates();
        rates.insert("ZWL".to_string(), Decimal::ZERO);
        assert!(rebase(&rates, "EUR", Decimal::ONE, "ZWL").is_none());
        rates.insert("ZWL".to_string(), dec!(-1));
        assert!(rebase(&rates, "EUR", Decimal::ONE, "ZWL").is_none());
    }

    #[test]
    fn test_rebase_with_listed_base_rate() {
        // Commercial feeds list their base at 1 alongside the other rates.
        let rates = RateMap::from([
            ("USD".to_string(), dec!(1)),
            ("EUR".to_string(), dec!(0.8)),
            ("GBP".to_string(), dec!(0.75)),
        ]);
        let rebased = rebase(&rates, "USD", dec!(1), "EUR").unwrap();

        assert_eq!(rebased["USD"], dec!(1.25));
        assert_eq!(rebased["GBP"], dec!(0.9375));
        assert!(!rebased.contains_key("EUR"));
    }

    #[test]
    fn test_normalize_same_base_is_unmodified() {
        let result = normalize(fetched("EUR", ecb_rates()), "EUR", MissingBase::Empty).unwrap();
        assert_eq!(result, ecb_rates());
    }

    #[test]
    fn test_normalize_missing_base_policies() {
        let result = normalize(fetched("EUR", ecb_rates()), "GBP", MissingBase::Empty).unwrap();
        assert!(result.is_empty());

        let err = normalize(fetched("USD", ecb_rates()), "GBP", MissingBase::Fail).unwrap_err();
        assert!(matches!(
            err,
            RateError::RebaseUndefined { ref currency, .. } if currency == "GBP"
        ));
    }
}
