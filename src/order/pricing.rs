use std::fmt;
use std::ops::{Add, Mul};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::foundation::error::{StudioError, StudioResult};
use crate::shirt::ShirtModel;

/// An amount of money in integer cents.
///
/// Serialized as a decimal amount (`25.0`), rounded to the nearest cent on the way in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);
    /// Largest amount accepted from configuration: one billion units.
    pub const LIMIT: Money = Money(100_000_000_000);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub fn from_decimal(amount: f64) -> StudioResult<Self> {
        if !amount.is_finite() {
            return Err(StudioError::validation(format!(
                "money amount must be finite, got {amount}"
            )));
        }
        let cents = (amount * 100.0).round();
        if cents.abs() > Self::LIMIT.0 as f64 {
            return Err(StudioError::validation(format!(
                "money amount must not exceed {} in magnitude, got {amount}",
                Self::LIMIT
            )));
        }
        Ok(Self(cents as i64))
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, rhs: i64) -> Money {
        Money(self.0.saturating_mul(rhs))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}${}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

/// Base price per shirt model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasePrices {
    pub classic: Money,
    pub fitted: Money,
    pub oversized: Money,
}

impl BasePrices {
    pub fn get(&self, model: ShirtModel) -> Money {
        match model {
            ShirtModel::Classic => self.classic,
            ShirtModel::Fitted => self.fitted,
            ShirtModel::Oversized => self.oversized,
        }
    }
}

impl Default for BasePrices {
    fn default() -> Self {
        Self {
            classic: Money::from_units(25),
            fitted: Money::from_units(28),
            oversized: Money::from_units(30),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub base_prices: BasePrices,
    pub design_fee: Money,
    /// Fraction of the subtotal, e.g. `0.1` for 10%.
    pub tax_rate: f64,
    /// Shipping is free when the subtotal is strictly greater than this.
    pub free_shipping_over: Money,
    pub flat_shipping: Money,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_prices: BasePrices::default(),
            design_fee: Money::from_units(5),
            tax_rate: 0.10,
            free_shipping_over: Money::from_units(50),
            flat_shipping: Money::from_units(8),
        }
    }
}

impl PricingConfig {
    pub fn validate(&self) -> StudioResult<()> {
        let amounts = [
            ("base_prices.classic", self.base_prices.classic),
            ("base_prices.fitted", self.base_prices.fitted),
            ("base_prices.oversized", self.base_prices.oversized),
            ("design_fee", self.design_fee),
            ("free_shipping_over", self.free_shipping_over),
            ("flat_shipping", self.flat_shipping),
        ];
        if let Some((name, m)) = amounts.iter().find(|(_, m)| m.cents() < 0) {
            return Err(StudioError::validation(format!(
                "pricing.{name} must not be negative, got {m}"
            )));
        }
        if let Some((name, m)) = amounts.iter().find(|(_, m)| *m > Money::LIMIT) {
            return Err(StudioError::validation(format!(
                "pricing.{name} must not exceed {}, got {m}",
                Money::LIMIT
            )));
        }
        if !self.tax_rate.is_finite() || !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(StudioError::validation(format!(
                "pricing.tax_rate must be in [0, 1], got {}",
                self.tax_rate
            )));
        }
        Ok(())
    }

    /// Price an order of one shirt carrying `design_count` designs.
    pub fn quote(&self, model: ShirtModel, design_count: usize) -> PriceQuote {
        let base = self.base_prices.get(model);
        let count = i64::try_from(design_count).unwrap_or(i64::MAX);
        let designs = self.design_fee * count;
        let subtotal = base + designs;
        let tax = round_tax(subtotal, self.tax_rate);
        let shipping = if subtotal > self.free_shipping_over {
            Money::ZERO
        } else {
            self.flat_shipping
        };
        PriceQuote {
            base,
            designs,
            subtotal,
            tax,
            shipping,
            total: subtotal + tax + shipping,
        }
    }
}

/// Tax on `subtotal`, rounded half-up to the cent.
///
/// The rate is taken in hundredths of a basis point so the product stays in integers.
fn round_tax(subtotal: Money, rate: f64) -> Money {
    const SCALE: i128 = 1_000_000;
    let rate = (rate * SCALE as f64).round() as i128;
    let raw = i128::from(subtotal.cents()) * rate;
    let cents = (raw + SCALE / 2).div_euclid(SCALE);
    let clamped = cents.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
    Money::from_cents(clamped as i64)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base: Money,
    pub designs: Money,
    pub subtotal: Money,
    pub tax: Money,
    pub shipping: Money,
    pub total: Money,
}

impl PriceQuote {
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Shipping as shown to the customer.
    pub fn shipping_label(&self) -> String {
        if self.free_shipping() {
            "GRATIS".to_owned()
        } else {
            self.shipping.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_without_designs() {
        let q = PricingConfig::default().quote(ShirtModel::Classic, 0);
        assert_eq!(q.subtotal, Money::from_cents(2500));
        assert_eq!(q.tax, Money::from_cents(250));
        assert_eq!(q.shipping, Money::from_cents(800));
        assert_eq!(q.total, Money::from_cents(3550));
    }

    #[test]
    fn oversized_with_two_designs() {
        let q = PricingConfig::default().quote(ShirtModel::Oversized, 2);
        assert_eq!(q.designs, Money::from_units(10));
        assert_eq!(q.subtotal.to_string(), "$40.00");
        assert_eq!(q.tax.to_string(), "$4.00");
        assert_eq!(q.shipping_label(), "$8.00");
        assert_eq!(q.total.to_string(), "$52.00");
    }

    #[test]
    fn shipping_is_free_only_strictly_above_threshold() {
        let p = PricingConfig::default();
        // 25 + 5*5 = 50: not strictly greater.
        assert_eq!(p.quote(ShirtModel::Classic, 5).shipping, p.flat_shipping);
        let q = p.quote(ShirtModel::Fitted, 5);
        assert_eq!(q.subtotal, Money::from_units(53));
        assert!(q.free_shipping());
        assert_eq!(q.shipping_label(), "GRATIS");
        for n in 0..40 {
            for m in ShirtModel::ALL {
                let q = p.quote(m, n);
                if q.subtotal > Money::from_units(50) {
                    assert!(q.shipping.is_zero());
                }
                assert_eq!(q.total, q.subtotal + q.tax + q.shipping);
            }
        }
    }

    #[test]
    fn tax_rounds_half_up_once() {
        assert_eq!(round_tax(Money::from_cents(5), 0.10), Money::from_cents(1));
        assert_eq!(round_tax(Money::from_cents(4), 0.10), Money::from_cents(0));
        assert_eq!(round_tax(Money::from_cents(1999), 0.0825), Money::from_cents(165));
    }

    #[test]
    fn money_formats_and_parses_as_decimal() {
        assert_eq!(Money::from_cents(-150).to_string(), "-$1.50");
        let m: Money = serde_json::from_str("27.999").unwrap();
        assert_eq!(m.cents(), 2800);
        assert_eq!(serde_json::to_string(&Money::from_cents(2550)).unwrap(), "25.5");
    }

    #[test]
    fn validation_rejects_negative_and_out_of_range() {
        let mut p = PricingConfig::default();
        assert!(p.validate().is_ok());
        p.design_fee = Money::from_cents(-1);
        assert!(p.validate().is_err());
        p = PricingConfig {
            tax_rate: 1.5,
            ..PricingConfig::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn oversized_amounts_are_rejected_and_never_overflow() {
        let err = serde_json::from_str::<PricingConfig>(r#"{"base_prices": {"classic": 1e17}}"#);
        assert!(err.is_err());

        let p = PricingConfig {
            design_fee: Money::from_cents(i64::MAX),
            ..PricingConfig::default()
        };
        assert!(p.validate().is_err());
        let q = p.quote(ShirtModel::Classic, usize::MAX);
        assert_eq!(q.total, Money::from_cents(i64::MAX));
        assert!(q.tax.cents() > 0);
    }
}
