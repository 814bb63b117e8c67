//! Pricing, the contact form and the simulated checkout.

pub mod checkout;
pub mod customer;
pub mod pricing;

pub use checkout::{
    CheckoutConfig, CheckoutOutcome, CheckoutSimulator, CheckoutTask, FixedOutcome,
    OrderConfirmation, OrderStep, OutcomeSource, RandomOutcome, SUPPORT_EMAIL, Submission,
};
pub use customer::{CheckoutForm, CustomerInfo, Field, FieldError, FieldErrors};
pub use pricing::{BasePrices, Money, PriceQuote, PricingConfig};
