use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;

use crate::foundation::error::{StudioError, StudioResult};
use crate::order::customer::{CheckoutForm, FieldErrors};
use crate::order::pricing::{PriceQuote, PricingConfig};
use crate::shirt::ShirtSelection;

/// Contact shown to the customer when an order fails.
pub const SUPPORT_EMAIL: &str = "soporte@ropapersonalizada.com";

/// Decides whether a simulated order goes through.
pub trait OutcomeSource {
    /// `true` when the order should be confirmed given the configured failure rate.
    fn approve(&mut self, failure_rate: f64) -> bool;
}

/// Draws `u` uniformly from `[0, 1)`; the order succeeds when `u >= failure_rate`.
#[derive(Debug)]
pub struct RandomOutcome {
    rng: StdRng,
}

impl RandomOutcome {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl OutcomeSource for RandomOutcome {
    fn approve(&mut self, failure_rate: f64) -> bool {
        self.rng.gen_range(0.0..1.0) >= failure_rate
    }
}

/// Always gives the same answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedOutcome(pub bool);

impl FixedOutcome {
    pub const APPROVE: FixedOutcome = FixedOutcome(true);
    pub const DECLINE: FixedOutcome = FixedOutcome(false);
}

impl OutcomeSource for FixedOutcome {
    fn approve(&mut self, _failure_rate: f64) -> bool {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub delay_ms: u64,
    /// Probability in `[0, 1]` that a submitted order is declined.
    pub failure_rate: f64,
    pub delivery_days: u32,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            delay_ms: 3000,
            failure_rate: 0.1,
            delivery_days: 7,
        }
    }
}

impl CheckoutConfig {
    pub fn validate(&self) -> StudioResult<()> {
        if !self.failure_rate.is_finite() || !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(StudioError::validation(format!(
                "checkout.failure_rate must be in [0, 1], got {}",
                self.failure_rate
            )));
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub placed_on: NaiveDate,
    pub estimated_delivery: NaiveDate,
    pub quote: PriceQuote,
}

impl OrderConfirmation {
    /// `RP` followed by the last six digits of the submission's Unix time in milliseconds.
    pub fn order_number_at(at: DateTime<Local>) -> String {
        format!("RP{:06}", at.timestamp_millis().rem_euclid(1_000_000))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Confirmed(OrderConfirmation),
    Declined,
    Cancelled,
}

/// Result of handing a form to [`CheckoutSimulator::submit`].
#[derive(Debug)]
pub enum Submission {
    Started(CheckoutTask),
    /// The form did not validate; no task was started.
    Invalid(FieldErrors),
}

/// A checkout in flight. Await it for the outcome or [`cancel`](Self::cancel) it.
#[derive(Debug)]
pub struct CheckoutTask {
    handle: JoinHandle<CheckoutOutcome>,
}

impl CheckoutTask {
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn outcome(self) -> StudioResult<CheckoutOutcome> {
        match self.handle.await {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_cancelled() => {
                tracing::info!("checkout cancelled");
                Ok(CheckoutOutcome::Cancelled)
            }
            Err(e) => Err(anyhow::Error::new(e).context("checkout task failed").into()),
        }
    }
}

impl IntoFuture for CheckoutTask {
    type Output = StudioResult<CheckoutOutcome>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.outcome())
    }
}

/// Simulates placing an order: a fixed delay, then a confirmation or a decline.
pub struct CheckoutSimulator {
    config: CheckoutConfig,
    pricing: PricingConfig,
    source: Box<dyn OutcomeSource + Send>,
}

impl std::fmt::Debug for CheckoutSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSimulator")
            .field("config", &self.config)
            .field("pricing", &self.pricing)
            .finish_non_exhaustive()
    }
}

impl CheckoutSimulator {
    pub fn new(
        config: CheckoutConfig,
        pricing: PricingConfig,
        source: impl OutcomeSource + Send + 'static,
    ) -> Self {
        Self {
            config,
            pricing,
            source: Box::new(source),
        }
    }

    pub fn config(&self) -> &CheckoutConfig {
        &self.config
    }

    /// Validate the form and, when valid, start the timed order task.
    ///
    /// Must be called from within a tokio runtime.
    #[tracing::instrument(level = "debug", skip(self, form))]
    pub fn submit(
        &mut self,
        form: &mut CheckoutForm,
        selection: &ShirtSelection,
        design_count: usize,
    ) -> StudioResult<Submission> {
        if !form.validate() {
            return Ok(Submission::Invalid(form.errors().clone()));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| StudioError::Other(anyhow::Error::new(e).context("no tokio runtime")))?;

        let quote = self.pricing.quote(selection.model, design_count);
        let approved = self.source.approve(self.config.failure_rate);
        let placed_at = Local::now();
        let delay = self.config.delay();
        let delivery_days = self.config.delivery_days;

        tracing::info!(total = %quote.total, delay_ms = self.config.delay_ms, "checkout started");
        let handle = runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if !approved {
                tracing::info!("checkout declined");
                return CheckoutOutcome::Declined;
            }
            let placed_on = placed_at.date_naive();
            let confirmation = OrderConfirmation {
                order_number: OrderConfirmation::order_number_at(placed_at),
                placed_on,
                estimated_delivery: placed_on + chrono::Days::new(u64::from(delivery_days)),
                quote,
            };
            tracing::info!(order = %confirmation.order_number, "checkout confirmed");
            CheckoutOutcome::Confirmed(confirmation)
        });
        Ok(Submission::Started(CheckoutTask { handle }))
    }
}

/// Where the checkout screen is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OrderStep {
    #[default]
    Form,
    Processing,
    Success(OrderConfirmation),
    Failed,
}

impl OrderStep {
    /// Form → Processing.
    pub fn begin(&mut self) -> StudioResult<()> {
        match self {
            OrderStep::Form => {
                *self = OrderStep::Processing;
                Ok(())
            }
            other => Err(invalid_transition(other, "begin")),
        }
    }

    /// Processing → Success | Failed, or back to Form when the task was cancelled.
    pub fn finish(&mut self, outcome: CheckoutOutcome) -> StudioResult<()> {
        if *self != OrderStep::Processing {
            return Err(invalid_transition(self, "finish"));
        }
        *self = match outcome {
            CheckoutOutcome::Confirmed(c) => OrderStep::Success(c),
            CheckoutOutcome::Declined => OrderStep::Failed,
            CheckoutOutcome::Cancelled => OrderStep::Form,
        };
        Ok(())
    }

    /// Failed → Form.
    pub fn retry(&mut self) -> StudioResult<()> {
        match self {
            OrderStep::Failed => {
                *self = OrderStep::Form;
                Ok(())
            }
            other => Err(invalid_transition(other, "retry")),
        }
    }
}

fn invalid_transition(step: &OrderStep, action: &str) -> StudioError {
    let name = match step {
        OrderStep::Form => "form",
        OrderStep::Processing => "processing",
        OrderStep::Success(_) => "success",
        OrderStep::Failed => "failed",
    };
    StudioError::validation(format!("cannot {action} checkout from the {name} step"))
}
