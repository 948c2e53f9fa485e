//! Recurring obligations: fixed costs, subscriptions and installment plans.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Identifiable, NamedEntity};
use super::month::{CalendarDate, MonthKey};
use crate::errors::BudgetError;

/// How often a fixed cost or subscription is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Monthly,
    Yearly,
}

impl Interval {
    pub fn label(&self) -> &'static str {
        match self {
            Interval::Monthly => "Monthly",
            Interval::Yearly => "Yearly",
        }
    }

    /// Converts an amount charged once per interval into its per-month share.
    pub fn monthly_share(&self, amount: f64) -> f64 {
        match self {
            Interval::Monthly => amount,
            Interval::Yearly => amount / 12.0,
        }
    }
}

impl FromStr for Interval {
    type Err = BudgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" | "m" => Ok(Interval::Monthly),
            "yearly" | "year" | "annual" | "y" => Ok(Interval::Yearly),
            other => Err(BudgetError::InvalidInput(format!(
                "unknown interval `{other}`, expected monthly or yearly"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub interval: Interval,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<Uuid>,
}

impl FixedCost {
    pub fn new(name: impl Into<String>, amount: f64, interval: Interval) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            interval,
            category: String::new(),
            member_id: None,
            household_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub interval: Interval,
    #[serde(default)]
    pub category: String,
    /// Day of month the charge is due, 1 through 31.
    pub payment_date: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<Uuid>,
}

impl Subscription {
    pub fn new(name: impl Into<String>, amount: f64, interval: Interval, payment_date: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            interval,
            category: String::new(),
            payment_date: payment_date.clamp(1, 31),
            member_id: None,
            household_id: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// A financed purchase paid off in equal monthly installments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub id: Uuid,
    pub name: String,
    pub monthly_amount: f64,
    pub start_date: CalendarDate,
    pub end_date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_day: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<Uuid>,
}

impl InstallmentPlan {
    pub fn new(
        name: impl Into<String>,
        monthly_amount: f64,
        start_date: impl Into<CalendarDate>,
        end_date: impl Into<CalendarDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            monthly_amount,
            start_date: start_date.into(),
            end_date: end_date.into(),
            total_amount: None,
            down_payment: None,
            interest_rate: None,
            payment_day: None,
            notes: None,
            member_id: None,
            household_id: None,
        }
    }

    /// Month range covered by the plan, or `None` when either date does not parse.
    pub fn active_months(&self) -> Option<(MonthKey, MonthKey)> {
        Some((self.start_date.month()?, self.end_date.month()?))
    }

    /// True when `month` lies within the start and end months, both inclusive.
    pub fn is_active_in(&self, month: &MonthKey) -> bool {
        match self.active_months() {
            Some((start, end)) => start <= *month && *month <= end,
            None => {
                tracing::debug!(plan = %self.id, "unparseable date range, treating as inactive");
                false
            }
        }
    }

    /// Payments still due from `month` through the final month.
    pub fn remaining_payments(&self, month: &MonthKey) -> u32 {
        let Some((start, end)) = self.active_months() else {
            return 0;
        };
        let from = if *month < start { start } else { *month };
        let count = from.months_until(&end) + 1;
        count.max(0) as u32
    }

    /// Amount financed after the down payment, when the total is known.
    pub fn financed_amount(&self) -> Option<f64> {
        self.total_amount
            .map(|total| total - self.down_payment.unwrap_or(0.0))
    }
}

/// Discriminant shared by obligations and the payment ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObligationKind {
    Fixed,
    Subscription,
    Installment,
}

impl ObligationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObligationKind::Fixed => "fixed",
            ObligationKind::Subscription => "subscription",
            ObligationKind::Installment => "installment",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ObligationKind::Fixed => "Fixed cost",
            ObligationKind::Subscription => "Subscription",
            ObligationKind::Installment => "Installment plan",
        }
    }
}

impl fmt::Display for ObligationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObligationKind {
    type Err = BudgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "fixed" => Ok(ObligationKind::Fixed),
            "subscription" => Ok(ObligationKind::Subscription),
            "installment" => Ok(ObligationKind::Installment),
            other => Err(BudgetError::InvalidInput(format!(
                "unknown obligation kind `{other}`"
            ))),
        }
    }
}

/// Identifies one obligation across all variants.
///
/// Compared structurally; the `{kind}-{id}` text form is only used for display and
/// user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InstanceId {
    pub kind: ObligationKind,
    pub id: Uuid,
}

impl InstanceId {
    pub fn new(kind: ObligationKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.id)
    }
}

impl FromStr for InstanceId {
    type Err = BudgetError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (kind, id) = raw
            .split_once('-')
            .ok_or_else(|| BudgetError::InvalidInput(format!("invalid instance id `{raw}`")))?;
        let id = Uuid::parse_str(id)
            .map_err(|err| BudgetError::InvalidInput(format!("invalid instance id `{raw}`: {err}")))?;
        Ok(Self::new(kind.parse()?, id))
    }
}

/// Closed union of every recurring obligation the aggregator understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Obligation {
    Fixed(FixedCost),
    Subscription(Subscription),
    Installment(InstallmentPlan),
}

impl Obligation {
    pub fn kind(&self) -> ObligationKind {
        match self {
            Obligation::Fixed(_) => ObligationKind::Fixed,
            Obligation::Subscription(_) => ObligationKind::Subscription,
            Obligation::Installment(_) => ObligationKind::Installment,
        }
    }

    pub fn instance_id(&self) -> InstanceId {
        InstanceId::new(self.kind(), self.id())
    }

    /// Category label; installment plans carry none.
    pub fn category(&self) -> Option<&str> {
        match self {
            Obligation::Fixed(cost) => Some(cost.category.as_str()),
            Obligation::Subscription(sub) => Some(sub.category.as_str()),
            Obligation::Installment(_) => None,
        }
    }

    pub fn member_id(&self) -> Option<Uuid> {
        match self {
            Obligation::Fixed(cost) => cost.member_id,
            Obligation::Subscription(sub) => sub.member_id,
            Obligation::Installment(plan) => plan.member_id,
        }
    }

    pub fn household_id(&self) -> Option<Uuid> {
        match self {
            Obligation::Fixed(cost) => cost.household_id,
            Obligation::Subscription(sub) => sub.household_id,
            Obligation::Installment(plan) => plan.household_id,
        }
    }

    /// Native billing interval; installment plans always bill monthly.
    pub fn interval(&self) -> Interval {
        match self {
            Obligation::Fixed(cost) => cost.interval,
            Obligation::Subscription(sub) => sub.interval,
            Obligation::Installment(_) => Interval::Monthly,
        }
    }

    /// Whether the obligation is charged in `month`.
    ///
    /// Fixed costs and subscriptions have no date range and are active every month.
    pub fn is_active_in(&self, month: &MonthKey) -> bool {
        match self {
            Obligation::Fixed(_) | Obligation::Subscription(_) => true,
            Obligation::Installment(plan) => plan.is_active_in(month),
        }
    }

    pub(crate) fn set_id(&mut self, id: Uuid) {
        match self {
            Obligation::Fixed(cost) => cost.id = id,
            Obligation::Subscription(sub) => sub.id = id,
            Obligation::Installment(plan) => plan.id = id,
        }
    }
}

impl Identifiable for Obligation {
    fn id(&self) -> Uuid {
        match self {
            Obligation::Fixed(cost) => cost.id,
            Obligation::Subscription(sub) => sub.id,
            Obligation::Installment(plan) => plan.id,
        }
    }
}

impl NamedEntity for Obligation {
    fn name(&self) -> &str {
        match self {
            Obligation::Fixed(cost) => &cost.name,
            Obligation::Subscription(sub) => &sub.name,
            Obligation::Installment(plan) => &plan.name,
        }
    }
}

impl From<FixedCost> for Obligation {
    fn from(value: FixedCost) -> Self {
        Obligation::Fixed(value)
    }
}

impl From<Subscription> for Obligation {
    fn from(value: Subscription) -> Self {
        Obligation::Subscription(value)
    }
}

impl From<InstallmentPlan> for Obligation {
    fn from(value: InstallmentPlan) -> Self {
        Obligation::Installment(value)
    }
}
