use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{Identifiable, NamedEntity};
use super::month::{CalendarDate, MonthKey};

/// A target amount being saved towards, optionally by a given date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: f64,
    #[serde(default)]
    pub current_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SavingsGoal {
    pub fn new(name: impl Into<String>, target_amount: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target_amount,
            current_amount: 0.0,
            target_date: None,
            household_id: None,
            member_id: None,
            notes: None,
        }
    }

    pub fn with_target_date(mut self, date: impl Into<CalendarDate>) -> Self {
        self.target_date = Some(date.into());
        self
    }

    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Fraction of the target already saved, within `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 1.0;
        }
        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }

    /// Amount to put aside each month from `month` to reach the target in time.
    ///
    /// Counts `month` and the target month itself; an overdue goal asks for the full
    /// remainder now. `None` when no usable target date is set.
    pub fn monthly_required(&self, month: &MonthKey) -> Option<f64> {
        let target_date = self.target_date.as_ref()?;
        let Some(target) = target_date.month() else {
            tracing::warn!(goal = %self.id, date = %target_date, "savings goal has an unparseable target date");
            return None;
        };
        let remaining = self.remaining();
        if remaining <= 0.0 {
            return Some(0.0);
        }
        let months = (month.months_until(&target) + 1).max(1);
        Some(remaining / months as f64)
    }
}

impl Identifiable for SavingsGoal {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for SavingsGoal {
    fn name(&self) -> &str {
        &self.name
    }
}
