//! Budget domain models and persistence-friendly types.

pub mod book;
pub mod common;
pub mod household;
pub mod month;
pub mod obligation;
pub mod savings;

pub use book::BudgetBook;
pub use common::{Identifiable, NamedEntity};
pub use household::{Category, FamilyMember, Household};
pub use month::{CalendarDate, MonthKey};
pub use obligation::{
    FixedCost, InstallmentPlan, InstanceId, Interval, Obligation, ObligationKind, Subscription,
};
pub use savings::SavingsGoal;
