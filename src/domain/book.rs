use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{find_by_id, take_by_id, Identifiable};
use super::household::{Category, FamilyMember, Household};
use super::obligation::{InstallmentPlan, InstanceId, Obligation, Subscription, FixedCost};
use super::savings::SavingsGoal;
use crate::errors::{BudgetError, Result};

const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Everything a household budget persists: obligations, goals and reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetBook {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    obligations: Vec<Obligation>,
    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
    #[serde(default)]
    pub households: Vec<Household>,
    #[serde(default)]
    pub members: Vec<FamilyMember>,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "BudgetBook::schema_version_default")]
    pub schema_version: u8,
}

impl BudgetBook {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            obligations: Vec::new(),
            savings_goals: Vec::new(),
            households: Vec::new(),
            members: Vec::new(),
            categories: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// All obligations in insertion order.
    pub fn obligations(&self) -> &[Obligation] {
        &self.obligations
    }

    pub fn fixed_costs(&self) -> impl Iterator<Item = &FixedCost> {
        self.obligations.iter().filter_map(|item| match item {
            Obligation::Fixed(cost) => Some(cost),
            _ => None,
        })
    }

    pub fn subscriptions(&self) -> impl Iterator<Item = &Subscription> {
        self.obligations.iter().filter_map(|item| match item {
            Obligation::Subscription(sub) => Some(sub),
            _ => None,
        })
    }

    pub fn installment_plans(&self) -> impl Iterator<Item = &InstallmentPlan> {
        self.obligations.iter().filter_map(|item| match item {
            Obligation::Installment(plan) => Some(plan),
            _ => None,
        })
    }

    /// Plans whose start or end date does not parse; they never count as active.
    pub fn plans_with_invalid_dates(&self) -> impl Iterator<Item = &InstallmentPlan> {
        self.installment_plans()
            .filter(|plan| plan.active_months().is_none())
    }

    pub fn add_obligation(&mut self, obligation: impl Into<Obligation>) -> InstanceId {
        let obligation = obligation.into();
        let instance = obligation.instance_id();
        tracing::debug!(%instance, "adding obligation");
        self.obligations.push(obligation);
        self.touch();
        instance
    }

    pub fn obligation(&self, instance: &InstanceId) -> Option<&Obligation> {
        self.obligations
            .iter()
            .find(|item| item.instance_id() == *instance)
    }

    /// Replaces the whole record; the stored id is kept and the variant may not change.
    pub fn replace_obligation(
        &mut self,
        instance: &InstanceId,
        replacement: impl Into<Obligation>,
    ) -> Result<()> {
        let mut replacement = replacement.into();
        if replacement.kind() != instance.kind {
            return Err(BudgetError::InvalidInput(format!(
                "cannot replace a {} with a {}",
                instance.kind.label(),
                replacement.kind().label()
            )));
        }
        let slot = self
            .obligations
            .iter_mut()
            .find(|item| item.instance_id() == *instance)
            .ok_or(BudgetError::ObligationNotFound(*instance))?;
        replacement.set_id(instance.id);
        *slot = replacement;
        self.touch();
        Ok(())
    }

    /// Deletes an obligation. Payment records referring to it are left alone.
    pub fn remove_obligation(&mut self, instance: &InstanceId) -> Result<Obligation> {
        let index = self
            .obligations
            .iter()
            .position(|item| item.instance_id() == *instance)
            .ok_or(BudgetError::ObligationNotFound(*instance))?;
        let removed = self.obligations.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn add_savings_goal(&mut self, goal: SavingsGoal) -> Uuid {
        let id = goal.id;
        self.savings_goals.push(goal);
        self.touch();
        id
    }

    pub fn savings_goal(&self, id: Uuid) -> Option<&SavingsGoal> {
        find_by_id(&self.savings_goals, id)
    }

    pub fn savings_goal_mut(&mut self, id: Uuid) -> Option<&mut SavingsGoal> {
        self.savings_goals.iter_mut().find(|goal| goal.id == id)
    }

    pub fn remove_savings_goal(&mut self, id: Uuid) -> Result<SavingsGoal> {
        let goal = take_by_id(&mut self.savings_goals, id).ok_or_else(|| not_found("Savings goal", id))?;
        self.touch();
        Ok(goal)
    }

    pub fn add_household(&mut self, household: Household) -> Uuid {
        let id = household.id;
        self.households.push(household);
        self.touch();
        id
    }

    pub fn household(&self, id: Uuid) -> Option<&Household> {
        find_by_id(&self.households, id)
    }

    pub fn remove_household(&mut self, id: Uuid) -> Result<Household> {
        let household = take_by_id(&mut self.households, id).ok_or_else(|| not_found("Household", id))?;
        self.touch();
        Ok(household)
    }

    /// Adds a member, checking that the referenced household exists.
    pub fn add_member(&mut self, member: FamilyMember) -> Result<Uuid> {
        if let Some(household_id) = member.household_id {
            if self.household(household_id).is_none() {
                return Err(not_found("Household", household_id));
            }
        }
        let id = member.id;
        self.members.push(member);
        self.touch();
        Ok(id)
    }

    pub fn member(&self, id: Uuid) -> Option<&FamilyMember> {
        find_by_id(&self.members, id)
    }

    pub fn remove_member(&mut self, id: Uuid) -> Result<FamilyMember> {
        let member = take_by_id(&mut self.members, id).ok_or_else(|| not_found("Family member", id))?;
        self.touch();
        Ok(member)
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id();
        self.categories.push(category);
        self.touch();
        id
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        find_by_id(&self.categories, id)
    }

    pub fn remove_category(&mut self, id: Uuid) -> Result<Category> {
        let category = take_by_id(&mut self.categories, id).ok_or_else(|| not_found("Category", id))?;
        self.touch();
        Ok(category)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for BudgetBook {
    fn default() -> Self {
        Self::new("Household budget")
    }
}

fn not_found(kind: &'static str, id: Uuid) -> BudgetError {
    BudgetError::EntityNotFound {
        kind,
        id: id.to_string(),
    }
}
