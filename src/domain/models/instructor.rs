//! Instructors and how they are paid.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// How an instructor is compensated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    /// Paid per hour taught.
    Hourly,
    /// Paid a share of each class price.
    Commission,
    /// Periodic salary plus a share of each class price.
    Mixed,
    /// Periodic salary only.
    Fixed,
}

impl PaymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "HOURLY",
            Self::Commission => "COMMISSION",
            Self::Mixed => "MIXED",
            Self::Fixed => "FIXED",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "HOURLY" => Some(Self::Hourly),
            "COMMISSION" => Some(Self::Commission),
            "MIXED" => Some(Self::Mixed),
            "FIXED" => Some(Self::Fixed),
            _ => None,
        }
    }
}

/// Instructor compensation terms.
///
/// The per-class part (`hourly_rate`, `commission_percent`) is charged to
/// each class instance. `monthly_salary` is paid by payroll on its own
/// schedule and is never attributed to individual classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorPayModel {
    pub payment_type: PaymentType,
    #[serde(default)]
    pub hourly_rate: Money,
    /// Whole percent, 0-100.
    #[serde(default)]
    pub commission_percent: u32,
    #[serde(default)]
    pub monthly_salary: Option<Money>,
}

impl InstructorPayModel {
    pub fn hourly(rate: Money) -> Self {
        Self {
            payment_type: PaymentType::Hourly,
            hourly_rate: rate,
            commission_percent: 0,
            monthly_salary: None,
        }
    }

    pub fn commission(percent: u32) -> Self {
        Self {
            payment_type: PaymentType::Commission,
            hourly_rate: Money::ZERO,
            commission_percent: percent,
            monthly_salary: None,
        }
    }

    pub fn mixed(salary: Money, percent: u32) -> Self {
        Self {
            payment_type: PaymentType::Mixed,
            hourly_rate: Money::ZERO,
            commission_percent: percent,
            monthly_salary: Some(salary),
        }
    }

    pub fn fixed(salary: Money) -> Self {
        Self {
            payment_type: PaymentType::Fixed,
            hourly_rate: Money::ZERO,
            commission_percent: 0,
            monthly_salary: Some(salary),
        }
    }

    /// Instructor cost attributable to one class of the given price and length.
    pub fn class_cost(&self, price: Money, duration_minutes: u32) -> Money {
        match self.payment_type {
            PaymentType::Hourly => self.hourly_rate.prorate_hourly(duration_minutes),
            PaymentType::Commission | PaymentType::Mixed => price.percent(self.commission_percent),
            PaymentType::Fixed => Money::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    pub pay_model: InstructorPayModel,
    pub active: bool,
}

impl Instructor {
    pub fn new(club_id: Uuid, name: impl Into<String>, pay_model: InstructorPayModel) -> Self {
        Self {
            id: Uuid::new_v4(),
            club_id,
            name: name.into(),
            pay_model,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hourly_cost() {
        let pay = InstructorPayModel::hourly(Money::from_minor(40_000));
        assert_eq!(pay.class_cost(Money::from_minor(99_999), 90).minor(), 60_000);
    }

    #[test]
    fn test_commission_cost() {
        let pay = InstructorPayModel::commission(50);
        assert_eq!(pay.class_cost(Money::from_minor(80_000), 90).minor(), 40_000);
    }

    #[test]
    fn test_mixed_charges_commission_only() {
        let pay = InstructorPayModel::mixed(Money::from_minor(1_000_000), 20);
        assert_eq!(pay.class_cost(Money::from_minor(50_000), 60).minor(), 10_000);
    }

    #[test]
    fn test_fixed_costs_nothing_per_class() {
        let pay = InstructorPayModel::fixed(Money::from_minor(1_500_000));
        assert_eq!(pay.class_cost(Money::from_minor(80_000), 120), Money::ZERO);
    }
}
