//! Derives the money fields attached to each class instance.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::models::{
    ClassInstanceDraft, ClassType, ClubSettings, InstructorPayModel, Money, TimeRange,
};

/// Cost fields for one class occurrence. They depend only on the time range,
/// price and pay model, so every occurrence of a series shares them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassCosts {
    pub duration_minutes: u32,
    pub price: Money,
    pub court_cost: Money,
    pub instructor_cost: Money,
}

impl ClassCosts {
    pub fn draft_for(&self, date: NaiveDate, time: TimeRange) -> ClassInstanceDraft {
        ClassInstanceDraft {
            date,
            time,
            duration_minutes: self.duration_minutes,
            price: self.price,
            court_cost: self.court_cost,
            instructor_cost: self.instructor_cost,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CostCalculator {
    fallback_court_cost_per_hour: Money,
}

impl CostCalculator {
    pub fn new(fallback_court_cost_per_hour: Money) -> Self {
        Self {
            fallback_court_cost_per_hour,
        }
    }

    /// Compute duration, price, court cost and instructor cost.
    ///
    /// `time` is already known to have a positive duration. The price is the
    /// explicit one when given, else the club default for `class_type`, else
    /// zero when the club has no settings.
    pub fn compute(
        &self,
        time: &TimeRange,
        club: Option<&ClubSettings>,
        class_type: ClassType,
        pay: &InstructorPayModel,
        explicit_price: Option<Money>,
    ) -> ClassCosts {
        let duration_minutes = time.duration_minutes();

        let price = explicit_price
            .or_else(|| club.map(|c| c.default_price(class_type)))
            .unwrap_or(Money::ZERO);

        let hourly_court_cost = club
            .and_then(|c| c.court_cost_per_hour)
            .unwrap_or(self.fallback_court_cost_per_hour);

        ClassCosts {
            duration_minutes,
            price,
            court_cost: hourly_court_cost.prorate_hourly(duration_minutes),
            instructor_cost: pay.class_cost(price, duration_minutes),
        }
    }
}
