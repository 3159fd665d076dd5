pub mod availability;
pub mod class_scheduler;
pub mod cost_calculator;
pub mod reservation_service;

pub use availability::{find_conflicts, AvailabilityChecker};
pub use class_scheduler::{expand_series, ClassScheduler, MaterializationResult, NewClassRequest};
pub use cost_calculator::{ClassCosts, CostCalculator};
pub use reservation_service::{NewReservation, ReservationService};
