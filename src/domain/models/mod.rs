pub mod class;
pub mod club;
pub mod config;
pub mod instructor;
pub mod money;
pub mod occupant;
pub mod recurrence;
pub mod reservation;
pub mod time;

pub use class::{ClassInstance, ClassInstanceDraft, ClassLevel, ClassStatus};
pub use club::{ClassType, ClubSettings, Court};
pub use config::{Config, DatabaseConfig, LoggingConfig, SchedulingConfig, ServerConfig};
pub use instructor::{Instructor, InstructorPayModel, PaymentType};
pub use money::Money;
pub use occupant::{Occupant, OccupantKind};
pub use recurrence::{Frequency, RecurrenceIter, RecurrencePattern, DEFAULT_OCCURRENCES};
pub use reservation::{Reservation, ReservationStatus};
pub use time::{format_calendar_date, parse_calendar_date, TimeOfDay, TimeRange};
