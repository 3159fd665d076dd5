//! Club-level reference data: pricing defaults and courts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::money::Money;

/// Kind of class, which selects the club's default price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassType {
    #[default]
    Group,
    Private,
    SemiPrivate,
}

impl ClassType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "GROUP",
            Self::Private => "PRIVATE",
            Self::SemiPrivate => "SEMI_PRIVATE",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().replace('-', "_").as_str() {
            "GROUP" => Some(Self::Group),
            "PRIVATE" => Some(Self::Private),
            "SEMI_PRIVATE" => Some(Self::SemiPrivate),
            _ => None,
        }
    }
}

/// Per-club pricing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubSettings {
    pub club_id: Uuid,
    pub default_group_price: Money,
    pub default_private_price: Money,
    pub default_semi_private_price: Money,
    /// Hourly court cost; `None` falls back to the configured default rate.
    pub court_cost_per_hour: Option<Money>,
}

impl ClubSettings {
    pub fn new(club_id: Uuid) -> Self {
        Self {
            club_id,
            default_group_price: Money::ZERO,
            default_private_price: Money::ZERO,
            default_semi_private_price: Money::ZERO,
            court_cost_per_hour: None,
        }
    }

    pub fn default_price(&self, class_type: ClassType) -> Money {
        match class_type {
            ClassType::Group => self.default_group_price,
            ClassType::Private => self.default_private_price,
            ClassType::SemiPrivate => self.default_semi_private_price,
        }
    }
}

/// A bookable court belonging to a club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    pub club_id: Uuid,
    pub name: String,
    pub active: bool,
}

impl Court {
    pub fn new(club_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            club_id,
            name: name.into(),
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_price_by_type() {
        let mut settings = ClubSettings::new(Uuid::new_v4());
        settings.default_group_price = Money::from_minor(30_000);
        settings.default_private_price = Money::from_minor(80_000);
        settings.default_semi_private_price = Money::from_minor(55_000);

        assert_eq!(settings.default_price(ClassType::Group).minor(), 30_000);
        assert_eq!(settings.default_price(ClassType::Private).minor(), 80_000);
        assert_eq!(settings.default_price(ClassType::SemiPrivate).minor(), 55_000);
    }

    #[test]
    fn test_class_type_parsing() {
        assert_eq!(ClassType::from_str("semi-private"), Some(ClassType::SemiPrivate));
        assert_eq!(ClassType::from_str("GROUP"), Some(ClassType::Group));
        assert_eq!(ClassType::from_str("clinic"), None);
        assert_eq!(
            serde_json::to_string(&ClassType::SemiPrivate).unwrap(),
            "\"SEMI_PRIVATE\""
        );
    }
}
