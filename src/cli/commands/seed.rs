//! `padel-scheduler seed`: load club reference data from a YAML fixture.
//!
//! ```yaml
//! clubs:
//!   - club_id: 7a1c...
//!     settings:
//!       default_group_price: 30000
//!       court_cost_per_hour: 45000
//!     courts:
//!       - name: Court 1
//!     instructors:
//!       - name: Ana
//!         pay_model: { payment_type: HOURLY, hourly_rate: 60000 }
//! ```
//!
//! Entries without an `id` get a fresh one, so re-seeding such a fixture adds
//! new rows instead of updating the old ones.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::adapters::sqlite::{initialize_database, sqlite_repositories, PoolConfig};
use crate::cli::output::{list_table, output, render_list, CommandOutput};
use crate::domain::models::{ClubSettings, Config, Court, Instructor, InstructorPayModel, Money};
use crate::domain::ports::Repositories;

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// YAML fixture file
    pub file: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct SeedFixture {
    #[serde(default)]
    pub clubs: Vec<ClubFixture>,
}

#[derive(Debug, Deserialize)]
pub struct ClubFixture {
    pub club_id: Uuid,
    #[serde(default)]
    pub settings: Option<SettingsFixture>,
    #[serde(default)]
    pub courts: Vec<CourtFixture>,
    #[serde(default)]
    pub instructors: Vec<InstructorFixture>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsFixture {
    #[serde(default)]
    pub default_group_price: Money,
    #[serde(default)]
    pub default_private_price: Money,
    #[serde(default)]
    pub default_semi_private_price: Money,
    #[serde(default)]
    pub court_cost_per_hour: Option<Money>,
}

#[derive(Debug, Deserialize)]
pub struct CourtFixture {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct InstructorFixture {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub pay_model: InstructorPayModel,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct SeededEntity {
    pub kind: &'static str,
    pub club_id: Uuid,
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SeedOutput {
    pub clubs: usize,
    pub courts: usize,
    pub instructors: usize,
    pub entities: Vec<SeededEntity>,
}

impl CommandOutput for SeedOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["kind", "club", "id", "name"]);
        for entity in &self.entities {
            table.add_row(vec![
                entity.kind.to_string(),
                entity.club_id.to_string(),
                entity.id.to_string(),
                entity.name.clone(),
            ]);
        }
        render_list("record", &table, self.entities.len())
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SeedArgs, config: &Config, json_mode: bool) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read fixture {}", args.file.display()))?;
    let fixture: SeedFixture = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse fixture {}", args.file.display()))?;

    let pool = initialize_database(&config.database.url(), Some(PoolConfig::from(&config.database)))
        .await
        .context("Failed to open database")?;

    let result = seed(&sqlite_repositories(pool.clone()), fixture).await?;
    pool.close().await;

    output(&result, json_mode);
    Ok(())
}

/// Persist every record in the fixture through the storage ports.
pub async fn seed(repos: &Repositories, fixture: SeedFixture) -> Result<SeedOutput> {
    let mut result = SeedOutput {
        clubs: fixture.clubs.len(),
        courts: 0,
        instructors: 0,
        entities: Vec::new(),
    };

    for club in fixture.clubs {
        let club_id = club.club_id;

        if let Some(settings) = club.settings {
            repos
                .clubs
                .save_settings(&ClubSettings {
                    club_id,
                    default_group_price: settings.default_group_price,
                    default_private_price: settings.default_private_price,
                    default_semi_private_price: settings.default_semi_private_price,
                    court_cost_per_hour: settings.court_cost_per_hour,
                })
                .await
                .with_context(|| format!("Failed to save settings for club {club_id}"))?;
            result.entities.push(SeededEntity {
                kind: "settings",
                club_id,
                id: club_id,
                name: "-".to_string(),
            });
        }

        for fixture in club.courts {
            let mut court = Court::new(club_id, fixture.name);
            court.id = fixture.id.unwrap_or(court.id);
            court.active = fixture.active;
            repos
                .courts
                .save_court(&court)
                .await
                .with_context(|| format!("Failed to save court {}", court.name))?;
            result.courts += 1;
            result.entities.push(SeededEntity {
                kind: "court",
                club_id,
                id: court.id,
                name: court.name,
            });
        }

        for fixture in club.instructors {
            let mut instructor = Instructor::new(club_id, fixture.name, fixture.pay_model);
            instructor.id = fixture.id.unwrap_or(instructor.id);
            instructor.active = fixture.active;
            repos
                .instructors
                .save_instructor(&instructor)
                .await
                .with_context(|| format!("Failed to save instructor {}", instructor.name))?;
            result.instructors += 1;
            result.entities.push(SeededEntity {
                kind: "instructor",
                club_id,
                id: instructor.id,
                name: instructor.name,
            });
        }
    }

    info!(
        clubs = result.clubs,
        courts = result.courts,
        instructors = result.instructors,
        "fixture seeded"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::models::PaymentType;
    use std::sync::Arc;

    const FIXTURE: &str = r"
clubs:
  - club_id: 6f1f6a52-93a4-4c55-9a1e-3b1a2f0c4d10
    settings:
      default_group_price: 30000
      court_cost_per_hour: 45000
    courts:
      - id: 0b7c2f3e-1d5a-4e8b-9c6f-2a4d8e1b3c50
        name: Court 1
      - name: Court 2
        active: false
    instructors:
      - name: Ana
        pay_model:
          payment_type: HOURLY
          hourly_rate: 60000
      - name: Leo
        pay_model:
          payment_type: COMMISSION
          commission_percent: 40
";

    #[tokio::test]
    async fn test_seed_fixture_through_ports() {
        let store = Arc::new(InMemoryStore::new());
        let repos = store.repositories();
        let fixture: SeedFixture = serde_yaml::from_str(FIXTURE).unwrap();

        let result = seed(&repos, fixture).await.unwrap();
        assert_eq!(result.clubs, 1);
        assert_eq!(result.courts, 2);
        assert_eq!(result.instructors, 2);
        assert_eq!(result.entities.len(), 5);

        let club_id: Uuid = "6f1f6a52-93a4-4c55-9a1e-3b1a2f0c4d10".parse().unwrap();
        let settings = repos.clubs.get_settings(club_id).await.unwrap().unwrap();
        assert_eq!(settings.default_group_price.minor(), 30_000);
        assert_eq!(settings.default_private_price, Money::ZERO);
        assert_eq!(settings.court_cost_per_hour, Some(Money::from_minor(45_000)));

        let court_id: Uuid = "0b7c2f3e-1d5a-4e8b-9c6f-2a4d8e1b3c50".parse().unwrap();
        let court = repos.courts.get_court(club_id, court_id).await.unwrap().unwrap();
        assert!(court.active);

        let courts = repos.courts.list_courts(club_id).await.unwrap();
        assert_eq!(courts.len(), 2);
        assert!(courts.iter().any(|c| c.name == "Court 2" && !c.active));

        let leo = result.entities.iter().find(|e| e.name == "Leo").unwrap();
        let leo = repos.instructors.get_instructor(club_id, leo.id).await.unwrap().unwrap();
        assert_eq!(leo.pay_model.payment_type, PaymentType::Commission);
        assert_eq!(leo.pay_model.commission_percent, 40);
    }

    #[test]
    fn test_fixture_rejects_unknown_payment_type() {
        let yaml = r"
clubs:
  - club_id: 6f1f6a52-93a4-4c55-9a1e-3b1a2f0c4d10
    instructors:
      - name: Ana
        pay_model:
          payment_type: BARTER
";
        assert!(serde_yaml::from_str::<SeedFixture>(yaml).is_err());
    }
}
