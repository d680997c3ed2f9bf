use acoustic_common::{Error, Result};
use acoustic_config::SeedConfig;
use acoustic_db::ProjectStore;
use acoustic_db::records::{DATE_FORMAT, Email, Milestone, NewProject};
use chrono::{NaiveDate, NaiveTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::catalog::{
    self, CONFERENCE_ROOM_THREAD, GENERAL_EMAIL_TEMPLATES, MILESTONE_STATUSES, MILESTONE_TYPES,
    PROJECT_STATUSES, PROJECT_TEMPLATES,
};
use crate::datacenter::DatacenterProject;

const BASE_START: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid base date"),
};

/// First and last (exclusive) day offsets for general project email.
const GENERAL_EMAIL_DAYS: std::ops::Range<i64> = 40..365;

/// What a seed run inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSummary {
    pub project_ids: Vec<i64>,
    pub datacenter_id: Option<i64>,
    pub table_counts: Vec<(&'static str, usize)>,
}

/// Fills a migrated database with plausible consulting-project data.
pub struct SampleDataGenerator<R = StdRng> {
    rng: R,
    config: SeedConfig,
}

impl SampleDataGenerator<StdRng> {
    /// Seeded from `config.rng_seed` when set, otherwise from OS entropy.
    pub fn from_config(config: &SeedConfig) -> Result<Self> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(rng, config.clone())
    }
}

impl<R: Rng> SampleDataGenerator<R> {
    pub fn with_rng(rng: R, config: SeedConfig) -> Result<Self> {
        for (label, p) in [
            ("email_probability", config.email_probability),
            ("milestone_probability", config.milestone_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::Seed(format!("{label} must be within 0..=1, got {p}")));
            }
        }
        Ok(Self { rng, config })
    }

    fn pick<'a>(&mut self, options: &[&'a str]) -> &'a str {
        options[self.rng.random_range(0..options.len())]
    }

    /// Randomized project rows, cycling through the name/client templates.
    pub fn projects(&mut self) -> Vec<NewProject> {
        (0..self.config.project_count)
            .map(|i| {
                let (name, client) = PROJECT_TEMPLATES[i % PROJECT_TEMPLATES.len()];
                let round = i / PROJECT_TEMPLATES.len();
                let project_name = if round == 0 {
                    name.to_string()
                } else {
                    format!("{name} {}", round + 1)
                };
                let start_date = BASE_START + TimeDelta::days(self.rng.random_range(0..=60));
                let end_date = start_date + TimeDelta::days(self.rng.random_range(180..=365));
                NewProject {
                    project_name,
                    client_name: client.to_string(),
                    start_date,
                    end_date,
                    status: self.pick(&PROJECT_STATUSES).to_string(),
                    percent_complete: self.rng.random_range(0..=100),
                }
            })
            .collect()
    }

    /// Routine project mail on random days after the initial design thread.
    pub fn general_emails(&mut self, start: NaiveDate) -> Vec<Email> {
        let mut emails = Vec::new();
        for offset in GENERAL_EMAIL_DAYS {
            if !self.rng.random_bool(self.config.email_probability) {
                continue;
            }
            let (subject, body) =
                GENERAL_EMAIL_TEMPLATES[self.rng.random_range(0..GENERAL_EMAIL_TEMPLATES.len())];
            let subject = subject
                .replace("{week}", &self.rng.random_range(1..=52).to_string())
                .replace("{quarter}", &self.rng.random_range(1..=4).to_string());
            emails.push(Email {
                sender: "project.manager@company.com".to_string(),
                recipient: "team@company.com".to_string(),
                subject,
                content: body.to_string(),
                sent_date: (start + TimeDelta::days(offset)).and_time(NaiveTime::MIN),
                is_read: self.rng.random_bool(0.5),
            });
        }
        emails
    }

    /// Milestones on random days in `[start, end)`, each landing within two
    /// days of its plan.
    pub fn milestones(&mut self, start: NaiveDate, end: NaiveDate) -> Vec<Milestone> {
        let mut milestones = Vec::new();
        let mut day = start;
        while day < end {
            if self.rng.random_bool(self.config.milestone_probability) {
                let kind = self.pick(&MILESTONE_TYPES);
                let slip = TimeDelta::days(self.rng.random_range(-2..=2));
                milestones.push(Milestone {
                    milestone_name: format!("{kind} - {}", day.format(DATE_FORMAT)),
                    milestone_type: kind.to_string(),
                    planned_date: day,
                    actual_date: Some(day + slip),
                    status: self.pick(&MILESTONE_STATUSES).to_string(),
                    notes: Some(format!("Sample {kind} milestone")),
                });
            }
            day += TimeDelta::days(1);
        }
        milestones
    }

    fn populate(
        &mut self,
        store: &ProjectStore,
        project_id: i64,
        project: &NewProject,
    ) -> Result<()> {
        for material in catalog::materials() {
            store.insert_material(project_id, &material)?;
        }
        for item in catalog::equipment() {
            store.insert_equipment(project_id, &item)?;
        }
        for space in catalog::spaces() {
            store.insert_space(project_id, &space)?;
        }
        for email in conference_thread(project.start_date) {
            store.insert_email(project_id, &email)?;
        }
        let general = self.general_emails(project.start_date);
        for email in &general {
            store.insert_email(project_id, email)?;
        }
        let milestones = self.milestones(project.start_date, project.end_date);
        for milestone in &milestones {
            store.insert_milestone(project_id, milestone)?;
        }
        debug!(
            project_id,
            general_emails = general.len(),
            milestones = milestones.len(),
            "populated project"
        );
        Ok(())
    }

    /// Insert every generated project, plus the data-center project when
    /// enabled, in a single transaction.
    pub fn seed(&mut self, store: &ProjectStore) -> Result<SeedSummary> {
        let projects = self.projects();
        let datacenter = if self.config.include_datacenter {
            Some(DatacenterProject::build()?)
        } else {
            None
        };

        let (project_ids, datacenter_id) = store.in_transaction(|store| {
            let mut ids = Vec::with_capacity(projects.len());
            for project in &projects {
                let id = store.insert_project(project)?;
                self.populate(store, id, project)?;
                ids.push(id);
            }
            let dc_id = match &datacenter {
                Some(dc) => Some(insert_datacenter(store, dc)?),
                None => None,
            };
            Ok((ids, dc_id))
        })?;

        let table_counts = store.table_counts()?;
        info!(
            projects = project_ids.len(),
            datacenter = datacenter_id.is_some(),
            "sample data generated"
        );
        Ok(SeedSummary {
            project_ids,
            datacenter_id,
            table_counts,
        })
    }
}

/// The scripted conference-room thread, dated relative to `start`.
pub fn conference_thread(start: NaiveDate) -> Vec<Email> {
    CONFERENCE_ROOM_THREAD
        .iter()
        .map(|msg| Email {
            sender: msg.sender.to_string(),
            recipient: msg.recipient.to_string(),
            subject: msg.subject.to_string(),
            content: msg.body.to_string(),
            sent_date: (start + TimeDelta::days(msg.day_offset)).and_time(NaiveTime::MIN),
            is_read: true,
        })
        .collect()
}

fn insert_datacenter(store: &ProjectStore, dc: &DatacenterProject) -> Result<i64> {
    let id = store.insert_project(&dc.project)?;
    store.insert_budget(id, &dc.budget)?;
    for test in &dc.astm_tests {
        store.insert_astm_test(id, test)?;
    }
    for material in &dc.materials {
        store.insert_material(id, material)?;
    }
    for space in &dc.spaces {
        store.insert_space(id, space)?;
    }
    for item in &dc.equipment {
        store.insert_equipment(id, item)?;
    }
    for email in &dc.emails {
        store.insert_email(id, email)?;
    }
    for deliverable in &dc.deliverables {
        store.insert_deliverable(id, deliverable)?;
    }
    for milestone in &dc.milestones {
        store.insert_milestone(id, milestone)?;
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(seed: u64) -> SampleDataGenerator {
        SampleDataGenerator::from_config(&SeedConfig {
            rng_seed: Some(seed),
            ..SeedConfig::default()
        })
        .unwrap()
    }

    fn count(summary: &SeedSummary, table: &str) -> usize {
        summary
            .table_counts
            .iter()
            .find(|(name, _)| *name == table)
            .map(|(_, n)| *n)
            .unwrap()
    }

    #[test]
    fn projects_stay_within_date_windows() {
        let mut generator = seeded(7);
        for project in generator.projects() {
            let start_offset = (project.start_date - BASE_START).num_days();
            let length = (project.end_date - project.start_date).num_days();
            assert!((0..=60).contains(&start_offset));
            assert!((180..=365).contains(&length));
            assert!((0..=100).contains(&project.percent_complete));
            assert!(PROJECT_STATUSES.contains(&project.status.as_str()));
        }
    }

    #[test]
    fn extra_projects_get_numbered_names() {
        let mut generator = SampleDataGenerator::from_config(&SeedConfig {
            rng_seed: Some(1),
            project_count: 7,
            ..SeedConfig::default()
        })
        .unwrap();
        let names: Vec<_> = generator.projects().into_iter().map(|p| p.project_name).collect();
        assert_eq!(names[0], "Acoustic Design - Corporate Office");
        assert_eq!(names[5], "Acoustic Design - Corporate Office 2");
        assert_eq!(names[6], "Concert Hall Renovation 2");
    }

    #[test]
    fn same_seed_same_data() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        assert_eq!(a.projects(), b.projects());

        let start = BASE_START;
        let end = start + TimeDelta::days(200);
        assert_eq!(a.general_emails(start), b.general_emails(start));
        assert_eq!(a.milestones(start, end), b.milestones(start, end));
    }

    #[test]
    fn milestones_slip_at_most_two_days() {
        let mut generator = SampleDataGenerator::with_rng(
            StdRng::seed_from_u64(3),
            SeedConfig {
                milestone_probability: 1.0,
                ..SeedConfig::default()
            },
        )
        .unwrap();
        let start = BASE_START;
        let end = start + TimeDelta::days(30);
        let milestones = generator.milestones(start, end);
        assert_eq!(milestones.len(), 30);
        for m in &milestones {
            let slip = (m.actual_date.unwrap() - m.planned_date).num_days();
            assert!((-2..=2).contains(&slip));
            assert!(m.planned_date < end);
        }
    }

    #[test]
    fn general_emails_start_after_the_thread() {
        let mut generator = SampleDataGenerator::with_rng(
            StdRng::seed_from_u64(9),
            SeedConfig {
                email_probability: 1.0,
                ..SeedConfig::default()
            },
        )
        .unwrap();
        let emails = generator.general_emails(BASE_START);
        assert_eq!(emails.len(), 325);
        assert_eq!(emails[0].sent_date.date(), BASE_START + TimeDelta::days(40));
        assert!(emails.iter().all(|e| !e.subject.contains('{')));
    }

    #[test]
    fn zero_probability_generates_nothing() {
        let mut generator = SampleDataGenerator::with_rng(
            StdRng::seed_from_u64(0),
            SeedConfig {
                email_probability: 0.0,
                milestone_probability: 0.0,
                ..SeedConfig::default()
            },
        )
        .unwrap();
        assert!(generator.general_emails(BASE_START).is_empty());
        assert!(generator
            .milestones(BASE_START, BASE_START + TimeDelta::days(365))
            .is_empty());
    }

    #[test]
    fn rejects_out_of_range_probability() {
        let err = SampleDataGenerator::from_config(&SeedConfig {
            email_probability: 1.5,
            ..SeedConfig::default()
        })
        .err()
        .unwrap();
        assert!(matches!(err, Error::Seed(_)));
    }

    #[test]
    fn seeding_fills_every_table() {
        let store = ProjectStore::in_memory().unwrap();
        let summary = seeded(11).seed(&store).unwrap();

        assert_eq!(summary.project_ids.len(), 5);
        assert!(summary.datacenter_id.is_some());
        assert_eq!(count(&summary, "projects"), 6);
        assert_eq!(count(&summary, "budget"), 1);
        assert_eq!(count(&summary, "astm_tests"), 5);
        assert_eq!(count(&summary, "acoustic_materials"), 5 * 6 + 6);
        assert_eq!(count(&summary, "equipment"), 5 * 3 + 8);
        assert_eq!(count(&summary, "equipment_spaces"), 5 * 5 + 9);
        assert_eq!(count(&summary, "deliverables"), 6);
        assert!(count(&summary, "email_correspondence") >= 5 * 9 + 3);
    }

    #[test]
    fn fixed_seed_is_reproducible_end_to_end() {
        let first = ProjectStore::in_memory().unwrap();
        let second = ProjectStore::in_memory().unwrap();
        let a = seeded(2024).seed(&first).unwrap();
        let b = seeded(2024).seed(&second).unwrap();

        assert_eq!(a, b);
        assert_eq!(first.projects().unwrap(), second.projects().unwrap());
    }

    #[test]
    fn datacenter_can_be_skipped() {
        let store = ProjectStore::in_memory().unwrap();
        let mut generator = SampleDataGenerator::from_config(&SeedConfig {
            rng_seed: Some(5),
            project_count: 2,
            include_datacenter: false,
            ..SeedConfig::default()
        })
        .unwrap();
        let summary = generator.seed(&store).unwrap();
        assert_eq!(summary.datacenter_id, None);
        assert_eq!(count(&summary, "projects"), 2);
        assert_eq!(count(&summary, "budget"), 0);
    }

    #[test]
    fn thread_dates_follow_project_start() {
        let thread = conference_thread(BASE_START);
        assert_eq!(thread.len(), 9);
        assert_eq!(thread[0].sent_date.date(), BASE_START + TimeDelta::days(5));
        assert!(thread.iter().all(|e| e.is_read));
    }
}
