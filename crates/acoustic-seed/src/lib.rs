pub mod catalog;
pub mod datacenter;
pub mod generator;
pub mod scaffold;

pub use datacenter::DatacenterProject;
pub use generator::{SampleDataGenerator, SeedSummary, conference_thread};
pub use scaffold::{DEFAULT_PROJECT_FOLDER, scaffold_project_folders};
