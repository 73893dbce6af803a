//! Golden-image regression harness: a table of deterministic scenarios, rendered through an
//! injected backend and compared against reference images on disk.

pub mod compare;
pub mod opts;
pub mod scenario;

pub use compare::{ComparisonReport, Tolerance, compare_images, diff_images};
pub use opts::HarnessOpts;
pub use scenario::{Scenario, ScenarioCase, ScenarioOutcome, ScenarioRunner, scenario_table};
