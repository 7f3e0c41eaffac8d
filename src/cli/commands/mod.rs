mod export;
mod report;
mod seed;
mod site;
mod wipe;

pub use export::export_hits;
pub use report::run_report;
pub use seed::seed_demo;
pub use site::{add_site, list_sites, remove_site};
pub use wipe::wipe_store;
