//! Command implementations

pub mod bootstraps;
pub mod probe;
pub mod show;

pub use bootstraps::run_bootstraps;
pub use probe::run_probe;
pub use show::run_show;
