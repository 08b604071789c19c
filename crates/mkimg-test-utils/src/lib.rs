//! Shared test utilities for the mkimg workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`site`]: [`TestSite`] builder for site configs and kickstarts on disk
//! - [`fakes`]: in-memory stand-ins for the kickstart reader, repository
//!   backend and SELinux probe

pub mod fakes;
pub mod site;

pub use fakes::{FakeProbe, FakeRepoBackend, StaticKickstartReader};
pub use site::TestSite;
