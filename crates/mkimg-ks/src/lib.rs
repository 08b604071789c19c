//! Kickstart reader and local repository backend for mkimg
//!
//! Concrete collaborators for [`mkimg_conf`]:
//!
//! - [`KickstartFile`] implements [`mkimg_conf::KickstartReader`]
//! - [`LocalRepoBackend`] implements [`mkimg_conf::RepoBackend`] for
//!   `file://` repositories

pub mod backend;
pub mod error;
pub mod parser;

pub use backend::{LocalRepoBackend, parse_rpm_filename};
pub use error::{Error, Result};
pub use parser::{KickstartFile, parse};
