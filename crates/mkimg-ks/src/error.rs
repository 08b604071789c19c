//! Error types for mkimg-ks

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("Repository {repo} has no baseurl")]
    NoBaseurl { repo: String },

    #[error("Unsupported repository URL for {repo}: {url} (only file:// is supported)")]
    UnsupportedUrl { repo: String, url: String },

    #[error("Repository {repo} not found at {path}")]
    RepoNotFound { repo: String, path: PathBuf },

    #[error("Failed to scan {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Conf(#[from] mkimg_conf::Error),
}

impl Error {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<Error> for mkimg_conf::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Conf(inner) => inner,
            Error::Io { path, source } => mkimg_conf::Error::io(path, source),
            other => mkimg_conf::Error::backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mkimg_conf::ErrorKind;

    #[test]
    fn conversion_keeps_conf_errors() {
        let inner = mkimg_conf::Error::RepoString {
            repostr: "x".into(),
            message: "missing name".into(),
        };
        let converted: mkimg_conf::Error = Error::from(inner).into();
        assert_eq!(converted.kind(), ErrorKind::Kickstart);
    }

    #[test]
    fn scheme_errors_become_backend_errors() {
        let err = Error::UnsupportedUrl {
            repo: "base".into(),
            url: "http://x".into(),
        };
        let converted: mkimg_conf::Error = err.into();
        assert_eq!(converted.kind(), ErrorKind::Backend);
        assert!(converted.to_string().contains("http://x"));
    }
}
