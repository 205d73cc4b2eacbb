use std::error::Error;
use std::fmt;
use std::path::PathBuf;


#[derive(Debug)]
#[non_exhaustive]
pub struct MigrationError {
    pub kind: MigrationErrorKind
}

impl fmt::Display for MigrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MigrationError: {}", self.kind)
    }
}

impl Error for MigrationError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		Some(&self.kind)
	}
}

#[derive(Debug)]
pub enum MigrationErrorKind {
    InvalidContent { path: PathBuf, source: serde_json::Error },
    InvalidDirectory(PathBuf),
    InvalidName(String),
    Io { path: PathBuf, source: std::io::Error },
    MalformedFileName(String),
    Serialize(serde_json::Error),
}

impl fmt::Display for MigrationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidContent { path, .. } => write!(f, "Invalid migration content in '{path:?}'"),
            Self::InvalidDirectory(path) => write!(f, "Directory does not exist or is not a directory: '{path:?}'"),
            Self::InvalidName(name) => write!(f, "Invalid migration name: '{name}'"),
            Self::Io { path, .. } => write!(f, "File system operation failed on '{path:?}'"),
            Self::MalformedFileName(name) => write!(f, "Malformed migration file name: '{name}'"),
            Self::Serialize(e) => write!(f, "Failed to serialize migration content: {e}"),
        }
    }
}

impl Error for MigrationErrorKind {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::InvalidContent { source, .. } => Some(source),
			Self::Io { source, .. } => Some(source),
			Self::Serialize(source) => Some(source),
			_ => None,
		}
	}
}

impl MigrationError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigrationError { kind: MigrationErrorKind::Io { path: path.into(), source } }
    }

    pub fn malformed(file_name: &str) -> Self {
        MigrationError { kind: MigrationErrorKind::MalformedFileName(file_name.to_string()) }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn migration_error_display_formats_correctly() {
        let path = PathBuf::from("/tmp/migrations");

        let cases: Vec<(MigrationErrorKind, &str)> = vec![
            (MigrationErrorKind::InvalidDirectory(path.clone()), "Directory does not exist"),
            (MigrationErrorKind::InvalidName("bad name".into()), "Invalid migration name: 'bad name'"),
            (
                MigrationErrorKind::Io {
                    path: path.clone(),
                    source: io::Error::new(io::ErrorKind::Other, "disk full"),
                },
                "File system operation failed",
            ),
            (MigrationErrorKind::MalformedFileName("abc_foo".into()), "Malformed migration file name: 'abc_foo'"),
        ];

        for (kind, expect) in cases {
            let text = kind.to_string();
            assert!(
                text.contains(expect),
                "Expected `{}` in `{}`",
                expect,
                text
            );
        }
    }

    #[test]
    fn migration_error_source_chain_works() {
        let err = MigrationError::io("/tmp/out", io::Error::new(io::ErrorKind::Other, "permission denied"));
        let src = err.kind.source().unwrap().to_string();
        assert!(src.contains("permission denied"));
        assert!(err.to_string().starts_with("MigrationError: "));
    }
}
