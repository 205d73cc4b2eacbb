use crate::migration::{
    directory,
    Migration,
    MigrationError,
    MigrationErrorKind,
    MigrationFile,
    MigrationIdentifier,
    MigrationScripts,
};

use std::path::Path;


pub const MAX_NAME_LENGTH: usize = 200;

/// Names become part of a file name, so only a conservative character set is allowed.
pub fn validate_name(name: &str) -> Result<(), MigrationError> {
    let valid = !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(MigrationError { kind: MigrationErrorKind::InvalidName(name.to_string()) })
    }
}

/// Create a new migration file stamped with the current time.
pub fn create(
    migration_dir: &Path,
    name: &str,
    up: Option<&str>,
) -> Result<Migration, MigrationError> {
    create_with_identifier(migration_dir, MigrationIdentifier::now(), name, up)
}

/// Existing files are not consulted: a file created in the same millisecond
/// with the same name is overwritten.
pub fn create_with_identifier(
    migration_dir: &Path,
    identifier: MigrationIdentifier,
    name: &str,
    up: Option<&str>,
) -> Result<Migration, MigrationError> {
    validate_name(name)?;
    directory::ensure_directory(migration_dir)?;

    let file = MigrationFile::new(migration_dir, identifier, name);
    let scripts = MigrationScripts {
        up: up.unwrap_or_default().to_string(),
        down: String::new(),
    };

    directory::write_scripts(&file.path, &scripts)?;
    tracing::info!("Created migration {:?}", file.path);

    Ok(Migration { file, scripts })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::parse_id_from_file_name;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_name() {
        for name in ["create_users", "add-index", "v2_Orders"] {
            assert!(validate_name(name).is_ok(), "Expected {name:?} to be valid");
        }

        let too_long = "a".repeat(MAX_NAME_LENGTH + 1);
        for name in ["", "with space", "../escape", "dir/name", "dot.name", too_long.as_str()] {
            let err = validate_name(name).unwrap_err();
            assert!(matches!(err.kind, MigrationErrorKind::InvalidName(_)), "Expected {name:?} to be invalid");
        }
    }

    #[test]
    fn test_create_without_script_writes_empty_record() {
        let temp = TempDir::new().unwrap();

        let migration = create(temp.path(), "create_users", None).unwrap();

        assert_eq!(migration.file.name, "create_users");
        assert_eq!(migration.scripts, MigrationScripts { up: String::new(), down: String::new() });
        let on_disk: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(&migration.file.path).unwrap()
        ).unwrap();
        assert_eq!(on_disk, serde_json::json!({ "up": "", "down": "" }));
    }

    #[test]
    fn test_create_with_script_sets_up_only() {
        let temp = TempDir::new().unwrap();

        let migration = create(temp.path(), "create_users", Some("CREATE TABLE users (id INT);")).unwrap();

        let scripts = directory::read_scripts(&migration.file.path).unwrap();
        assert_eq!(scripts.up, "CREATE TABLE users (id INT);");
        assert_eq!(scripts.down, "");
    }

    #[test]
    fn test_created_file_name_carries_thirteen_digit_identifier() {
        let temp = TempDir::new().unwrap();

        let migration = create(temp.path(), "create_users", None).unwrap();
        let file_name = migration.file.path.file_name().unwrap().to_str().unwrap();

        let identifier = parse_id_from_file_name(file_name).unwrap();
        assert_eq!(identifier, migration.file.identifier);
        assert_eq!(identifier.to_string().len(), 13);
        assert!(file_name.ends_with("_create_users"));
    }

    #[test]
    fn test_create_invalid_name_writes_nothing() {
        let temp = TempDir::new().unwrap();

        let err = create(temp.path(), "bad name", None).unwrap_err();

        assert!(matches!(err.kind, MigrationErrorKind::InvalidName(_)));
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let temp = TempDir::new().unwrap();

        let err = create(&temp.path().join("missing"), "create_users", None).unwrap_err();

        assert!(matches!(err.kind, MigrationErrorKind::InvalidDirectory(_)));
    }

    #[test]
    fn test_same_millisecond_creations_share_identifier() {
        let temp = TempDir::new().unwrap();
        let identifier = MigrationIdentifier::from(1700000000000);

        let a = create_with_identifier(temp.path(), identifier, "a", None).unwrap();
        let b = create_with_identifier(temp.path(), identifier, "b", None).unwrap();

        assert_eq!(a.file.identifier, b.file.identifier);
        assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 2);
    }
}
