//! Migration file discovery.

use std::fs;
use std::path::Path;

use crate::error::Result;

/// File extension migrations are selected by.
const MIGRATION_EXTENSION: &str = "sql";

/// A migration file, read eagerly at discovery time.
#[derive(Debug, Clone)]
pub struct MigrationFile {
    pub name: String,
    pub sql: String,
}

/// List migration files in `dir`, ordered for application.
///
/// Only `.sql` entries are retained, sorted by filename byte order. This is
/// deliberately not numeric ordering: `10_x.sql` sorts before `2_y.sql`, so
/// migration names should use zero-padded prefixes. A directory with no
/// matching entries yields an empty list, not an error.
pub fn list_migrations(dir: &Path) -> Result<Vec<MigrationFile>> {
    let mut names: Vec<String> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if Path::new(name)
            .extension()
            .is_some_and(|ext| ext == MIGRATION_EXTENSION)
        {
            names.push(name.to_string());
        }
    }

    names.sort();

    let mut files = Vec::with_capacity(names.len());
    for name in names {
        let sql = fs::read_to_string(dir.join(&name))?;
        files.push(MigrationFile { name, sql });
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut f = File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "001_init.sql", "CREATE TABLE users ();");
        write_file(dir.path(), "README.md", "not a migration");
        write_file(dir.path(), "notes.txt", "also not");

        let files = list_migrations(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "001_init.sql");
    }

    #[test]
    fn sorts_by_filename_bytes_not_numerically() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "2_y.sql", "");
        write_file(dir.path(), "10_x.sql", "");
        write_file(dir.path(), "1_a.sql", "");

        let files = list_migrations(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["10_x.sql", "1_a.sql", "2_y.sql"]);
    }

    #[test]
    fn reads_file_contents_eagerly() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "001_init.sql", "CREATE TABLE users (id SERIAL);");

        let files = list_migrations(dir.path()).unwrap();
        assert_eq!(files[0].sql, "CREATE TABLE users (id SERIAL);");
    }

    #[test]
    fn empty_directory_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let files = list_migrations(dir.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(list_migrations(&missing).is_err());
    }
}
