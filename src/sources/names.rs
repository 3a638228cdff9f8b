//! Gender-matched first-name lists.

use std::io::ErrorKind;
use std::path::Path;

use crate::models::Gender;

use super::SourceError;

pub const DEFAULT_MALE_NAMES: &[&str] = &[
    "John", "Michael", "David", "Robert", "William",
    "James", "Richard", "Thomas", "Charles", "Joseph",
];

pub const DEFAULT_FEMALE_NAMES: &[&str] = &[
    "Mary", "Patricia", "Jennifer", "Linda", "Elizabeth",
    "Barbara", "Susan", "Jessica", "Sarah", "Karen",
];

/// Non-empty name pools, one per gender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLists {
    male: Vec<String>,
    female: Vec<String>,
}

impl Default for NameLists {
    fn default() -> Self {
        Self {
            male: owned_names(DEFAULT_MALE_NAMES),
            female: owned_names(DEFAULT_FEMALE_NAMES),
        }
    }
}

impl NameLists {
    /// Empty pools are replaced by the built-in defaults.
    pub fn new(male: Vec<String>, female: Vec<String>) -> Self {
        Self {
            male: if male.is_empty() { owned_names(DEFAULT_MALE_NAMES) } else { male },
            female: if female.is_empty() { owned_names(DEFAULT_FEMALE_NAMES) } else { female },
        }
    }

    /// Loads both lists; `None` paths use the defaults directly.
    pub fn load(male: Option<&Path>, female: Option<&Path>) -> Result<Self, SourceError> {
        Ok(Self {
            male: load_or_default(male, DEFAULT_MALE_NAMES)?,
            female: load_or_default(female, DEFAULT_FEMALE_NAMES)?,
        })
    }

    pub fn for_gender(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Male => &self.male,
            Gender::Female => &self.female,
        }
    }
}

/// One name per line; blank lines and `#` comments are skipped.
pub fn parse_names(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(String::from)
        .collect()
}

fn load_or_default(path: Option<&Path>, defaults: &[&str]) -> Result<Vec<String>, SourceError> {
    let Some(path) = path else {
        return Ok(owned_names(defaults));
    };

    match std::fs::read_to_string(path) {
        Ok(text) => {
            let names = parse_names(&text);
            if names.is_empty() {
                tracing::warn!(path = %path.display(), "Name list has no entries, using default names");
                Ok(owned_names(defaults))
            } else {
                tracing::info!(path = %path.display(), count = names.len(), "Loaded name list");
                Ok(names)
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Name list not found, using default names");
            Ok(owned_names(defaults))
        }
        Err(source) => Err(SourceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn owned_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_skips_comments_and_blanks() {
        let names = parse_names("# male names\n\n  Arthur \nHarold\n#Bert\n");
        assert_eq!(names, vec!["Arthur", "Harold"]);
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("male.txt");
        let lists = NameLists::load(Some(missing.as_path()), None).unwrap();
        assert_eq!(lists, NameLists::default());
        assert_eq!(lists.for_gender(Gender::Male).len(), 10);
    }

    #[test]
    fn comment_only_file_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# nothing here").unwrap();
        let lists = NameLists::load(None, Some(file.path())).unwrap();
        assert_eq!(lists.for_gender(Gender::Female)[0], "Mary");
    }

    #[test]
    fn loads_file_contents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Edith\nMabel").unwrap();
        let lists = NameLists::load(None, Some(file.path())).unwrap();
        assert_eq!(lists.for_gender(Gender::Female), ["Edith", "Mabel"]);
        assert_eq!(lists.for_gender(Gender::Male)[0], "John");
    }

    #[test]
    fn directory_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(NameLists::load(Some(dir.path()), None).is_err());
    }

    #[test]
    fn new_replaces_empty_pools() {
        let lists = NameLists::new(vec![], vec!["Edith".into()]);
        assert_eq!(lists.for_gender(Gender::Male).len(), 10);
        assert_eq!(lists.for_gender(Gender::Female), ["Edith"]);
    }
}
