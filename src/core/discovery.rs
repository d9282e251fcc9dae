use std::path::Path;

use itertools::Itertools;

use crate::constants::{NATIVE_FIXTURE_SUFFIX, TEST_FILE_PREFIX};
use crate::core::{
    domain::{Configuration, FixtureKind, TestCase},
    errors::HarnessError,
};

/// Collects the tests to run.
///
/// Explicit files are used verbatim and in order. Otherwise the corpus
/// directory is listed, filtered by the test naming convention and sorted
/// by name.
#[tracing::instrument(skip_all)]
pub fn discover(config: &Configuration) -> Result<Vec<TestCase>, HarnessError> {
    if !config.files.is_empty() {
        tracing::debug!("Using {} explicit test files", config.files.len());
        return Ok(config.files.iter().map(TestCase::new).collect());
    }

    let cases = list_dir(&config.dir, config.fixture)?;
    tracing::debug!(
        "Found {} test files in {}",
        cases.len(),
        config.dir.display()
    );
    Ok(cases)
}

fn list_dir(dir: &Path, fixture: FixtureKind) -> Result<Vec<TestCase>, HarnessError> {
    let to_err = |source| HarnessError::Discovery {
        dir: dir.into(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(to_err)? {
        let entry = entry.map_err(to_err)?;
        if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_test_name(&name, fixture) {
            names.push(name);
        }
    }

    Ok(names
        .into_iter()
        .sorted()
        .map(|name| TestCase::new(dir.join(name)))
        .collect())
}

fn is_test_name(name: &str, fixture: FixtureKind) -> bool {
    if !name.starts_with(TEST_FILE_PREFIX) {
        return false;
    }
    match fixture {
        FixtureKind::Script => true,
        FixtureKind::Native => name.ends_with(NATIVE_FIXTURE_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::*;
    use crate::core::options::resolve;

    fn corpus_dir(files: &[&str]) -> PathBuf {
        let dir = PathBuf::from(format!("/tmp/corpus_runner_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for file in files {
            std::fs::write(dir.join(file), "").unwrap();
        }
        dir
    }

    #[test]
    fn test_directory_mode_filters_and_sorts() {
        let dir = corpus_dir(&["test_b.js", "runner.js", "test_a.js", "harness.js"]);
        std::fs::create_dir(dir.join("test_subdir")).unwrap();
        let config = resolve(["--dir", dir.to_str().unwrap()]);

        let cases = discover(&config).unwrap();

        assert_eq!(
            cases,
            vec![
                TestCase::new(dir.join("test_a.js")),
                TestCase::new(dir.join("test_b.js")),
            ]
        );
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_native_mode_only_takes_c_sources() {
        let dir = corpus_dir(&["test_eval.c", "test_eval.c.out", "test.h", "test_casting.c"]);
        let config = resolve(["--native", "--dir", dir.to_str().unwrap()]);

        let names: Vec<String> = discover(&config)
            .unwrap()
            .iter()
            .map(TestCase::name)
            .collect();

        assert_eq!(names, vec!["test_casting.c", "test_eval.c"]);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_explicit_files_skip_directory() {
        // The directory does not exist, so any listing would fail.
        let config = resolve(["-d", "/nonexistent/corpus", "z.js", "a.js"]);

        let cases = discover(&config).unwrap();

        assert_eq!(cases, vec![TestCase::new("z.js"), TestCase::new("a.js")]);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let config = resolve(["-d", "/nonexistent/corpus"]);

        let result = discover(&config);

        assert!(matches!(result, Err(HarnessError::Discovery { .. })));
    }
}
