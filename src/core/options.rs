use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::constants::{
    DEFAULT_ARGS_TEMPLATE, DEFAULT_COMPILER, DEFAULT_EXECUTABLE, DEFAULT_MAX_OUTPUT_BYTES,
    DEFAULT_TEST_DIR, DEFAULT_TIMEOUT_MS,
};
use crate::core::domain::{ClassificationMode, Configuration, FixtureKind};

/// Builds the run configuration from raw arguments, program name excluded.
///
/// Recognized options are removed together with their values. Everything
/// left over, unknown flags included, becomes the explicit file list.
#[tracing::instrument(skip_all)]
pub fn resolve<I, S>(args: I) -> Configuration
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = ArgList::new(args);

    let executable = args
        .take_value("--exec", "-x")
        .map(PathBuf::from)
        .unwrap_or_else(|| DEFAULT_EXECUTABLE.into());
    let args_template = args
        .take_value("--args", "-a")
        .unwrap_or_else(|| DEFAULT_ARGS_TEMPLATE.to_string());
    let timeout_ms = parse_or_default(args.take_value("--timeout", "-t"), DEFAULT_TIMEOUT_MS);
    let max_output_bytes = parse_or_default(
        args.take_value("--max-output", "-m"),
        DEFAULT_MAX_OUTPUT_BYTES,
    );
    let dir = args
        .take_value("--dir", "-d")
        .map(PathBuf::from)
        .unwrap_or_else(|| DEFAULT_TEST_DIR.into());
    let compiler = args
        .take_value("--cc", "-c")
        .map(PathBuf::from)
        .unwrap_or_else(|| DEFAULT_COMPILER.into());

    let quiet = args.take_flag("--quiet", "-q");
    let mode = if args.take_flag("--strict", "-s") {
        ClassificationMode::Strict
    } else {
        ClassificationMode::StderrSensitive
    };
    let fixture = if args.take_flag("--native", "-n") {
        FixtureKind::Native
    } else {
        FixtureKind::Script
    };
    let show_output = args.take_flag("--show-output", "-o");

    let files: Vec<PathBuf> = args.into_rest().into_iter().map(PathBuf::from).collect();
    let show_output = show_output || (fixture == FixtureKind::Native && !files.is_empty());

    let config = Configuration {
        executable,
        args_template,
        timeout: Duration::from_millis(timeout_ms),
        quiet,
        files,
        dir,
        mode,
        fixture,
        compiler,
        max_output_bytes,
        show_output,
    };
    tracing::debug!("Resolved configuration: {:?}", config);
    config
}

/// Parses a positive number, falling back to `default` on anything else.
fn parse_or_default<T>(value: Option<String>, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Debug,
{
    let Some(value) = value else {
        return default;
    };
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => parsed,
        _ => {
            tracing::debug!(
                "Ignoring malformed value {:?}, using default {:?}",
                value,
                default
            );
            default
        }
    }
}

struct ArgList {
    args: Vec<String>,
}

impl ArgList {
    fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgList {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn position(&self, long: &str, short: &str) -> Option<usize> {
        self.args.iter().position(|arg| arg == long || arg == short)
    }

    /// Removes every occurrence of the option and its value; the last value wins.
    /// A trailing option without a value is dropped and keeps what came before.
    fn take_value(&mut self, long: &str, short: &str) -> Option<String> {
        let mut value = None;
        while let Some(idx) = self.position(long, short) {
            self.args.remove(idx);
            if idx < self.args.len() {
                value = Some(self.args.remove(idx));
            }
        }
        value
    }

    fn take_flag(&mut self, long: &str, short: &str) -> bool {
        let mut found = false;
        while let Some(idx) = self.position(long, short) {
            self.args.remove(idx);
            found = true;
        }
        found
    }

    fn into_rest(self) -> Vec<String> {
        self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = resolve(Vec::<String>::new());

        assert_eq!(config.executable, PathBuf::from(DEFAULT_EXECUTABLE));
        assert_eq!(config.args_template, "[test]");
        assert_eq!(config.timeout, Duration::from_millis(2000));
        assert_eq!(config.dir, PathBuf::from("test"));
        assert_eq!(config.compiler, PathBuf::from("gcc"));
        assert_eq!(config.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
        assert_eq!(config.mode, ClassificationMode::StderrSensitive);
        assert_eq!(config.fixture, FixtureKind::Script);
        assert!(!config.quiet);
        assert!(!config.show_output);
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_long_options() {
        let config = resolve([
            "--exec",
            "node",
            "--args",
            "-f harness.js -f [test]",
            "--timeout",
            "50",
            "--quiet",
            "--dir",
            "corpus",
            "--strict",
        ]);

        assert_eq!(config.executable, PathBuf::from("node"));
        assert_eq!(config.args_template, "-f harness.js -f [test]");
        assert_eq!(config.timeout, Duration::from_millis(50));
        assert_eq!(config.dir, PathBuf::from("corpus"));
        assert_eq!(config.mode, ClassificationMode::Strict);
        assert!(config.quiet);
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_short_options_and_positionals() {
        let config = resolve(["a.js", "-x", "d8", "-t", "100", "b.js", "-q", "c.js"]);

        assert_eq!(config.executable, PathBuf::from("d8"));
        assert_eq!(config.timeout, Duration::from_millis(100));
        assert!(config.quiet);
        assert_eq!(
            config.files,
            vec![
                PathBuf::from("a.js"),
                PathBuf::from("b.js"),
                PathBuf::from("c.js")
            ]
        );
    }

    #[test]
    fn test_unknown_flags_are_left_in_place() {
        let config = resolve(["--verbose", "a.js", "-z"]);

        assert_eq!(
            config.files,
            vec![
                PathBuf::from("--verbose"),
                PathBuf::from("a.js"),
                PathBuf::from("-z")
            ]
        );
    }

    #[test]
    fn test_malformed_numbers_fall_back_to_defaults() {
        for bad in ["abc", "-5", "0", "", "12ms"] {
            let config = resolve(["--timeout", bad, "--max-output", bad]);
            assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
            assert_eq!(config.max_output_bytes, DEFAULT_MAX_OUTPUT_BYTES);
            assert!(config.files.is_empty(), "value {:?} leaked into files", bad);
        }
    }

    #[test]
    fn test_last_occurrence_wins() {
        let config = resolve(["-t", "10", "--timeout", "20", "-t"]);

        assert_eq!(config.timeout, Duration::from_millis(20));
        assert!(config.files.is_empty());
    }

    #[test]
    fn test_native_with_files_shows_output() {
        let config = resolve(["--native", "test_eval.c"]);
        assert_eq!(config.fixture, FixtureKind::Native);
        assert!(config.show_output);

        let config = resolve(["-n", "-c", "clang"]);
        assert_eq!(config.compiler, PathBuf::from("clang"));
        assert!(!config.show_output);
    }
}
