pub const DEFAULT_EXECUTABLE: &str = "bin/flat";
pub const DEFAULT_ARGS_TEMPLATE: &str = "[test]";
pub const DEFAULT_TEST_DIR: &str = "test";
pub const DEFAULT_COMPILER: &str = "gcc";
pub const DEFAULT_TIMEOUT_MS: u64 = 2000;
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

pub const TEST_PLACEHOLDER: &str = "[test]";
pub const TEST_FILE_PREFIX: &str = "test_";
pub const NATIVE_FIXTURE_SUFFIX: &str = ".c";

/// How long stream readers may keep draining after a timed out child was killed.
pub const READER_GRACE_MS: u64 = 250;
pub const READ_CHUNK_BYTES: usize = 8 * 1024;

pub const PASS_MARK: &str = "✓";
pub const FAIL_MARK: &str = "✖";
