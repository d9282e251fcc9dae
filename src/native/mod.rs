/// Native module runs tests as plain child processes on the host,
/// using tokio's process support and process groups for the watchdog.
pub mod capture;
pub mod compiler;
pub mod executor;
pub mod process;
