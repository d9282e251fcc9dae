use std::panic;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::core::{errors::HarnessError, options};

mod constants;
mod core;
mod harness;
mod native;
#[cfg(test)]
mod stubs;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    set_panic_hook();

    let config = options::resolve(std::env::args().skip(1));

    // Dropping the run on interrupt kills the children still in flight.
    let result = tokio::select! {
        result = harness::run(&config, std::io::stdout(), std::io::stderr()) => result,
        _ = tokio::signal::ctrl_c() => Err(HarnessError::Interrupted),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::debug!("Run aborted: {:?}", e);
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
