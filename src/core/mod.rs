pub mod aggregator;
pub mod classify;
pub mod discovery;
pub mod domain;
pub mod errors;
pub mod options;
pub mod pipeline;
pub mod reporter;
pub mod traits;
