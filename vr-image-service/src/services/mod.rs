pub mod metrics;
pub mod prompts;
pub mod providers;
