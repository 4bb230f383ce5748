//! Cross-crate suites.

mod profiles;
mod properties;
mod remote_strategy;
mod scenarios;
