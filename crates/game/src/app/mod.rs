mod bootstrap;
mod cli;
mod gameplay;
mod input;
mod loop_runner;

pub(crate) use bootstrap::{build_app, init_tracing, BootstrapError, Startup};
pub(crate) use loop_runner::run;
