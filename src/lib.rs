pub mod backing;
pub mod cli;
pub mod config;
pub mod draft;
pub mod engine;
pub mod headers;
pub mod ids;
pub mod logging;
pub mod mvi;
pub mod operation;
pub mod selection;
pub mod validation;
