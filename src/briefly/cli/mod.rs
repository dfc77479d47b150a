//! # CLI Behavior
//!
//! This is **one possible UI client** for briefly, standing in for the pages
//! of the web client. It is the only place that knows about terminal I/O,
//! exit codes and output formatting.
//!
//! ## Forms on the command line
//!
//! Every form field is an option that defaults to an empty string. Leaving one
//! out is the same as leaving an input box empty: the form validators report
//! it, every inline error is listed, and no request is made.
//!
//! ## Naked Execution (`briefly`)
//!
//! Running `briefly` without a command prints `briefly status`: who is logged
//! in and which screens the navigation offers.
//!
//! ## Redirects
//!
//! Flows that would navigate after a success message (login, registration,
//! password reset) print the next command to run instead of waiting.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup and per-command handlers
//! - `print`: Output formatting (messages, lists, navigation)
//! - `setup`: Argument parsing via clap

mod commands;
mod print;
pub mod setup;

pub use commands::run;
