//! # Briefly Architecture
//!
//! Briefly is the client side of a document-summarization service: users
//! authenticate, upload PDFs for summaries, browse their history, keep notes
//! and pick a subscription tier. It is a **UI-agnostic client library** with a
//! command-line client on top; the same core could back a web or desktop UI.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns form states, submissions and the note cache         │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per user flow                                 │
//! │  - validate -> submit -> apply side effects                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Ports                                                      │
//! │  - SessionStore: file (production), in-memory (testing)     │
//! │  - Backend: reqwest (production), in-memory fake (testing)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Form Engine
//!
//! The part with real rules is shared by every flow:
//!
//! 1. [`validate`]: one pure validator per field kind, each returning the
//!    first rule it breaks.
//! 2. [`form`]: runs a form's validators into a field to error map and picks
//!    the primary error by field priority.
//! 3. [`submit`]: `Idle -> Submitting -> Succeeded | Failed`, with a
//!    re-entrancy guard so a form never has two requests in flight.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments, returns
//! `Result<CmdResult>`, never writes to stdout/stderr and never exits the
//! process. Network and storage go through the two ports only.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Flow logic for each command
//! - [`validate`], [`form`], [`submit`]: The form engine
//! - [`session`]: Session value and storage port
//! - [`nav`]: Navigation state and the session polling watcher
//! - [`filter`]: Note length filter
//! - [`backend`]: Network port and its implementations
//! - [`model`]: Records exchanged with the backend
//! - [`config`]: Client configuration
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod backend;
pub mod commands;
pub mod config;
pub mod error;
pub mod filter;
pub mod form;
pub mod model;
pub mod nav;
pub mod session;
pub mod submit;
pub mod validate;
