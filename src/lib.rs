//! # frontdesk
//!
//! Human-in-the-loop receptionist engine: answer caller questions from a
//! learned knowledge base, escalate unknowns to a human supervisor, and fold
//! supervisor answers back into the knowledge base so the next occurrence is
//! answered automatically.
//!
//! ## Architecture
//!
//! - **Fuzzy matcher** (`matcher`): normalization + Ratcliff/Obershelp
//!   similarity over character sequences, 0.80 threshold
//! - **Stores** (`store`): redb-backed knowledge base and help-request
//!   persistence with a single Pending→Resolved transition
//! - **Engine** (`engine`): the resolve/escalate/write-back workflow,
//!   constructed with explicit store handles
//!
//! Voice transport, speech-to-text, HTTP routing, and dashboard rendering
//! live outside this crate; they consume [`engine::Engine`] as a library.
//!
//! ## Library usage
//!
//! ```no_run
//! use frontdesk::engine::{Engine, EngineConfig, Resolution};
//!
//! let engine = Engine::new(EngineConfig::default()).unwrap();
//! match engine.resolve_question("caller-1", "Do you do nails?", true).unwrap() {
//!     Resolution::Answered { answer, .. } => println!("{answer}"),
//!     Resolution::Escalated { request_id } => println!("escalated: {request_id}"),
//!     Resolution::Rejected { .. } | Resolution::ClarificationNeeded => {}
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod paths;
pub mod store;
