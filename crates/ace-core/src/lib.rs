//! ACE Core Pipeline
//!
//! Ties the playbook model and the curation engine into the per-session
//! update: ratings, atomic curation, optional dedup, then pruning.
//!
//! # Example
//!
//! ```rust
//! use ace_core::{run_session_update, AceConfig, SessionUpdate};
//! use ace_curator::NullSink;
//! use ace_playbook::Document;
//!
//! let update = SessionUpdate::from_json_str(
//!     r#"{"operations": [{"type": "ADD", "text": "pin the toolchain"}]}"#,
//! )?;
//! let outcome = run_session_update(Document::new(), &update, &AceConfig::default(), NullSink)?;
//!
//! assert!(outcome.document.contains_id("oth-001"));
//! # Ok::<(), ace_core::AceError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod error;
mod session;

pub use config::AceConfig;
pub use error::AceError;
pub use session::{
    run_session_update, run_session_update_with, CurationStage, DedupStage, SessionOutcome,
    SessionUpdate,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
