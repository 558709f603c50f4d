//! ACE Playbook Model
//!
//! In-memory representation of the guidance playbook an assistant carries
//! across sessions.
//!
//! # Core Concepts
//!
//! - [`Document`]: Every canonical section mapped to its ordered entries
//! - [`Section`]: Closed set of five canonical sections with id slugs
//! - [`Entry`]: Guidance text with a unique id and helpful/harmful counters
//! - [`generate_id`]: Section-scoped `{slug}-{NNN}` identifier generation
//!
//! # Example
//!
//! ```rust
//! use ace_playbook::{Document, Entry, Section};
//!
//! let mut doc = Document::new();
//! let id = doc.next_id(Section::Patterns);
//! doc.insert(Section::Patterns, Entry::new(id, "prefer small commits"))?;
//!
//! assert_eq!(doc.section_of("pat-001"), Some(Section::Patterns));
//! # Ok::<(), ace_playbook::PlaybookError>(())
//! ```

#![warn(unreachable_pub)]
#![warn(missing_docs)]

mod document;
mod entry;
mod error;
mod id;
mod render;
mod section;

pub use document::{Document, Location};
pub use entry::Entry;
pub use error::PlaybookError;
pub use id::{generate_id, parse_suffix, SUFFIX_WIDTH};
pub use render::{preview, render, render_entry, DEFAULT_PREVIEW_CHARS};
pub use section::{Section, SectionLabel};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
