// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Alignment-structure coordination for protein exploration front-ends.
//!
//! msalink cross-links a multiple-sequence alignment of homologous chains
//! with an external 3D structure viewer. Hovering an alignment column
//! previews a residue window on every visible chain; clicking pins it.
//! Chains are fetched lazily from a REST backend the first time they are
//! shown.
//!
//! # Key entry points
//!
//! - [`session::Session`] - one controller per reference chain; all user
//!   actions go through [`session::Session::execute`]
//! - [`alignment::AlignmentModel`] - aligned sequences and variant columns
//! - [`selection::SelectionCoordinator`] - hover/lock window state
//! - [`registry::ChainRegistry`] - lazily loaded chains with coalesced
//!   background fetches
//! - [`sync::ViewSync`] - diffs coordination state into viewer commands
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Everything is driven from the caller's thread. Chain fetches run on a
//! single background thread and come back over a channel; they are applied
//! only when the session is pumped, which then reconciles the external
//! [`sync::RenderSurface`] with a minimal list of commands.

pub mod alignment;
pub mod error;
pub mod input;
pub mod options;
pub mod registry;
pub mod selection;
pub mod session;
pub mod source;
pub mod sync;
pub mod tracks;
