//! Validated SELinux/MLS label substrate.
//!
//! Turns raw label bytes into typed, validated security contexts, translates
//! category sets into human-readable markings, and answers lattice dominance
//! questions. Every label string is parsed by two independent parsers and
//! accepted only when they agree.
//!
//! - [`label`]: sensitivities, categories, identifiers, levels, contexts
//! - [`gate`]: the dual-path parser
//! - [`xattr`]: reading labels from open file handles
//! - [`translate`]: setrans vernacular markings
//! - [`lattice`]: dominance, bounds and range membership
//!
//! See `DESIGN.md` for the architecture notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;

pub mod gate;
pub mod label;
pub mod lattice;

pub mod translate;
pub mod xattr;

pub use error::{IdentError, LabelError};
pub use label::{
    Category, CategorySet, MlsLevel, MlsRange, SecurityContext, SelinuxRole, SelinuxType,
    SelinuxUser, SensitivityLevel,
};
pub use translate::{TranslationEntry, TranslationError, TranslationTable};
pub use xattr::{XattrError, XattrReader};
