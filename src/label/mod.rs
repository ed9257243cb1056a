//! Label primitives: sensitivities, categories, identifiers, levels and
//! contexts.
//!
//! Every type here is constructed only from validated input. The textual
//! forms are parsed by [`crate::gate`]; these types never parse on their own
//! except through `FromStr` impls that delegate to the gate.

pub mod category;
pub mod context;
pub mod ident;
pub mod level;
pub mod sensitivity;

pub use category::{Category, CategorySet, CATEGORY_WORDS, MAX_CATEGORIES};
pub use context::SecurityContext;
pub use ident::{SelinuxRole, SelinuxType, SelinuxUser};
pub use level::{MlsLevel, MlsRange};
pub use sensitivity::{SensitivityLevel, MAX_SENSITIVITY};
