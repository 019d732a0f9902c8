//! Configuration structures for one build pipeline run.
//!
//! [`BuildConfiguration`] replaces scattered CI input lookups: it is built
//! and validated once, then handed to every stage.

mod android;
mod builder;
mod core;
mod editor;
mod ios;
mod target;

pub use android::{AndroidSigning, KeystoreSource};
pub use builder::SettingsBuilder;
pub(crate) use builder::non_empty;
pub use core::BuildConfiguration;
pub use editor::EditorSettings;
pub use ios::{ExportPolicy, IosSigning};
pub use target::{BuildTarget, Configuration};
