/// Data model for the plugin catalog.
///
/// Re-exports the catalog record and its classification tags.
pub mod record;

pub use record::{Bitness, PluginFormat, PluginRecord};
