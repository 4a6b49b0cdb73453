//! The 9×9 button grid: persisted cells, named configurations, the per-strip
//! editor and press handling

pub mod cell;
pub mod document;
pub mod editor;
pub mod palette;
pub mod press;
pub mod store;

pub use cell::GridCell;
pub use document::Grid;
pub use editor::{build_command_list, commit_from_editor, load_into_editor, ArgSlot, EditorForm, StripTab};
pub use press::{apply_on_press, press_button, ApplyContext, ApplyReport};
pub use store::ConfigStore;
