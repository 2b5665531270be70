pub mod actions;
pub mod commands;
pub mod inspector;
pub mod session;

pub use actions::{Gesture, MenuItem, dispatch};
pub use commands::{Command, CommandStack};
pub use session::{EditorSession, TreeMutation};
