//! UI layer for desktop GUI: the note list, detail pane, and modal prompts.

pub mod app;

pub use app::NotesApp;
