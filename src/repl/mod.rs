//! Interactive session: server menu, command loop, reply rendering

pub mod editor;
pub mod engine;
pub mod render;
pub mod script;
pub mod selection;

pub use editor::Terminal;
pub use engine::{parse_line, CommandEngine, Dispatch, EngineState, LineReader, PROMPT};
pub use render::{render, ReplyShape};
pub use script::run_script;
pub use selection::{choose_server, selection_index};
