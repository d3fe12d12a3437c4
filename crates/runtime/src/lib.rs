mod error;
mod renderer;
mod terminal;

pub use error::{RuntimeError, RuntimeResult};
pub use renderer::{MAX_SETTLE_FRAMES, RenderSession, run};
pub use terminal::{ManagedTerminal, restore_terminal, setup_terminal};
