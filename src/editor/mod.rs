// Module editor - Interactive grid editing
//
// Keys are translated into input actions through per-state dispatch tables,
// applied by the GridEditor state machine, and the Session runs the control
// loop that also follows playback.

pub mod action;
pub mod error;
pub mod line_input;
pub mod session;
pub mod state;

pub use action::{Direction, InputAction, InputContext};
pub use error::{EditError, SessionError};
pub use line_input::{LineInput, parse_cell};
pub use session::{Session, SessionEvent};
pub use state::{GridEditor, Mode, Outcome};
