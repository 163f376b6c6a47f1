mod level;
mod program;

pub use level::{CefrLevel, CoachBand};
pub use program::{NewProgram, ProgramInfo, PromptProgram, DEFAULT_DIFFICULTY};
