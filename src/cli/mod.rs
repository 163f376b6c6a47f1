mod commands;
mod handlers;

pub use commands::{parse_var, Cli, Commands};
pub use handlers::{
    handle_add, handle_chat, handle_coach, handle_import, handle_info, handle_init, handle_levels,
    handle_programs, handle_render, handle_serve, handle_snapshot, handle_update,
};
