use clap::Parser;
use discute::cli::{
    handle_add, handle_chat, handle_coach, handle_import, handle_info, handle_init, handle_levels,
    handle_programs, handle_render, handle_serve, handle_snapshot, handle_update, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // stdout carries command output and the MCP transport
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let config = cli.config();

    let result = match cli.command {
        Commands::Init => handle_init(&config),
        Commands::Levels { json } => handle_levels(&config, json),
        Commands::Programs { level, json } => handle_programs(&config, level, json),
        Commands::Info { name, json } => handle_info(&config, name, json),
        Commands::Render {
            name,
            vars,
            lenient,
        } => handle_render(&config, name, vars, lenient),
        Commands::Coach { level, vars } => handle_coach(&config, level, vars),
        Commands::Add {
            name,
            level,
            description,
            tags,
            difficulty,
            template,
            stdin,
            json,
        } => handle_add(
            &config,
            name,
            level,
            description,
            tags,
            difficulty,
            template,
            stdin,
            json,
        ),
        Commands::Update {
            name,
            template,
            stdin,
        } => handle_update(&config, name, template, stdin),
        Commands::Import { file } => handle_import(&config, file),
        Commands::Snapshot { out } => handle_snapshot(&config, out),
        Commands::Chat {
            audio,
            level,
            program,
            context,
            review,
            json,
        } => handle_chat(&config, audio, level, program, context, review, json),
        Commands::Serve => handle_serve(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
