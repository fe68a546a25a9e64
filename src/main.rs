use clap::Parser;
use stegpass::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => stegpass::cli::commands::init::execute(&cli),
        Commands::Add {
            ref uri,
            ref username,
        } => stegpass::cli::commands::add::execute(&cli, uri, username),
        Commands::Gen {
            ref uri,
            ref username,
            length,
        } => stegpass::cli::commands::gen::execute(&cli, uri, username, length),
        Commands::Query {
            ref uri,
            ref username,
            show,
        } => stegpass::cli::commands::query::execute(&cli, uri.as_deref(), username.as_deref(), show),
        Commands::Edit { id } => stegpass::cli::commands::edit::execute(&cli, id),
        Commands::Rem { id, force } => stegpass::cli::commands::rem::execute(&cli, id, force),
        Commands::Hide {
            ref cover,
            ref output,
        } => stegpass::cli::commands::hide::execute(&cli, cover, output.as_deref()),
        Commands::Reveal {
            ref image,
            ref output,
        } => stegpass::cli::commands::reveal::execute(&cli, image, output),
        #[cfg(feature = "audit-log")]
        Commands::Audit { last } => stegpass::cli::commands::audit_cmd::execute(&cli, last),
        Commands::Completions { ref shell } => stegpass::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        stegpass::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
