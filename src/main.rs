use clap::Parser;
use securevault::cli::commands::add::AddArgs;
use securevault::cli::commands::update::UpdateArgs;
use securevault::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Login {
            ref email,
            ref proof,
        } => securevault::cli::commands::login::execute(&cli, email, proof.as_deref()),
        Commands::Logout => securevault::cli::commands::logout::execute(&cli),
        Commands::Status => securevault::cli::commands::status::execute(&cli),
        Commands::Add {
            ref name,
            ref username,
            ref secret,
            ref url,
            ref notes,
            ref category,
        } => securevault::cli::commands::add::execute(
            &cli,
            &AddArgs {
                name,
                username,
                secret: secret.as_deref(),
                url: url.as_deref(),
                notes: notes.as_deref(),
                category: category.as_deref(),
            },
        ),
        Commands::List { ref query } => {
            securevault::cli::commands::list::execute(&cli, query.as_deref())
        }
        Commands::Show { ref id, reveal } => {
            securevault::cli::commands::show::execute(&cli, id, reveal)
        }
        Commands::Update {
            ref id,
            ref name,
            ref username,
            ref secret,
            rotate_secret,
            ref url,
            ref notes,
            ref category,
        } => securevault::cli::commands::update::execute(
            &cli,
            id,
            UpdateArgs {
                name: name.clone(),
                username: username.clone(),
                secret: secret.clone(),
                rotate_secret,
                url: url.clone(),
                notes: notes.clone(),
                category: category.clone(),
            },
        ),
        Commands::Remove { ref id, force } => {
            securevault::cli::commands::remove::execute(&cli, id, force)
        }
        Commands::Export { ref output } => {
            securevault::cli::commands::export::execute(&cli, output.as_deref())
        }
        Commands::Completions { ref shell } => {
            securevault::cli::commands::completions::execute(shell)
        }
    };

    if let Err(e) = result {
        securevault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
