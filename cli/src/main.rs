use clap::{Parser, Subcommand};
use report_view_cli::CliContext;
use report_view_cli::commands;
use report_view_cli::logging;
use report_view_cli::readline;
use report_view_core::{ContractConfig, load_contract};
use std::io::Write;
use std::path::PathBuf;

/// Drive the report view controller against a report layout
#[derive(Parser)]
#[command(version, about = "report-view")]
struct Args {
    /// Report layout (TOML) to load at startup
    #[arg(short, long)]
    layout: Option<PathBuf>,
    /// Markup contract (TOML); defaults to the stock report markup
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    logging::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_contract(path).map_err(|e| e.to_string())?,
        None => ContractConfig::default(),
    };
    let ctx = CliContext::new(config);

    if let Some(path) = &args.layout {
        if let Err(err) = commands::load(&path.to_string_lossy(), &ctx).await {
            println!("{err}");
        }
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "cli")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Load {
        #[arg(short, long)]
        path: String,
    },
    Containers,
    Show {
        #[arg(short, long)]
        container: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    Info {
        #[arg(short, long, default_value_t = 0)]
        container: usize,
    },
    Table {
        #[arg(short, long, default_value_t = 0)]
        container: usize,
    },
    Toggle {
        #[arg(short, long, default_value_t = 0)]
        container: usize,
        #[arg(short, long)]
        label: Option<usize>,
        #[arg(short, long)]
        pane: Option<String>,
    },
    Version {
        #[arg(short, long, default_value_t = 0)]
        container: usize,
        variant: String,
    },
    View {
        #[arg(short, long, default_value_t = 0)]
        container: usize,
        value: String,
    },
    Bindings,
    Dump,
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "report-view".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load { path }) => commands::load(path, ctx).await?,
        Some(Commands::Containers) => commands::list_containers(ctx).await?,
        Some(Commands::Show { container, json }) => commands::show(*container, *json, ctx).await?,
        Some(Commands::Info { container }) => commands::info(*container, ctx).await?,
        Some(Commands::Table { container }) => commands::table(*container, ctx).await?,
        Some(Commands::Toggle {
            container,
            label,
            pane,
        }) => commands::toggle(*container, *label, pane.as_deref(), ctx).await?,
        Some(Commands::Version { container, variant }) => {
            commands::version(*container, variant, ctx).await?
        }
        Some(Commands::View { container, value }) => {
            commands::view(*container, value, ctx).await?
        }
        Some(Commands::Bindings) => commands::list_bindings(ctx).await?,
        Some(Commands::Dump) => commands::dump(ctx).await?,
        Some(Commands::Config) => commands::show_config(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit();
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Commands {
        let mut args = shlex::split(line).unwrap();
        args.insert(0, "report-view".to_string());
        Cli::try_parse_from(args).unwrap().command.unwrap()
    }

    #[test]
    fn test_parse_toggle_by_pane() {
        match parse("toggle -c 2 --pane 'info 3'") {
            Commands::Toggle {
                container,
                label,
                pane,
            } => {
                assert_eq!(container, 2);
                assert_eq!(label, None);
                assert_eq!(pane.as_deref(), Some("info 3"));
            }
            _ => panic!("expected toggle"),
        }
    }

    #[test]
    fn test_parse_version_defaults_to_first_container() {
        match parse("version v4.1") {
            Commands::Version { container, variant } => {
                assert_eq!(container, 0);
                assert_eq!(variant, "v4.1");
            }
            _ => panic!("expected version"),
        }
    }

    #[tokio::test]
    async fn test_respond_exit_and_bad_quoting() {
        let ctx = CliContext::new(ContractConfig::default());
        assert_eq!(respond("exit", &ctx).await, Ok(true));
        assert!(respond("show 'unterminated", &ctx).await.is_err());
        assert!(respond("frobnicate", &ctx).await.is_err());
    }
}
