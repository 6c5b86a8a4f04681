use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use pagechain::commands::{self, transitions::Outcome, OutputFormat};
use pagechain::config::{self, loader, models::StoreModel, resolve_store_path, RealEnv};
use pagechain::markov::Node;
use pagechain::store::{self, NewHit, SqliteStore};

#[derive(Parser)]
#[command(name = "pagechain", version, about = "Page transition Markov chains from visit logs")]
struct Cli {
    /// Config path (defaults to <home>/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a page view
    Record {
        /// Page number (0 is reserved for the exit state)
        page: Node,
        /// Session to file the hit under; a new one is generated if omitted
        #[arg(long)]
        session_id: Option<Uuid>,
        /// Client address
        #[arg(long)]
        ip: Option<String>,
        /// Client port
        #[arg(long)]
        socket: Option<u16>,
        /// Request header as name=value, repeatable
        #[arg(long = "header")]
        headers: Vec<String>,
    },
    /// Display the page transitions graph
    Transitions {
        /// Show transitions for the given session only
        #[arg(long)]
        session_id: Option<Uuid>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List sessions, most recently active first
    Sessions {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pagechain=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let env = RealEnv;
    let home = config::pagechain_home(&env);

    let cfg = match loader::load(&env, cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    match cli.command {
        Commands::Record {
            page,
            session_id,
            ip,
            socket,
            headers,
        } => {
            if cfg.store.model != StoreModel::Actual {
                anyhow::bail!("recording hits needs store.model = actual");
            }
            let store = SqliteStore::open(&resolve_store_path(&cfg.store.path, &home))?;
            store.initialize()?;

            let hit = NewHit {
                page_no: page,
                session_id: session_id.unwrap_or_else(Uuid::new_v4),
                ip,
                socket,
                headers: parse_headers(&headers)?,
            };
            println!("{}", commands::record::run(&store, &hit)?);
        }
        Commands::Transitions { session_id, format } => {
            let source = store::open_source(&cfg.store, &home)?;
            match commands::transitions::run(source.as_ref(), session_id, format)? {
                Outcome::Report(report) => print!("{report}"),
                Outcome::UnknownSession(id) => {
                    eprintln!("Unknown session {id}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Sessions { format } => {
            let source = store::open_source(&cfg.store, &home)?;
            print!("{}", commands::sessions::run(source.as_ref(), format)?);
        }
    }

    Ok(())
}

fn parse_headers(raw: &[String]) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    for item in raw {
        let (key, value) = item.split_once('=').ok_or_else(|| {
            anyhow::anyhow!("invalid --header format '{}': expected name=value", item)
        })?;
        map.insert(key.to_string(), value.to_string());
    }
    Ok(map)
}
