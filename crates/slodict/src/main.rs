use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use sloleks_db::{ExplanatoryDictionary, Lexicon, LoadMode};
use sloleks_inflect::LayoutTable;
use sloleks_types::Vocabulary;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use slodict::{AppState, Catalog, EntrySink, HtmlDirSink, JsonLinesSink, router};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";

#[derive(Parser)]
#[command(name = "slodict")]
#[command(about = "Sloleks inflection tables as HTML")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the page of one lemma.
    Render {
        lemma: String,
        #[command(flatten)]
        sources: Sources,
        /// Write to a file instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write every lemma to a sink.
    Export {
        #[command(flatten)]
        sources: Sources,
        #[arg(long, value_enum, default_value_t = Format::Html)]
        format: Format,
        /// Output directory for `html`, file for `json-lines` (stdout if absent).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Serve pages and tables over HTTP.
    Serve {
        #[command(flatten)]
        sources: Sources,
        #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    JsonLines,
}

#[derive(Args)]
struct Sources {
    /// Sloleks XML file or directory of XML files.
    #[arg(long, env = "SLODICT_LEXICON")]
    lexicon: PathBuf,
    /// Saved SSKJ page or directory of pages.
    #[arg(long, env = "SLODICT_SSKJ")]
    sskj: Option<PathBuf>,
    /// JSON axis layouts replacing the built-in ones.
    #[arg(long, env = "SLODICT_LAYOUTS")]
    layouts: Option<PathBuf>,
    #[arg(long, env = "SLODICT_LOAD_MODE", default_value = "mmap")]
    load_mode: LoadMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            lemma,
            sources,
            out,
        } => {
            let catalog = load_catalog(&sources)?;
            let Some(page) = catalog.page(&lemma) else {
                bail!("no entry for lemma {lemma:?}");
            };
            match out {
                Some(path) => {
                    fs::write(&path, page).with_context(|| format!("write {}", path.display()))?
                }
                None => io::stdout().write_all(page.as_bytes())?,
            }
        }
        Commands::Export {
            sources,
            format,
            out,
        } => {
            let catalog = load_catalog(&sources)?;
            let mut sink = open_sink(format, out)?;
            catalog.export(sink.as_mut())?;
        }
        Commands::Serve {
            sources,
            host,
            port,
        } => {
            let catalog = load_catalog(&sources)?;
            serve(catalog, &host, port).await?;
        }
    }

    Ok(())
}

async fn serve(catalog: Catalog, host: &str, port: u16) -> Result<()> {
    info!("binding to {}:{}", host, port);
    let state = AppState {
        catalog: Arc::new(catalog),
    };
    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

fn load_catalog(sources: &Sources) -> Result<Catalog> {
    info!(
        "using lexicon at {} (mode: {:?})",
        sources.lexicon.display(),
        sources.load_mode
    );
    let start = Instant::now();
    let lexicon = Lexicon::load_with_mode(&sources.lexicon, sources.load_mode)?;
    info!(
        "lexicon loaded in {} ms: {} entries, {} lemmas",
        start.elapsed().as_millis(),
        lexicon.entry_count(),
        lexicon.lemma_count()
    );

    let layouts = match &sources.layouts {
        Some(path) => {
            let json =
                fs::read_to_string(path).with_context(|| format!("open {}", path.display()))?;
            LayoutTable::from_json(&json).with_context(|| format!("parse {}", path.display()))?
        }
        None => LayoutTable::standard(Vocabulary::standard()),
    };
    let unhandled = layouts.unhandled();
    if !unhandled.is_empty() {
        warn!("no layouts for {:?}", unhandled);
    }

    let mut catalog = Catalog::new(lexicon, layouts);
    if let Some(path) = &sources.sskj {
        catalog = catalog.with_definitions(ExplanatoryDictionary::load(path)?);
    }
    Ok(catalog)
}

fn open_sink(format: Format, out: Option<PathBuf>) -> Result<Box<dyn EntrySink>> {
    let sink: Box<dyn EntrySink> = match (format, out) {
        (Format::Html, Some(dir)) => Box::new(HtmlDirSink::create(dir)?),
        (Format::Html, None) => bail!("--out is required for html export"),
        (Format::JsonLines, Some(path)) => {
            let file = File::create(&path).with_context(|| format!("create {}", path.display()))?;
            Box::new(JsonLinesSink::new(BufWriter::new(file)))
        }
        (Format::JsonLines, None) => Box::new(JsonLinesSink::new(BufWriter::new(io::stdout()))),
    };
    Ok(sink)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}
