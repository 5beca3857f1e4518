use anyhow::{Context, Result};
use arbol::cli::{Cli, OutputFormat};
use arbol::config::ViewConfig;
use arbol::context::ViewContext;
use arbol::html_output::HtmlOutput;
use arbol::json_output::JsonOutput;
use arbol::provider::{CallTreeProvider, FileProvider, HttpProvider};
use arbol::session::TreeSession;
use arbol::text_output::TextOutput;
use arbol::view::{RecordingSink, VisibleRow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Configuration file values, overridden by threshold flags
fn load_config(args: &Cli) -> Result<ViewConfig> {
    let config = match &args.config {
        Some(path) => ViewConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewConfig::default(),
    };
    let config = config.with_thresholds(args.root_threshold, args.threshold);
    config.validate()?;
    Ok(config)
}

fn render(args: &Cli, context: &ViewContext, rows: Vec<VisibleRow>) -> Result<String> {
    match args.format {
        OutputFormat::Text => Ok(TextOutput::new(rows).with_severity(args.severity).to_text()),
        OutputFormat::Json => {
            let mut json = JsonOutput::new(context, rows).to_json()?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Html => {
            let title = format!("Call tree: {}", context.file().unwrap_or("(none)"));
            Ok(HtmlOutput::new(&title, rows).to_html())
        }
    }
}

/// Run every requested action against one provider
async fn run<P: CallTreeProvider>(provider: P, args: &Cli, config: &ViewConfig) -> Result<()> {
    let mut session = TreeSession::new(provider, config, RecordingSink::new());

    if let Some(path) = &args.file {
        session
            .open(path)
            .await
            .with_context(|| format!("Failed to open {}", path))?;
    } else if args.refresh {
        session
            .refresh()
            .await
            .context("Failed to refresh the active trace file")?;
    }

    if args.recent {
        for file in session.recent_files().await? {
            println!("{}", file.path);
        }
    }

    if args.active {
        let active = session.provider().active_file().await?;
        println!("{}", active.path);
    }

    // Each id is one user action; a failure leaves the node collapsed
    for id in &args.expand {
        if let Err(e) = session.expand(id).await {
            eprintln!("Cannot expand {}: {}", id, e);
        }
    }

    if args.opens_tree() {
        let rows = session.rows();
        print!("{}", render(args, session.controller().context(), rows)?);
    }

    if args.shutdown {
        session
            .shutdown()
            .await
            .context("Failed to shut down the backend")?;
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    if !args.expand.is_empty() && !args.opens_tree() {
        anyhow::bail!("--expand needs a call tree. Use --file PATH or --refresh.");
    }
    if !(args.opens_tree() || args.recent || args.active || args.shutdown) {
        anyhow::bail!("Nothing to do. Usage: arbol --file TRACE [--expand ID]... or arbol --server URL --refresh");
    }

    let config = load_config(&args)?;

    match &args.server {
        Some(url) => {
            let provider = HttpProvider::new(url)
                .with_context(|| format!("Invalid backend URL {}", url))?;
            run(provider, &args, &config).await
        }
        None => run(FileProvider::from_config(&config), &args, &config).await,
    }
}
