//! clustermatrix - Kubernetes distribution CI test matrix builder
//!
//! ## Commands
//!
//! - `build`: fetch the version catalog, apply the policy file, print the matrix
//! - `catalog`: fetch and print the raw version catalog
//! - `latest`: highest of the given versions
//! - `buckets`: major.minor lines of the given versions, newest first
//! - `pick`: highest version per major.minor line

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clustermatrix_catalog::{
    CatalogConfig, CatalogSource, FileCatalogSource, HttpCatalogSource, DEFAULT_CATALOG_URL,
    DEFAULT_TIMEOUT_SECS,
};
use clustermatrix_core::{
    build_matrix, latest_overall, latest_per_bucket, matrix_digest, top_n_major_minors,
    MajorMinorKey, MatrixConfig, MatrixEntry,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "clustermatrix")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build Kubernetes distribution CI test matrices", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the test matrix from the catalog and a policy file
    Build {
        /// Policy file (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        policies: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// Fail when any distribution cannot be evaluated
        #[arg(long)]
        strict: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Write the matrix to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fetch and print the version catalog
    Catalog {
        #[command(flatten)]
        source: SourceArgs,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the highest version
    Latest {
        /// Raw version strings
        #[arg(required = true)]
        versions: Vec<String>,
    },

    /// Print major.minor lines, newest first
    Buckets {
        /// Raw version strings
        versions: Vec<String>,

        /// Keep only the N newest lines
        #[arg(long)]
        top: Option<usize>,
    },

    /// Print the highest version per major.minor line
    Pick {
        /// Raw version strings
        versions: Vec<String>,

        /// Restrict to these major.minor lines (repeatable)
        #[arg(short, long = "bucket")]
        buckets: Vec<String>,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Read the catalog from a local JSON file instead of the API
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Catalog API endpoint
    #[arg(long, env = "CLUSTERMATRIX_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    catalog_url: String,

    /// Catalog API token
    #[arg(long, env = "CLUSTERMATRIX_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Catalog request timeout in seconds
    #[arg(long, env = "CLUSTERMATRIX_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl SourceArgs {
    fn into_source(self) -> Result<Box<dyn CatalogSource>> {
        if let Some(path) = self.catalog {
            return Ok(Box::new(FileCatalogSource::new(path)));
        }

        let mut config =
            CatalogConfig::new(&self.catalog_url).with_timeout_secs(self.timeout_secs);
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_token(token);
        }
        let source = HttpCatalogSource::new(config).context("Failed to create catalog client")?;
        Ok(Box::new(source))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    clustermatrix_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Build {
            policies,
            source,
            strict,
            pretty,
            output,
        } => {
            let source = source.into_source()?;
            let rendered = cmd_build(&policies, source.as_ref(), strict, pretty).await?;
            write_output(&rendered, output.as_deref())
        }
        Commands::Catalog { source, pretty } => {
            let source = source.into_source()?;
            let catalog = source
                .fetch()
                .await
                .context("Failed to fetch cluster version catalog")?;
            write_output(&render(&catalog, pretty)?, None)
        }
        Commands::Latest { versions } => cmd_latest(&versions),
        Commands::Buckets { versions, top } => cmd_buckets(&versions, top),
        Commands::Pick { versions, buckets } => cmd_pick(&versions, &buckets),
    }
}

/// Fetch, evaluate and render the matrix as JSON.
async fn cmd_build(
    policies: &Path,
    source: &dyn CatalogSource,
    strict: bool,
    pretty: bool,
) -> Result<String> {
    let config = MatrixConfig::load(policies)
        .with_context(|| format!("Failed to load policies from {}", policies.display()))?;
    info!(
        distributions = config.distributions.len(),
        "Loaded distribution policies"
    );

    let catalog = source
        .fetch()
        .await
        .context("Failed to fetch cluster version catalog")?;

    let outcome = build_matrix(&catalog, &config);
    let entries: Vec<MatrixEntry> = if strict {
        outcome
            .into_strict()
            .context("Matrix build aborted in strict mode")?
    } else {
        outcome.entries
    };

    info!(
        entries = entries.len(),
        digest = %matrix_digest(&entries),
        "Test matrix ready"
    );

    render(&entries, pretty)
}

/// Print the highest version
fn cmd_latest(versions: &[String]) -> Result<()> {
    let latest = latest_overall(versions)?
        .ok_or_else(|| anyhow::anyhow!("No versions given"))?;
    println!("{}", latest);
    Ok(())
}

/// Print major.minor lines, newest first
fn cmd_buckets(versions: &[String], top: Option<usize>) -> Result<()> {
    let buckets = top_n_major_minors(versions, top)?;
    write_output(&render(&buckets, false)?, None)
}

/// Print the highest version per major.minor line
fn cmd_pick(versions: &[String], buckets: &[String]) -> Result<()> {
    let allowed = buckets
        .iter()
        .map(|b| b.parse::<MajorMinorKey>())
        .collect::<clustermatrix_core::Result<Vec<_>>>()?;
    let picked = latest_per_bucket(versions, Some(allowed.as_slice()))?;
    write_output(&render(&picked, true)?, None)
}

fn render<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn write_output(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote test matrix");
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
