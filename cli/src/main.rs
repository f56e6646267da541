#![allow(
    clippy::print_stderr,
    reason = "The continuation token is reported on stderr"
)]
use crate::cli::{Args, Command};
use anyhow::{bail, Context};
use clap::Parser;
use oxrdfio::{RdfFormat, RdfParser};
use rdf_sage_engine::{QueryPage, SageConfig, SageDataset, UnionMode};
use rdf_sage_physical::ContinuationToken;
use rdf_sage_storage::MemPatternSource;
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, stdin, stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    let matches = Args::parse();
    match matches.command {
        Command::Query {
            files,
            format,
            lenient,
            query,
            query_file,
            quota_ms,
            max_results,
            next,
            all,
            randomized_union,
            explain,
        } => {
            let source = load_source(&files, format.as_deref(), lenient)?;
            let query = match (query, query_file) {
                (Some(query), _) => query,
                (None, Some(file)) => fs::read_to_string(&file).with_context(|| {
                    format!("Not able to read the query file {}", file.display())
                })?,
                (None, None) => bail!("Either --query or --query-file must be set"),
            };

            let union_mode = if randomized_union {
                UnionMode::Randomized
            } else {
                UnionMode::Ordered
            };
            let config = SageConfig::default()
                .with_quota(Duration::from_millis(quota_ms))
                .with_max_results(max_results)
                .with_union_mode(union_mode);
            let dataset = SageDataset::new(Arc::new(source), config);
            let next = next.map(ContinuationToken::from);

            if explain {
                let plan = dataset.explain(&query, next.as_ref())?;
                stdout().lock().write_all(plan.as_bytes())?;
                return Ok(());
            }
            evaluate(&dataset, &query, next, all).await
        }
    }
}

async fn evaluate(
    dataset: &SageDataset,
    query: &str,
    mut next: Option<ContinuationToken>,
    all: bool,
) -> anyhow::Result<()> {
    let mut stdout = stdout().lock();
    loop {
        let page = dataset.query_cooperative(query, next.as_ref()).await?;
        write_page(&mut stdout, &page)?;
        tracing::info!(
            "{} solutions in {} steps ({}), import {}us, export {}us",
            page.solutions.len(),
            page.stats.steps,
            page.stats.state,
            page.stats.import_time.as_micros(),
            page.stats.export_time.as_micros()
        );

        match page.next {
            Some(token) if all => next = Some(token),
            Some(token) => {
                stdout.flush()?;
                eprintln!("{token}");
                return Ok(());
            }
            None => return Ok(stdout.flush()?),
        }
    }
}

/// Writes one solution per line, bindings separated by tabs.
fn write_page(writer: &mut impl Write, page: &QueryPage) -> io::Result<()> {
    for solution in &page.solutions {
        for (i, (variable, term)) in solution.iter().enumerate() {
            if i > 0 {
                writer.write_all(b"\t")?;
            }
            write!(writer, "{variable}={term}")?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

fn load_source(
    files: &[PathBuf],
    format: Option<&str>,
    lenient: bool,
) -> anyhow::Result<MemPatternSource> {
    let source = MemPatternSource::new();
    let format = format.map(rdf_format_from_name).transpose()?;
    if files.is_empty() {
        let Some(format) = format else {
            bail!("The --format option must be set when reading from stdin")
        };
        source.load(RdfParser::from_format(format), stdin().lock(), lenient)?;
    }
    for file in files {
        let format = match format {
            Some(format) => format,
            None => rdf_format_from_path(file)?,
        };
        let reader = File::open(file)
            .with_context(|| format!("Not able to open the data file {}", file.display()))?;
        let count = source.load(RdfParser::from_format(format), reader, lenient)?;
        tracing::debug!("Loaded {count} quads from {}", file.display());
    }
    Ok(source)
}

fn rdf_format_from_path(path: &Path) -> anyhow::Result<RdfFormat> {
    let Some(ext) = path.extension().and_then(OsStr::to_str) else {
        bail!(
            "The path {} has no extension to guess a file format from",
            path.display()
        )
    };
    RdfFormat::from_extension(ext).with_context(|| {
        format!("Not able to guess the file format from file name extension '{ext}'")
    })
}

fn rdf_format_from_name(name: &str) -> anyhow::Result<RdfFormat> {
    if let Some(t) = RdfFormat::from_extension(name) {
        return Ok(t);
    }
    if let Some(t) = RdfFormat::from_media_type(name) {
        return Ok(t);
    }
    bail!("The file format '{name}' is unknown")
}
