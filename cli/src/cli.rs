use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "rdf-sage")]
/// RDF Sage command line toolkit for preemptable SPARQL query evaluation
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Evaluate a SPARQL query over RDF files under a time quota
    Query {
        /// File(s) to load the data from
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long = "file", value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
        /// The format of the data file(s)
        ///
        /// It can be an extension like "nt" or a MIME type like "application/n-triples".
        ///
        /// By default the format is guessed from the data file extension.
        #[arg(long, required_unless_present = "files")]
        format: Option<String>,
        /// Attempt to keep loading even if a data file is invalid
        #[arg(long)]
        lenient: bool,
        /// The SPARQL query to evaluate
        #[arg(short, long, conflicts_with = "query_file")]
        query: Option<String>,
        /// File to read the SPARQL query from
        #[arg(long, conflicts_with = "query", value_hint = ValueHint::FilePath)]
        query_file: Option<PathBuf>,
        /// The time quota of one invocation in milliseconds
        #[arg(long, default_value_t = 75)]
        quota_ms: u64,
        /// The maximum number of solutions of one invocation
        #[arg(long)]
        max_results: Option<usize>,
        /// The continuation token returned by a previous invocation
        #[arg(long)]
        next: Option<String>,
        /// Keep resuming the query until it completes
        #[arg(long)]
        all: bool,
        /// Interleave the branches of a UNION randomly
        #[arg(long)]
        randomized_union: bool,
        /// Print the plan instead of evaluating it
        #[arg(long)]
        explain: bool,
    },
}
