use crate::config::SageConfig;
use crate::engine::{ExecutionOutcome, ExecutionState, SageEngine};
use crate::sparql::{QueryEvaluationError, SageQuery};
use rdf_sage_model::SolutionMapping;
use rdf_sage_physical::{ContinuationToken, PreemptableOperator};
use rdf_sage_storage::PatternSource;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Statistics of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionStats {
    pub state: ExecutionState,
    pub steps: usize,
    /// The time spent executing the plan.
    pub elapsed: Duration,
    /// The time spent building the plan or loading it from a continuation token.
    pub import_time: Duration,
    /// The time spent encoding the continuation token.
    pub export_time: Duration,
}

/// A page of solutions of a query.
#[derive(Debug)]
pub struct QueryPage {
    pub solutions: Vec<SolutionMapping>,
    /// Resumes the query. `None` if the query completed.
    pub next: Option<ContinuationToken>,
    pub stats: ExecutionStats,
}

impl QueryPage {
    pub fn is_complete(&self) -> bool {
        self.next.is_none()
    }
}

/// Evaluates queries page by page over a pattern source.
///
/// This is the entry point for a server. Each call evaluates the query under the configured quota
/// and result limit. If the query does not complete, the page carries a continuation token that is
/// passed to the next call.
///
/// ```
/// # use rdf_sage_engine::{SageConfig, SageDataset};
/// # use rdf_sage_storage::memory::MemPatternSource;
/// # use std::sync::Arc;
/// let dataset = SageDataset::new(Arc::new(MemPatternSource::new()), SageConfig::default());
/// let page = dataset.query("SELECT * WHERE { ?s ?p ?o }", None)?;
/// assert!(page.is_complete());
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Clone)]
pub struct SageDataset {
    engine: SageEngine,
}

impl SageDataset {
    pub fn new(source: Arc<dyn PatternSource>, config: SageConfig) -> Self {
        Self {
            engine: SageEngine::new(source, config),
        }
    }

    pub fn engine(&self) -> &SageEngine {
        &self.engine
    }

    /// Evaluates a SPARQL query or, if `next` is given, resumes it.
    ///
    /// The query text is not parsed when resuming. The token alone describes the plan.
    pub fn query(
        &self,
        query: &str,
        next: Option<&ContinuationToken>,
    ) -> Result<QueryPage, QueryEvaluationError> {
        let (plan, import_time) = self.prepare(query, next)?;
        let outcome = self.engine.execute(plan)?;
        export(outcome, import_time)
    }

    /// Evaluates a query that has been built programmatically.
    pub fn evaluate(
        &self,
        query: &SageQuery,
        next: Option<&ContinuationToken>,
    ) -> Result<QueryPage, QueryEvaluationError> {
        let start = Instant::now();
        let snapshot = next.map(ContinuationToken::to_snapshot).transpose()?;
        let plan = self.engine.plan(query, snapshot)?;
        let import_time = start.elapsed();
        let outcome = self.engine.execute(plan)?;
        export(outcome, import_time)
    }

    /// Like [Self::query] but yields to the tokio scheduler while executing.
    pub async fn query_cooperative(
        &self,
        query: &str,
        next: Option<&ContinuationToken>,
    ) -> Result<QueryPage, QueryEvaluationError> {
        let (plan, import_time) = self.prepare(query, next)?;
        let outcome = self.engine.execute_cooperative(plan).await?;
        export(outcome, import_time)
    }

    /// Returns the plan that would be executed for the given query.
    pub fn explain(
        &self,
        query: &str,
        next: Option<&ContinuationToken>,
    ) -> Result<String, QueryEvaluationError> {
        let (plan, _) = self.prepare(query, next)?;
        Ok(plan.to_string())
    }

    fn prepare(
        &self,
        query: &str,
        next: Option<&ContinuationToken>,
    ) -> Result<(PreemptableOperator, Duration), QueryEvaluationError> {
        let start = Instant::now();
        let plan = match next {
            Some(token) => self.engine.load(token.to_snapshot()?)?,
            None => self.engine.plan(&SageQuery::parse(query, None)?, None)?,
        };
        Ok((plan, start.elapsed()))
    }
}

fn export(
    outcome: ExecutionOutcome,
    import_time: Duration,
) -> Result<QueryPage, QueryEvaluationError> {
    let start = Instant::now();
    let next = outcome
        .snapshot
        .as_ref()
        .map(ContinuationToken::from_snapshot)
        .transpose()?;
    let export_time = start.elapsed();

    Ok(QueryPage {
        solutions: outcome.solutions,
        next,
        stats: ExecutionStats {
            state: outcome.state,
            steps: outcome.steps,
            elapsed: outcome.elapsed,
            import_time,
            export_time,
        },
    })
}
