use crate::config::SageConfig;
use crate::planner::PlanBuilder;
use crate::sparql::{QueryEvaluationError, SageQuery};
use rdf_sage_model::SolutionMapping;
use rdf_sage_physical::{ExecutionContext, PreemptableOperator, SavedOperator, Step};
use rdf_sage_storage::PatternSource;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The state of a [QueryExecution].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExecutionState {
    Running,
    /// The plan produced all of its solutions.
    Completed,
    /// The quota expired before the plan was exhausted.
    QuotaExceeded,
    /// The maximum number of solutions was reached before the plan was exhausted.
    ResultLimitExceeded,
}

impl ExecutionState {
    pub fn is_running(self) -> bool {
        self == ExecutionState::Running
    }
}

impl Display for ExecutionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ExecutionState::Running => "running",
            ExecutionState::Completed => "completed",
            ExecutionState::QuotaExceeded => "quota exceeded",
            ExecutionState::ResultLimitExceeded => "result limit exceeded",
        })
    }
}

/// What happened during a single call to [QueryExecution::step].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The root operator produced a solution.
    Solution,
    /// The root operator did some work without producing a solution.
    NotYet,
    /// No step was performed because the execution has stopped.
    Stopped(ExecutionState),
}

/// The result of a single invocation of the engine.
#[derive(Debug)]
pub struct ExecutionOutcome {
    pub solutions: Vec<SolutionMapping>,
    /// The state of the plan if it was suspended. `None` if the plan completed.
    pub snapshot: Option<SavedOperator>,
    pub state: ExecutionState,
    /// The number of scheduling steps performed.
    pub steps: usize,
    pub elapsed: Duration,
}

impl ExecutionOutcome {
    pub fn completed(&self) -> bool {
        self.state == ExecutionState::Completed
    }
}

/// A running invocation of a plan.
///
/// Each call to [Self::step] performs exactly one scheduling step of the root operator. Between two
/// steps, the execution checks the quota and the result limit. An execution always performs at
/// least one step if the plan has solutions left, even with a zero quota. Hence, repeatedly
/// resuming a plan always makes progress.
#[derive(Debug)]
pub struct QueryExecution {
    plan: PreemptableOperator,
    context: ExecutionContext,
    quota: Duration,
    max_results: Option<usize>,
    started: Instant,
    solutions: Vec<SolutionMapping>,
    steps: usize,
    state: ExecutionState,
}

impl QueryExecution {
    pub fn new(
        plan: PreemptableOperator,
        context: ExecutionContext,
        quota: Duration,
        max_results: Option<usize>,
    ) -> Self {
        Self {
            plan,
            context,
            quota,
            max_results,
            started: Instant::now(),
            solutions: Vec::new(),
            steps: 0,
            state: ExecutionState::Running,
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn solutions(&self) -> &[SolutionMapping] {
        &self.solutions
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Performs a single scheduling step.
    ///
    /// A failure of the pattern source aborts the execution. The plan cannot be saved afterward.
    pub fn step(&mut self) -> Result<StepOutcome, QueryEvaluationError> {
        if !self.state.is_running() {
            return Ok(StepOutcome::Stopped(self.state));
        }
        if self.limit_reached() {
            return Ok(self.stop(ExecutionState::ResultLimitExceeded));
        }
        if !self.plan.has_next() {
            return Ok(self.stop(ExecutionState::Completed));
        }

        let step = self.plan.next(&self.context)?;
        self.steps += 1;
        let outcome = match step {
            Step::Solution(solution) => {
                self.solutions.push(solution);
                StepOutcome::Solution
            }
            Step::NotYet => StepOutcome::NotYet,
            Step::Exhausted => return Ok(self.stop(ExecutionState::Completed)),
        };

        if !self.plan.has_next() {
            self.state = ExecutionState::Completed;
        } else if self.limit_reached() {
            self.state = ExecutionState::ResultLimitExceeded;
        } else if self.started.elapsed() >= self.quota {
            self.state = ExecutionState::QuotaExceeded;
        }
        Ok(outcome)
    }

    /// Runs the execution until it stops.
    pub fn run(&mut self) -> Result<(), QueryEvaluationError> {
        while self.is_running() {
            self.step()?;
        }
        Ok(())
    }

    /// Ends the execution and saves the plan unless it completed.
    ///
    /// An execution that is still running is saved as well.
    pub fn finish(self) -> ExecutionOutcome {
        let snapshot = match self.state {
            ExecutionState::Completed => None,
            ExecutionState::Running
            | ExecutionState::QuotaExceeded
            | ExecutionState::ResultLimitExceeded => Some(self.plan.save()),
        };
        let outcome = ExecutionOutcome {
            solutions: self.solutions,
            snapshot,
            state: self.state,
            steps: self.steps,
            elapsed: self.started.elapsed(),
        };
        tracing::debug!(
            "Execution stopped ({}) after {} steps and {:.3}ms with {} solutions",
            outcome.state,
            outcome.steps,
            outcome.elapsed.as_secs_f64() * 1000.0,
            outcome.solutions.len()
        );
        outcome
    }

    fn limit_reached(&self) -> bool {
        self.max_results
            .is_some_and(|max_results| self.solutions.len() >= max_results)
    }

    fn stop(&mut self, state: ExecutionState) -> StepOutcome {
        self.state = state;
        StepOutcome::Stopped(state)
    }
}

/// Executes `plan` until it completes, `quota` expires, or `max_results` solutions have been
/// produced.
pub fn execute(
    plan: PreemptableOperator,
    context: ExecutionContext,
    quota: Duration,
    max_results: Option<usize>,
) -> Result<ExecutionOutcome, QueryEvaluationError> {
    let mut execution = QueryExecution::new(plan, context, quota, max_results);
    execution.run()?;
    Ok(execution.finish())
}

/// Plans and executes queries over a pattern source.
#[derive(Debug, Clone)]
pub struct SageEngine {
    context: ExecutionContext,
    config: SageConfig,
}

impl SageEngine {
    pub fn new(source: Arc<dyn PatternSource>, config: SageConfig) -> Self {
        Self {
            context: ExecutionContext::new(source),
            config,
        }
    }

    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }

    pub fn config(&self) -> &SageConfig {
        &self.config
    }

    /// Builds the plan of `query` or, if a snapshot is given, reconstructs the saved plan.
    pub fn plan(
        &self,
        query: &SageQuery,
        snapshot: Option<SavedOperator>,
    ) -> Result<PreemptableOperator, QueryEvaluationError> {
        PlanBuilder::new(&self.context, &self.config).build(query, snapshot)
    }

    /// Reconstructs a saved plan.
    pub fn load(
        &self,
        snapshot: SavedOperator,
    ) -> Result<PreemptableOperator, QueryEvaluationError> {
        PlanBuilder::new(&self.context, &self.config).load(snapshot)
    }

    /// Starts an execution of `plan` with the configured quota and result limit.
    pub fn start(&self, plan: PreemptableOperator) -> QueryExecution {
        QueryExecution::new(
            plan,
            self.context.clone(),
            self.config.quota,
            self.config.max_results,
        )
    }

    /// Executes `plan` on the current thread until it stops.
    pub fn execute(
        &self,
        plan: PreemptableOperator,
    ) -> Result<ExecutionOutcome, QueryEvaluationError> {
        let mut execution = self.start(plan);
        execution.run()?;
        Ok(execution.finish())
    }

    /// Executes `plan` while yielding to the tokio scheduler every `yield_every` steps.
    ///
    /// Steps themselves are never interrupted. Pattern source calls block the worker thread.
    pub async fn execute_cooperative(
        &self,
        plan: PreemptableOperator,
    ) -> Result<ExecutionOutcome, QueryEvaluationError> {
        let yield_every = self.config.yield_every.max(1);
        let mut execution = self.start(plan);
        while execution.is_running() {
            execution.step()?;
            if execution.steps() % yield_every == 0 {
                tokio::task::yield_now().await;
            }
        }
        Ok(execution.finish())
    }
}
