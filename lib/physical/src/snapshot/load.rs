use crate::operator::{
    BagUnionOperator, BindJoinOperator, FilterOperator, NestedLoopJoinOperator,
    ProjectionOperator, ScanOperator,
};
use crate::{ExecutionContext, ExecutionError, PreemptableOperator, SavedOperator};

/// Reconstructs the operator tree captured in `saved`.
///
/// Scans are reopened at their saved offsets and joins continue with the outer solution they were
/// processing. No operator re-derives anything from the query text.
pub fn load_operator(
    saved: SavedOperator,
    context: &ExecutionContext,
) -> Result<PreemptableOperator, ExecutionError> {
    Ok(match saved {
        SavedOperator::Scan(saved) => ScanOperator::load(context, saved)?.into(),
        SavedOperator::NestedLoopJoin(saved) => {
            let source = load_operator(*saved.source, context)?;
            NestedLoopJoinOperator::resume(
                context,
                source,
                saved.inner,
                saved.binding,
                saved.offset,
            )?
            .into()
        }
        SavedOperator::BindJoin(saved) => BindJoinOperator::resume(
            context,
            saved.bindings,
            saved.inner,
            saved.binding,
            saved.offset,
        )?
        .into(),
        SavedOperator::BagUnion(saved) => BagUnionOperator::new(
            load_operator(*saved.left, context)?,
            load_operator(*saved.right, context)?,
            saved.mode,
        )
        .into(),
        SavedOperator::Filter(saved) => {
            FilterOperator::new(load_operator(*saved.source, context)?, saved.expression).into()
        }
        SavedOperator::Projection(saved) => {
            ProjectionOperator::new(load_operator(*saved.source, context)?, saved.variables).into()
        }
        SavedOperator::Empty => PreemptableOperator::Empty,
    })
}
