//! Projection guard over a query's step history.

use crate::error::{AutoFilterError, Result};
use crate::query::StepKind;

/// Fails with [`AutoFilterError::MissingProjection`] unless the history
/// holds a projection step.
///
/// `step` names the step about to be appended (`"filter"` or `"sort"`).
pub fn assert_projected(history: &[StepKind], step: &'static str) -> Result<()> {
    if history.contains(&StepKind::Project) {
        Ok(())
    } else {
        Err(AutoFilterError::MissingProjection { step })
    }
}

/// Returns `true` if an ordering step was appended since the latest
/// projection.
///
/// Orderings applied before a projection belong to the upstream query and
/// never make a new sort a tie-breaker.
pub fn has_prior_ordering(history: &[StepKind]) -> bool {
    history
        .iter()
        .rev()
        .take_while(|step| **step != StepKind::Project)
        .any(|step| *step == StepKind::Order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use StepKind::*;

    #[test]
    fn projected_history_passes() {
        assert!(assert_projected(&[Project], "filter").is_ok());
        assert!(assert_projected(&[Order, Project, Filter, Filter], "sort").is_ok());
    }

    #[test]
    fn unprojected_history_fails() {
        for history in [&[][..], &[Order][..], &[Filter, Order][..]] {
            let err = assert_projected(history, "filter").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MissingProjection);
        }

        let err = assert_projected(&[], "sort").unwrap_err();
        assert_eq!(
            err.to_string(),
            "the query must be projected before applying a sort"
        );
    }

    #[test]
    fn prior_ordering_is_scoped_to_latest_projection() {
        assert!(!has_prior_ordering(&[Project]));
        assert!(!has_prior_ordering(&[Project, Filter]));
        assert!(has_prior_ordering(&[Project, Order]));
        assert!(has_prior_ordering(&[Project, Order, Filter]));
        assert!(!has_prior_ordering(&[Order, Project]));
        assert!(!has_prior_ordering(&[Project, Order, Project, Filter]));
    }
}
