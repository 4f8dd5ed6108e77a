//! Queries: the seam to executors, and an in-memory executor.
//!
//! The engine never runs a query. It reads a query's step history through
//! [`Queryable`] and hands back a new query with one more predicate or
//! ordering step. [`MemoryQuery`] is the executor for `Vec`-backed data.

use std::fmt;
use std::sync::Arc;

use crate::ordering::{compare_by_orderings, OrderingStep};
use crate::predicate::Predicate;
use crate::traits::Record;

/// Kind of an operation recorded in a query's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Projection onto a concrete record shape.
    Project,
    /// Filter predicate.
    Filter,
    /// Ordering key.
    Order,
}

/// A lazily evaluated query the engine can extend.
///
/// Implementations are immutable values: `push_*` returns a new query and
/// leaves `self` untouched.
pub trait Queryable: Clone {
    /// The projected record shape.
    type Item: Record;

    /// Returns the operations applied so far, oldest first.
    fn history(&self) -> &[StepKind];

    /// Returns a new query that also requires `predicate`.
    fn push_filter(&self, predicate: Predicate<Self::Item>) -> Self;

    /// Returns a new query with `step` appended to its ordering.
    ///
    /// A primary step replaces the effective order; a tie-break step refines
    /// the order built by the steps before it.
    fn push_ordering(&self, step: OrderingStep<Self::Item>) -> Self;
}

type Source<T> = Arc<dyn Fn() -> Vec<T> + Send + Sync>;

/// A query over in-memory data.
///
/// Nothing runs until the query is executed with [`to_vec`](Self::to_vec),
/// [`first`](Self::first) or [`count`](Self::count). Filters are ANDed;
/// orderings are applied with a stable sort, so upstream order breaks any tie
/// left by the ordering steps.
///
/// # Example
///
/// ```
/// use autofilter::{Filter, MemoryQuery, QueryExt, Record, Sort};
///
/// #[derive(Clone)]
/// struct Invoice {
///     number: String,
///     total: f64,
///     notes: String,
/// }
///
/// #[derive(Record)]
/// #[filter(rename_all = "PascalCase")]
/// struct Row {
///     number: String,
///     total: f64,
/// }
///
/// let invoices = vec![
///     Invoice { number: "INV-1001".into(), total: 24.0, notes: String::new() },
///     Invoice { number: "CRN-1001".into(), total: -6.0, notes: String::new() },
///     Invoice { number: "INV-1002".into(), total: 12.0, notes: String::new() },
/// ];
///
/// let rows = MemoryQuery::new(invoices)
///     .select(|i| Row { number: i.number, total: i.total })
///     .apply_filter(&Filter::gt("total", "0"))?
///     .apply_sort(&Sort::asc("number"))?
///     .to_vec();
///
/// let numbers: Vec<_> = rows.iter().map(|r| r.number.as_str()).collect();
/// assert_eq!(numbers, ["INV-1001", "INV-1002"]);
/// # Ok::<(), autofilter::AutoFilterError>(())
/// ```
pub struct MemoryQuery<T> {
    source: Source<T>,
    history: Vec<StepKind>,
    filters: Vec<Predicate<T>>,
    orderings: Vec<OrderingStep<T>>,
}

impl<T: Clone + Send + Sync + 'static> MemoryQuery<T> {
    /// Creates an unprojected query over `items`.
    pub fn new(items: Vec<T>) -> Self {
        let items = Arc::new(items);
        Self::from_fn(move || items.as_ref().clone())
    }
}

impl<T: 'static> MemoryQuery<T> {
    /// Creates an unprojected query whose items are produced by `source` on
    /// every execution.
    pub fn from_fn<F>(source: F) -> Self
    where
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        MemoryQuery {
            source: Arc::new(source),
            history: Vec::new(),
            filters: Vec::new(),
            orderings: Vec::new(),
        }
    }

    /// Projects every item into a new shape.
    ///
    /// The returned query starts with no filter or ordering of its own; the
    /// steps of `self` run upstream of the projection.
    pub fn select<U, F>(&self, project: F) -> MemoryQuery<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let upstream = self.clone();
        let mut history = self.history.clone();
        history.push(StepKind::Project);

        MemoryQuery {
            source: Arc::new(move || upstream.to_vec().into_iter().map(&project).collect()),
            history,
            filters: Vec::new(),
            orderings: Vec::new(),
        }
    }

    /// Runs the query and returns the matching items in order.
    pub fn to_vec(&self) -> Vec<T> {
        let mut items = (self.source)();
        items.retain(|item| self.filters.iter().all(|p| p.matches(item)));

        if !self.orderings.is_empty() {
            items.sort_by(|a, b| compare_by_orderings(a, b, &self.orderings));
        }
        items
    }

    /// Runs the query and returns the first item, if any.
    pub fn first(&self) -> Option<T> {
        self.to_vec().into_iter().next()
    }

    /// Runs the query and returns the number of matching items.
    pub fn count(&self) -> usize {
        self.to_vec().len()
    }

    /// Returns the filter predicates, in application order.
    pub fn filters(&self) -> &[Predicate<T>] {
        &self.filters
    }

    /// Returns the effective ordering steps, primary first.
    pub fn orderings(&self) -> &[OrderingStep<T>] {
        &self.orderings
    }
}

impl<T> Clone for MemoryQuery<T> {
    fn clone(&self) -> Self {
        MemoryQuery {
            source: Arc::clone(&self.source),
            history: self.history.clone(),
            filters: self.filters.clone(),
            orderings: self.orderings.clone(),
        }
    }
}

impl<T> fmt::Debug for MemoryQuery<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryQuery")
            .field("history", &self.history)
            .field("filters", &self.filters)
            .field("orderings", &self.orderings)
            .finish_non_exhaustive()
    }
}

impl<T: Record> Queryable for MemoryQuery<T> {
    type Item = T;

    fn history(&self) -> &[StepKind] {
        &self.history
    }

    fn push_filter(&self, predicate: Predicate<T>) -> Self {
        let mut next = self.clone();
        next.history.push(StepKind::Filter);
        next.filters.push(predicate);
        next
    }

    fn push_ordering(&self, step: OrderingStep<T>) -> Self {
        let mut next = self.clone();
        next.history.push(StepKind::Order);
        if step.is_primary() {
            next.orderings.clear();
        }
        next.orderings.push(step);
        next
    }
}
