//! The engine: applies runtime filter and sort criteria to queries.
//!
//! [`Engine::apply_filter`] and [`Engine::apply_sort`] validate a criterion
//! against the query's projected record shape and return a new query with one
//! more step. Either the call succeeds or the input query is left as it was.
//!
//! [`QueryExt`] exposes the same operations as methods on any [`Queryable`],
//! using the default [`Options`].

use serde::{Deserialize, Serialize};

use crate::coerce::coerce;
use crate::error::{AutoFilterError, Result};
use crate::filter::Filter;
use crate::guard;
use crate::ordering::{OrderingStep, Sort};
use crate::predicate::Predicate;
use crate::query::Queryable;
use crate::registry::FieldRegistry;

/// What to do with a criterion whose field name is empty or whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyFieldPolicy {
    /// Fail with [`AutoFilterError::EmptyField`].
    #[default]
    Strict,
    /// Return the query unchanged.
    Permissive,
}

/// How date/time filter values are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateMatching {
    /// Every value stands for its whole calendar day, `[midnight, next midnight)`.
    #[default]
    DayBucket,
    /// Values at midnight stand for their whole day; values with a time of
    /// day are compared as exact instants.
    ExactWhenTimed,
}

/// Engine configuration.
///
/// ```
/// use autofilter::{DateMatching, EmptyFieldPolicy, Options};
///
/// let options: Options = serde_json::from_str(r#"{"empty_field": "permissive"}"#).unwrap();
/// assert_eq!(options, Options::new().empty_field(EmptyFieldPolicy::Permissive));
/// assert_eq!(options.date_matching, DateMatching::DayBucket);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Handling of empty field names, for filters and sorts alike.
    pub empty_field: EmptyFieldPolicy,
    /// Matching rule for date/time filters.
    pub date_matching: DateMatching,
}

impl Options {
    /// Creates the default options: strict, day-bucketed.
    pub fn new() -> Self {
        Options::default()
    }

    /// Sets the empty field name policy.
    pub fn empty_field(mut self, policy: EmptyFieldPolicy) -> Self {
        self.empty_field = policy;
        self
    }

    /// Sets the date matching rule.
    pub fn date_matching(mut self, matching: DateMatching) -> Self {
        self.date_matching = matching;
        self
    }
}

/// Applies [`Filter`] and [`Sort`] criteria to [`Queryable`] queries.
///
/// An engine holds only its [`Options`]; it is cheap to copy and safe to
/// share between threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Engine {
    options: Options,
}

impl Engine {
    /// Creates an engine with the given options.
    pub fn new(options: Options) -> Self {
        Engine { options }
    }

    /// Creates an engine that rejects empty field names.
    pub fn strict() -> Self {
        Engine::new(Options::new().empty_field(EmptyFieldPolicy::Strict))
    }

    /// Creates an engine that ignores criteria with an empty field name.
    pub fn permissive() -> Self {
        Engine::new(Options::new().empty_field(EmptyFieldPolicy::Permissive))
    }

    /// Returns the engine's options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Returns a new query that also requires `filter`.
    ///
    /// # Errors
    ///
    /// - [`AutoFilterError::EmptyField`] for a blank field name (strict only)
    /// - [`AutoFilterError::MissingProjection`] if the query is not projected
    /// - [`AutoFilterError::UnknownField`] if no field has that name
    /// - [`AutoFilterError::NullValue`] for a null value on a non-nullable field
    /// - [`AutoFilterError::ValueFormat`] if the value does not parse
    /// - [`AutoFilterError::UnsupportedOperator`] if the operator does not
    ///   apply to the field's type
    pub fn apply_filter<Q: Queryable>(&self, query: &Q, filter: &Filter) -> Result<Q> {
        if self.skip_blank(filter.field(), "filter")? {
            return Ok(query.clone());
        }

        guard::assert_projected(query.history(), "filter")?;

        let registry = FieldRegistry::<Q::Item>::shared();
        let field = registry.resolve(filter.field())?;
        let ty = field.field_type();

        let value = coerce(filter.value(), ty)
            .map_err(|e| e.for_field(field.name(), filter.value(), ty))?;
        let predicate =
            Predicate::build(field, filter.operator(), &value, self.options.date_matching)?;

        tracing::debug!(
            shape = registry.shape(),
            field = field.name(),
            operator = %filter.operator(),
            value = ?filter.value(),
            "appending filter"
        );

        Ok(query.push_filter(predicate))
    }

    /// Returns a new query ordered by `sort`.
    ///
    /// The first sort applied after the latest projection is the primary
    /// key; every later one breaks the ties left by the sorts before it.
    ///
    /// # Errors
    ///
    /// - [`AutoFilterError::EmptyField`] for a blank field name (strict only)
    /// - [`AutoFilterError::MissingProjection`] if the query is not projected
    /// - [`AutoFilterError::UnknownField`] if no field has that name
    pub fn apply_sort<Q: Queryable>(&self, query: &Q, sort: &Sort) -> Result<Q> {
        if self.skip_blank(sort.field(), "sort")? {
            return Ok(query.clone());
        }

        guard::assert_projected(query.history(), "sort")?;

        let registry = FieldRegistry::<Q::Item>::shared();
        let field = registry.resolve(sort.field())?;
        let step = OrderingStep::build(
            field,
            sort.direction(),
            guard::has_prior_ordering(query.history()),
        );

        tracing::debug!(
            shape = registry.shape(),
            field = field.name(),
            direction = %sort.direction(),
            primary = step.is_primary(),
            "appending ordering"
        );

        Ok(query.push_ordering(step))
    }

    /// Applies filters in order, stopping at the first error.
    pub fn apply_filters<'a, Q, I>(&self, query: &Q, filters: I) -> Result<Q>
    where
        Q: Queryable,
        I: IntoIterator<Item = &'a Filter>,
    {
        filters
            .into_iter()
            .try_fold(query.clone(), |q, filter| self.apply_filter(&q, filter))
    }

    /// Applies sorts in order, stopping at the first error.
    ///
    /// The first sort is the primary key unless the query is already ordered.
    pub fn apply_sorts<'a, Q, I>(&self, query: &Q, sorts: I) -> Result<Q>
    where
        Q: Queryable,
        I: IntoIterator<Item = &'a Sort>,
    {
        sorts
            .into_iter()
            .try_fold(query.clone(), |q, sort| self.apply_sort(&q, sort))
    }

    /// Returns `Ok(true)` when a blank field name should be skipped.
    fn skip_blank(&self, field: &str, step: &'static str) -> Result<bool> {
        if !field.trim().is_empty() {
            return Ok(false);
        }

        match self.options.empty_field {
            EmptyFieldPolicy::Strict => Err(AutoFilterError::EmptyField),
            EmptyFieldPolicy::Permissive => {
                tracing::debug!(step, "skipping criterion with an empty field name");
                Ok(true)
            }
        }
    }
}

/// Method syntax for the default [`Engine`].
///
/// ```
/// use autofilter::{Filter, MemoryQuery, QueryExt, Record};
///
/// #[derive(Clone, Record)]
/// struct Row {
///     number: String,
/// }
///
/// let rows = vec![Row { number: "INV-1001".into() }, Row { number: "CRN-1001".into() }];
/// let query = MemoryQuery::new(rows).select(|r| r);
///
/// let found = query.apply_filter(&Filter::contains("number", "inv"))?;
/// assert_eq!(found.count(), 1);
///
/// // Unprojected queries are rejected
/// let rows = vec![Row { number: "INV-1001".into() }];
/// assert!(MemoryQuery::new(rows).apply_filter(&Filter::eq("number", "x")).is_err());
/// # Ok::<(), autofilter::AutoFilterError>(())
/// ```
pub trait QueryExt: Queryable {
    /// See [`Engine::apply_filter`].
    fn apply_filter(&self, filter: &Filter) -> Result<Self> {
        Engine::default().apply_filter(self, filter)
    }

    /// See [`Engine::apply_sort`].
    fn apply_sort(&self, sort: &Sort) -> Result<Self> {
        Engine::default().apply_sort(self, sort)
    }

    /// See [`Engine::apply_filters`].
    fn apply_filters<'a, I>(&self, filters: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Filter>,
    {
        Engine::default().apply_filters(self, filters)
    }

    /// See [`Engine::apply_sorts`].
    fn apply_sorts<'a, I>(&self, sorts: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Sort>,
    {
        Engine::default().apply_sorts(self, sorts)
    }
}

impl<Q: Queryable> QueryExt for Q {}
