//! Filter settings: the persisted form of a row filter configuration.
//!
//! Settings are plain serde data and can be loaded from JSON:
//!
//! ```
//! use rowfilter::settings::{FilterSettings, MatchCriteria};
//!
//! let settings = FilterSettings::from_json(
//!     r#"{
//!         "matchCriteria": "any",
//!         "criteria": [
//!             { "column": { "column": "age" }, "operator": "greaterThan", "parameters": ["30"] },
//!             { "column": "rowIndex", "operator": "firstNRows", "parameters": ["2"] }
//!         ]
//!     }"#,
//! )
//! .unwrap();
//! assert_eq!(settings.match_criteria, MatchCriteria::Any);
//! assert_eq!(settings.criteria.len(), 2);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    error::{FilterError, PredicateError},
    predicate::{build_leaf, ColumnSelector, FilterOperator, LeafContext, MatchOptions, RowPredicate},
};

/// How the criteria of a filter are combined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchCriteria {
    /// Every criterion must hold (`AND`).
    #[default]
    All,
    /// At least one criterion must hold (`OR`).
    Any,
}

/// Which rows the filter emits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputMode {
    /// Rows satisfying the criteria.
    #[default]
    Matching,
    /// Rows not satisfying the criteria.
    NonMatching,
}

/// A single condition on a column or pseudo-column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    /// Target column or pseudo-column.
    pub column: ColumnSelector,
    /// Operator applied to the target.
    pub operator: FilterOperator,
    /// Operator arguments, in order.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// String-matching switches.
    #[serde(flatten)]
    pub options: MatchOptions,
}

impl FilterCriterion {
    /// Criterion with default match options.
    pub fn new<I, S>(column: ColumnSelector, operator: FilterOperator, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column,
            operator,
            parameters: parameters.into_iter().map(Into::into).collect(),
            options: MatchOptions::default(),
        }
    }

    /// Replaces the match options.
    #[must_use]
    pub fn with_options(mut self, options: MatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves this criterion into a leaf predicate.
    pub fn to_predicate(&self, ctx: &LeafContext) -> Result<RowPredicate, PredicateError> {
        build_leaf(
            &self.column,
            self.operator,
            &self.parameters,
            &self.options,
            ctx,
        )
    }
}

/// Complete row filter configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSettings {
    /// Conditions; an empty list keeps every row.
    #[serde(default)]
    pub criteria: Vec<FilterCriterion>,
    /// How the conditions are combined.
    #[serde(default)]
    pub match_criteria: MatchCriteria,
    /// Which side of the predicate is emitted.
    #[serde(default)]
    pub output_mode: OutputMode,
}

impl FilterSettings {
    /// Settings combining `criteria` with `match_criteria`.
    pub fn new(criteria: Vec<FilterCriterion>, match_criteria: MatchCriteria) -> Self {
        Self {
            criteria,
            match_criteria,
            output_mode: OutputMode::Matching,
        }
    }

    /// Sets the output mode.
    #[must_use]
    pub fn with_output_mode(mut self, output_mode: OutputMode) -> Self {
        self.output_mode = output_mode;
        self
    }

    /// Decodes settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes settings as JSON.
    pub fn to_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Compiles all criteria into one predicate.
    ///
    /// The first failing criterion aborts compilation.
    pub fn compile(&self, ctx: &LeafContext) -> Result<RowPredicate, PredicateError> {
        if self.criteria.is_empty() {
            return Ok(RowPredicate::always_true());
        }
        let leaves = self
            .criteria
            .iter()
            .map(|criterion| criterion.to_predicate(ctx))
            .collect::<Result<Vec<_>, _>>()?;
        match self.match_criteria {
            MatchCriteria::All => RowPredicate::and(leaves),
            MatchCriteria::Any => RowPredicate::or(leaves),
        }
    }
}
