//! Joins each PMML card with the schema and the spreadsheet.

use scorecard_model::{
    Diagnostic, DiagnosticKind, FullParameter, Reporter, ScoreCard, ScoreCardExt,
};

use crate::error::{CombineError, Result};
use crate::options::{CombineOptions, MissingPolicy};
use crate::source::{CardScope, MethodSource, TypeSource};

/// Result of combining a batch of cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineOutcome {
    /// Successfully combined cards, in input order.
    pub cards: Vec<ScoreCardExt>,
    /// Cards that were rejected, in input order.
    pub failures: Vec<CombineError>,
    /// Input position of each entry in `failures`.
    pub rejected: Vec<usize>,
}

impl CombineOutcome {
    /// Parameters whose method is ambiguous, over all combined cards.
    pub fn ambiguous_count(&self) -> usize {
        self.cards.iter().map(ScoreCardExt::ambiguous_count).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One slot per input card, `None` where the card was rejected.
    pub fn into_per_card(self) -> (Vec<Option<ScoreCardExt>>, Vec<CombineError>) {
        let total = self.cards.len() + self.failures.len();
        let mut combined = self.cards.into_iter();
        let mut rejected = self.rejected.iter().copied().peekable();
        let slots = (0..total)
            .map(|position| {
                if rejected.next_if_eq(&position).is_some() {
                    None
                } else {
                    combined.next()
                }
            })
            .collect();
        (slots, self.failures)
    }
}

/// Stateless join over one schema and one spreadsheet.
pub struct Combiner<'a, T: ?Sized, M: ?Sized> {
    types: &'a T,
    methods: &'a M,
    options: CombineOptions,
}

impl<'a, T, M> Combiner<'a, T, M>
where
    T: TypeSource + ?Sized,
    M: MethodSource + ?Sized,
{
    pub fn new(types: &'a T, methods: &'a M, options: CombineOptions) -> Self {
        Self {
            types,
            methods,
            options,
        }
    }

    pub fn options(&self) -> CombineOptions {
        self.options
    }

    /// Combines one card.
    ///
    /// Every parameter is looked up even after a failure so that all
    /// problems of the card are reported in one pass.
    pub fn combine(&self, card: &ScoreCard, reporter: &mut dyn Reporter) -> Result<ScoreCardExt> {
        let _span = tracing::debug_span!("combine_card", card = %card.score_name).entered();
        let mut scope = CardScope::new(&card.score_name, reporter);

        let mut params = Vec::with_capacity(card.params.len());
        let mut missing_types = Vec::new();
        let mut missing_methods = Vec::new();

        for raw in &card.params {
            let name = raw.as_str();

            let declaration = self.types.declaration(name);
            if declaration.is_none() {
                scope.report(
                    Diagnostic::error(
                        DiagnosticKind::MissingType,
                        format!("parameter '{name}' is not declared in the schema"),
                    )
                    .for_parameter(name),
                );
            }
            let method = self.methods.method_info(name, &mut scope).ok();

            let (Some(declaration), Some(info)) = (declaration, method.as_ref()) else {
                let mut rejected = false;
                if declaration.is_none() && self.options.missing_type == MissingPolicy::FailCard {
                    missing_types.push(name.to_string());
                    rejected = true;
                }
                if method.is_none() && self.options.missing_method == MissingPolicy::FailCard {
                    missing_methods.push(name.to_string());
                    rejected = true;
                }
                if !rejected {
                    scope.report(
                        Diagnostic::warning(
                            DiagnosticKind::ParameterSkipped,
                            format!("parameter '{name}' dropped from the card"),
                        )
                        .for_parameter(name),
                    );
                }
                continue;
            };

            params.push(FullParameter {
                name: declaration.name.clone(),
                param_type: declaration.param_type,
                pmml_name: name.to_string(),
                method: info.method.clone(),
            });
        }

        if !missing_types.is_empty() || !missing_methods.is_empty() {
            let error = CombineError::IncompleteCard {
                card: card.score_name.clone(),
                missing_types,
                missing_methods,
            };
            scope.report(Diagnostic::error(DiagnosticKind::CardRejected, error.to_string()));
            return Err(error);
        }

        let combined = ScoreCardExt::new(card.score_name.as_str(), params);
        tracing::debug!(
            params = combined.params().len(),
            ambiguous = combined.ambiguous_count(),
            "combined card"
        );
        Ok(combined)
    }

    /// Combines every card; a rejected card does not stop the batch.
    pub fn combine_all(&self, cards: &[ScoreCard], reporter: &mut dyn Reporter) -> CombineOutcome {
        let mut outcome = CombineOutcome::default();
        for (position, card) in cards.iter().enumerate() {
            match self.combine(card, reporter) {
                Ok(combined) => outcome.cards.push(combined),
                Err(error) => {
                    outcome.failures.push(error);
                    outcome.rejected.push(position);
                }
            }
        }

        tracing::info!(
            combined = outcome.cards.len(),
            rejected = outcome.failures.len(),
            ambiguous = outcome.ambiguous_count(),
            "combined score cards"
        );
        outcome
    }
}
