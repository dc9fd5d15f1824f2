pub use crate::config::*;

/// A builder for assembling a decision matrix from numbers.
///
/// It avoids going through strings when the data is already numeric.
///
/// ```
/// pub use topsis_core::builder::Builder;
/// pub use topsis_core::{Impact, TopsisRules};
/// # use topsis_core::TopsisError;
///
/// let mut builder = Builder::new(&TopsisRules::DEFAULT_RULES)?
///     .criteria(&["Price".to_string(), "Storage".to_string()])?;
///
/// builder.add_alternative("Phone A", &[250.0, 16.0])?;
/// builder.add_alternative("Phone B", &[200.0, 32.0])?;
///
/// let res = builder
///     .weights(&[1.0, 1.0])
///     .impacts(&[Impact::Minimize, Impact::Maximize])
///     .run()?;
/// assert_eq!(res.ranks(), vec![2, 1]);
///
/// # Ok::<(), TopsisError>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TopsisRules,
    pub(crate) _id_column: String,
    pub(crate) _criteria: Vec<String>,
    pub(crate) _alternatives: Vec<(String, Vec<f64>)>,
    pub(crate) _weights: Option<Vec<f64>>,
    pub(crate) _impacts: Option<Vec<Impact>>,
}

impl Builder {
    pub fn new(rules: &TopsisRules) -> Result<Builder, TopsisError> {
        Ok(Builder {
            _rules: rules.clone(),
            _id_column: "Alternative".to_string(),
            _criteria: Vec::new(),
            _alternatives: Vec::new(),
            _weights: None,
            _impacts: None,
        })
    }

    /// Sets the names of the criteria. Any alternative added before is dropped.
    pub fn criteria(self, names: &[String]) -> Result<Builder, TopsisError> {
        if names.len() < 2 {
            return Err(TopsisError::Schema {
                reason: format!("expected at least 2 criteria, found {}", names.len()),
            });
        }
        Ok(Builder {
            _criteria: names.to_vec(),
            _alternatives: Vec::new(),
            ..self
        })
    }

    /// The header of the identifier column in the output (default `Alternative`).
    pub fn id_column(self, name: &str) -> Builder {
        Builder {
            _id_column: name.to_string(),
            ..self
        }
    }

    /// Adds one alternative, with one value per criterion, in the order of the criteria.
    pub fn add_alternative(&mut self, id: &str, values: &[f64]) -> Result<(), TopsisError> {
        if values.len() != self._criteria.len() {
            return Err(TopsisError::Schema {
                reason: format!(
                    "alternative {:?} has {} values, there are {} criteria",
                    id,
                    values.len(),
                    self._criteria.len()
                ),
            });
        }
        self._alternatives.push((id.to_string(), values.to_vec()));
        Ok(())
    }

    pub fn weights(self, weights: &[f64]) -> Builder {
        Builder {
            _weights: Some(weights.to_vec()),
            ..self
        }
    }

    pub fn impacts(self, impacts: &[Impact]) -> Builder {
        Builder {
            _impacts: Some(impacts.to_vec()),
            ..self
        }
    }

    /// The dataset assembled so far, with the numbers written out as text.
    pub fn dataset(&self) -> Dataset {
        let mut header = vec![self._id_column.clone()];
        header.extend(self._criteria.iter().cloned());
        let rows = self
            ._alternatives
            .iter()
            .map(|(id, values)| {
                let mut row = vec![id.clone()];
                row.extend(values.iter().map(|v| v.to_string()));
                row
            })
            .collect();
        Dataset::new(header, rows)
    }

    /// Runs the algorithm. Weights default to 1 and impacts to `Maximize` for every criterion.
    pub fn run(&self) -> Result<ScoredDataset, TopsisError> {
        let weights = self
            ._weights
            .clone()
            .unwrap_or_else(|| vec![1.0; self._criteria.len()]);
        let impacts = self
            ._impacts
            .clone()
            .unwrap_or_else(|| vec![Impact::Maximize; self._criteria.len()]);
        crate::run_topsis(&self.dataset(), &weights, &impacts, &self._rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn same_outcome_as_text_input() {
        let mut b = Builder::new(&TopsisRules::DEFAULT_RULES)
            .unwrap()
            .criteria(&names(&["P1", "P2"]))
            .unwrap()
            .id_column("Model");
        b.add_alternative("A", &[1.0, 8.0]).unwrap();
        b.add_alternative("B", &[2.0, 6.0]).unwrap();
        b.add_alternative("C", &[3.0, 4.0]).unwrap();
        let b = b
            .weights(&[1.0, 1.0])
            .impacts(&[Impact::Maximize, Impact::Minimize]);

        let from_builder = b.run().unwrap();
        let from_text = crate::compute(&b.dataset(), "1,1", "+,-").unwrap();
        assert_eq!(from_builder, from_text);
        assert_eq!(from_builder.header, names(&["Model", "P1", "P2"]));
        assert_eq!(from_builder.rows[2].cells, names(&["C", "3", "4"]));
        assert_eq!(from_builder.ranks(), vec![3, 2, 1]);
    }

    #[test]
    fn defaults_to_equal_benefit_criteria() {
        let mut b = Builder::new(&TopsisRules::DEFAULT_RULES)
            .unwrap()
            .criteria(&names(&["x", "y"]))
            .unwrap();
        b.add_alternative("low", &[1.0, 1.0]).unwrap();
        b.add_alternative("high", &[2.0, 2.0]).unwrap();
        let res = b.run().unwrap();
        assert_eq!(res.scores(), vec![0.0, 1.0]);
        assert_eq!(res.ranks(), vec![2, 1]);
    }

    #[test]
    fn shape_checks() {
        assert!(matches!(
            Builder::new(&TopsisRules::DEFAULT_RULES)
                .unwrap()
                .criteria(&names(&["x"])),
            Err(TopsisError::Schema { .. })
        ));
        let mut b = Builder::new(&TopsisRules::DEFAULT_RULES)
            .unwrap()
            .criteria(&names(&["x", "y"]))
            .unwrap();
        assert!(matches!(
            b.add_alternative("a", &[1.0, 2.0, 3.0]),
            Err(TopsisError::Schema { .. })
        ));
        // Non-finite values are caught by the engine.
        b.add_alternative("a", &[f64::NAN, 2.0]).unwrap();
        b.add_alternative("b", &[1.0, 3.0]).unwrap();
        assert!(matches!(b.run(), Err(TopsisError::Parse { .. })));
    }
}
