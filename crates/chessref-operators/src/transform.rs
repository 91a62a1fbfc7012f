//! Derived columns.
//!
//! `Transform` calls a caller-supplied function once per record and writes
//! the result into a target column. The engine does not guard the function:
//! a panic inside it propagates. Functions that can meet bad input (missing
//! lookups, division by zero, text where a number is expected) should be
//! built with `Transform::with_fallback`, which substitutes a sentinel.

use std::collections::HashMap;

use chessref_core::record::Record;
use chessref_core::table::Table;
use chessref_core::types::{Scalar, ScalarKey};

use crate::traits::{expect_inputs, OpError, Operator};

pub struct Transform<F> {
    pub source: String,
    pub target: String,
    f: F,
}

impl<F> Transform<F>
where
    F: Fn(&Record, &str) -> Scalar,
{
    pub fn new(source: impl Into<String>, target: impl Into<String>, f: F) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            f,
        }
    }

    /// Write `f(record, source)` into `target` on every record. `source` is
    /// left untouched unless it is also the target.
    pub fn apply(&self, table: &mut Table) -> Result<(), OpError> {
        table.require(&self.source)?;
        let values: Vec<Scalar> = table.iter().map(|r| (self.f)(r, &self.source)).collect();
        table.set_column(&self.target, values)?;
        tracing::trace!(source = %self.source, target = %self.target, rows = table.len(), "transform");
        Ok(())
    }
}

impl Transform<()> {
    /// Build a transform whose function may decline (`None`); declined
    /// records receive `fallback`.
    pub fn with_fallback<G>(
        source: impl Into<String>,
        target: impl Into<String>,
        fallback: Scalar,
        g: G,
    ) -> Transform<impl Fn(&Record, &str) -> Scalar>
    where
        G: Fn(&Record, &str) -> Option<Scalar>,
    {
        Transform::new(source, target, move |r: &Record, c: &str| {
            g(r, c).unwrap_or_else(|| fallback.clone())
        })
    }
}

impl<F> std::fmt::Debug for Transform<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transform")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl<F> Operator for Transform<F>
where
    F: Fn(&Record, &str) -> Scalar,
{
    fn name(&self) -> &'static str {
        "transform"
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError> {
        expect_inputs(self, inputs)?;
        let mut out = inputs[0].clone();
        self.apply(&mut out)?;
        Ok(out)
    }
}

/// Multiply a numeric column by a constant; non-numeric values yield `None`.
pub fn scale(factor: f64) -> impl Fn(&Record, &str) -> Option<Scalar> {
    move |r: &Record, c: &str| {
        let v = r.get(c)?.as_f64()?;
        Some(Scalar::Float(v * factor))
    }
}

/// `round(record[source] / lookup[record[record_key]] * factor)`.
///
/// Used to express a per-country count relative to the country's total
/// player base. Missing lookups, zero denominators and non-numeric values
/// all decline, so pair it with `Transform::with_fallback`.
#[derive(Debug, Clone)]
pub struct NormalizeBy {
    lookup: HashMap<ScalarKey, f64>,
    pub record_key: String,
    pub factor: f64,
}

impl NormalizeBy {
    pub fn new(record_key: impl Into<String>, factor: f64) -> Self {
        Self {
            lookup: HashMap::new(),
            record_key: record_key.into(),
            factor,
        }
    }

    /// Fill the denominator lookup from two columns of `table`. Rows whose
    /// value column is not numeric are skipped; later rows win on duplicate keys.
    pub fn with_lookup_table(
        mut self,
        table: &Table,
        key_column: &str,
        value_column: &str,
    ) -> Result<Self, OpError> {
        table.require(key_column)?;
        table.require(value_column)?;
        for record in table {
            let key = record.try_get(key_column)?.key();
            if let Some(v) = record.try_get(value_column)?.as_f64() {
                self.lookup.insert(key, v);
            }
        }
        Ok(self)
    }

    pub fn with_lookup(mut self, key: &Scalar, value: f64) -> Self {
        self.lookup.insert(key.key(), value);
        self
    }

    pub fn compute(&self, record: &Record, source: &str) -> Option<Scalar> {
        let numerator = record.get(source)?.as_f64()?;
        let denominator = *self.lookup.get(&record.get(&self.record_key)?.key())?;
        if denominator == 0.0 {
            return None;
        }
        // Exact halves go to the even neighbour.
        let v = (numerator / denominator * self.factor).round_ties_even();
        if v.is_finite() {
            Some(Scalar::Int(v as i64))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessref_core::record;

    fn gm_counts() -> Table {
        Table::from_records(vec![
            record! { "country" => "Russia", "count" => 2i64 },
            record! { "country" => "Atlantis", "count" => 1i64 },
            record! { "country" => "Norway", "count" => "?" },
        ])
        .unwrap()
    }

    #[test]
    fn writes_new_column_and_keeps_source() {
        let mut t = gm_counts();
        Transform::new("count", "label", |r: &Record, c: &str| {
            Scalar::Str(format!("{}!", r.get(c).map(|v| v.to_string()).unwrap_or_default()))
        })
        .apply(&mut t)
        .unwrap();
        assert_eq!(t.header().unwrap(), vec!["country", "count", "label"]);
        assert_eq!(t.records()[0].get("count"), Some(&Scalar::Int(2)));
        assert_eq!(t.records()[0].get("label"), Some(&Scalar::from("2!")));
    }

    #[test]
    fn normalisation_falls_back_on_missing_and_invalid() {
        let norm = NormalizeBy::new("country", 10_000.0)
            .with_lookup(&Scalar::from("Russia"), 3.0)
            .with_lookup(&Scalar::from("Norway"), 5.0);
        let mut t = gm_counts();
        Transform::with_fallback("count", "count_normal", Scalar::Int(0), move |r, c| {
            norm.compute(r, c)
        })
        .apply(&mut t)
        .unwrap();
        let got: Vec<_> = t.iter().map(|r| r.get("count_normal").cloned()).collect();
        assert_eq!(
            got,
            vec![
                Some(Scalar::Int(6667)),
                Some(Scalar::Int(0)),
                Some(Scalar::Int(0)),
            ]
        );
    }

    #[test]
    fn zero_denominator_declines() {
        let norm = NormalizeBy::new("country", 1.0).with_lookup(&Scalar::from("Russia"), 0.0);
        assert_eq!(norm.compute(&gm_counts().records()[0], "count"), None);
    }

    #[test]
    fn lookup_table_supplies_denominators() {
        let totals = Table::from_records(vec![
            record! { "country name" => "Russia", "total players" => "4" },
        ])
        .unwrap();
        let norm = NormalizeBy::new("country", 100.0)
            .with_lookup_table(&totals, "country name", "total players")
            .unwrap();
        assert_eq!(
            norm.compute(&gm_counts().records()[0], "count"),
            Some(Scalar::Int(50))
        );
    }

    #[test]
    fn exact_halves_round_to_even() {
        let norm = NormalizeBy::new("country", 1.0)
            .with_lookup(&Scalar::from("Russia"), 4.0)
            .with_lookup(&Scalar::from("Norway"), 4.0);
        let t = Table::from_records(vec![
            record! { "country" => "Russia", "count" => 2i64 },
            record! { "country" => "Norway", "count" => 10i64 },
        ])
        .unwrap();
        let got: Vec<_> = t.iter().map(|r| norm.compute(r, "count")).collect();
        assert_eq!(got, vec![Some(Scalar::Int(0)), Some(Scalar::Int(2))]);
    }

    #[test]
    fn scale_multiplies_numbers() {
        let f = scale(0.5);
        assert_eq!(
            f(&gm_counts().records()[0], "count"),
            Some(Scalar::Float(1.0))
        );
        assert_eq!(f(&gm_counts().records()[2], "count"), None);
    }

    #[test]
    fn missing_source_is_schema_error() {
        let mut t = gm_counts();
        let err = Transform::new("rating", "x", |_: &Record, _: &str| Scalar::Null)
            .apply(&mut t)
            .unwrap_err();
        assert!(matches!(err, OpError::Schema(_)));
    }
}
