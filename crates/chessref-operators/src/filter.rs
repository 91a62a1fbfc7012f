//! Filter operator with simple predicate evaluation.
//!
//! Supports expressions of the form: "col OP literal" where OP ∈ {==, !=, <, <=, >, >=}.
//! The literal runs to the end of the expression, so it may contain spaces
//! ("opening_name == Queen's Gambit Declined").

use chessref_core::table::Table;
use chessref_core::types::Scalar;

use crate::traits::{expect_inputs, OpError, Operator};

#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Simple predicate expression: "column op literal"
    pub expr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
struct Predicate {
    column: String,
    op: CmpOp,
    literal: String,
}

impl Filter {
    pub fn new(expr: impl Into<String>) -> Self {
        Self { expr: expr.into() }
    }

    pub fn apply(&self, table: &Table) -> Result<Table, OpError> {
        let pred = parse_simple_predicate(&self.expr)?;
        table.require(&pred.column)?;

        let mut out = table.clone();
        out.retain(|r| {
            r.get(&pred.column)
                .map(|v| eval_predicate(v, pred.op, &pred.literal))
                .unwrap_or(false)
        });
        tracing::debug!(expr = %self.expr, kept = out.len(), of = table.len(), "filter");
        Ok(out)
    }
}

impl Operator for Filter {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn eval(&self, inputs: &[&Table]) -> Result<Table, OpError> {
        expect_inputs(self, inputs)?;
        self.apply(inputs[0])
    }
}

/// Parse a simple predicate like "count > 18" or "opening_name == Reti Opening".
/// The leftmost operator wins; at equal positions the two-character form wins.
fn parse_simple_predicate(expr: &str) -> Result<Predicate, OpError> {
    const OPS: [(&str, CmpOp); 6] = [
        ("==", CmpOp::Eq),
        ("!=", CmpOp::Ne),
        ("<=", CmpOp::Le),
        (">=", CmpOp::Ge),
        ("<", CmpOp::Lt),
        (">", CmpOp::Gt),
    ];

    let found = OPS
        .iter()
        .filter_map(|(tok, op)| expr.find(tok).map(|pos| (pos, *tok, *op)))
        .min_by_key(|(pos, tok, _)| (*pos, usize::MAX - tok.len()));

    let Some((pos, tok, op)) = found else {
        return Err(OpError::Exec(format!("unparseable predicate: {}", expr)));
    };
    let column = expr[..pos].trim().to_string();
    if column.is_empty() {
        return Err(OpError::Exec(format!("predicate has no column: {}", expr)));
    }
    let literal = expr[pos + tok.len()..].trim().to_string();
    Ok(Predicate {
        column,
        op,
        literal,
    })
}

/// Evaluate a simple comparison predicate. Numbers compare numerically when
/// both sides are numeric, everything else compares as text. Nulls never match.
fn eval_predicate(val: &Scalar, op: CmpOp, literal: &str) -> bool {
    use std::cmp::Ordering;

    let ord = match val {
        Scalar::Null => return false,
        Scalar::Int(_) | Scalar::Float(_) | Scalar::Str(_) => {
            match (val.as_f64(), literal.parse::<f64>().ok()) {
                // A NaN literal compares with nothing.
                (Some(x), Some(y)) => match x.partial_cmp(&y) {
                    Some(o) => o,
                    None => return false,
                },
                _ => val.to_string().as_str().cmp(literal),
            }
        }
        Scalar::Bool(b) => match literal.parse::<bool>() {
            Ok(l) => b.cmp(&l),
            Err(_) => return false,
        },
    };

    match op {
        CmpOp::Eq => ord == Ordering::Equal,
        CmpOp::Ne => ord != Ordering::Equal,
        CmpOp::Lt => ord == Ordering::Less,
        CmpOp::Le => ord != Ordering::Greater,
        CmpOp::Gt => ord == Ordering::Greater,
        CmpOp::Ge => ord != Ordering::Less,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chessref_core::record;

    fn games() -> Table {
        Table::from_records(vec![
            record! { "opening_name" => "Reti Opening", "turns" => "40" },
            record! { "opening_name" => "English Opening", "turns" => "12" },
            record! { "opening_name" => "Reti Opening", "turns" => "7" },
        ])
        .unwrap()
    }

    #[test]
    fn literal_may_contain_spaces() {
        let out = Filter::new("opening_name == Reti Opening").apply(&games()).unwrap();
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn numeric_text_compares_numerically() {
        let out = Filter::new("turns >= 12").apply(&games()).unwrap();
        assert_eq!(out.len(), 2);
        let out = Filter::new("turns < 12").apply(&games()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn parser_prefers_two_character_operators() {
        let p = parse_simple_predicate("a <= 5").unwrap();
        assert_eq!(p.op, CmpOp::Le);
        assert_eq!(p.column, "a");
        assert_eq!(p.literal, "5");
        assert!(parse_simple_predicate("no operator here").is_err());
        assert!(parse_simple_predicate("== x").is_err());
    }

    #[test]
    fn unknown_column_is_schema_error() {
        assert!(matches!(
            Filter::new("rating > 2500").apply(&games()),
            Err(OpError::Schema(_))
        ));
    }

    #[test]
    fn nulls_never_match() {
        assert!(!eval_predicate(&Scalar::Null, CmpOp::Ne, "x"));
        assert!(eval_predicate(&Scalar::Bool(true), CmpOp::Eq, "true"));
    }

    #[test]
    fn tiny_numbers_are_not_equal_to_zero() {
        let v = Scalar::from("0.0000000000000001");
        assert!(!eval_predicate(&v, CmpOp::Eq, "0"));
        assert!(eval_predicate(&v, CmpOp::Gt, "0"));
        assert!(eval_predicate(&Scalar::Float(1e-300), CmpOp::Ne, "0"));
        assert!(eval_predicate(&Scalar::Int(3), CmpOp::Eq, "3.0"));
        assert!(!eval_predicate(&Scalar::Int(3), CmpOp::Ne, "NaN"));
    }
}
