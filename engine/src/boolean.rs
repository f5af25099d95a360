//! Boolean query evaluation over the inverted index.
//!
//! Grammar: `expr := term | NOT expr | expr AND expr | expr OR expr | ( expr )`.
//! Keywords are case-insensitive. Precedence low to high: OR, AND, NOT; NOT
//! is a unary prefix operator, AND and OR are left-associative. A query is
//! tokenized into a typed stream, leaf tokens are expanded through the lemma
//! table, the stream is converted to postfix with a shunting-yard pass, and
//! the postfix form is evaluated with a stack of posting sets.

use crate::error::QueryError;
use crate::index::{DocId, InvertedIndex};
use crate::lemma::LemmaTable;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fmt;

lazy_static! {
    static ref QUERY_RE: Regex =
        Regex::new(r"(?u)\(|\)|[\p{L}\p{N}_]+").expect("valid regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    And,
    Or,
    Not,
}

impl Op {
    /// Binding strength, higher binds tighter. Expressed as data so the
    /// parser has no per-operator branching.
    fn precedence(self) -> u8 {
        match self {
            Op::Or => 1,
            Op::And => 2,
            Op::Not => 3,
        }
    }

    /// NOT is a unary prefix operator; stacked `NOT NOT x` must nest
    /// rightward rather than pop its predecessor.
    fn right_associative(self) -> bool {
        matches!(self, Op::Not)
    }

    fn keyword(self) -> &'static str {
        match self {
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
        }
    }

    fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Op::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Op::Or)
        } else if word.eq_ignore_ascii_case("not") {
            Some(Op::Not)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tok {
    LParen,
    RParen,
    Op(Op),
    Term(String),
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::LParen => f.write_str("("),
            Tok::RParen => f.write_str(")"),
            Tok::Op(op) => f.write_str(op.keyword()),
            Tok::Term(term) => f.write_str(term),
        }
    }
}

pub fn tokenize(query: &str) -> Vec<Tok> {
    QUERY_RE
        .find_iter(query)
        .map(|m| match m.as_str() {
            "(" => Tok::LParen,
            ")" => Tok::RParen,
            word => match Op::from_keyword(word) {
                Some(op) => Tok::Op(op),
                None => Tok::Term(word.to_lowercase()),
            },
        })
        .collect()
}

/// Replace each leaf with its lemma expansion: a multi-term lemma becomes a
/// parenthesized OR-group over its surface terms, a single-term lemma
/// becomes that term, anything else stays literal.
pub fn expand(tokens: Vec<Tok>, lemmas: &LemmaTable) -> Vec<Tok> {
    let mut out = Vec::with_capacity(tokens.len());
    for tok in tokens {
        let Tok::Term(leaf) = tok else {
            out.push(tok);
            continue;
        };
        match lemmas.surface_terms(&leaf) {
            Some(terms) if terms.len() > 1 => {
                out.push(Tok::LParen);
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        out.push(Tok::Op(Op::Or));
                    }
                    out.push(Tok::Term(term.clone()));
                }
                out.push(Tok::RParen);
            }
            Some(terms) => match terms.iter().next() {
                Some(term) => out.push(Tok::Term(term.clone())),
                None => out.push(Tok::Term(leaf)),
            },
            None => out.push(Tok::Term(leaf)),
        }
    }
    out
}

pub fn render(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(Tok::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Shunting-yard conversion of the infix token stream to postfix.
pub fn to_postfix(tokens: Vec<Tok>) -> Result<Vec<Tok>, QueryError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Tok> = Vec::new();
    for tok in tokens {
        match tok {
            Tok::Term(_) => output.push(tok),
            Tok::LParen => operators.push(tok),
            Tok::RParen => loop {
                match operators.pop() {
                    Some(Tok::LParen) => break,
                    Some(op) => output.push(op),
                    None => return Err(QueryError::UnbalancedParens),
                }
            },
            Tok::Op(op) => {
                while let Some(Tok::Op(top)) = operators.last() {
                    let pops = if op.right_associative() {
                        top.precedence() > op.precedence()
                    } else {
                        top.precedence() >= op.precedence()
                    };
                    if !pops {
                        break;
                    }
                    let top = operators.pop().expect("stack top just observed");
                    output.push(top);
                }
                operators.push(Tok::Op(op));
            }
        }
    }
    while let Some(tok) = operators.pop() {
        match tok {
            Tok::LParen => return Err(QueryError::UnbalancedParens),
            op => output.push(op),
        }
    }
    Ok(output)
}

/// Evaluate a postfix sequence with a stack of posting sets. AND is set
/// intersection, OR is union, NOT is the complement against the full
/// universe of document ids. Unknown leaf terms resolve to the empty set.
pub fn evaluate_postfix(
    postfix: Vec<Tok>,
    index: &InvertedIndex,
) -> Result<BTreeSet<DocId>, QueryError> {
    let mut stack: Vec<BTreeSet<DocId>> = Vec::new();
    let mut universe: Option<BTreeSet<DocId>> = None;
    for tok in postfix {
        match tok {
            Tok::Term(term) => {
                stack.push(index.postings_for(&term).cloned().unwrap_or_default());
            }
            Tok::Op(op @ Op::Not) => {
                let operand = stack
                    .pop()
                    .ok_or(QueryError::MissingOperand(op.keyword()))?;
                let universe = universe.get_or_insert_with(|| index.universe());
                stack.push(universe.difference(&operand).copied().collect());
            }
            Tok::Op(op) => {
                let right = stack
                    .pop()
                    .ok_or(QueryError::MissingOperand(op.keyword()))?;
                let left = stack
                    .pop()
                    .ok_or(QueryError::MissingOperand(op.keyword()))?;
                let combined = match op {
                    Op::And => left.intersection(&right).copied().collect(),
                    Op::Or => left.union(&right).copied().collect(),
                    Op::Not => unreachable!("handled above"),
                };
                stack.push(combined);
            }
            Tok::LParen | Tok::RParen => return Err(QueryError::UnbalancedParens),
        }
    }
    match stack.len() {
        0 => Err(QueryError::EmptyExpression),
        1 => Ok(stack.pop().expect("stack has one element")),
        _ => Err(QueryError::MissingOperator),
    }
}

/// Full pipeline: tokenize, lemma-expand, parse, evaluate. The match set is
/// returned in ascending document-id order.
pub fn evaluate(
    query: &str,
    index: &InvertedIndex,
    lemmas: &LemmaTable,
) -> Result<Vec<DocId>, QueryError> {
    let tokens = expand(tokenize(query), lemmas);
    tracing::debug!(expanded = %render(&tokens), "expanded boolean query");
    let postfix = to_postfix(tokens)?;
    let matched = evaluate_postfix(postfix, index)?;
    Ok(matched.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_keywords_case_insensitively() {
        let toks = tokenize("Wolf and (hare OR not fox)");
        assert_eq!(
            toks,
            vec![
                Tok::Term("wolf".into()),
                Tok::Op(Op::And),
                Tok::LParen,
                Tok::Term("hare".into()),
                Tok::Op(Op::Or),
                Tok::Op(Op::Not),
                Tok::Term("fox".into()),
                Tok::RParen,
            ]
        );
    }

    #[test]
    fn postfix_respects_precedence() {
        // a OR b AND c  =>  a b c AND OR
        let postfix = to_postfix(tokenize("a OR b AND c")).unwrap();
        assert_eq!(render(&postfix), "a b c AND OR");
    }

    #[test]
    fn stacked_not_nests_rightward() {
        let postfix = to_postfix(tokenize("NOT NOT a")).unwrap();
        assert_eq!(render(&postfix), "a NOT NOT");
    }

    #[test]
    fn unbalanced_parens_are_rejected() {
        assert_eq!(
            to_postfix(tokenize("(a AND b")),
            Err(QueryError::UnbalancedParens)
        );
        assert_eq!(
            to_postfix(tokenize("a AND b)")),
            Err(QueryError::UnbalancedParens)
        );
    }
}
