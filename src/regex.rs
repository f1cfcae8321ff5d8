use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::graph::Merge;
use crate::show::Show;

/// A regular expression over `char` literals.
///
/// The two constant expressions are deliberately kept apart: [`Regex::Empty`]
/// is the empty language ∅ matching no word at all, while [`Regex::Epsilon`]
/// is the empty word ε. During state elimination an absent edge folds to ∅
/// ("no such path"), which must not be confused with an edge that consumes
/// nothing.
///
/// Composite expressions are built through [`Regex::concatenate`],
/// [`Regex::alternate`] and [`Regex::star`], which collapse the identities of
/// the algebra instead of accreting degenerate nodes. Equality is structural.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Regex {
    /// The empty language ∅.
    Empty,
    /// The empty word ε.
    Epsilon,
    /// A single literal symbol.
    Literal(char),
    /// Concatenation of two expressions.
    Concat(Box<Regex>, Box<Regex>),
    /// Alternation of two expressions.
    Alt(Box<Regex>, Box<Regex>),
    /// Kleene star of an expression.
    Star(Box<Regex>),
}

impl Regex {
    /// Concatenates two expressions. ∅ absorbs the whole product and ε
    /// vanishes, so no `Concat` node ever carries either constant.
    pub fn concatenate(self, other: Regex) -> Regex {
        match (self, other) {
            (Regex::Empty, _) | (_, Regex::Empty) => Regex::Empty,
            (Regex::Epsilon, x) | (x, Regex::Epsilon) => x,
            (x, y) => Regex::Concat(Box::new(x), Box::new(y)),
        }
    }

    /// Combines two expressions into an alternative. ∅ is the neutral
    /// element and structurally equal alternatives collapse into one.
    pub fn alternate(self, other: Regex) -> Regex {
        match (self, other) {
            (Regex::Empty, x) | (x, Regex::Empty) => x,
            (x, y) if x == y => x,
            (x, y) => Regex::Alt(Box::new(x), Box::new(y)),
        }
    }

    /// Iterates the expression. Starring either constant gives ε, since zero
    /// repetitions always match the empty word, and an iterated expression
    /// stays iterated.
    pub fn star(self) -> Regex {
        match self {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            Regex::Star(inner) => Regex::Star(inner),
            x => Regex::Star(Box::new(x)),
        }
    }

    /// Whether this is the empty language ∅.
    pub fn is_empty(&self) -> bool {
        matches!(self, Regex::Empty)
    }

    fn precedence(&self) -> u8 {
        match self {
            Regex::Alt(_, _) => 1,
            Regex::Concat(_, _) => 2,
            Regex::Star(_) => 3,
            _ => 4,
        }
    }

    fn fmt_with_precedence(&self, f: &mut fmt::Formatter<'_>, enclosing: u8) -> fmt::Result {
        let brackets = self.precedence() < enclosing;
        if brackets {
            write!(f, "(")?;
        }
        match self {
            Regex::Empty => write!(f, "∅")?,
            Regex::Epsilon => write!(f, "ε")?,
            Regex::Literal(sym) => write!(f, "{sym}")?,
            Regex::Concat(x, y) => {
                x.fmt_with_precedence(f, 2)?;
                y.fmt_with_precedence(f, 2)?;
            }
            Regex::Alt(x, y) => {
                x.fmt_with_precedence(f, 1)?;
                y.fmt_with_precedence(f, 1)?;
            }
            Regex::Star(x) => {
                x.fmt_with_precedence(f, 4)?;
                write!(f, "*")?;
            }
        }
        if brackets {
            write!(f, ")")?;
        }
        Ok(())
    }
}

impl From<char> for Regex {
    fn from(sym: char) -> Self {
        Regex::Literal(sym)
    }
}

/// Edges between an already connected pair of vertices always merge, by
/// alternating their expressions. This is what keeps expression graphs at
/// one edge per vertex pair.
impl Merge for Regex {
    fn merge(&self, incoming: &Self) -> Option<Self> {
        Some(self.clone().alternate(incoming.clone()))
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with_precedence(f, 0)
    }
}

impl Show for Regex {
    fn show(&self) -> String {
        self.to_string()
    }
}

/// The reasons parsing a pattern can fail. Bracket problems are hard errors
/// surfaced immediately, a pattern never parses partially.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// An opening bracket is never closed.
    #[error("unbalanced brackets, missing `)`")]
    MissingClosingBracket,
    /// A character shows up where it cannot belong, for example a closing
    /// bracket that was never opened or an operator without operand.
    #[error("unexpected character `{0}` in pattern")]
    UnexpectedChar(char),
    /// The pattern ends where an operand is still required.
    #[error("pattern ended unexpectedly")]
    UnexpectedEnd,
}

/// Recursive descent parser for the pattern syntax: `+` alternation,
/// juxtaposition concatenation, postfix `*` and brackets, plus the literal
/// constants `ε` and `∅`. Any other character is a literal symbol.
struct Parser<'a> {
    input: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            input: pattern.chars().peekable(),
        }
    }

    fn parse(mut self) -> Result<Regex, ParseError> {
        if self.input.peek().is_none() {
            return Ok(Regex::Epsilon);
        }
        let expr = self.alternation()?;
        match self.input.next() {
            None => Ok(expr),
            Some(sym) => Err(ParseError::UnexpectedChar(sym)),
        }
    }

    fn alternation(&mut self) -> Result<Regex, ParseError> {
        let mut expr = self.concatenation()?;
        while self.input.peek() == Some(&'+') {
            self.input.next();
            expr = expr.alternate(self.concatenation()?);
        }
        Ok(expr)
    }

    fn concatenation(&mut self) -> Result<Regex, ParseError> {
        let mut expr = self.repetition()?;
        while let Some(&sym) = self.input.peek() {
            if sym == '+' || sym == ')' {
                break;
            }
            expr = expr.concatenate(self.repetition()?);
        }
        Ok(expr)
    }

    fn repetition(&mut self) -> Result<Regex, ParseError> {
        let mut expr = self.atom()?;
        while self.input.peek() == Some(&'*') {
            self.input.next();
            expr = expr.star();
        }
        Ok(expr)
    }

    fn atom(&mut self) -> Result<Regex, ParseError> {
        match self.input.next() {
            None => Err(ParseError::UnexpectedEnd),
            Some('(') => {
                let inner = if self.input.peek() == Some(&')') {
                    Regex::Epsilon
                } else {
                    self.alternation()?
                };
                match self.input.next() {
                    Some(')') => Ok(inner),
                    Some(sym) => Err(ParseError::UnexpectedChar(sym)),
                    None => Err(ParseError::MissingClosingBracket),
                }
            }
            Some(sym @ ('*' | ')' | '+')) => Err(ParseError::UnexpectedChar(sym)),
            Some('∅') => Ok(Regex::Empty),
            Some('ε') => Ok(Regex::Epsilon),
            Some(sym) => Ok(Regex::Literal(sym)),
        }
    }
}

impl FromStr for Regex {
    type Err = ParseError;

    /// Parses a pattern, validating it completely: unbalanced brackets and
    /// misplaced operators are rejected at construction. The empty pattern
    /// parses to ε.
    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Parser::new(pattern).parse()
    }
}
