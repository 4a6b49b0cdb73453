//! Closed expression grammar shared by the fallback evaluator and argument evaluation.
//!
//! Expressions can include number and string literals, identifiers, list and
//! tuple literals, arithmetic, and the `time()` accessor. There are no
//! statements and no other function calls.

use ahash::AHashMap;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{alpha1, alphanumeric1, char, digit0, digit1, multispace0, one_of},
    combinator::{all_consuming, map, map_res, opt, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use std::fmt;
use thiserror::Error;

use crate::core::types::Clock;

/// Name of the only callable in the grammar
pub const TIME_ACCESSOR: &str = "time";

/// Deepest expression tree `Expr::parse` accepts
pub const MAX_NESTING_DEPTH: usize = 64;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinOp {
    fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }

    fn precedence(self) -> u8 {
        match self {
            BinOp::Add | BinOp::Sub => 1,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 2,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
}

/// Expression AST node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal (e.g., 0.3)
    Number(f64),
    /// A quoted string literal
    Str(String),
    /// A bare identifier (effect/color name, constant, null sentinel)
    Ident(String),
    /// A list or tuple literal
    List(Vec<Expr>),
    /// A binary operation (e.g., left * right)
    BinOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A unary operation (e.g., -x)
    UnaryOp { op: UnaryOp, operand: Box<Expr> },
    /// A function call; only `time()` evaluates
    Call { name: String, args: Vec<Expr> },
}

/// Result of evaluating an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "None"),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Error type for expression evaluation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Referenced an identifier that has no binding
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),
    /// Called a function that doesn't exist
    #[error("Unknown function: {0}")]
    UnknownFunction(String),
    /// Attempted to divide by zero
    #[error("Division by zero")]
    DivisionByZero,
    /// Function called with wrong number of arguments
    #[error("Function {func} expected {expected} args, got {got}")]
    InvalidArgCount {
        func: String,
        expected: usize,
        got: usize,
    },
    /// Arithmetic applied to something that is not a number
    #[error("Operator {op} needs numbers, got {left} and {right}")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },
    /// Unbound identifiers kept appearing past the retry cap
    #[error("Gave up after binding {0} unknown identifiers")]
    RetriesExhausted(usize),
}

/// Error type for expression parsing
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Parse error: {message}")]
pub struct ExprParseError {
    pub message: String,
}

/// Identifier bindings visible during evaluation
pub struct Bindings<'c> {
    values: AHashMap<String, Value>,
    clock: &'c dyn Clock,
}

impl<'c> Bindings<'c> {
    pub fn new(clock: &'c dyn Clock) -> Self {
        Self {
            values: AHashMap::new(),
            clock,
        }
    }

    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn now(&self) -> f64 {
        self.clock.now_secs()
    }

    /// Evaluate, binding each unknown identifier to its own name and retrying
    ///
    /// Gives up with `RetriesExhausted` once `max_retries` names have been
    /// bound and another unknown one still turns up. Returns the value and the
    /// names that were bound along the way.
    pub fn eval_binding_unknowns(
        &mut self,
        expr: &Expr,
        max_retries: usize,
    ) -> Result<(Value, Vec<String>), EvalError> {
        let mut bound = Vec::new();
        loop {
            match expr.eval(self) {
                Ok(value) => return Ok((value, bound)),
                Err(EvalError::UnknownIdentifier(name)) => {
                    if bound.len() >= max_retries {
                        return Err(EvalError::RetriesExhausted(bound.len()));
                    }
                    self.bind(name.clone(), Value::Text(name.clone()));
                    bound.push(name);
                }
                Err(other) => return Err(other),
            }
        }
    }
}

impl Expr {
    /// Parse a complete expression; trailing input is an error
    ///
    /// Input nested deeper than `MAX_NESTING_DEPTH` is rejected before the
    /// grammar runs.
    pub fn parse(input: &str) -> Result<Expr, ExprParseError> {
        let depth = nesting_depth(input);
        if depth > MAX_NESTING_DEPTH {
            return Err(ExprParseError {
                message: format!(
                    "nesting depth {} exceeds the limit of {}",
                    depth, MAX_NESTING_DEPTH
                ),
            });
        }
        match all_consuming(ws(expression)).parse(input) {
            Ok((_, expr)) => Ok(expr),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(ExprParseError {
                message: if e.input.trim().is_empty() {
                    "unexpected end of input".to_string()
                } else {
                    format!("unexpected input at '{}'", snippet(e.input))
                },
            }),
            Err(nom::Err::Incomplete(_)) => Err(ExprParseError {
                message: "incomplete input".to_string(),
            }),
        }
    }

    /// Evaluate against the given bindings
    pub fn eval(&self, bindings: &Bindings<'_>) -> Result<Value, EvalError> {
        match self {
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Str(s) => Ok(Value::Text(s.clone())),
            Expr::Ident(name) => bindings
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::UnknownIdentifier(name.clone())),
            Expr::List(items) => items
                .iter()
                .map(|item| item.eval(bindings))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
            Expr::BinOp { op, left, right } => {
                let l = left.eval(bindings)?;
                let r = right.eval(bindings)?;
                match (&l, &r) {
                    (Value::Number(a), Value::Number(b)) => apply_binop(*op, *a, *b),
                    _ => Err(EvalError::TypeMismatch {
                        op: op.symbol().to_string(),
                        left: l.to_string(),
                        right: r.to_string(),
                    }),
                }
            }
            Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand,
            } => match operand.eval(bindings)? {
                Value::Number(n) => Ok(Value::Number(-n)),
                other => Err(EvalError::TypeMismatch {
                    op: "-".to_string(),
                    left: String::new(),
                    right: other.to_string(),
                }),
            },
            Expr::Call { name, args } => {
                if name != TIME_ACCESSOR {
                    return Err(EvalError::UnknownFunction(name.clone()));
                }
                if !args.is_empty() {
                    return Err(EvalError::InvalidArgCount {
                        func: name.clone(),
                        expected: 0,
                        got: args.len(),
                    });
                }
                Ok(Value::Number(bindings.now()))
            }
        }
    }

    /// True if evaluating this expression reads the clock
    pub fn is_time_dependent(&self) -> bool {
        match self {
            Expr::Ident(name) => name == TIME_ACCESSOR,
            Expr::Call { name, .. } => name == TIME_ACCESSOR,
            Expr::List(items) => items.iter().any(Expr::is_time_dependent),
            Expr::BinOp { left, right, .. } => left.is_time_dependent() || right.is_time_dependent(),
            Expr::UnaryOp { operand, .. } => operand.is_time_dependent(),
            Expr::Number(_) | Expr::Str(_) => false,
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Expr::BinOp { op, .. } => op.precedence(),
            Expr::UnaryOp { .. } => 3,
            _ => 4,
        }
    }
}

fn apply_binop(op: BinOp, a: f64, b: f64) -> Result<Value, EvalError> {
    let result = match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinOp::Mod => {
            if b == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            a.rem_euclid(b)
        }
    };
    Ok(Value::Number(result))
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Overflowing literals read back as infinity
            Expr::Number(n) if n.is_infinite() => write!(f, "1e999"),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Str(s) => {
                if s.contains('\'') {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "'{}'", s)
                }
            }
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::List(items) => {
                write!(f, "[")?;
                write_joined(f, items)?;
                write!(f, "]")
            }
            Expr::BinOp { op, left, right } => {
                let prec = op.precedence();
                if left.precedence() < prec {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }
                write!(f, " {} ", op.symbol())?;
                // Right operand of equal precedence needs parens: a - (b - c)
                if right.precedence() <= prec {
                    write!(f, "({})", right)
                } else {
                    write!(f, "{}", right)
                }
            }
            Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand,
            } => {
                if operand.precedence() < 3 {
                    write!(f, "-({})", operand)
                } else {
                    write!(f, "-{}", operand)
                }
            }
            Expr::Call { name, args } => {
                write!(f, "{}(", name)?;
                write_joined(f, args)?;
                write!(f, ")")
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

/// Upper bound on the depth of the tree `input` would parse into
///
/// Each bracket level, unary minus and binary operator adds a level; a comma
/// starts a fresh item at the current bracket level. String literals are
/// skipped.
fn nesting_depth(input: &str) -> usize {
    // (base, cost) of each enclosing bracket level
    let mut levels: Vec<(usize, usize)> = Vec::new();
    let mut base = 0;
    let mut cost = 0;
    let mut deepest = 0;
    let mut quote: Option<char> = None;

    for ch in input.chars() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' => quote = Some(ch),
            '(' | '[' => {
                levels.push((base, cost));
                base = cost + 1;
                cost = base;
            }
            ')' | ']' => {
                (base, cost) = levels.pop().unwrap_or((0, 0));
            }
            ',' => cost = base,
            '+' | '-' | '*' | '/' | '%' => cost += 1,
            _ => {}
        }
        deepest = deepest.max(cost);
    }
    deepest
}

fn snippet(input: &str) -> String {
    input.trim().chars().take(24).collect()
}

// === GRAMMAR ===

/// Surround a parser with optional whitespace
fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Parse an identifier (alphanumeric + underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

/// Unsigned decimal literal: `12`, `0.3`, `5.`, `.5`, `1e3`
fn number(input: &str) -> IResult<&str, Expr> {
    map(
        map_res(
            recognize((
                alt((
                    recognize((digit1, opt((char('.'), digit0)))),
                    recognize((char('.'), digit1)),
                )),
                opt((one_of("eE"), opt(one_of("+-")), digit1)),
            )),
            |s: &str| s.parse::<f64>(),
        ),
        Expr::Number,
    )
    .parse(input)
}

fn string_literal(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        |s: &str| Expr::Str(s.to_string()),
    )
    .parse(input)
}

/// Comma-separated items with an optional trailing comma
fn items(input: &str) -> IResult<&str, (Vec<Expr>, bool)> {
    let (input, items) = separated_list0(ws(char(',')), expression).parse(input)?;
    let (input, trailing) = opt(ws(char(','))).parse(input)?;
    Ok((input, (items, trailing.is_some())))
}

fn list_literal(input: &str) -> IResult<&str, Expr> {
    map(delimited(char('['), items, ws(char(']'))), |(items, _)| {
        Expr::List(items)
    })
    .parse(input)
}

/// `(x)` groups, `(x,)` and `(x, y)` are tuples (read as lists)
fn paren_or_tuple(input: &str) -> IResult<&str, Expr> {
    let (input, (mut items, trailing)) =
        delimited(char('('), items, ws(char(')'))).parse(input)?;
    if items.len() == 1 && !trailing {
        Ok((input, items.remove(0)))
    } else {
        Ok((input, Expr::List(items)))
    }
}

fn call_or_ident(input: &str) -> IResult<&str, Expr> {
    let (input, name) = identifier(input)?;
    let (input, args) = opt(delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        ws(char(')')),
    ))
    .parse(input)?;
    let expr = match args {
        Some(args) => Expr::Call {
            name: name.to_string(),
            args,
        },
        None => Expr::Ident(name.to_string()),
    };
    Ok((input, expr))
}

fn primary(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        number,
        string_literal,
        list_literal,
        paren_or_tuple,
        call_or_ident,
    )))
    .parse(input)
}

fn unary(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(ws(char('-')), unary), |operand| Expr::UnaryOp {
            op: UnaryOp::Neg,
            operand: Box::new(operand),
        }),
        primary,
    ))
    .parse(input)
}

/// Parse multiplication, division and modulo
fn term(input: &str) -> IResult<&str, Expr> {
    let (input, first) = unary(input)?;
    let (input, ops) = many0(pair(ws(one_of("*/%")), unary)).parse(input)?;

    let expr = ops.into_iter().fold(first, |acc, (op, right)| {
        let op = match op {
            '*' => BinOp::Mul,
            '/' => BinOp::Div,
            _ => BinOp::Mod,
        };
        Expr::BinOp {
            op,
            left: Box::new(acc),
            right: Box::new(right),
        }
    });

    Ok((input, expr))
}

/// Parse addition and subtraction
fn expression(input: &str) -> IResult<&str, Expr> {
    let (input, first) = term(input)?;
    let (input, ops) = many0(pair(ws(one_of("+-")), term)).parse(input)?;

    let expr = ops.into_iter().fold(first, |acc, (op, right)| Expr::BinOp {
        op: if op == '+' { BinOp::Add } else { BinOp::Sub },
        left: Box::new(acc),
        right: Box::new(right),
    });

    Ok((input, expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FixedClock;

    fn ident(name: &str) -> Expr {
        Expr::Ident(name.to_string())
    }

    #[test]
    fn test_literal_parsing() {
        assert_eq!(Expr::parse("42.5").unwrap(), Expr::Number(42.5));
        assert_eq!(Expr::parse("42").unwrap(), Expr::Number(42.0));
        assert_eq!(Expr::parse(".5").unwrap(), Expr::Number(0.5));
        assert_eq!(Expr::parse("1e3").unwrap(), Expr::Number(1000.0));
    }

    #[test]
    fn test_ident_parsing() {
        assert_eq!(Expr::parse("default_bpm").unwrap(), ident("default_bpm"));
        assert_eq!(Expr::parse("_x1").unwrap(), ident("_x1"));
    }

    #[test]
    fn test_string_literal_parsing() {
        assert_eq!(Expr::parse("'rainbow'").unwrap(), Expr::Str("rainbow".into()));
        assert_eq!(Expr::parse("\"it's\"").unwrap(), Expr::Str("it's".into()));
    }

    #[test]
    fn test_operator_precedence_mul_over_add() {
        // a + b * c should parse as a + (b * c)
        match Expr::parse("a + b * c").unwrap() {
            Expr::BinOp {
                op: BinOp::Add,
                left,
                right,
            } => {
                assert_eq!(*left, ident("a"));
                match *right {
                    Expr::BinOp {
                        op: BinOp::Mul,
                        left: inner_left,
                        right: inner_right,
                    } => {
                        assert_eq!(*inner_left, ident("b"));
                        assert_eq!(*inner_right, ident("c"));
                    }
                    other => panic!("Expected inner BinOp Mul, got {:?}", other),
                }
            }
            other => panic!("Expected BinOp Add, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_group_and_display_round_trip() {
        let expr = Expr::parse("(a + b) * c").unwrap();
        assert!(matches!(expr, Expr::BinOp { op: BinOp::Mul, .. }));
        assert_eq!(expr.to_string(), "(a + b) * c");

        let expr = Expr::parse("a - (b - c)").unwrap();
        assert_eq!(expr.to_string(), "a - (b - c)");
        assert_eq!(Expr::parse(&expr.to_string()).unwrap(), expr);
    }

    #[test]
    fn test_tuple_reads_as_list() {
        assert_eq!(
            Expr::parse("(1, 2)").unwrap(),
            Expr::List(vec![Expr::Number(1.0), Expr::Number(2.0)])
        );
        assert_eq!(Expr::parse("(1,)").unwrap(), Expr::List(vec![Expr::Number(1.0)]));
        assert_eq!(Expr::parse("(1)").unwrap(), Expr::Number(1.0));
    }

    #[test]
    fn test_nested_lists_with_whitespace() {
        let expr = Expr::parse(" [ [0, chase, [60, 10, 0.3]] , ] ").unwrap();
        match expr {
            Expr::List(outer) => {
                assert_eq!(outer.len(), 1);
                match &outer[0] {
                    Expr::List(inner) => {
                        assert_eq!(inner.len(), 3);
                        assert_eq!(inner[1], ident("chase"));
                    }
                    other => panic!("Expected inner list, got {:?}", other),
                }
            }
            other => panic!("Expected list, got {:?}", other),
        }
        assert_eq!(Expr::parse("[]").unwrap(), Expr::List(vec![]));
    }

    #[test]
    fn test_unary_negation() {
        let expr = Expr::parse("-x").unwrap();
        assert_eq!(
            expr,
            Expr::UnaryOp {
                op: UnaryOp::Neg,
                operand: Box::new(ident("x")),
            }
        );
        assert_eq!(Expr::parse("2 - -1").unwrap().to_string(), "2 - -1");
    }

    #[test]
    fn test_time_call_parsing() {
        assert_eq!(
            Expr::parse("time()").unwrap(),
            Expr::Call {
                name: "time".into(),
                args: vec![]
            }
        );
        assert!(Expr::parse("time() % 4").unwrap().is_time_dependent());
        assert!(!Expr::parse("[1, a]").unwrap().is_time_dependent());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Expr::parse("").is_err());
        assert!(Expr::parse("[1, 2").is_err());
        assert!(Expr::parse("1 +").is_err());
        assert!(Expr::parse("a b").is_err());
    }

    #[test]
    fn test_deep_nesting_rejected() {
        for depth in [200, 500, 200_000] {
            let open = format!("{}1", "(".repeat(depth));
            assert!(Expr::parse(&open).is_err());
            let closed = format!("{}1{}", "[".repeat(depth), "]".repeat(depth));
            assert!(Expr::parse(&closed).is_err());
        }
        assert!(Expr::parse(&format!("{}1", "-".repeat(500))).is_err());
        assert!(Expr::parse(&format!("1{}", " + 1".repeat(500))).is_err());

        let shallow = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert_eq!(Expr::parse(&shallow).unwrap(), Expr::Number(1.0));
    }

    #[test]
    fn test_wide_lists_are_not_deep() {
        let items: Vec<String> = (0..500).map(|i| format!("a{} * 2", i)).collect();
        let text = format!("[{}]", items.join(", "));
        assert!(matches!(Expr::parse(&text), Ok(Expr::List(items)) if items.len() == 500));
    }

    #[test]
    fn test_eval_arithmetic() {
        let clock = FixedClock(0.0);
        let mut bindings = Bindings::new(&clock);
        bindings.bind("default_bpm", Value::Number(120.0));

        let value = Expr::parse("default_bpm * 2 + 1").unwrap().eval(&bindings).unwrap();
        assert_eq!(value, Value::Number(241.0));

        let value = Expr::parse("-7 % 4").unwrap().eval(&bindings).unwrap();
        assert_eq!(value, Value::Number(1.0));
    }

    #[test]
    fn test_eval_time_uses_clock() {
        let clock = FixedClock(12.5);
        let bindings = Bindings::new(&clock);
        let value = Expr::parse("time() * 2").unwrap().eval(&bindings).unwrap();
        assert_eq!(value, Value::Number(25.0));
    }

    #[test]
    fn test_eval_errors() {
        let clock = FixedClock(0.0);
        let bindings = Bindings::new(&clock);

        assert_eq!(
            Expr::parse("foo").unwrap().eval(&bindings),
            Err(EvalError::UnknownIdentifier("foo".into()))
        );
        assert_eq!(
            Expr::parse("1 / 0").unwrap().eval(&bindings),
            Err(EvalError::DivisionByZero)
        );
        assert_eq!(
            Expr::parse("max(1, 2)").unwrap().eval(&bindings),
            Err(EvalError::UnknownFunction("max".into()))
        );
        assert_eq!(
            Expr::parse("time(1)").unwrap().eval(&bindings),
            Err(EvalError::InvalidArgCount {
                func: "time".into(),
                expected: 0,
                got: 1
            })
        );
        assert!(matches!(
            Expr::parse("'a' + 1").unwrap().eval(&bindings),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_eval_binding_unknowns_binds_self_names() {
        let clock = FixedClock(0.0);
        let mut bindings = Bindings::new(&clock);
        let expr = Expr::parse("[a, b, a]").unwrap();

        let (value, bound) = bindings.eval_binding_unknowns(&expr, 25).unwrap();
        assert_eq!(bound, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            value,
            Value::List(vec![
                Value::Text("a".into()),
                Value::Text("b".into()),
                Value::Text("a".into())
            ])
        );
    }

    #[test]
    fn test_eval_binding_unknowns_respects_cap() {
        let clock = FixedClock(0.0);
        let mut bindings = Bindings::new(&clock);
        let expr = Expr::parse("[a, b, c]").unwrap();
        assert_eq!(
            bindings.eval_binding_unknowns(&expr, 2),
            Err(EvalError::RetriesExhausted(2))
        );
    }

    #[test]
    fn test_value_display() {
        let value = Value::List(vec![
            Value::Number(60.0),
            Value::Number(0.3),
            Value::Null,
            Value::Text("chase".into()),
        ]);
        assert_eq!(value.to_string(), "[60, 0.3, None, chase]");
    }
}
