//! Operand micro-syntax: registers, labels, macros, address modes, binary
//! operators and numeric literals. A hand-written recursive-descent
//! parser over a character cursor, per spec.md §4.1 — grounded on
//! `examples/original_source/main.py::parse_arg_elems`, whose exact
//! control flow (including the `)` that terminates without consuming,
//! and the BinOp arm that returns immediately) is preserved rather than
//! reshaped into a grammar.

use crate::error::{ParseError, Result};
use std::collections::VecDeque;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Register {
    pub name: String,
}

impl Register {
    pub fn new(name: impl Into<String>) -> Self {
        Register { name: name.into() }
    }

    /// `s0..s7`, per spec.md §3 — matches the original's `re.match('s[0-7]',
    /// name)`, which only anchors the prefix, not the whole string.
    pub fn is_callee_save(&self) -> bool {
        let bytes = self.name.as_bytes();
        bytes.len() >= 2 && bytes[0] == b's' && (b'0'..=b'7').contains(&bytes[1])
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MacroKind {
    Hi,
    Lo,
}

impl fmt::Display for MacroKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MacroKind::Hi => "hi",
            MacroKind::Lo => "lo",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOpKind {
    Shr,
    And,
    Add,
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BinOpKind::Shr => ">>",
            BinOpKind::And => "&",
            BinOpKind::Add => "+",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Argument {
    Register(Register),
    GlobalSymbol(String),
    Macro(MacroKind, Box<Argument>),
    NumberLiteral(i64),
    AddressMode {
        lhs: Option<Box<Argument>>,
        rhs: Box<Argument>,
    },
    BinOp {
        op: BinOpKind,
        lhs: Box<Argument>,
        rhs: Box<Argument>,
    },
    JumpTarget(String),
}

fn format_hex(value: i64) -> String {
    if value < 0 {
        format!("-0x{:x}", -value)
    } else {
        format!("0x{:x}", value)
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Register(reg) => write!(f, "{}", reg),
            Argument::GlobalSymbol(name) => write!(f, "{}", name),
            Argument::Macro(kind, inner) => write!(f, "%{}({})", kind, inner),
            Argument::NumberLiteral(value) => write!(f, "{}", format_hex(*value)),
            Argument::AddressMode { lhs: Some(lhs), rhs } => write!(f, "{}({})", lhs, rhs),
            Argument::AddressMode { lhs: None, rhs } => write!(f, "({})", rhs),
            Argument::BinOp { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Argument::JumpTarget(name) => write!(f, ".{}", name),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_number_char(c: char) -> bool {
    c == '-' || c == 'x' || c.is_ascii_hexdigit()
}

fn pop_while(elems: &mut VecDeque<char>, pred: impl Fn(char) -> bool) -> String {
    let mut s = String::new();
    while let Some(&c) = elems.front() {
        if !pred(c) {
            break;
        }
        s.push(c);
        elems.pop_front();
    }
    s
}

fn parse_number(elems: &mut VecDeque<char>) -> Result<i64> {
    let text = pop_while(elems, is_number_char);
    let (neg, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let magnitude = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| ParseError::BadNumber { text: text.clone() })?;
    Ok(if neg { -magnitude } else { magnitude })
}

/// Pops the next char and checks it's one of `allowed`.
fn expect(elems: &mut VecDeque<char>, allowed: &str) -> Result<char> {
    match elems.pop_front() {
        Some(c) if allowed.contains(c) => Ok(c),
        Some(c) => Err(ParseError::UnexpectedToken {
            token: c,
            rest: elems.iter().collect(),
        }
        .into()),
        None => Err(ParseError::UnexpectedEnd {
            expected: allowed.to_string(),
        }
        .into()),
    }
}

fn parse_arg_elems(elems: &mut VecDeque<char>) -> Result<Option<Argument>> {
    let mut value: Option<Argument> = None;

    while let Some(&tok) = elems.front() {
        match tok {
            c if c.is_whitespace() => {
                elems.pop_front();
            }
            '$' => {
                elems.pop_front();
                value = Some(Argument::Register(Register::new(pop_while(elems, is_word_char))));
            }
            '.' => {
                elems.pop_front();
                value = Some(Argument::JumpTarget(pop_while(elems, is_word_char)));
            }
            '%' => {
                elems.pop_front();
                let macro_name = pop_while(elems, is_word_char);
                let kind = match macro_name.as_str() {
                    "hi" => MacroKind::Hi,
                    "lo" => MacroKind::Lo,
                    _ => return Err(ParseError::UnknownMacro { macro_name }.into()),
                };
                expect(elems, "(")?;
                let inner = parse_arg_elems(elems)?.ok_or(ParseError::EmptyMacroArgument {
                    macro_name: macro_name.clone(),
                })?;
                expect(elems, ")")?;
                value = Some(Argument::Macro(kind, Box::new(inner)));
            }
            ')' => {
                // Return to the parent call without consuming the paren.
                break;
            }
            '-' | '0'..='9' => {
                value = Some(Argument::NumberLiteral(parse_number(elems)?));
            }
            '(' => {
                // `value`, if present, is the AddressMode's lhs (an offset
                // or %hi/%lo macro parsed earlier in this same call).
                expect(elems, "(")?;
                let rhs = parse_arg_elems(elems)?.ok_or(ParseError::UnexpectedEnd {
                    expected: "address mode operand".to_string(),
                })?;
                expect(elems, ")")?;
                value = Some(Argument::AddressMode {
                    lhs: value.map(Box::new),
                    rhs: Box::new(rhs),
                });
            }
            c if is_word_char(c) => {
                value = Some(Argument::GlobalSymbol(pop_while(elems, is_word_char)));
            }
            '>' | '+' | '&' => {
                let op = if tok == '>' {
                    expect(elems, ">")?;
                    expect(elems, ">")?;
                    BinOpKind::Shr
                } else {
                    match expect(elems, "&+")? {
                        '&' => BinOpKind::And,
                        '+' => BinOpKind::Add,
                        _ => unreachable!(),
                    }
                };
                let lhs = value.take().ok_or(ParseError::UnexpectedEnd {
                    expected: "a number or symbol before a binary operator".to_string(),
                })?;
                let rhs = match parse_arg_elems(elems)? {
                    Some(Argument::NumberLiteral(n)) => n,
                    _ => {
                        return Err(ParseError::UnexpectedEnd {
                            expected: "a numeric literal right-hand side".to_string(),
                        }
                        .into())
                    }
                };
                return Ok(Some(Argument::BinOp {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(Argument::NumberLiteral(rhs)),
                }));
            }
            other => {
                return Err(ParseError::UnexpectedToken {
                    token: other,
                    rest: elems.iter().skip(1).collect(),
                }
                .into())
            }
        }
    }

    Ok(value)
}

/// Parses one trimmed operand string. `None` iff `arg` is empty.
pub fn parse_arg(arg: &str) -> Result<Option<Argument>> {
    let mut elems: VecDeque<char> = arg.chars().collect();
    parse_arg_elems(&mut elems)
}
