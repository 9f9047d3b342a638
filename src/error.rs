//! Fatal error family: parsing, block building and flow analysis all abort
//! through here. See [`crate::lift::LiftError`] for the one recoverable
//! error boundary (per-block lifting).

use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// An operand parse hit a token it didn't expect, with the remaining
    /// unparsed input kept around for the diagnostic message.
    UnexpectedToken { token: char, rest: String },
    /// `%hi`/`%lo` must wrap exactly one argument.
    EmptyMacroArgument { macro_name: String },
    /// A macro name other than `hi`/`lo`.
    UnknownMacro { macro_name: String },
    /// A numeric literal didn't parse as an integer.
    BadNumber { text: String },
    /// The operand string ended while more input was expected (e.g. a
    /// macro's closing paren, or an address mode's dereferenced value).
    UnexpectedEnd { expected: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StructuralError {
    /// A branch instruction's jump target doesn't resolve to any label in
    /// the function.
    UnresolvedBranchTarget { label: String },
    /// More than one branch instruction was found in a single block.
    MultipleBranchesInBlock { block_index: usize },
    /// A branch instruction was the last element of a function body, so
    /// there is no delay-slot instruction to pull.
    MissingDelaySlot,
    /// `sw ra, ...(reg)` where `reg` isn't `sp`.
    ReturnAddressNotOnStack,
    /// An instruction or label appeared before any `glabel`.
    NoCurrentFunction,
    /// A function has no instructions at all, so there is no block to
    /// run flow analysis over.
    EmptyFunctionBody,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    Parse(ParseError),
    Structural(StructuralError),
    UnknownMnemonic(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedToken { token, rest } => {
                write!(f, "unexpected token '{}' (rest: \"{}\")", token, rest)
            }
            ParseError::EmptyMacroArgument { macro_name } => {
                write!(f, "%{}(...) requires an argument", macro_name)
            }
            ParseError::UnknownMacro { macro_name } => {
                write!(f, "unknown macro \"{}\", expected hi or lo", macro_name)
            }
            ParseError::BadNumber { text } => write!(f, "bad numeric literal \"{}\"", text),
            ParseError::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of operand, expected {}", expected)
            }
        }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuralError::UnresolvedBranchTarget { label } => {
                write!(f, "branch target \".{}\" has no matching label", label)
            }
            StructuralError::MultipleBranchesInBlock { block_index } => {
                write!(f, "block {} contains more than one branch", block_index)
            }
            StructuralError::MissingDelaySlot => {
                write!(f, "branch instruction has no following delay-slot instruction")
            }
            StructuralError::ReturnAddressNotOnStack => {
                write!(f, "\"sw ra\" address mode isn't based on sp")
            }
            StructuralError::NoCurrentFunction => {
                write!(f, "instruction or label appeared before any glabel")
            }
            StructuralError::EmptyFunctionBody => {
                write!(f, "function has no instructions to analyze")
            }
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse(err) => write!(f, "parse error: {}", err),
            Error::Structural(err) => write!(f, "structural error: {}", err),
            Error::UnknownMnemonic(mnemonic) => {
                write!(f, "don't know how to handle mnemonic \"{}\"", mnemonic)
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Error {
        Error::Parse(err)
    }
}

impl From<StructuralError> for Error {
    fn from(err: StructuralError) -> Error {
        Error::Structural(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
