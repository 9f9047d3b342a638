//! `Instruction` and `Label`, the two element kinds of a `Function` body.
//! Grounded on `examples/original_source/main.py`'s `Instruction`/`Label`
//! classes.

use crate::arg::Argument;
use std::fmt;

const BRANCH_MNEMONICS: &[&str] = &["b", "beq", "bne", "bgez", "bgtz", "blez", "bltz"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub mnemonic: String,
    pub args: Vec<Argument>,
}

impl Instruction {
    pub fn new(mnemonic: impl Into<String>, args: Vec<Argument>) -> Self {
        Instruction {
            mnemonic: mnemonic.into(),
            args,
        }
    }

    pub fn is_branch_instruction(&self) -> bool {
        BRANCH_MNEMONICS.contains(&self.mnemonic.as_str())
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "    {} {}", self.mnemonic, args)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label { name: name.into() }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  .{}:", self.name)
    }
}

/// An element of a `Function`'s body: either a local label or an
/// instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BodyItem {
    Label(Label),
    Instruction(Instruction),
}

impl fmt::Display for BodyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyItem::Label(label) => write!(f, "{}", label),
            BodyItem::Instruction(instr) => write!(f, "{}", instr),
        }
    }
}
