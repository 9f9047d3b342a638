//! Block builder (C4): segments a `Function` body into delay-slot-aware
//! `Block`s. Grounded on `examples/original_source/main.py`'s
//! `new_block`/`take_instruction`/`body_iter` closures inside
//! `do_flow_analysis` — ported here as its own pass since this core
//! keeps block building and flow analysis as separate components
//! (spec.md C4 vs C5).

use crate::error::{Result, StructuralError};
use crate::instruction::{BodyItem, Instruction, Label};
use crate::program::Function;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub index: usize,
    pub label: Option<Label>,
    pub instructions: Vec<Instruction>,
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => writeln!(f, "# {} ({})", self.index, label.name)?,
            None => writeln!(f, "# {}", self.index)?,
        }
        for instr in &self.instructions {
            writeln!(f, "{}", instr)?;
        }
        Ok(())
    }
}

fn emit(
    blocks: &mut Vec<Block>,
    curr_index: &mut usize,
    curr_label: &mut Option<Label>,
    curr_instructions: &mut Vec<Instruction>,
) {
    if curr_instructions.is_empty() {
        return;
    }
    blocks.push(Block {
        index: *curr_index,
        label: curr_label.take(),
        instructions: std::mem::take(curr_instructions),
    });
    *curr_index += 1;
}

/// Splits `function`'s body into blocks, honouring the branch-delay-slot
/// rule: a branch instruction and the instruction immediately following
/// it always terminate the same block.
pub fn build_blocks(function: &Function) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut curr_index = 0usize;
    let mut curr_label: Option<Label> = None;
    let mut curr_instructions: Vec<Instruction> = Vec::new();

    let mut iter = function.body.iter();
    while let Some(item) = iter.next() {
        match item {
            BodyItem::Label(label) => {
                emit(&mut blocks, &mut curr_index, &mut curr_label, &mut curr_instructions);
                curr_label = Some(label.clone());
            }
            BodyItem::Instruction(instr) => {
                curr_instructions.push(instr.clone());
                if instr.is_branch_instruction() {
                    match iter.next() {
                        Some(BodyItem::Instruction(delay)) => {
                            curr_instructions.push(delay.clone());
                        }
                        _ => return Err(StructuralError::MissingDelaySlot.into()),
                    }
                    emit(&mut blocks, &mut curr_index, &mut curr_label, &mut curr_instructions);
                }
            }
        }
    }
    emit(&mut blocks, &mut curr_index, &mut curr_label, &mut curr_instructions);

    Ok(blocks)
}
