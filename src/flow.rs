//! Flow analyzer (C5): builds one `Node` per `Block`, wires successor
//! edges and classifies back-edges as loops. Grounded on
//! `examples/original_source/main.py`'s `do_flow_analysis`
//! (`get_block_analysis`/`do_block_analysis`) for the algorithm; encoded
//! as an arena of block-index-keyed edges rather than shared references,
//! per spec.md §9's "Cyclic Node graph" note (mirrors the teacher's
//! `vasm/src/labels.rs` index-based label resolution).

use crate::arg::Argument;
use crate::block::Block;
use crate::error::{Result, StructuralError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Node {
    Basic {
        block_index: usize,
        exit_edge: usize,
    },
    Conditional {
        block_index: usize,
        conditional_edge: usize,
        fallthrough_edge: usize,
    },
    Exit {
        block_index: usize,
    },
}

impl Node {
    pub fn block_index(&self) -> usize {
        match self {
            Node::Basic { block_index, .. } => *block_index,
            Node::Conditional { block_index, .. } => *block_index,
            Node::Exit { block_index } => *block_index,
        }
    }

    /// A `BasicNode` is a loop iff its exit edge is a back-edge; a
    /// `ConditionalNode` iff its conditional edge is. The fallthrough
    /// edge is never a loop edge.
    pub fn is_loop(&self) -> bool {
        match self {
            Node::Basic { block_index, exit_edge } => *exit_edge < *block_index,
            Node::Conditional {
                block_index,
                conditional_edge,
                ..
            } => *conditional_edge < *block_index,
            Node::Exit { .. } => false,
        }
    }
}

pub fn is_loop_edge(from_block_index: usize, to_block_index: usize) -> bool {
    to_block_index < from_block_index
}

#[derive(Clone, Debug)]
pub struct FlowAnalysis {
    pub blocks: Vec<Block>,
    pub nodes: Vec<Node>,
}

impl FlowAnalysis {
    pub fn block(&self, node: &Node) -> &Block {
        &self.blocks[node.block_index()]
    }

    pub fn entry_block(&self) -> &Block {
        &self.blocks[0]
    }

    pub fn describe(&self, node: &Node) -> String {
        let block = self.block(node);
        match node {
            Node::Basic { exit_edge, .. } => format!(
                "{}# {} -> {}{}",
                block,
                node.block_index(),
                exit_edge,
                if node.is_loop() { " (loop)" } else { "" }
            ),
            Node::Conditional {
                conditional_edge,
                fallthrough_edge,
                ..
            } => format!(
                "{}# {} -> cond: {}{}, def: {}",
                block,
                node.block_index(),
                conditional_edge,
                if node.is_loop() { " (loop)" } else { "" },
                fallthrough_edge
            ),
            Node::Exit { .. } => format!("{}# {} -> ret", block, node.block_index()),
        }
    }
}

fn find_block_by_label<'a>(blocks: &'a [Block], target: &str) -> Option<&'a Block> {
    blocks
        .iter()
        .find(|b| b.label.as_ref().map(|l| l.name.as_str()) == Some(target))
}

/// Visits every block reachable from `idx`, filling in `slots`.
///
/// A node's variant only needs its *successors' indices*, which are
/// already known before recursing (`idx + 1`, or a resolved label) — it
/// never needs a successor's finished `Node` value. So the recursion
/// below exists purely to reach every block, not to satisfy a data
/// dependency; `visiting` breaks the cycles that back-edges (loops)
/// would otherwise cause if it recursed into an in-progress block again.
fn ensure_analyzed(
    idx: usize,
    blocks: &[Block],
    slots: &mut Vec<Option<Node>>,
    visiting: &mut Vec<bool>,
) -> Result<()> {
    if slots[idx].is_some() || visiting[idx] {
        return Ok(());
    }
    visiting[idx] = true;
    let node = do_block_analysis(idx, blocks, slots, visiting)?;
    slots[idx] = Some(node);
    Ok(())
}

fn do_block_analysis(
    idx: usize,
    blocks: &[Block],
    slots: &mut Vec<Option<Node>>,
    visiting: &mut Vec<bool>,
) -> Result<Node> {
    let block = &blocks[idx];
    let branches: Vec<&crate::instruction::Instruction> = block
        .instructions
        .iter()
        .filter(|instr| instr.is_branch_instruction())
        .collect();

    match branches.len() {
        0 => {
            let exit_idx = idx + 1;
            ensure_analyzed(exit_idx, blocks, slots, visiting)?;
            Ok(Node::Basic {
                block_index: idx,
                exit_edge: exit_idx,
            })
        }
        1 => {
            let branch = branches[0];
            let target_name = match branch.args.last() {
                Some(Argument::JumpTarget(name)) => name.clone(),
                _ => {
                    return Err(StructuralError::UnresolvedBranchTarget {
                        label: branch.mnemonic.clone(),
                    }
                    .into())
                }
            };
            let target_idx = find_block_by_label(blocks, &target_name)
                .ok_or_else(|| StructuralError::UnresolvedBranchTarget {
                    label: target_name.clone(),
                })?
                .index;
            ensure_analyzed(target_idx, blocks, slots, visiting)?;

            if branch.mnemonic == "b" {
                Ok(Node::Basic {
                    block_index: idx,
                    exit_edge: target_idx,
                })
            } else {
                let fallthrough_idx = idx + 1;
                ensure_analyzed(fallthrough_idx, blocks, slots, visiting)?;
                Ok(Node::Conditional {
                    block_index: idx,
                    conditional_edge: target_idx,
                    fallthrough_edge: fallthrough_idx,
                })
            }
        }
        _ => Err(StructuralError::MultipleBranchesInBlock { block_index: idx }.into()),
    }
}

/// Runs flow analysis over a function's blocks (C5).
pub fn analyze(blocks: Vec<Block>) -> Result<FlowAnalysis> {
    if blocks.is_empty() {
        return Err(StructuralError::EmptyFunctionBody.into());
    }

    let mut slots: Vec<Option<Node>> = vec![None; blocks.len()];
    let mut visiting: Vec<bool> = vec![false; blocks.len()];

    let last_idx = blocks.len() - 1;
    slots[last_idx] = Some(Node::Exit { block_index: last_idx });

    ensure_analyzed(0, &blocks, &mut slots, &mut visiting)?;

    let mut nodes: Vec<Node> = slots.into_iter().flatten().collect();
    nodes.sort_by_key(|n| n.block_index());

    Ok(FlowAnalysis { blocks, nodes })
}
