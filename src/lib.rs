//! Analytical core of a MIPS-assembly-to-C decompiler: parses a
//! compilation unit (C1-C3), recovers per-function control flow (C4-C5),
//! infers stack-frame layout (C6) and lifts instructions into a symbolic
//! IR (C7). Grounded on `examples/original_source/main.py`, an
//! already-working decompiler this crate reimplements the analysis
//! passes of, reshaped in the idiom of `vasm/src/lib.rs` (single pass
//! over a string input, arena/index-based graph, fatal `Error` type
//! with one recoverable sub-boundary).

pub mod arg;
pub mod block;
pub mod error;
pub mod flow;
pub mod instruction;
pub mod ir;
pub mod lift;
pub mod program;
pub mod stack;

#[cfg(test)]
mod test;

pub use error::{Error, Result};

use block::Block;
use flow::FlowAnalysis;
use ir::Terminator;
use lift::{BlockLift, LiftError};
use program::{Function, Program};
use stack::StackInfo;

/// Parses a compilation unit (C2 + C3).
pub fn assemble(filename: &str, input: &str) -> Result<Program> {
    program::assemble(filename, input)
}

/// The full analysis of one function (C4-C7): its flow graph, inferred
/// stack frame, and one lift attempt per block, keyed by block index. A
/// block whose lift failed is kept as an `Err` here rather than
/// aborting the whole function — the only recoverable error boundary
/// (§7).
pub struct FunctionAnalysis {
    pub flow: FlowAnalysis,
    pub stack: StackInfo,
    pub lifts: Vec<(usize, std::result::Result<BlockLift, LiftError>)>,
}

/// Runs the analytical pipeline over a single function.
///
/// Block 0 (the entry/prologue block) is never lifted — it matches
/// `examples/original_source/main.py::translate_to_ast`, which skips the
/// first flow node (`if i == 0: continue`) before calling
/// `translate_block_body`.
pub fn analyze_function(function: &Function) -> Result<FunctionAnalysis> {
    let blocks: Vec<Block> = block::build_blocks(function)?;
    let flow = flow::analyze(blocks)?;
    let stack = stack::analyze_stack(flow.entry_block())?;
    let lifts = flow
        .blocks
        .iter()
        .enumerate()
        .skip(1)
        .map(|(idx, block)| (idx, lift::translate_block_body(block)))
        .collect();
    Ok(FunctionAnalysis { flow, stack, lifts })
}

impl FunctionAnalysis {
    /// The §6 textual dump: flow analysis, stack-frame facts, then one
    /// section per block with either its lifted stores/terminator or the
    /// error that aborted just that block.
    pub fn describe(&self) -> String {
        let mut out = String::new();

        out.push_str("-- flow analysis --\n");
        for node in &self.flow.nodes {
            out.push_str(&self.flow.describe(node));
        }

        out.push_str("\n-- stack frame --\n");
        out.push_str(&format!(
            "allocated_stack_size={:#x} is_leaf={} return_addr_location={:#x} local_vars_region_bottom={:#x}\n",
            self.stack.allocated_stack_size,
            self.stack.is_leaf,
            self.stack.return_addr_location,
            self.stack.local_vars_region_bottom,
        ));
        let mut callee_saves: Vec<_> = self.stack.callee_save_reg_locations.iter().collect();
        callee_saves.sort_by_key(|(reg, _)| reg.name.clone());
        for (reg, offset) in callee_saves {
            out.push_str(&format!("  {} at {:#x}\n", reg, offset));
        }

        out.push_str("\n-- lifted blocks --\n");
        for (idx, lift) in &self.lifts {
            match lift {
                Ok(block_lift) => {
                    out.push_str(&format!("# block {}\n", idx));
                    for store in &block_lift.stores {
                        out.push_str(&format!("  {}\n", store));
                    }
                    match &block_lift.terminator {
                        Some(Terminator::Return) => out.push_str("  return\n"),
                        Some(Terminator::Call(target)) => out.push_str(&format!("  call {}\n", target)),
                        None => {}
                    }
                }
                Err(err) => out.push_str(&format!("# block {}: lift failed: {}\n", idx, err)),
            }
        }

        out
    }
}
