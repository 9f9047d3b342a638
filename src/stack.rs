//! Stack-frame analyzer (C6): scans a function's entry block (the
//! prologue) to infer frame layout. Grounded on
//! `examples/original_source/main.py::find_stack_info`.

use crate::arg::{Argument, Register};
use crate::block::Block;
use crate::error::{Result, StructuralError};
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StackInfo {
    pub allocated_stack_size: i64,
    pub is_leaf: bool,
    pub return_addr_location: i64,
    pub callee_save_reg_locations: HashMap<Register, i64>,
    pub local_vars_region_bottom: i64,
}

impl StackInfo {
    pub fn in_local_var_region(&self, offset: i64) -> bool {
        self.local_vars_region_bottom <= offset && offset < self.allocated_stack_size
    }
}

fn address_mode_sp_offset(arg: Option<&Argument>) -> Option<i64> {
    match arg {
        Some(Argument::AddressMode { lhs, rhs }) => match rhs.as_ref() {
            Argument::Register(r) if r.name == "sp" => Some(match lhs {
                Some(boxed) => match boxed.as_ref() {
                    Argument::NumberLiteral(n) => *n,
                    _ => 0,
                },
                None => 0,
            }),
            _ => None,
        },
        _ => None,
    }
}

/// Walks the entry block's prologue instructions in order (C6).
pub fn analyze_stack(entry_block: &Block) -> Result<StackInfo> {
    let mut allocated_stack_size = 0i64;
    let mut is_leaf = true;
    let mut return_addr_location = 0i64;
    let mut callee_save_reg_locations: HashMap<Register, i64> = HashMap::new();

    for instr in &entry_block.instructions {
        let destination = match instr.args.first() {
            Some(Argument::Register(r)) => r,
            _ => continue,
        };

        if instr.mnemonic == "addiu" && destination.name == "sp" {
            if let Some(Argument::NumberLiteral(n)) = instr.args.get(2) {
                allocated_stack_size = -n;
            }
        } else if instr.mnemonic == "sw" && destination.name == "ra" {
            return_addr_location =
                address_mode_sp_offset(instr.args.get(1)).ok_or(StructuralError::ReturnAddressNotOnStack)?;
            is_leaf = false;
        } else if instr.mnemonic == "sw" && destination.is_callee_save() {
            if let Some(offset) = address_mode_sp_offset(instr.args.get(1)) {
                callee_save_reg_locations.insert(destination.clone(), offset);
            }
        }
    }

    let local_vars_region_bottom = if is_leaf && !callee_save_reg_locations.is_empty() {
        callee_save_reg_locations.values().copied().max().unwrap() + 4
    } else if is_leaf {
        0
    } else {
        return_addr_location + 4
    };

    Ok(StackInfo {
        allocated_stack_size,
        is_leaf,
        return_addr_location,
        callee_save_reg_locations,
        local_vars_region_bottom,
    })
}
