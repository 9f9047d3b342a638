//! Instruction lifter (C7): per-mnemonic dispatch against a symbolic
//! register file. Grounded on
//! `examples/original_source/main.py::translate_block_body` (the
//! `cases_*` dict-of-lambdas tables), reshaped as the teacher's static
//! dispatch-table idiom from `src/processor/logic.rs::tick` (decode, then
//! match into small per-opcode effect functions).

use crate::arg::{Argument, Register};
use crate::block::Block;
use crate::instruction::Instruction;
use crate::ir::{Expr, Store, Terminator};
use std::collections::HashMap;
use std::fmt;

/// The only recoverable error boundary in the whole pipeline (§7): raised
/// per-instruction during lifting, caught per-block by the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum LiftError {
    UnknownMnemonic(String),
    /// A register was read before anything in this block (or the fixed
    /// `zero` binding) wrote to it — expected for real inputs per spec.md
    /// §1's non-goal "dataflow convergence across blocks": each block is
    /// lifted against a fresh snapshot, so cross-block register reads
    /// surface here.
    UnsetRegister(String),
    ExpectedRegister,
    MissingArgument(usize),
}

impl fmt::Display for LiftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiftError::UnknownMnemonic(m) => write!(f, "don't know how to handle {}", m),
            LiftError::UnsetRegister(r) => write!(f, "register ${} has no value in this block", r),
            LiftError::ExpectedRegister => write!(f, "expected a register operand"),
            LiftError::MissingArgument(i) => write!(f, "missing argument #{}", i),
        }
    }
}

impl std::error::Error for LiftError {}

pub type Result<T> = std::result::Result<T, LiftError>;

/// Block-local symbolic register file (§3).
#[derive(Clone, Debug, Default)]
pub struct RegisterMap {
    map: HashMap<Register, Expr>,
}

impl RegisterMap {
    pub fn new() -> Self {
        let mut map = HashMap::new();
        map.insert(Register::new("zero"), Expr::Leaf(Argument::NumberLiteral(0)));
        RegisterMap { map }
    }

    pub fn get(&self, reg: &Register) -> Result<Expr> {
        self.map
            .get(reg)
            .cloned()
            .ok_or_else(|| LiftError::UnsetRegister(reg.name.clone()))
    }

    pub fn set(&mut self, reg: Register, expr: Expr) {
        self.map.insert(reg, expr);
    }
}

/// Folds alias mnemonics onto their canonical form (§4.6 item 1).
/// `mul.d` deliberately maps to the nonexistent `mulu` — preserved per
/// spec.md §9, not fixed.
fn canonicalize(mnemonic: &str) -> &str {
    match mnemonic {
        "addiu" => "addi",
        "divu" => "div",
        "add.s" => "addu",
        "mul.s" => "multu",
        "sub.s" => "subu",
        "add.d" => "addu",
        "div.d" => "div.s",
        "mul.d" => "mulu",
        "sub.d" => "subu",
        "cvt.d.w" => "cvt.d.s",
        "cvt.s.w" => "cvt.s.d",
        "cvt.w.s" => "cvt.w.d",
        "c.lt.d" => "c.lt.s",
        "c.eq.d" => "c.eq.s",
        "c.le.d" => "c.le.s",
        "sra" => "srl",
        "sltiu" => "slti",
        "sltu" => "slt",
        other => other,
    }
}

fn arg(args: &[Argument], i: usize) -> Result<&Argument> {
    args.get(i).ok_or(LiftError::MissingArgument(i))
}

fn arg_register(args: &[Argument], i: usize) -> Result<&Register> {
    match arg(args, i)? {
        Argument::Register(r) => Ok(r),
        _ => Err(LiftError::ExpectedRegister),
    }
}

/// Dereferences a memory operand: a stack slot `(sp)` is kept as-is; any
/// other register base is rebound through `reg` first.
fn deref(operand: &Argument, reg: &RegisterMap) -> Result<Expr> {
    match operand {
        Argument::AddressMode { lhs, rhs } => {
            let base = match rhs.as_ref() {
                Argument::Register(r) => r,
                _ => return Err(LiftError::ExpectedRegister),
            };
            let lhs_expr = lhs.as_ref().map(|l| Box::new(Expr::Leaf((**l).clone())));
            if base.name == "sp" {
                Ok(Expr::AddressMode {
                    lhs: lhs_expr,
                    rhs: Box::new(Expr::Leaf(Argument::Register(base.clone()))),
                })
            } else {
                Ok(Expr::AddressMode {
                    lhs: lhs_expr,
                    rhs: Box::new(reg.get(base)?),
                })
            }
        }
        Argument::Register(r) => reg.get(r),
        _ => Err(LiftError::ExpectedRegister),
    }
}

/// `lui reg, X` (§4.6 special handlers).
fn handle_lui(args: &[Argument], _reg: &RegisterMap) -> Result<Expr> {
    match arg(args, 1)? {
        Argument::BinOp {
            op: crate::arg::BinOpKind::Shr,
            lhs,
            rhs,
        } if matches!(rhs.as_ref(), Argument::NumberLiteral(16)) => Ok(Expr::Leaf((**lhs).clone())),
        Argument::NumberLiteral(n) => Ok(Expr::BinaryOp {
            left: Box::new(Expr::Leaf(Argument::NumberLiteral(*n))),
            op: "<<",
            right: Box::new(Expr::Leaf(Argument::NumberLiteral(16))),
        }),
        other => Ok(Expr::Leaf(other.clone())),
    }
}

/// `ori reg, X`. The `<` operator is the original's, almost certainly a
/// typo for `|` — preserved verbatim per spec.md §9.
// TODO: `<` below should very likely be `|`; kept as-is per spec.md §9 "Open questions".
fn handle_ori(args: &[Argument], reg: &RegisterMap) -> Result<Option<Expr>> {
    match arg(args, 1)? {
        Argument::BinOp {
            op: crate::arg::BinOpKind::And,
            rhs,
            ..
        } if matches!(rhs.as_ref(), Argument::NumberLiteral(0xFFFF)) => Ok(None),
        other => {
            let left = reg.get(arg_register(args, 0)?)?;
            Ok(Some(Expr::BinaryOp {
                left: Box::new(left),
                op: "<",
                right: Box::new(Expr::Leaf(other.clone())),
            }))
        }
    }
}

/// `addi reg[, base], X`.
fn handle_addi(args: &[Argument], reg: &RegisterMap) -> Result<Expr> {
    if args.len() == 2 {
        return Ok(Expr::Leaf(arg(args, 1)?.clone()));
    }
    let base = arg_register(args, 1)?;
    let offset = arg(args, 2)?;
    if base.name == "sp" {
        Ok(Expr::UnaryOp {
            op: "&",
            expr: Box::new(Expr::AddressMode {
                lhs: Some(Box::new(Expr::Leaf(offset.clone()))),
                rhs: Box::new(Expr::Leaf(Argument::Register(base.clone()))),
            }),
        })
    } else {
        Ok(Expr::BinaryOp {
            left: Box::new(reg.get(base)?),
            op: "+",
            right: Box::new(Expr::Leaf(offset.clone())),
        })
    }
}

fn unwrap_macros(args: &[Argument]) -> Vec<Argument> {
    args.iter()
        .map(|a| match a {
            Argument::Macro(_, inner) => (**inner).clone(),
            other => other.clone(),
        })
        .collect()
}

/// Per-block lifting state: the symbolic register map, the accumulated
/// store list, and the last jump terminator seen (§4.6 Jumps group).
#[derive(Clone, Debug, Default)]
pub struct BlockLift {
    pub reg: RegisterMap,
    pub stores: Vec<Store>,
    pub terminator: Option<Terminator>,
}

impl BlockLift {
    pub fn new() -> Self {
        BlockLift {
            reg: RegisterMap::new(),
            stores: Vec::new(),
            terminator: None,
        }
    }

    /// Lifts one instruction, mutating `self`. Errors here are the
    /// recoverable per-instruction boundary; the caller (C6-adjacent
    /// `translate_to_ast` driver) catches per block.
    pub fn lift_instruction(&mut self, instr: &Instruction) -> Result<()> {
        let canonical = canonicalize(&instr.mnemonic);
        if canonical == "nop" {
            return Ok(());
        }

        let args = unwrap_macros(&instr.args);

        match canonical {
            "sb" | "sh" | "sw" | "swc1" | "sdc1" => {
                let size = match canonical {
                    "sb" => 8,
                    "sh" => 16,
                    "sw" | "swc1" => 32,
                    "sdc1" => 64,
                    _ => unreachable!(),
                };
                let source = self.reg.get(arg_register(&args, 0)?)?;
                let dest = deref(arg(&args, 1)?, &self.reg)?;
                self.stores.push(Store {
                    size,
                    source,
                    dest,
                    float: matches!(canonical, "swc1" | "sdc1"),
                });
            }

            "mtc1" => {
                let source = self.reg.get(arg_register(&args, 0)?)?;
                let dest_reg = arg_register(&args, 1)?.clone();
                self.reg.set(
                    dest_reg,
                    Expr::Cast {
                        to_type: "f32",
                        expr: Box::new(source),
                    },
                );
            }

            // Branch / float-branch / float-compare: recorded-but-not-emitted
            // (§9) — reached and type-checked, but neither register map nor
            // terminator is touched.
            "b" | "beq" | "bne" | "beqz" | "bnez" | "blez" | "bgtz" | "bltz" | "bgez" => {}
            "bc1t" | "bc1f" => {}
            "c.eq.s" | "c.le.s" | "c.lt.s" => {}

            "jr" => {
                self.terminator = Some(Terminator::Return);
            }
            "jal" => {
                let target = Expr::Leaf(arg(&args, 0)?.clone());
                self.terminator = Some(Terminator::Call(target));
            }

            "lui" => {
                let value = handle_lui(&args, &self.reg)?;
                let dest = arg_register(&args, 0)?.clone();
                self.reg.set(dest, value);
            }
            "ori" => {
                if let Some(value) = handle_ori(&args, &self.reg)? {
                    let dest = arg_register(&args, 0)?.clone();
                    self.reg.set(dest, value);
                }
            }
            "addi" => {
                let value = handle_addi(&args, &self.reg)?;
                let dest = arg_register(&args, 0)?.clone();
                self.reg.set(dest, value);
            }

            "slt" | "slti" | "addu" | "multu" | "subu" | "div" | "negu" | "mfhi" | "mflo"
            | "div.s" | "cvt.d.s" | "cvt.s.d" | "cvt.w.d" | "trunc.w.s" | "trunc.w.d" | "and"
            | "or" | "xor" | "andi" | "xori" | "sll" | "srl" | "move" | "mfc1" | "li" | "lb"
            | "lh" | "lw" | "lbu" | "lhu" | "lwu" | "lwc1" | "ldc1" => {
                let value = self.lift_destination_first(canonical, &args)?;
                let dest = arg_register(&args, 0)?.clone();
                self.reg.set(dest, value);
            }

            other => return Err(LiftError::UnknownMnemonic(other.to_string())),
        }

        Ok(())
    }

    fn lift_destination_first(&self, mnemonic: &str, args: &[Argument]) -> Result<Expr> {
        let reg = &self.reg;
        Ok(match mnemonic {
            "slt" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "<",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            "slti" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "<",
                right: Box::new(Expr::Leaf(arg(args, 2)?.clone())),
            },
            "addu" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "+",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            "multu" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "*",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            "subu" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "-",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            // `div`/`divu` bind the *pair* (quot, rem) to the single
            // destination register — see DESIGN.md "Open Question
            // decisions"; preserved from the original rather than fixed.
            "div" => {
                let lhs = reg.get(arg_register(args, 1)?)?;
                let rhs = reg.get(arg_register(args, 2)?)?;
                Expr::Pair(
                    Box::new(Expr::BinaryOp {
                        left: Box::new(lhs.clone()),
                        op: "/",
                        right: Box::new(rhs.clone()),
                    }),
                    Box::new(Expr::BinaryOp {
                        left: Box::new(lhs),
                        op: "%",
                        right: Box::new(rhs),
                    }),
                )
            }
            "negu" => Expr::UnaryOp {
                op: "-",
                expr: Box::new(reg.get(arg_register(args, 1)?)?),
            },
            "mfhi" => reg.get(&Register::new("hi"))?,
            "mflo" => reg.get(&Register::new("lo"))?,
            "div.s" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "/",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            "cvt.d.s" => Expr::Cast {
                to_type: "(f64)",
                expr: Box::new(reg.get(arg_register(args, 1)?)?),
            },
            "cvt.s.d" => Expr::Cast {
                to_type: "(f32)",
                expr: Box::new(reg.get(arg_register(args, 1)?)?),
            },
            "cvt.w.d" => Expr::Cast {
                to_type: "(s32)",
                expr: Box::new(reg.get(arg_register(args, 1)?)?),
            },
            "trunc.w.s" => Expr::Cast {
                to_type: "(s32)",
                expr: Box::new(reg.get(arg_register(args, 1)?)?),
            },
            "trunc.w.d" => Expr::Cast {
                to_type: "(s32)",
                expr: Box::new(reg.get(arg_register(args, 1)?)?),
            },
            "and" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "&",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            // `or` uses `^`, inconsistent with the mnemonic — preserved
            // per spec.md §9, not fixed to `|`.
            // TODO: `or` below should very likely use `|`, not `^`.
            "or" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "^",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            "xor" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "^",
                right: Box::new(reg.get(arg_register(args, 2)?)?),
            },
            "andi" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "&",
                right: Box::new(Expr::Leaf(arg(args, 2)?.clone())),
            },
            "xori" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "^",
                right: Box::new(Expr::Leaf(arg(args, 2)?.clone())),
            },
            "sll" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: "<<",
                right: Box::new(Expr::Leaf(arg(args, 2)?.clone())),
            },
            "srl" => Expr::BinaryOp {
                left: Box::new(reg.get(arg_register(args, 1)?)?),
                op: ">>",
                right: Box::new(Expr::Leaf(arg(args, 2)?.clone())),
            },
            "move" => reg.get(arg_register(args, 1)?)?,
            "mfc1" => reg.get(arg_register(args, 1)?)?,
            "li" => Expr::Leaf(arg(args, 1)?.clone()),
            "lb" => Expr::TypeHint {
                ty: "s8",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "lh" => Expr::TypeHint {
                ty: "s16",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "lw" => Expr::TypeHint {
                ty: "s32",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "lbu" => Expr::TypeHint {
                ty: "u8",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "lhu" => Expr::TypeHint {
                ty: "u16",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "lwu" => Expr::TypeHint {
                ty: "u32",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "lwc1" => Expr::TypeHint {
                ty: "f32",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            "ldc1" => Expr::TypeHint {
                ty: "f64",
                value: Box::new(deref(arg(args, 1)?, reg)?),
            },
            _ => unreachable!("dispatched only for the destination-first group"),
        })
    }
}

/// Lifts every instruction in `block` against a fresh register map (§1
/// non-goal: no dataflow convergence across blocks).
pub fn translate_block_body(block: &Block) -> Result<BlockLift> {
    let mut lift = BlockLift::new();
    for instr in &block.instructions {
        lift.lift_instruction(instr)?;
    }
    Ok(lift)
}
