use crate::arg::{parse_arg, Argument, Register};
use crate::instruction::Instruction;
use crate::ir::{Expr, Terminator};
use crate::lift::{BlockLift, LiftError};

fn instr(mnemonic: &str, args: &[&str]) -> Instruction {
    Instruction::new(
        mnemonic,
        args.iter().map(|a| parse_arg(a).unwrap().unwrap()).collect(),
    )
}

#[test]
fn zero_register_stays_zero_after_lifting() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("addu", &["$v0", "$a0", "$a1"]))
        .unwrap_err(); // $a0/$a1 are unset in a fresh register map
    assert_eq!(
        lift.reg.get(&Register::new("zero")).unwrap(),
        Expr::Leaf(Argument::NumberLiteral(0))
    );
}

#[test]
fn move_copies_source_register_value() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("addu", &["$v0", "$zero", "$zero"])).unwrap();
    lift.lift_instruction(&instr("move", &["$v1", "$v0"])).unwrap();
    assert_eq!(lift.reg.get(&Register::new("v1")).unwrap(), lift.reg.get(&Register::new("v0")).unwrap());
}

#[test]
fn div_binds_a_pair_to_the_destination_register() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("addu", &["$a0", "$zero", "$zero"])).unwrap();
    lift.lift_instruction(&instr("addu", &["$a1", "$zero", "$zero"])).unwrap();
    lift.lift_instruction(&instr("div", &["$v0", "$a0", "$a1"])).unwrap();
    assert!(matches!(lift.reg.get(&Register::new("v0")).unwrap(), Expr::Pair(_, _)));
}

#[test]
fn or_uses_xor_not_pipe() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("addu", &["$a0", "$zero", "$zero"])).unwrap();
    lift.lift_instruction(&instr("addu", &["$a1", "$zero", "$zero"])).unwrap();
    lift.lift_instruction(&instr("or", &["$v0", "$a0", "$a1"])).unwrap();
    match lift.reg.get(&Register::new("v0")).unwrap() {
        Expr::BinaryOp { op, .. } => assert_eq!(op, "^"),
        other => panic!("expected a BinaryOp, got {:?}", other),
    }
}

#[test]
fn mul_dot_d_has_no_canonical_form() {
    let mut lift = BlockLift::new();
    let err = lift.lift_instruction(&instr("mul.d", &["$f0", "$f2", "$f4"])).unwrap_err();
    assert_eq!(err, LiftError::UnknownMnemonic("mulu".to_string()));
}

#[test]
fn jr_sets_a_return_terminator() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("jr", &["$ra"])).unwrap();
    assert_eq!(lift.terminator, Some(Terminator::Return));
}

#[test]
fn jal_sets_a_call_terminator() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("jal", &["some_func"])).unwrap();
    assert!(matches!(lift.terminator, Some(Terminator::Call(_))));
}

#[test]
fn sw_appends_a_store_without_touching_the_register_map() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("addu", &["$v0", "$zero", "$zero"])).unwrap();
    lift.lift_instruction(&instr("sw", &["$v0", "0x10($sp)"])).unwrap();
    assert_eq!(lift.stores.len(), 1);
    assert_eq!(lift.stores[0].size, 32);
    assert!(!lift.stores[0].float);
}

#[test]
fn branch_instructions_are_a_noop() {
    let mut lift = BlockLift::new();
    lift.lift_instruction(&instr("beq", &["$a0", "$a1", ".L1"])).unwrap();
    assert!(lift.stores.is_empty());
    assert!(lift.terminator.is_none());
}

#[test]
fn unset_register_read_is_an_error() {
    let mut lift = BlockLift::new();
    let err = lift.lift_instruction(&instr("move", &["$v0", "$t9"])).unwrap_err();
    assert_eq!(err, LiftError::UnsetRegister("t9".to_string()));
}
