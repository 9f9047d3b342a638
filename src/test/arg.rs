use crate::arg::{parse_arg, Argument, BinOpKind, MacroKind, Register};

#[test]
fn negative_hex_address_mode() {
    let parsed = parse_arg("-0x10($sp)").unwrap().unwrap();
    assert_eq!(
        parsed,
        Argument::AddressMode {
            lhs: Some(Box::new(Argument::NumberLiteral(-16))),
            rhs: Box::new(Argument::Register(Register::new("sp"))),
        }
    );
}

#[test]
fn macro_in_address_mode() {
    let parsed = parse_arg("%lo(foo)($v0)").unwrap().unwrap();
    assert_eq!(
        parsed,
        Argument::AddressMode {
            lhs: Some(Box::new(Argument::Macro(
                MacroKind::Lo,
                Box::new(Argument::GlobalSymbol("foo".to_string())),
            ))),
            rhs: Box::new(Argument::Register(Register::new("v0"))),
        }
    );
}

#[test]
fn shift_binop() {
    let parsed = parse_arg("foo >> 16").unwrap().unwrap();
    assert_eq!(
        parsed,
        Argument::BinOp {
            op: BinOpKind::Shr,
            lhs: Box::new(Argument::GlobalSymbol("foo".to_string())),
            rhs: Box::new(Argument::NumberLiteral(16)),
        }
    );
}

#[test]
fn empty_operand_is_none() {
    assert_eq!(parse_arg("").unwrap(), None);
    assert_eq!(parse_arg("   ").unwrap(), None);
}

#[test]
fn jump_target() {
    let parsed = parse_arg(".L123").unwrap().unwrap();
    assert_eq!(parsed, Argument::JumpTarget("L123".to_string()));
}

#[test]
fn display_round_trips_register_and_number() {
    for text in ["$a0", "$sp", "-0x10($sp)", "0x1c"] {
        let parsed = parse_arg(text).unwrap().unwrap();
        assert_eq!(parsed.to_string(), text);
    }
}

#[test]
fn callee_save_detection() {
    assert!(Register::new("s0").is_callee_save());
    assert!(Register::new("s7").is_callee_save());
    assert!(!Register::new("s8").is_callee_save());
    assert!(!Register::new("sp").is_callee_save());
    assert!(!Register::new("a0").is_callee_save());
}

#[test]
fn unknown_macro_is_an_error() {
    assert!(parse_arg("%bogus(foo)").is_err());
}
