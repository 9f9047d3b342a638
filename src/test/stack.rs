use crate::arg::Register;
use crate::block::build_blocks;
use crate::program::assemble;
use crate::stack::analyze_stack;

#[test]
fn prologue_with_saved_return_address_and_one_callee_save() {
    let input = "\
glabel foo
addiu $sp, $sp, -0x20
sw $ra, 0x1c($sp)
sw $s0, 0x18($sp)
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    let info = analyze_stack(&blocks[0]).unwrap();

    assert_eq!(info.allocated_stack_size, 32);
    assert!(!info.is_leaf);
    assert_eq!(info.return_addr_location, 28);
    assert_eq!(info.callee_save_reg_locations.get(&Register::new("s0")), Some(&24));
    assert_eq!(info.local_vars_region_bottom, 32);
}

#[test]
fn leaf_function_with_no_stack_frame() {
    let input = "\
glabel foo
addu $v0, $a0, $a1
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    let info = analyze_stack(&blocks[0]).unwrap();

    assert!(info.is_leaf);
    assert_eq!(info.local_vars_region_bottom, 0);
    assert_eq!(info.allocated_stack_size, 0);
}

#[test]
fn leaf_function_with_callee_saves_only() {
    let input = "\
glabel foo
addiu $sp, $sp, -0x10
sw $s0, 0x8($sp)
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    let info = analyze_stack(&blocks[0]).unwrap();

    assert!(info.is_leaf);
    assert_eq!(info.local_vars_region_bottom, 12);
    assert!(info.in_local_var_region(12));
    assert!(!info.in_local_var_region(8));
}
