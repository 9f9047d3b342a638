use crate::block::build_blocks;
use crate::program::assemble;

#[test]
fn delay_slot_terminates_the_block() {
    let input = "\
glabel foo
beq $a0, $a1, .L1
nop
addiu $v0, $v0, 1
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].instructions.len(), 2);
    assert_eq!(blocks[0].instructions[0].mnemonic, "beq");
    assert_eq!(blocks[0].instructions[1].mnemonic, "nop");
    assert_eq!(blocks[1].instructions[0].mnemonic, "addiu");
}

#[test]
fn block_indices_are_dense() {
    let input = "\
glabel foo
beq $a0, $a1, .L1
nop
.L1:
beq $a0, $a1, .L1
nop
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    for (i, block) in blocks.iter().enumerate() {
        assert_eq!(block.index, i);
    }
}

#[test]
fn branch_as_last_instruction_is_missing_delay_slot() {
    let input = "\
glabel foo
beq $a0, $a1, .L1
";
    let program = assemble("f.s", input).unwrap();
    assert!(build_blocks(&program.functions[0]).is_err());
}
