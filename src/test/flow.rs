use crate::block::build_blocks;
use crate::flow::{analyze, Node};
use crate::program::assemble;

#[test]
fn backward_branch_is_a_loop() {
    let input = "\
glabel foo
.L1:
beq $t0, $zero, .L2
nop
addiu $v0, $v0, 1
b .L1
nop
.L2:
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    let flow = analyze(blocks).unwrap();

    let loop_node = flow.nodes[1];
    match loop_node {
        Node::Basic { block_index, exit_edge } => {
            assert_eq!(block_index, 1);
            assert_eq!(exit_edge, 0);
        }
        other => panic!("expected a BasicNode, got {:?}", other),
    }
    assert!(loop_node.is_loop());
}

#[test]
fn exit_node_is_highest_index() {
    let input = "\
glabel foo
beq $a0, $a1, .L1
nop
.L1:
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    let flow = analyze(blocks).unwrap();

    let last = flow.nodes.last().unwrap();
    assert!(matches!(last, Node::Exit { .. }));
    assert_eq!(last.block_index(), flow.nodes.len() - 1);
}

#[test]
fn conditional_branch_has_fallthrough_and_target() {
    let input = "\
glabel foo
beq $a0, $a1, .L1
nop
addiu $v0, $v0, 1
.L1:
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    let flow = analyze(blocks).unwrap();

    match flow.nodes[0] {
        Node::Conditional {
            conditional_edge,
            fallthrough_edge,
            ..
        } => {
            assert_eq!(conditional_edge, 2);
            assert_eq!(fallthrough_edge, 1);
        }
        other => panic!("expected a ConditionalNode, got {:?}", other),
    }
}

#[test]
fn unresolved_branch_target_is_an_error() {
    let input = "\
glabel foo
beq $a0, $a1, .nowhere
nop
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    assert!(analyze(blocks).is_err());
}

#[test]
fn empty_function_body_is_a_structural_error_not_a_panic() {
    let input = "\
glabel foo
glabel bar
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    let blocks = build_blocks(&program.functions[0]).unwrap();
    assert!(blocks.is_empty());
    assert!(analyze(blocks).is_err());
}
