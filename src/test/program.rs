use crate::program::assemble;

#[test]
fn strips_comments_and_directives() {
    let input = "\
glabel foo
.text # a section directive
/* block comment */ addiu $sp, $sp, -0x10 # trailing
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.functions[0].name, "foo");
    assert_eq!(program.functions[0].body.len(), 3);
}

#[test]
fn labels_and_multiple_functions() {
    let input = "\
glabel foo
.L0:
beq $a0, $a1, .L0
nop
glabel bar
jr $ra
nop
";
    let program = assemble("f.s", input).unwrap();
    assert_eq!(program.functions.len(), 2);
    assert_eq!(program.functions[0].name, "foo");
    assert_eq!(program.functions[1].name, "bar");
}

#[test]
fn instruction_before_any_glabel_is_an_error() {
    let input = "jr $ra\nnop\n";
    assert!(assemble("f.s", input).is_err());
}
