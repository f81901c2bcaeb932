use luminar::bytecode::Opcode;
use luminar::parser::Parser;
use luminar::scanner::Scanner;

fn opcodes(source: &str) -> Vec<Opcode> {
    let (tokens, scan_errors) = Scanner::new(source, "t", "t.lum").scan_tokens();
    assert!(scan_errors.is_empty(), "{scan_errors:?}");
    let (program, parse_errors) = Parser::new(tokens).parse();
    assert!(parse_errors.is_empty(), "{parse_errors:?}");
    program.instructions.into_iter().map(|i| i.opcode).collect()
}

#[test]
fn var_declaration_emits_declare_and_store() {
    let ops = opcodes("var x = 1;");
    assert!(ops.contains(&Opcode::DeclareVariable));
    assert!(ops.contains(&Opcode::StoreVariable));
    assert_eq!(ops.last(), Some(&Opcode::Halt));
}

#[test]
fn uninitialized_var_still_stores_a_zero_value() {
    let ops = opcodes("var x: int;");
    let declare_pos = ops.iter().position(|o| *o == Opcode::DeclareVariable).unwrap();
    assert_eq!(ops[declare_pos + 1], Opcode::LoadConst);
    assert_eq!(ops[declare_pos + 2], Opcode::StoreVariable);
}

#[test]
fn if_statement_emits_a_conditional_jump() {
    let ops = opcodes("if (true) { print(1); }");
    assert!(ops.contains(&Opcode::JumpIfFalse));
}

#[test]
fn while_loop_emits_a_backward_jump() {
    let ops = opcodes("while (true) { print(1); }");
    assert!(ops.contains(&Opcode::Jump));
    assert!(ops.contains(&Opcode::JumpIfFalse));
}

#[test]
fn function_declaration_emits_define_and_return() {
    let ops = opcodes("fn add(a, b) { return a + b; }");
    assert!(ops.contains(&Opcode::DefineFunction));
    assert!(ops.contains(&Opcode::ReturnValue));
}

#[test]
fn string_interpolation_emits_interpolate_string() {
    let ops = opcodes("var name = \"world\"; print(\"hi {name}\");");
    assert!(ops.contains(&Opcode::InterpolateString));
}

#[test]
fn redeclaring_a_variable_in_the_same_scope_is_a_diagnostic_not_a_panic() {
    let (tokens, _) = Scanner::new("var x = 1; var x = 2;", "t", "t.lum").scan_tokens();
    let (_, errors) = Parser::new(tokens).parse();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("already exists"));
}

#[test]
fn missing_semicolon_is_a_syntax_diagnostic() {
    let (tokens, _) = Scanner::new("var x = 1", "t", "t.lum").scan_tokens();
    let (_, errors) = Parser::new(tokens).parse();
    assert!(!errors.is_empty());
}
