//! Recursive-descent parser emitting bytecode directly, no intermediate AST.
//!
//! Grounded on `littrs::compiler`'s emit/patch_jump discipline (placeholder
//! jump targets, patched once the destination is known) generalized from
//! tree-walking a parsed AST to driving itself off the token vector by index,
//! per `spec.md` §4.2.

use crate::bytecode::{Instruction, Opcode, Program};
use crate::diagnostic::{Diagnostic, Span, Stage};
use crate::scanner::Scanner;
use crate::symbols::{FunctionRecord, FunctionTable, SymbolTable};
use crate::token::{Token, TokenKind};
use crate::types::{Type, TypeTag};
use crate::value::Value;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    program: Program,
    symbols: SymbolTable,
    functions: FunctionTable,
    diagnostics: Vec<Diagnostic>,
    function_depth: usize,
    last_identifier_name: Option<String>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            program: Program::new(),
            symbols: SymbolTable::new(),
            functions: FunctionTable::new(),
            diagnostics: Vec::new(),
            function_depth: 0,
            last_identifier_name: None,
        }
    }

    /// Parse the whole token stream, returning the emitted program and any
    /// diagnostics recorded along the way (parse errors are non-fatal;
    /// panic-mode recovery lets the parser keep going after one).
    pub fn parse(mut self) -> (Program, Vec<Diagnostic>) {
        while !self.check(TokenKind::Eof) {
            self.declaration();
        }
        self.program.push(Instruction::new(Opcode::Halt, self.previous_line()));
        (self.program, self.diagnostics)
    }

    // -- token stream helpers ------------------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn previous_line(&self) -> usize {
        if self.current == 0 { 0 } else { self.previous().location.line }
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &'static str) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            self.error_at_current(format!("missing '{what}'"));
            false
        }
    }

    fn error_at_current(&mut self, message: impl Into<String>) {
        let token = self.peek().clone();
        let diagnostic = Diagnostic::new(Stage::Syntax, message)
            .with_location(crate::diagnostic::Location {
                file: token.location.file.clone(),
                path: token.location.path.clone(),
                line: token.location.line,
                column: token.location.column,
            })
            .with_label(Span::default(), format!("near '{}'", token.lexeme))
            .with_sample_solution_lookup();
        self.diagnostics.push(diagnostic);
    }

    /// Panic-mode recovery: advance until `;` or the start of one of the
    /// statement-beginning keywords, then resume.
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            match self.peek().kind {
                TokenKind::LeftBrace
                | TokenKind::RightBrace
                | TokenKind::Class
                | TokenKind::Fn
                | TokenKind::Var
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // -- emission helpers -----------------------------------------------------

    fn emit(&mut self, opcode: Opcode, line: usize) -> usize {
        self.program.push(Instruction::new(opcode, line))
    }

    fn emit_value(&mut self, opcode: Opcode, line: usize, value: Value) -> usize {
        self.program.push(Instruction::with_value(opcode, line, value))
    }

    fn emit_name(&mut self, opcode: Opcode, line: usize, name: impl Into<String>) -> usize {
        self.program.push(Instruction::with_name(opcode, line, name))
    }

    fn emit_count(&mut self, opcode: Opcode, line: usize, count: u32) -> usize {
        self.program.push(Instruction::with_count(opcode, line, count))
    }

    /// Emit a jump with a placeholder target; returns the index to patch.
    fn emit_jump(&mut self, opcode: Opcode, line: usize) -> usize {
        self.program.push(Instruction::with_target(opcode, line, 0))
    }

    fn current_index(&self) -> u32 {
        self.program.len() as u32
    }

    fn patch_jump(&mut self, at: usize) {
        let target = self.current_index();
        self.program.patch_jump(at, target);
    }

    fn patch_jump_to(&mut self, at: usize, target: u32) {
        self.program.patch_jump(at, target);
    }

    // -- declarations -----------------------------------------------------------

    fn declaration(&mut self) {
        let result = if self.matches(TokenKind::Var) {
            self.var_declaration()
        } else if self.matches(TokenKind::Fn) {
            self.function_declaration()
        } else if self.matches(TokenKind::Class) {
            self.class_declaration()
        } else {
            self.statement()
        };
        if result.is_err() {
            self.synchronize();
        }
    }

    fn var_declaration(&mut self) -> Result<(), ()> {
        let line = self.previous_line();
        if !self.check(TokenKind::Identifier) {
            self.error_at_current("expected a variable name");
            return Err(());
        }
        let name = self.advance().lexeme.clone();

        let declared_type = if self.matches(TokenKind::Colon) {
            self.parse_type_annotation()?
        } else {
            Type::simple(TypeTag::Any)
        };

        let slot = match self.symbols.declare(&name, true, declared_type.clone()) {
            Ok(slot) => slot,
            Err(_) => {
                self.error_at_current(format!("variable already exists in current scope: {name}"));
                return Err(());
            }
        };
        self.emit_count(Opcode::DeclareVariable, line, slot);

        if self.matches(TokenKind::Equal) {
            self.expression()?;
            self.emit_count(Opcode::StoreVariable, line, slot);
        } else {
            // No initializer: store the type-appropriate zero value so the
            // VM never has to infer a declared type from the slot alone.
            self.emit_value(Opcode::LoadConst, line, Value::zero_value(declared_type.tag));
            self.emit_count(Opcode::StoreVariable, line, slot);
        }

        self.expect(TokenKind::Semicolon, ";");
        Ok(())
    }

    fn parse_type_annotation(&mut self) -> Result<Type, ()> {
        use TokenKind::*;
        let tag = match self.peek().kind {
            IntType | I64Type => TypeTag::Int64,
            I8Type => TypeTag::Int8,
            I16Type => TypeTag::Int16,
            I32Type => TypeTag::Int32,
            UIntType | U64Type => TypeTag::UInt64,
            U8Type => TypeTag::UInt8,
            U16Type => TypeTag::UInt16,
            U32Type => TypeTag::UInt32,
            FloatType | F64Type => TypeTag::Float64,
            F32Type => TypeTag::Float32,
            StrType => TypeTag::String,
            BoolType => TypeTag::Bool,
            ListType | ArrayType => TypeTag::List,
            DictType => TypeTag::Dict,
            EnumType => TypeTag::Enum,
            SumType => TypeTag::Sum,
            UnionType => TypeTag::Union,
            AnyType => TypeTag::Any,
            _ => {
                self.error_at_current("expected a type name after ':'");
                return Err(());
            }
        };
        self.advance();
        Ok(Type::simple(tag))
    }

    fn function_declaration(&mut self) -> Result<(), ()> {
        let line = self.previous_line();
        if !self.check(TokenKind::Identifier) {
            self.error_at_current("expected a function name");
            return Err(());
        }
        let name = self.advance().lexeme.clone();

        self.expect(TokenKind::LeftParen, "(");
        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if !self.check(TokenKind::Identifier) {
                    self.error_at_current("expected a parameter name");
                    break;
                }
                let param_name = self.advance().lexeme.clone();
                let param_type = if self.matches(TokenKind::Colon) {
                    self.parse_type_annotation()?
                } else {
                    Type::simple(TypeTag::Any)
                };
                params.push((param_name, param_type));
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, ")");

        let return_type = if self.matches(TokenKind::Colon) {
            self.parse_type_annotation()?
        } else {
            Type::simple(TypeTag::Any)
        };

        let define_idx = self.emit_name(Opcode::DefineFunction, line, name.clone());
        let entry = self.current_index();

        if self
            .functions
            .declare(&name, FunctionRecord { params: params.clone(), return_type, entry })
            .is_err()
        {
            self.error_at_current(format!("function already declared: {name}"));
        }

        self.symbols.enter_scope();
        let mut param_slots = Vec::with_capacity(params.len());
        for (param_name, param_type) in &params {
            let slot = self.symbols.declare(param_name, true, param_type.clone()).ok();
            param_slots.push(slot);
        }
        // Arguments sit on the stack in left-to-right push order, so binding
        // them to slots pops back-to-front: the last parameter first.
        for (slot, (_, param_type)) in param_slots.iter().zip(params.iter()).rev() {
            if let Some(slot) = slot {
                self.emit_count(Opcode::DeclareVariable, line, *slot);
                let _ = param_type;
                self.emit_count(Opcode::StoreVariable, line, *slot);
            }
        }
        self.function_depth += 1;
        self.expect(TokenKind::LeftBrace, "{");
        self.block_body();
        self.function_depth -= 1;
        let _ = self.symbols.exit_scope();

        if !matches!(
            self.program.instructions.last().map(|i| i.opcode),
            Some(Opcode::Return) | Some(Opcode::ReturnValue)
        ) {
            self.emit(Opcode::Return, self.previous_line());
        }
        let _ = define_idx;
        Ok(())
    }

    fn class_declaration(&mut self) -> Result<(), ()> {
        let line = self.previous_line();
        if !self.check(TokenKind::Identifier) {
            self.error_at_current("expected a class name");
            return Err(());
        }
        let name = self.advance().lexeme.clone();
        self.emit_name(Opcode::DefineClass, line, name.clone());
        self.expect(TokenKind::LeftBrace, "{");
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            if self.matches(TokenKind::Fn) {
                self.function_declaration()?;
            } else {
                self.error_at_current("expected a method declaration inside class body");
                self.synchronize();
            }
        }
        self.expect(TokenKind::RightBrace, "}");
        Ok(())
    }

    // -- statements ---------------------------------------------------------

    fn statement(&mut self) -> Result<(), ()> {
        if self.matches(TokenKind::If) {
            self.if_statement()
        } else if self.matches(TokenKind::While) {
            self.while_statement()
        } else if self.matches(TokenKind::For) {
            self.for_statement()
        } else if self.matches(TokenKind::Print) {
            self.print_statement()
        } else if self.matches(TokenKind::Return) {
            self.return_statement()
        } else if self.matches(TokenKind::LeftBrace) {
            self.symbols.enter_scope();
            self.block_body();
            let _ = self.symbols.exit_scope();
            Ok(())
        } else {
            self.expression_statement()
        }
    }

    fn block_body(&mut self) {
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            self.declaration();
        }
        self.expect(TokenKind::RightBrace, "}");
    }

    fn if_statement(&mut self) -> Result<(), ()> {
        let line = self.previous_line();
        self.expect(TokenKind::LeftParen, "(");
        self.expression()?;
        self.expect(TokenKind::RightParen, ")");

        let mut end_jumps = Vec::new();
        let jf = self.emit_jump(Opcode::JumpIfFalse, line);
        self.expect(TokenKind::LeftBrace, "{");
        self.symbols.enter_scope();
        self.block_body();
        let _ = self.symbols.exit_scope();
        end_jumps.push(self.emit_jump(Opcode::Jump, self.previous_line()));
        self.patch_jump(jf);

        while self.matches(TokenKind::Elif) {
            let elif_line = self.previous_line();
            self.expect(TokenKind::LeftParen, "(");
            self.expression()?;
            self.expect(TokenKind::RightParen, ")");
            let jf = self.emit_jump(Opcode::JumpIfFalse, elif_line);
            self.expect(TokenKind::LeftBrace, "{");
            self.symbols.enter_scope();
            self.block_body();
            let _ = self.symbols.exit_scope();
            end_jumps.push(self.emit_jump(Opcode::Jump, self.previous_line()));
            self.patch_jump(jf);
        }

        if self.matches(TokenKind::Else) {
            self.expect(TokenKind::LeftBrace, "{");
            self.symbols.enter_scope();
            self.block_body();
            let _ = self.symbols.exit_scope();
        }

        for jump in end_jumps {
            self.patch_jump(jump);
        }
        Ok(())
    }

    fn while_statement(&mut self) -> Result<(), ()> {
        let loop_start = self.current_index();
        let line = self.previous_line();
        self.expect(TokenKind::LeftParen, "(");
        self.expression()?;
        self.expect(TokenKind::RightParen, ")");

        let jf = self.emit_jump(Opcode::JumpIfFalse, line);
        self.expect(TokenKind::LeftBrace, "{");
        self.symbols.enter_scope();
        self.block_body();
        let _ = self.symbols.exit_scope();
        self.emit_jump_to(Opcode::Jump, self.previous_line(), loop_start);
        self.patch_jump(jf);
        Ok(())
    }

    fn emit_jump_to(&mut self, opcode: Opcode, line: usize, target: u32) {
        let idx = self.program.push(Instruction::with_target(opcode, line, target));
        let _ = idx;
    }

    /// `for (INIT; C; STEP) { B }` lowers to `INIT; while (C) { B; STEP }`
    /// with no stray jump, per the Open Question #1 resolution.
    fn for_statement(&mut self) -> Result<(), ()> {
        self.expect(TokenKind::LeftParen, "(");
        self.symbols.enter_scope();

        if self.matches(TokenKind::Semicolon) {
            // no initializer
        } else if self.matches(TokenKind::Var) {
            self.var_declaration()?;
        } else {
            self.expression_statement()?;
        }

        let loop_start = self.current_index();
        let cond_line = self.previous_line();
        if !self.check(TokenKind::Semicolon) {
            self.expression()?;
        } else {
            self.emit_value(Opcode::Boolean, cond_line, Value::Bool(true));
        }
        self.expect(TokenKind::Semicolon, ";");
        let jf = self.emit_jump(Opcode::JumpIfFalse, cond_line);

        let step_start = self.current;
        // Skip over the step clause's tokens for now; we'll re-parse them
        // after the body, since the step must run after the body but before
        // the next condition check.
        let mut depth = 0i32;
        while !(depth == 0 && self.check(TokenKind::RightParen)) && !self.is_at_end() {
            match self.peek().kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                _ => {}
            }
            self.advance();
        }
        let step_end = self.current;
        self.expect(TokenKind::RightParen, ")");

        self.expect(TokenKind::LeftBrace, "{");
        self.symbols.enter_scope();
        self.block_body();
        let _ = self.symbols.exit_scope();

        if step_end > step_start {
            let saved = self.current;
            self.current = step_start;
            let _ = self.expression();
            self.current = saved;
        }

        self.emit_jump_to(Opcode::Jump, self.previous_line(), loop_start);
        self.patch_jump(jf);
        let _ = self.symbols.exit_scope();
        Ok(())
    }

    fn print_statement(&mut self) -> Result<(), ()> {
        let line = self.previous_line();
        self.expect(TokenKind::LeftParen, "(");
        self.expression()?;
        self.expect(TokenKind::RightParen, ")");
        self.expect(TokenKind::Semicolon, ";");
        self.emit(Opcode::Print, line);
        Ok(())
    }

    fn return_statement(&mut self) -> Result<(), ()> {
        let line = self.previous_line();
        if self.function_depth == 0 {
            self.error_at_current("return outside of a function body");
        }
        if self.check(TokenKind::Semicolon) {
            self.advance();
            self.emit(Opcode::Return, line);
        } else {
            self.expression()?;
            self.expect(TokenKind::Semicolon, ";");
            self.emit(Opcode::ReturnValue, line);
        }
        Ok(())
    }

    fn expression_statement(&mut self) -> Result<(), ()> {
        // `assignment()` takes the `=`/`+=`/`-=` branch for exactly this
        // shape and already balances its own stack (STORE_VARIABLE consumes
        // what it pushed); every other expression form leaves one value
        // that this statement must discard.
        let is_assignment = self.check(TokenKind::Identifier)
            && matches!(
                self.tokens.get(self.current + 1).map(|t| t.kind),
                Some(TokenKind::Equal) | Some(TokenKind::PlusEqual) | Some(TokenKind::MinusEqual)
            );
        self.expression()?;
        self.expect(TokenKind::Semicolon, ";");
        if !is_assignment {
            self.emit(Opcode::Discard, self.previous_line());
        }
        Ok(())
    }

    // -- expressions (precedence ladder) -------------------------------------

    fn expression(&mut self) -> Result<(), ()> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<(), ()> {
        if self.check(TokenKind::Identifier) {
            let is_assign = matches!(
                self.tokens.get(self.current + 1).map(|t| t.kind),
                Some(TokenKind::Equal) | Some(TokenKind::PlusEqual) | Some(TokenKind::MinusEqual)
            );
            if is_assign {
                let name_token = self.advance().clone();
                let op_token = self.advance().clone();
                let line = op_token.location.line;

                let slot = match self.symbols.resolve(&name_token.lexeme) {
                    Some(record) => record.slot,
                    None => {
                        self.error_at_current(format!("undefined variable: {}", name_token.lexeme));
                        self.expression()?;
                        self.expect(TokenKind::Semicolon, ";");
                        return Ok(());
                    }
                };

                match op_token.kind {
                    TokenKind::Equal => {
                        self.expression()?;
                        self.emit_count(Opcode::StoreVariable, line, slot);
                    }
                    TokenKind::PlusEqual => {
                        self.emit_count(Opcode::LoadVariable, line, slot);
                        self.expression()?;
                        self.emit(Opcode::Add, line);
                        self.emit_count(Opcode::StoreVariable, line, slot);
                    }
                    TokenKind::MinusEqual => {
                        self.emit_count(Opcode::LoadVariable, line, slot);
                        self.expression()?;
                        self.emit(Opcode::Subtract, line);
                        self.emit_count(Opcode::StoreVariable, line, slot);
                    }
                    _ => unreachable!(),
                }
                return Ok(());
            }
        }
        self.or_expr()
    }

    fn or_expr(&mut self) -> Result<(), ()> {
        self.and_expr()?;
        while self.matches(TokenKind::Or) {
            let line = self.previous_line();
            self.and_expr()?;
            self.emit(Opcode::Or, line);
        }
        Ok(())
    }

    fn and_expr(&mut self) -> Result<(), ()> {
        self.equality()?;
        while self.matches(TokenKind::And) {
            let line = self.previous_line();
            self.equality()?;
            self.emit(Opcode::And, line);
        }
        Ok(())
    }

    fn equality(&mut self) -> Result<(), ()> {
        self.comparison()?;
        loop {
            let opcode = if self.matches(TokenKind::EqualEqual) {
                Opcode::Equal
            } else if self.matches(TokenKind::BangEqual) {
                Opcode::NotEqual
            } else {
                break;
            };
            let line = self.previous_line();
            self.comparison()?;
            self.emit(opcode, line);
        }
        Ok(())
    }

    fn comparison(&mut self) -> Result<(), ()> {
        self.term()?;
        loop {
            let opcode = if self.matches(TokenKind::Less) {
                Opcode::LessThan
            } else if self.matches(TokenKind::LessEqual) {
                Opcode::LessThanOrEqual
            } else if self.matches(TokenKind::Greater) {
                Opcode::GreaterThan
            } else if self.matches(TokenKind::GreaterEqual) {
                Opcode::GreaterThanOrEqual
            } else {
                break;
            };
            let line = self.previous_line();
            self.term()?;
            self.emit(opcode, line);
        }
        Ok(())
    }

    fn term(&mut self) -> Result<(), ()> {
        self.factor()?;
        loop {
            let opcode = if self.matches(TokenKind::Plus) {
                Opcode::Add
            } else if self.matches(TokenKind::Minus) {
                Opcode::Subtract
            } else {
                break;
            };
            let line = self.previous_line();
            self.factor()?;
            self.emit(opcode, line);
        }
        Ok(())
    }

    fn factor(&mut self) -> Result<(), ()> {
        self.unary()?;
        loop {
            let opcode = if self.matches(TokenKind::Star) {
                Opcode::Multiply
            } else if self.matches(TokenKind::Slash) {
                Opcode::Divide
            } else if self.matches(TokenKind::Modulus) {
                Opcode::Modulus
            } else {
                break;
            };
            let line = self.previous_line();
            self.unary()?;
            self.emit(opcode, line);
        }
        Ok(())
    }

    fn unary(&mut self) -> Result<(), ()> {
        if self.matches(TokenKind::Bang) {
            let line = self.previous_line();
            self.unary()?;
            self.emit(Opcode::Not, line);
            return Ok(());
        }
        if self.matches(TokenKind::Minus) {
            let line = self.previous_line();
            self.unary()?;
            self.emit(Opcode::Negate, line);
            return Ok(());
        }
        self.call()
    }

    fn call(&mut self) -> Result<(), ()> {
        self.primary()?;
        loop {
            if self.matches(TokenKind::LeftParen) {
                let name = self.last_identifier_name.take();
                let line = self.previous_line();
                let mut argc = 0u32;
                if !self.check(TokenKind::RightParen) {
                    loop {
                        self.expression()?;
                        argc += 1;
                        if !self.matches(TokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RightParen, ")");
                if argc > 0 {
                    self.emit_count(Opcode::PushArgs, line, argc);
                }
                match name {
                    Some(name) => {
                        self.emit_name(Opcode::InvokeFunction, line, name);
                    }
                    None => {
                        self.error_at_current("calls are only supported on named functions");
                    }
                }
            } else if self.matches(TokenKind::Dot) {
                if !self.check(TokenKind::Identifier) {
                    self.error_at_current("expected a property name after '.'");
                    break;
                }
                let prop = self.advance().lexeme.clone();
                let line = self.previous_line();
                if self.matches(TokenKind::LeftParen) {
                    let mut argc = 0u32;
                    if !self.check(TokenKind::RightParen) {
                        loop {
                            self.expression()?;
                            argc += 1;
                            if !self.matches(TokenKind::Comma) {
                                break;
                            }
                        }
                    }
                    self.expect(TokenKind::RightParen, ")");
                    if argc > 0 {
                        self.emit_count(Opcode::PushArgs, line, argc);
                    }
                    self.emit_name(Opcode::MethodCall, line, prop);
                } else {
                    self.emit_name(Opcode::LoadProperty, line, prop);
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn primary(&mut self) -> Result<(), ()> {
        let token = self.peek().clone();
        let line = token.location.line;
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = parse_number_literal(&token.lexeme);
                self.emit_value(Opcode::LoadConst, line, value);
            }
            TokenKind::String => {
                self.advance();
                self.compile_string_literal(&token.lexeme, line)?;
            }
            TokenKind::True => {
                self.advance();
                self.emit_value(Opcode::Boolean, line, Value::Bool(true));
            }
            TokenKind::False => {
                self.advance();
                self.emit_value(Opcode::Boolean, line, Value::Bool(false));
            }
            TokenKind::Nil => {
                self.advance();
                self.emit_value(Opcode::LoadConst, line, Value::Nil);
            }
            TokenKind::Identifier => {
                self.advance();
                self.last_identifier_name = Some(token.lexeme.clone());
                if self.functions.exists(&token.lexeme) && !self.symbols.exists(&token.lexeme) {
                    // Resolved at the call site above; nothing to emit here.
                } else if let Some(record) = self.symbols.resolve(&token.lexeme) {
                    self.emit_count(Opcode::LoadVariable, line, record.slot);
                } else {
                    self.error_at_current(format!("undefined variable: {}", token.lexeme));
                }
            }
            TokenKind::LeftParen => {
                self.advance();
                self.expression()?;
                self.expect(TokenKind::RightParen, ")");
            }
            _ => {
                self.error_at_current(format!("unexpected token: {}", token.lexeme));
                self.advance();
                return Err(());
            }
        }
        Ok(())
    }

    /// Split a string literal's content on `{expr}` placeholders, emitting
    /// `LOAD_STR` for the templated text and recursively compiling each
    /// embedded expression, then `INTERPOLATE_STRING n`.
    fn compile_string_literal(&mut self, content: &str, line: usize) -> Result<(), ()> {
        let (template, expressions) = split_interpolation(content);
        if expressions.is_empty() {
            self.emit_value(Opcode::LoadStr, line, Value::String(template));
            return Ok(());
        }
        self.emit_value(Opcode::LoadStr, line, Value::String(template));
        for expr_source in &expressions {
            self.compile_sub_expression(expr_source)?;
        }
        self.emit_count(Opcode::InterpolateString, line, expressions.len() as u32);
        Ok(())
    }

    /// Temporarily scan and parse `source` as a standalone expression,
    /// splicing its instructions into the running program, then restore the
    /// outer token stream.
    fn compile_sub_expression(&mut self, source: &str) -> Result<(), ()> {
        let (tokens, scan_errors) =
            Scanner::new(source, "<interpolation>", "<interpolation>").scan_tokens();
        self.diagnostics.extend(scan_errors);

        let saved_tokens = std::mem::replace(&mut self.tokens, tokens);
        let saved_current = std::mem::replace(&mut self.current, 0);

        let result = self.expression();

        self.tokens = saved_tokens;
        self.current = saved_current;
        result
    }
}

/// Split string content on `{...}` placeholders (single level, no nesting)
/// into a template with literal `{}` markers and the list of embedded
/// expression source strings, in left-to-right order.
fn split_interpolation(content: &str) -> (String, Vec<String>) {
    let mut template = String::new();
    let mut expressions = Vec::new();
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            let mut expr = String::new();
            for next in chars.by_ref() {
                if next == '}' {
                    break;
                }
                expr.push(next);
            }
            expressions.push(expr);
            template.push_str("{}");
        } else {
            template.push(c);
        }
    }
    (template, expressions)
}

fn parse_number_literal(lexeme: &str) -> Value {
    if lexeme.contains('.') {
        Value::Float64(lexeme.parse().unwrap_or(0.0))
    } else {
        Value::Int64(lexeme.parse().unwrap_or(0))
    }
}
