//! Line classifier and program assembler (C2/C3). Grounded on
//! `examples/original_source/main.py::decompile` for the classification
//! order, and on the teacher's `vasm/src/lib.rs::assemble` for the
//! single read-whole-file-then-process pipeline shape.

use crate::arg::parse_arg;
use crate::error::{Result, StructuralError};
use crate::instruction::{BodyItem, Instruction, Label};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub body: Vec<BodyItem>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            body: Vec::new(),
        }
    }

    fn new_label(&mut self, name: &str) {
        self.body.push(BodyItem::Label(Label::new(name)));
    }

    fn new_instruction(&mut self, instruction: Instruction) {
        self.body.push(BodyItem::Instruction(instruction));
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "glabel {}", self.name)?;
        let body = self
            .body
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        write!(f, "{}", body)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    pub filename: String,
    pub functions: Vec<Function>,
    current_function: Option<usize>,
}

impl Program {
    pub fn new(filename: impl Into<String>) -> Self {
        Program {
            filename: filename.into(),
            functions: Vec::new(),
            current_function: None,
        }
    }

    fn new_function(&mut self, name: &str) {
        self.functions.push(Function::new(name));
        self.current_function = Some(self.functions.len() - 1);
    }

    fn new_instruction(&mut self, instruction: Instruction) -> Result<()> {
        let idx = self
            .current_function
            .ok_or(StructuralError::NoCurrentFunction)?;
        self.functions[idx].new_instruction(instruction);
        Ok(())
    }

    fn new_label(&mut self, name: &str) -> Result<()> {
        let idx = self
            .current_function
            .ok_or(StructuralError::NoCurrentFunction)?;
        self.functions[idx].new_label(name);
        Ok(())
    }

    /// Clears the "current function" cursor; called once after parsing
    /// finishes (§3: "cleared after parsing").
    fn clear_cursor(&mut self) {
        self.current_function = None;
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}", self.filename)?;
        let functions = self
            .functions
            .iter()
            .map(|func| func.to_string())
            .collect::<Vec<_>>()
            .join("\n\n");
        write!(f, "{}", functions)
    }
}

/// Strips `/* ... */` and `# ...` comments, then trims whitespace.
fn strip_comments(line: &str) -> String {
    let mut s = line.to_string();
    if let Some(start) = s.find("/*") {
        if let Some(rel_end) = s[start + 2..].find("*/") {
            let end = start + 2 + rel_end + 2;
            s.replace_range(start..end, "");
        }
    }
    if let Some(hash) = s.find('#') {
        s.truncate(hash);
    }
    s.trim().to_string()
}

fn parse_instruction_line(line: &str) -> Result<Instruction> {
    let (mnemonic, rest) = match line.find(' ') {
        Some(idx) => (&line[..idx], &line[idx + 1..]),
        None => (line, ""),
    };
    let mut args = Vec::new();
    for arg_str in rest.split(',') {
        if let Some(arg) = parse_arg(arg_str.trim())? {
            args.push(arg);
        }
    }
    Ok(Instruction::new(mnemonic, args))
}

/// Parses a whole compilation unit into a `Program` (C2 + C3).
pub fn assemble(filename: &str, input: &str) -> Result<Program> {
    let mut program = Program::new(filename);

    for raw_line in input.lines() {
        let line = strip_comments(raw_line);

        if line.is_empty() {
            continue;
        } else if line.starts_with('.') && line.ends_with(':') {
            let label_name = line.trim_matches(|c| c == '.' || c == ':');
            program.new_label(label_name)?;
        } else if let Some(name) = line.strip_prefix("glabel ") {
            let function_name = name.split_whitespace().next().unwrap_or(name);
            program.new_function(function_name);
        } else if line.starts_with('.') {
            // Assembler directive, ignored.
            continue;
        } else {
            let instruction = parse_instruction_line(&line)?;
            program.new_instruction(instruction)?;
        }
    }

    program.clear_cursor();
    Ok(program)
}
