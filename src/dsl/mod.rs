#[allow(clippy::module_name_repetitions)]
pub mod ast;
pub mod bytecode;
pub mod compiler;
#[allow(clippy::module_name_repetitions)]
pub mod error;
#[allow(
    clippy::indexing_slicing,
    clippy::module_name_repetitions,
)]
pub mod lexer;
pub mod parser;
pub mod vm;

use bytecode::Bytecode;
use error::CompileError;

/// Compile an expression string into bytecode ready for VM execution.
///
/// This is the primary public entry point for the expression pipeline:
/// source → lex → parse → compile → `Bytecode`
pub fn compile_source(source: &str) -> Result<Bytecode, Vec<CompileError>> {
    let tokens = lexer::lex(source)?;
    let expr = parser::parse(tokens)?;
    Ok(compiler::compile(&expr))
}
