use super::ast::{BinOp, Expr, ExprKind};
use super::bytecode::{Bytecode, Op};

/// Compile a parsed expression into stack-machine bytecode.
///
/// Operands are emitted before their operator (post-order), so every binary
/// op finds its left operand second-from-top and its right operand on top.
pub fn compile(expr: &Expr) -> Bytecode {
    let mut compiler = Compiler::new();
    compiler.compile_expr(expr);
    compiler.code
}

struct Compiler {
    code: Bytecode,
}

impl Compiler {
    fn new() -> Self {
        Self { code: Bytecode::new() }
    }

    fn compile_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::IntLit(v) => self.code.emit(Op::Const(*v)),
            ExprKind::Var(var) => self.code.emit(Op::Load(*var)),
            ExprKind::Neg(operand) => {
                self.compile_expr(operand);
                self.code.emit(Op::Neg);
            }
            ExprKind::BinOp { op, left, right } => {
                self.compile_expr(left);
                self.compile_expr(right);
                self.code.emit(match op {
                    BinOp::Add => Op::Add,
                    BinOp::Sub => Op::Sub,
                    BinOp::Mul => Op::Mul,
                    BinOp::Div => Op::Div,
                    BinOp::Pow => Op::Pow,
                });
            }
        }
    }
}
