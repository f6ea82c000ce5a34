use super::ast::Var;
use super::bytecode::{Bytecode, Op};
use super::error::ExecError;

/// Stack machine for compiled expressions.
///
/// Holds its operand stack between runs so the per-pixel hot path does not
/// allocate. The stack is cleared on every `execute` entry, so a run that
/// failed part-way never leaks values into the next one.
#[derive(Debug, Default)]
pub struct Vm {
    stack: Vec<i32>,
}

impl Vm {
    pub fn new() -> Self {
        Self {
            stack: Vec::with_capacity(64),
        }
    }

    /// Evaluate `code` with the three free variables bound to `x`, `y`, `z`.
    pub fn execute(&mut self, code: &Bytecode, x: i32, y: i32, z: i32) -> Result<i32, ExecError> {
        self.stack.clear();
        let stack = &mut self.stack;
        let mut pc = 0;

        while pc < code.len() {
            let (op, next) = code.decode_at(pc)?;
            match op {
                Op::Const(v) => stack.push(v),
                Op::Load(Var::X) => stack.push(x),
                Op::Load(Var::Y) => stack.push(y),
                Op::Load(Var::Z) => stack.push(z),
                Op::Add => binop(stack, pc, |a, n| Ok(a.wrapping_add(n)))?,
                Op::Sub => binop(stack, pc, |a, n| Ok(a.wrapping_sub(n)))?,
                Op::Mul => binop(stack, pc, |a, n| Ok(a.wrapping_mul(n)))?,
                Op::Div => binop(stack, pc, |a, n| {
                    if n == 0 {
                        Err(ExecError::DivisionByZero { pc })
                    } else {
                        Ok(a.wrapping_div(n))
                    }
                })?,
                Op::Pow => binop(stack, pc, |a, b| int_pow(a, b, pc))?,
                Op::Neg => {
                    let top = stack.last_mut().ok_or(ExecError::StackUnderflow { pc })?;
                    *top = top.wrapping_neg();
                }
            }
            pc = next;
        }

        match stack.as_slice() {
            [result] => Ok(*result),
            [] => Err(ExecError::StackUnderflow { pc }),
            rest => Err(ExecError::UnbalancedStack { depth: rest.len() }),
        }
    }
}

/// Execute with a fresh stack. For per-pixel loops, keep a `Vm` around instead.
pub fn execute(code: &Bytecode, x: i32, y: i32, z: i32) -> Result<i32, ExecError> {
    Vm::new().execute(code, x, y, z)
}

/// Pop the right operand, then the left, and push `f(left, right)`.
fn binop(
    stack: &mut Vec<i32>,
    pc: usize,
    f: impl FnOnce(i32, i32) -> Result<i32, ExecError>,
) -> Result<(), ExecError> {
    let n = stack.pop().ok_or(ExecError::StackUnderflow { pc })?;
    let a = stack.last_mut().ok_or(ExecError::StackUnderflow { pc })?;
    *a = f(*a, n)?;
    Ok(())
}

/// Integer power with wrapping overflow. A negative exponent yields the
/// truncated reciprocal: 0 for |base| > 1, ±1 for base ±1, and a division
/// by zero for base 0.
fn int_pow(base: i32, exp: i32, pc: usize) -> Result<i32, ExecError> {
    if let Ok(e) = u32::try_from(exp) {
        return Ok(base.wrapping_pow(e));
    }
    match base {
        0 => Err(ExecError::DivisionByZero { pc }),
        1 => Ok(1),
        -1 => Ok(if exp % 2 == 0 { 1 } else { -1 }),
        _ => Ok(0),
    }
}
