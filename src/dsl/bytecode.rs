use std::fmt;

use super::ast::Var;
use super::error::ExecError;

/// Integer tags stored in the bytecode stream. The numbering is part of the
/// encoding and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Opcode {
    Add = 0,
    Sub = 1,
    Mul = 2,
    Div = 3,
    Pow = 4,
    Neg = 5,
    Const = 6,
    LoadX = 7,
    LoadY = 8,
    LoadZ = 9,
}

impl Opcode {
    pub fn from_tag(tag: i32) -> Option<Self> {
        Some(match tag {
            0 => Self::Add,
            1 => Self::Sub,
            2 => Self::Mul,
            3 => Self::Div,
            4 => Self::Pow,
            5 => Self::Neg,
            6 => Self::Const,
            7 => Self::LoadX,
            8 => Self::LoadY,
            9 => Self::LoadZ,
            _ => return None,
        })
    }

    pub fn tag(self) -> i32 {
        self as i32
    }

    pub fn load(var: Var) -> Self {
        match var {
            Var::X => Self::LoadX,
            Var::Y => Self::LoadY,
            Var::Z => Self::LoadZ,
        }
    }
}

/// One decoded instruction, with the `const` operand folded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Neg,
    Const(i32),
    Load(Var),
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Add => write!(f, "add"),
            Op::Sub => write!(f, "sub"),
            Op::Mul => write!(f, "mul"),
            Op::Div => write!(f, "div"),
            Op::Pow => write!(f, "pow"),
            Op::Neg => write!(f, "neg"),
            Op::Const(v) => write!(f, "const {v}"),
            Op::Load(Var::X) => write!(f, "load_x"),
            Op::Load(Var::Y) => write!(f, "load_y"),
            Op::Load(Var::Z) => write!(f, "load_z"),
        }
    }
}

/// A flat stream of opcode tags, each `const` tag followed by its literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytecode {
    code: Vec<i32>,
}

impl Bytecode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a raw stream without validating it. Malformed streams are caught
    /// by the VM at execution time.
    pub fn from_raw(code: Vec<i32>) -> Self {
        Self { code }
    }

    pub fn emit(&mut self, op: Op) {
        match op {
            Op::Add => self.code.push(Opcode::Add.tag()),
            Op::Sub => self.code.push(Opcode::Sub.tag()),
            Op::Mul => self.code.push(Opcode::Mul.tag()),
            Op::Div => self.code.push(Opcode::Div.tag()),
            Op::Pow => self.code.push(Opcode::Pow.tag()),
            Op::Neg => self.code.push(Opcode::Neg.tag()),
            Op::Const(v) => {
                self.code.push(Opcode::Const.tag());
                self.code.push(v);
            }
            Op::Load(var) => self.code.push(Opcode::load(var).tag()),
        }
    }

    pub fn as_slice(&self) -> &[i32] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Decode the instruction starting at `pc`. Returns the instruction and
    /// the pc of the next one.
    pub fn decode_at(&self, pc: usize) -> Result<(Op, usize), ExecError> {
        let tag = *self.code.get(pc).ok_or(ExecError::MissingOperand { pc })?;
        let op = match Opcode::from_tag(tag).ok_or(ExecError::InvalidOpcode { pc, tag })? {
            Opcode::Add => Op::Add,
            Opcode::Sub => Op::Sub,
            Opcode::Mul => Op::Mul,
            Opcode::Div => Op::Div,
            Opcode::Pow => Op::Pow,
            Opcode::Neg => Op::Neg,
            Opcode::Const => {
                let value = *self.code.get(pc + 1).ok_or(ExecError::MissingOperand { pc })?;
                return Ok((Op::Const(value), pc + 2));
            }
            Opcode::LoadX => Op::Load(Var::X),
            Opcode::LoadY => Op::Load(Var::Y),
            Opcode::LoadZ => Op::Load(Var::Z),
        };
        Ok((op, pc + 1))
    }

    /// Decode the whole stream, stopping at the first malformed instruction.
    pub fn ops(&self) -> Result<Vec<(usize, Op)>, ExecError> {
        let mut ops = Vec::new();
        let mut pc = 0;
        while pc < self.code.len() {
            let (op, next) = self.decode_at(pc)?;
            ops.push((pc, op));
            pc = next;
        }
        Ok(ops)
    }
}

/// One instruction per line, prefixed with its pc.
impl fmt::Display for Bytecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pc = 0;
        while pc < self.code.len() {
            match self.decode_at(pc) {
                Ok((op, next)) => {
                    writeln!(f, "{pc:04}  {op}")?;
                    pc = next;
                }
                Err(e) => return writeln!(f, "{pc:04}  <{e}>"),
            }
        }
        Ok(())
    }
}
