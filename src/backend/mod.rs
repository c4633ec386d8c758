mod instruction;

use std::fmt::{self, Display};

pub use instruction::{
	BinaryOp,
	Instruction,
	Operand,
	Width,
	OPERAND_OFFSET,
	OPERAND_WIDTH,
	PLACEHOLDER,
	RECORD_LEN,
};
use instruction::{format_operand, parse_operand};


/// The largest code buffer. Offsets into the buffer must fit an operand field.
pub const MAX_CODE_SIZE: usize = 0xFFFF;


/// Code generation errors. These are resource ceilings imposed by the fixed-width operand
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
	/// The code buffer can't hold another instruction.
	CodeBufferFull,
	/// The runtime stack depth or a frame offset doesn't fit an operand field.
	StackTooDeep,
}


impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::CodeBufferFull => write!(f, "code buffer full ({} bytes)", MAX_CODE_SIZE),
			Self::StackTooDeep => write!(f, "stack too deep"),
		}
	}
}


impl std::error::Error for Error {}


/// The location of an operand field awaiting a target address.
/// Handles are only produced by the emitter for placeholder operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchHandle(usize);


impl PatchHandle {
	/// The byte offset of the operand field in the code buffer.
	pub fn offset(self) -> usize {
		self.0
	}
}


/// The code emitter: an append-only buffer of fixed-width records, plus the compile-time
/// count of words live on the runtime stack in the current function.
#[derive(Debug, Default)]
pub struct Emitter {
	code: String,
	depth: u16,
}


impl Emitter {
	pub fn new() -> Self {
		Self::default()
	}


	/// The code offset where the next instruction will be placed.
	pub fn offset(&self) -> u16 {
		// The buffer never grows past MAX_CODE_SIZE.
		self.code.len() as u16
	}


	/// The number of words currently pushed in the function's frame.
	pub fn depth(&self) -> u16 {
		self.depth
	}


	/// Reset the depth counter, used when entering a function or when unwinding the
	/// logical depth after code that doesn't fall through.
	pub fn set_depth(&mut self, depth: u16) {
		self.depth = depth;
	}


	/// A := value.
	pub fn load_const(&mut self, value: u16) -> Result<(), Error> {
		self.emit(Instruction::LoadImmediate(Operand::Known(value)))
	}


	/// A := ????, to be patched once the value is known.
	pub fn load_placeholder(&mut self) -> Result<PatchHandle, Error> {
		self.emit_patchable(Instruction::LoadImmediate(Operand::Placeholder))
	}


	/// Push A.
	pub fn push(&mut self) -> Result<(), Error> {
		let depth = self.depth
			.checked_add(1)
			.ok_or(Error::StackTooDeep)?;

		self.emit(Instruction::Push)?;
		self.depth = depth;

		Ok(())
	}


	/// Discard the given number of words. Emits nothing when the count is zero.
	pub fn pop(&mut self, count: u16) -> Result<(), Error> {
		if count == 0 {
			return Ok(());
		}

		self.emit(Instruction::Pop(count))?;
		self.drop_words(count);

		Ok(())
	}


	/// A := address of the stack word `slot` words below the top.
	pub fn stack_addr(&mut self, slot: u16) -> Result<(), Error> {
		self.emit(Instruction::StackAddress(slot))
	}


	/// A := memory[A], word or byte wide.
	pub fn load(&mut self, width: Width) -> Result<(), Error> {
		self.emit(Instruction::Load(width))
	}


	/// Pop the address pushed earlier into B, and store A through it.
	pub fn store(&mut self, width: Width) -> Result<(), Error> {
		self.emit(Instruction::Store(width))?;
		self.drop_words(1);

		Ok(())
	}


	/// Pop the left operand and combine it with A.
	pub fn binary(&mut self, op: BinaryOp) -> Result<(), Error> {
		self.emit(Instruction::Binary(op))?;
		self.drop_words(1);

		Ok(())
	}


	/// Call the code address in A. The return address is the callee's concern, so the
	/// depth is unchanged.
	pub fn call(&mut self) -> Result<(), Error> {
		self.emit(Instruction::Call)
	}


	pub fn ret(&mut self) -> Result<(), Error> {
		self.emit(Instruction::Ret)
	}


	/// Unconditional jump to a target to be patched.
	pub fn jump(&mut self) -> Result<PatchHandle, Error> {
		self.emit_patchable(Instruction::Jump(Operand::Placeholder))
	}


	/// Unconditional jump to a known target, such as a loop head.
	pub fn jump_to(&mut self, target: u16) -> Result<(), Error> {
		self.emit(Instruction::Jump(Operand::Known(target)))
	}


	/// Jump if A is zero, to a target to be patched.
	pub fn jump_if_zero(&mut self) -> Result<PatchHandle, Error> {
		self.emit_patchable(Instruction::JumpIfZero(Operand::Placeholder))
	}


	/// Rewrite a placeholder operand with its target. Only the operand bytes change.
	pub fn patch(&mut self, handle: PatchHandle, target: u16) {
		let field = handle.0 .. handle.0 + OPERAND_WIDTH;

		debug_assert_eq!(
			self.code.get(field.clone()),
			Some(PLACEHOLDER),
			"patching an operand that isn't a placeholder"
		);

		self.code.replace_range(field, &format_operand(target));
	}


	/// Freeze the buffer into a program.
	pub fn finish(self) -> Program {
		Program { code: self.code.into() }
	}


	fn emit(&mut self, instruction: Instruction) -> Result<(), Error> {
		if self.code.len() + instruction.len() > MAX_CODE_SIZE {
			return Err(Error::CodeBufferFull);
		}

		instruction.encode(&mut self.code);

		Ok(())
	}


	fn emit_patchable(&mut self, instruction: Instruction) -> Result<PatchHandle, Error> {
		debug_assert!(instruction.has_operand());

		let handle = PatchHandle(self.code.len() + OPERAND_OFFSET);
		self.emit(instruction)?;

		Ok(handle)
	}


	fn drop_words(&mut self, count: u16) {
		self.depth = self.depth
			.checked_sub(count)
			.expect("runtime stack depth underflow");
	}
}


/// A finished VM program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
	code: Box<str>,
}


impl Program {
	/// The program size in bytes.
	pub fn len(&self) -> usize {
		self.code.len()
	}


	pub fn is_empty(&self) -> bool {
		self.code.is_empty()
	}


	pub fn as_str(&self) -> &str {
		&self.code
	}


	/// The program's records, without their trailing newlines.
	pub fn records(&self) -> impl Iterator<Item = &str> {
		self.code.lines()
	}


	/// Decode the operand of the record starting at the given code offset.
	pub fn operand_at(&self, offset: usize) -> Option<u16> {
		let start = offset + OPERAND_OFFSET;
		self.code
			.get(start .. start + OPERAND_WIDTH)
			.and_then(parse_operand)
	}
}


impl Display for Program {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.code)
	}
}
