use std::fmt::Write as _;


/// Every record is seven characters and a newline.
pub const RECORD_LEN: usize = 8;

/// Operand fields start at this byte within their record.
pub const OPERAND_OFFSET: usize = 3;

/// Operands are four lowercase hex digits.
pub const OPERAND_WIDTH: usize = 4;

/// Printed in an operand field until it is patched.
pub const PLACEHOLDER: &str = "....";

/// The record that pops the left operand into B, shared by stores and binary operators.
const POP_B: &str = "pop B  \n";


/// The width of a memory cell accessed through an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
	Word,
	Byte,
}


/// Binary operators. Each combines B (the left operand, popped from the stack) with A
/// (the right operand), leaving the result in A.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
	Add,
	Sub,
	Shl,
	Shr,
	Less,
	Equal,
	NotEqual,
	Or,
	And,
}


impl BinaryOp {
	fn record(self) -> &'static str {
		match self {
			Self::Add => "A:=B+A \n",
			Self::Sub => "A:=B-A \n",
			Self::Shl => "A:=B<<A\n",
			Self::Shr => "A:=B>>A\n",
			Self::Less => "A:=B<A \n",
			Self::Equal => "A:=B==A\n",
			Self::NotEqual => "A:=B!=A\n",
			Self::Or => "A:=B|A \n",
			Self::And => "A:=B&A \n",
		}
	}
}


/// An operand field: either a known value, or a placeholder to be patched later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
	Known(u16),
	Placeholder,
}


/// VM instructions, as understood by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
	LoadImmediate(Operand),
	Push,
	Pop(u16),
	StackAddress(u16),
	Load(Width),
	Store(Width),
	Binary(BinaryOp),
	Call,
	Ret,
	Jump(Operand),
	JumpIfZero(Operand),
}


impl Instruction {
	/// The length of the encoded instruction, in bytes.
	pub fn len(self) -> usize {
		match self {
			Self::Store(_) | Self::Binary(_) => 2 * RECORD_LEN,
			_ => RECORD_LEN,
		}
	}


	/// Whether the instruction carries an operand field in its first record.
	pub fn has_operand(self) -> bool {
		matches!(
			self,
			Self::LoadImmediate(_)
				| Self::Pop(_)
				| Self::StackAddress(_)
				| Self::Jump(_)
				| Self::JumpIfZero(_)
		)
	}


	/// Append the encoded instruction to the output.
	pub fn encode(self, out: &mut String) {
		match self {
			Self::LoadImmediate(operand) => encode_with_operand(out, "A:=", operand),

			Self::Push => out.push_str("push A \n"),

			Self::Pop(count) => encode_with_operand(out, "pop", Operand::Known(count)),

			Self::StackAddress(slot) => encode_with_operand(out, "sp@", Operand::Known(slot)),

			Self::Load(Width::Word) => out.push_str("A:=M[A]\n"),
			Self::Load(Width::Byte) => out.push_str("A:=m[A]\n"),

			Self::Store(Width::Word) => {
				out.push_str(POP_B);
				out.push_str("M[B]:=A\n");
			}

			Self::Store(Width::Byte) => {
				out.push_str(POP_B);
				out.push_str("m[B]:=A\n");
			}

			Self::Binary(op) => {
				out.push_str(POP_B);
				out.push_str(op.record());
			}

			Self::Call => out.push_str("call A \n"),

			Self::Ret => out.push_str("ret    \n"),

			Self::Jump(operand) => encode_with_operand(out, "jmp", operand),

			Self::JumpIfZero(operand) => encode_with_operand(out, "jz ", operand),
		}
	}
}


/// Format an operand value for its fixed-width field.
pub fn format_operand(value: u16) -> String {
	format!("{:04x}", value)
}


/// Decode a fixed-width operand field.
pub fn parse_operand(field: &str) -> Option<u16> {
	if field.len() != OPERAND_WIDTH {
		return None;
	}

	u16::from_str_radix(field, 16).ok()
}


fn encode_with_operand(out: &mut String, opcode: &str, operand: Operand) {
	debug_assert_eq!(opcode.len(), OPERAND_OFFSET);

	out.push_str(opcode);

	match operand {
		Operand::Known(value) => {
			write!(out, "{:04x}", value).expect("writing to a string can't fail");
		}

		Operand::Placeholder => out.push_str(PLACEHOLDER),
	}

	out.push('\n');
}
