use std::num::IntErrorKind;

use super::{scope::Storage, Compiler, Error, ErrorKind};
use crate::{
	backend::{BinaryOp, Emitter, PatchHandle, Width},
	lexer::{Token, TokenKind},
};


/// What an expression left in the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
	/// A plain value.
	Value,
	/// The address of a word wide cell.
	IntRef,
	/// The address of a byte wide cell.
	CharRef,
}


impl TypeTag {
	/// The width of the referenced cell, if this is a reference.
	pub fn width(self) -> Option<Width> {
		match self {
			Self::Value => None,
			Self::IntRef => Some(Width::Word),
			Self::CharRef => Some(Width::Byte),
		}
	}


	pub fn is_reference(self) -> bool {
		self.width().is_some()
	}
}


/// A precedence layer of the expression grammar.
type Layer<'a, 'b> = fn(&mut Compiler<'a, 'b>) -> Result<TypeTag, Error>;


const BITWISE: &[(&str, BinaryOp)] = &[("|", BinaryOp::Or), ("&", BinaryOp::And)];
const EQUALITY: &[(&str, BinaryOp)] = &[("==", BinaryOp::Equal), ("!=", BinaryOp::NotEqual)];
const RELATIONAL: &[(&str, BinaryOp)] = &[("<", BinaryOp::Less)];
const SHIFT: &[(&str, BinaryOp)] = &[("<<", BinaryOp::Shl), (">>", BinaryOp::Shr)];
const ADDITIVE: &[(&str, BinaryOp)] = &[("+", BinaryOp::Add), ("-", BinaryOp::Sub)];


impl<'a, 'b> Compiler<'a, 'b> {
	/// Compile an expression, leaving its value in the accumulator.
	pub(super) fn value(&mut self) -> Result<(), Error> {
		let tag = self.expression()?;
		self.unref(tag)
	}


	/// Compile an expression, leaving references undereferenced.
	pub(super) fn expression(&mut self) -> Result<TypeTag, Error> {
		self.assignment()
	}


	/// Assignment is right associative, and binds loosest.
	fn assignment(&mut self) -> Result<TypeTag, Error> {
		let tag = self.logical_or()?;

		if !self.peek("=") {
			return Ok(tag);
		}

		let width = tag
			.width()
			.ok_or_else(|| self.error(ErrorKind::NotAssignable))?;

		self.advance()?;
		self.emit(Emitter::push)?;
		self.value()?;
		self.emit(|emitter| emitter.store(width))?;

		Ok(TypeTag::Value)
	}


	fn logical_or(&mut self) -> Result<TypeTag, Error> {
		let tag = self.logical_and()?;

		if !self.peek("||") {
			return Ok(tag);
		}

		self.unref(tag)?;

		let mut to_true = Vec::new();
		while self.accept("||")? {
			let next = self.emit(Emitter::jump_if_zero)?;
			to_true.push(self.emit(Emitter::jump)?);
			self.patch_here(next);

			let tag = self.logical_and()?;
			self.unref(tag)?;
		}

		let to_false = self.emit(Emitter::jump_if_zero)?;
		for handle in to_true {
			self.patch_here(handle);
		}

		self.boolean(&[to_false])
	}


	fn logical_and(&mut self) -> Result<TypeTag, Error> {
		let tag = self.bitwise()?;

		if !self.peek("&&") {
			return Ok(tag);
		}

		self.unref(tag)?;

		let mut to_false = Vec::new();
		while self.accept("&&")? {
			to_false.push(self.emit(Emitter::jump_if_zero)?);

			let tag = self.bitwise()?;
			self.unref(tag)?;
		}
		to_false.push(self.emit(Emitter::jump_if_zero)?);

		self.boolean(&to_false)
	}


	/// Materialize a truth value: falling through yields 1, the given jumps yield 0.
	fn boolean(&mut self, to_false: &[PatchHandle]) -> Result<TypeTag, Error> {
		self.emit(|emitter| emitter.load_const(1))?;
		let end = self.emit(Emitter::jump)?;

		for &handle in to_false {
			self.patch_here(handle);
		}
		self.emit(|emitter| emitter.load_const(0))?;

		self.patch_here(end);

		Ok(TypeTag::Value)
	}


	fn bitwise(&mut self) -> Result<TypeTag, Error> {
		self.binary(Self::equality, BITWISE)
	}


	fn equality(&mut self) -> Result<TypeTag, Error> {
		self.binary(Self::relational, EQUALITY)
	}


	fn relational(&mut self) -> Result<TypeTag, Error> {
		self.binary(Self::shift, RELATIONAL)
	}


	fn shift(&mut self) -> Result<TypeTag, Error> {
		self.binary(Self::additive, SHIFT)
	}


	fn additive(&mut self) -> Result<TypeTag, Error> {
		self.binary(Self::postfix, ADDITIVE)
	}


	/// A left associative layer of binary operators, over a layer that binds tighter.
	fn binary(
		&mut self,
		operand: Layer<'a, 'b>,
		operators: &[(&str, BinaryOp)]
	) -> Result<TypeTag, Error> {
		let mut tag = operand(self)?;

		loop {
			let op = operators
				.iter()
				.find(|(text, _)| self.peek(text))
				.map(|&(_, op)| op);

			let op = match op {
				Some(op) => op,
				None => return Ok(tag),
			};

			self.advance()?;

			self.unref(tag)?;
			self.emit(Emitter::push)?;

			let rhs = operand(self)?;
			self.unref(rhs)?;

			self.emit(|emitter| emitter.binary(op))?;

			tag = TypeTag::Value;
		}
	}


	/// Chained indexing and calls.
	fn postfix(&mut self) -> Result<TypeTag, Error> {
		let mut tag = self.primary()?;

		loop {
			tag = if self.peek("[") {
				self.index(tag)?
			} else if self.peek("(") {
				self.call(tag)?
			} else {
				return Ok(tag);
			};
		}
	}


	/// `base [ offset ]`, addressing a byte.
	fn index(&mut self, base: TypeTag) -> Result<TypeTag, Error> {
		if !base.is_reference() {
			return Err(self.error(ErrorKind::NotIndexable));
		}

		self.advance()?;

		self.unref(base)?;
		self.emit(Emitter::push)?;
		self.value()?;
		self.emit(|emitter| emitter.binary(BinaryOp::Add))?;

		self.expect("]")?;

		Ok(TypeTag::CharRef)
	}


	/// `callee ( args )`. The callee is pushed first, then the arguments in order.
	fn call(&mut self, callee: TypeTag) -> Result<TypeTag, Error> {
		self.advance()?;

		let depth = self.emitter.depth();

		self.unref(callee)?;
		self.emit(Emitter::push)?;

		if !self.accept(")")? {
			loop {
				self.value()?;
				self.emit(Emitter::push)?;

				if !self.accept(",")? {
					break;
				}
			}

			self.expect(")")?;
		}

		// Fetch the call target back from below the arguments.
		let pushed = self.emitter.depth() - depth;
		self.emit(|emitter| emitter.stack_addr(pushed - 1))?;
		self.emit(|emitter| emitter.load(Width::Word))?;
		self.emit(Emitter::call)?;
		self.emit(|emitter| emitter.pop(pushed))?;

		Ok(TypeTag::Value)
	}


	fn primary(&mut self) -> Result<TypeTag, Error> {
		let token = self.token().clone();

		match token.kind() {
			TokenKind::Number => {
				let value = self.number(&token)?;
				self.advance()?;
				self.emit(|emitter| emitter.load_const(value))?;

				Ok(TypeTag::Value)
			}

			TokenKind::CharLiteral => {
				let value = token
					.char_value()
					.ok_or_else(|| Error::unexpected_token(&token))?;
				self.advance()?;
				self.emit(|emitter| emitter.load_const(u16::from(value)))?;

				Ok(TypeTag::Value)
			}

			TokenKind::Word if !token.is_keyword() => self.variable(),

			TokenKind::Punctuation if token.is("(") => {
				self.advance()?;
				let tag = self.expression()?;
				self.expect(")")?;

				Ok(tag)
			}

			_ => Err(Error::unexpected_token(&token)),
		}
	}


	/// A name usage. Variables yield references, functions yield their entry address.
	fn variable(&mut self) -> Result<TypeTag, Error> {
		let name = self.intern_token()?;
		let id = self.table
			.resolve(name)
			.ok_or_else(|| Error::undeclared_symbol(name, self.pos()))?;

		self.advance()?;

		let storage = self.table.get(id).storage;
		match storage {
			Storage::Local(index) => {
				let slot = self.frame_slot(index)?;
				self.emit(|emitter| emitter.stack_addr(slot))?;

				Ok(TypeTag::IntRef)
			}

			Storage::Global(address) => {
				self.emit(|emitter| emitter.load_const(address))?;

				Ok(TypeTag::IntRef)
			}

			Storage::Function(Some(entry)) => {
				self.emit(|emitter| emitter.load_const(entry))?;

				Ok(TypeTag::Value)
			}

			Storage::Function(None) => {
				let handle = self.emit(Emitter::load_placeholder)?;
				self.fixups
					.entry(id)
					.or_default()
					.push(handle);

				Ok(TypeTag::Value)
			}
		}
	}


	/// Parse a decimal or `0x` hexadecimal literal.
	pub(super) fn number(&self, token: &Token) -> Result<u16, Error> {
		let text = &*token.text;

		let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
			Some(hex) => u16::from_str_radix(hex, 16),
			None => text.parse(),
		};

		parsed.map_err(|error| {
			let kind = match error.kind() {
				IntErrorKind::PosOverflow => ErrorKind::ConstantOutOfRange(text.into()),
				_ => ErrorKind::InvalidNumber(text.into()),
			};

			Error::new(kind, token.pos)
		})
	}


	/// Load the referenced cell, if the accumulator holds a reference.
	pub(super) fn unref(&mut self, tag: TypeTag) -> Result<(), Error> {
		match tag.width() {
			Some(width) => self.emit(|emitter| emitter.load(width)),
			None => Ok(()),
		}
	}
}
