use super::{scope::Storage, Compiler, Error, ErrorKind, Symbol};
use crate::{backend::Emitter, lexer::TokenKind};


impl<'a, 'b> Compiler<'a, 'b> {
	pub(super) fn statement(&mut self) -> Result<(), Error> {
		if self.accept("{")? {
			return self.block();
		}

		if self.type_name()? {
			return self.declaration();
		}

		if self.accept("if")? {
			return self.if_statement();
		}

		if self.accept("while")? {
			return self.while_statement();
		}

		if self.accept("return")? {
			return self.return_statement();
		}

		if self.accept(";")? {
			return Ok(());
		}

		self.value()?;
		self.expect(";")
	}


	/// The statements of a block, after the opening brace. Locals declared in the block are
	/// popped at its end.
	pub(super) fn block(&mut self) -> Result<(), Error> {
		let depth = self.emitter.depth();
		self.table.enter();

		while !self.accept("}")? {
			if self.lexer.is_eof() {
				return Err(Error::expected_token("}", self.token()));
			}

			self.statement()?;
		}

		let locals = self.emitter.depth() - depth;
		self.emit(|emitter| emitter.pop(locals))?;

		self.table.exit();

		Ok(())
	}


	/// `type name [= value] ;` or `type name [ length ] ;`, after the type.
	fn declaration(&mut self) -> Result<(), Error> {
		let name = self.identifier()?;

		if self.accept("[")? {
			return self.array_declaration(name);
		}

		// The name is not in scope within its own initializer.
		if self.accept("=")? {
			self.value()?;
		}

		self.push_local(name)?;

		self.expect(";")
	}


	/// Reserve byte storage on the stack, and a slot pointing to it.
	fn array_declaration(&mut self, name: Symbol) -> Result<(), Error> {
		let token = self.token().clone();
		if token.kind() != TokenKind::Number {
			return Err(Error::unexpected_token(&token));
		}

		let length = self.number(&token)?;
		if length == 0 {
			return Err(Error::new(ErrorKind::ConstantOutOfRange(token.text), token.pos));
		}
		self.advance()?;
		self.expect("]")?;

		let words = (u32::from(length) + 1) / 2;
		for _ in 0 .. words {
			self.emit(Emitter::push)?;
		}

		self.emit(|emitter| emitter.stack_addr(0))?;
		self.push_local(name)?;

		self.expect(";")
	}


	/// Push the accumulator as a new local.
	fn push_local(&mut self, name: Symbol) -> Result<(), Error> {
		let index = self.emitter.depth();
		self.emit(Emitter::push)?;
		self.declare(name, Storage::Local(i32::from(index)))?;

		Ok(())
	}


	/// The body of a branch or loop. It is scoped like a block, so a local declared there
	/// is popped before control leaves the body.
	fn body(&mut self) -> Result<(), Error> {
		let depth = self.emitter.depth();
		self.table.enter();

		self.statement()?;

		let locals = self.emitter.depth() - depth;
		self.emit(|emitter| emitter.pop(locals))?;

		self.table.exit();

		Ok(())
	}


	fn if_statement(&mut self) -> Result<(), Error> {
		self.expect("(")?;
		self.value()?;
		self.expect(")")?;

		let skip_then = self.emit(Emitter::jump_if_zero)?;
		self.body()?;

		if self.accept("else")? {
			let skip_else = self.emit(Emitter::jump)?;
			self.patch_here(skip_then);
			self.body()?;
			self.patch_here(skip_else);
		} else {
			self.patch_here(skip_then);
		}

		Ok(())
	}


	fn while_statement(&mut self) -> Result<(), Error> {
		let top = self.emitter.offset();

		self.expect("(")?;
		self.value()?;
		self.expect(")")?;

		let exit = self.emit(Emitter::jump_if_zero)?;
		self.body()?;
		self.emit(|emitter| emitter.jump_to(top))?;

		self.patch_here(exit);

		Ok(())
	}


	/// `return [value] ;`. Code after the return still sees the function's locals, so the
	/// depth is restored after the bulk pop.
	fn return_statement(&mut self) -> Result<(), Error> {
		if !self.peek(";") {
			self.value()?;
		}
		self.expect(";")?;

		let depth = self.emitter.depth();
		self.emit(|emitter| emitter.pop(depth))?;
		self.emit(Emitter::ret)?;
		self.emitter.set_depth(depth);

		Ok(())
	}
}
