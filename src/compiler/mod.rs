mod error;
mod expr;
pub mod scope;
mod stmt;
#[cfg(test)]
mod tests;

use std::{collections::HashMap, convert::TryFrom};

use crate::{
	backend::{self, Emitter, PatchHandle, Program},
	lexer::{Cursor, Lexer, SourcePos, Token},
	source::Source,
	symbol::{Interner, Symbol},
};
pub use error::{Error, ErrorKind};
pub use expr::TypeTag;
use scope::{BindingId, Storage, Table};


/// The size of a global variable in the data segment.
pub const WORD_SIZE: u16 = 2;


/// The name of the function the program starts in.
pub const ENTRY_POINT: &str = "main";


/// The result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
	/// The VM program text.
	pub program: Program,
	/// Every binding declared in the unit.
	pub symbols: Table,
}


/// Compile a whole translation unit.
pub fn compile(source: &Source, interner: &mut Interner) -> Result<Compilation, Error> {
	let cursor = Cursor::from(source.contents.as_ref());
	let mut compiler = Compiler::new(cursor, interner)?;

	compiler.translation_unit()?;
	compiler.finish()
}


/// A single pass compiler: code is emitted as the tokens are consumed, and there's no
/// syntax tree. Forward jumps and forward function references are backpatched.
#[derive(Debug)]
pub struct Compiler<'a, 'b> {
	lexer: Lexer<'a>,
	interner: &'b mut Interner,
	table: Table,
	emitter: Emitter,
	/// The size of the data segment so far.
	data_size: u16,
	/// The preamble jump to the entry point.
	entry: PatchHandle,
	/// Loads of function addresses emitted before the function's body.
	fixups: HashMap<BindingId, Vec<PatchHandle>>,
}


impl<'a, 'b> Compiler<'a, 'b> {
	/// Create a compiler, priming the first token and emitting the preamble.
	pub fn new(cursor: Cursor<'a>, interner: &'b mut Interner) -> Result<Self, Error> {
		let lexer = Lexer::new(cursor)?;
		let mut emitter = Emitter::new();
		let entry = emitter
			.jump()
			.map_err(|error| Error::backend(error, lexer.token().pos))?;

		Ok(Self {
			lexer,
			interner,
			table: Table::new(),
			emitter,
			data_size: 0,
			entry,
			fixups: HashMap::new(),
		})
	}


	/// Whether the current token is the given literal.
	pub fn peek(&self, text: &str) -> bool {
		self.lexer.token().is(text)
	}


	/// Consume the current token if it is the given literal.
	pub fn accept(&mut self, text: &str) -> Result<bool, Error> {
		if self.peek(text) {
			self.advance()?;
			Ok(true)
		} else {
			Ok(false)
		}
	}


	/// Consume the given literal, or fail.
	pub fn expect(&mut self, text: &'static str) -> Result<(), Error> {
		if self.accept(text)? {
			Ok(())
		} else {
			Err(Error::expected_token(text, self.token()))
		}
	}


	/// Compile top level declarations until the end of input.
	pub fn translation_unit(&mut self) -> Result<(), Error> {
		while !self.lexer.is_eof() {
			self.top_level_declaration()?;
		}

		Ok(())
	}


	/// Check that every referenced function got a body, and point the preamble at main.
	pub fn finish(mut self) -> Result<Compilation, Error> {
		let pos = self.pos();

		// Report the earliest declared function, for deterministic diagnostics.
		if let Some(id) = self.fixups.keys().min() {
			let name = self.table.get(*id).name;
			return Err(Error::undefined_function(name, pos));
		}

		let main = self.intern(ENTRY_POINT)?;
		let entry = self.table
			.lookup_current(main)
			.and_then(|id| match self.table.get(id).storage {
				Storage::Function(entry) => entry,
				_ => None,
			})
			.ok_or_else(|| Error::missing_main(pos))?;

		self.emitter.patch(self.entry, entry);

		Ok(Compilation {
			program: self.emitter.finish(),
			symbols: self.table,
		})
	}


	/// `type name ;` or `type name ( params ) ;` or `type name ( params ) { body }`.
	fn top_level_declaration(&mut self) -> Result<(), Error> {
		if !self.type_name()? {
			return Err(Error::type_name_expected(self.token()));
		}

		let pos = self.pos();
		let name = self.identifier()?;

		if self.accept(";")? {
			return self.global(name, pos);
		}

		self.expect("(")?;
		self.function(name)
	}


	fn global(&mut self, name: Symbol, pos: SourcePos) -> Result<(), Error> {
		let address = self.data_size;

		self.data_size = address
			.checked_add(WORD_SIZE)
			.ok_or_else(|| Error::new(ErrorKind::DataSegmentFull, pos))?;

		self.declare(name, Storage::Global(address))?;

		Ok(())
	}


	/// A prototype or a definition, after the opening parenthesis.
	fn function(&mut self, name: Symbol) -> Result<(), Error> {
		let function = match self.table.lookup_current(name) {
			Some(id) if matches!(self.table.get(id).storage, Storage::Function(_)) => id,
			_ => self.declare(name, Storage::Function(None))?,
		};

		self.table.enter();
		self.parameters()?;

		if self.accept(";")? {
			self.table.exit();
			return Ok(());
		}

		if !self.peek("{") {
			return Err(Error::expected_token("{", self.token()));
		}

		self.define(function)?;
		self.emitter.set_depth(0);

		self.expect("{")?;
		self.block()?;
		self.emit(Emitter::ret)?;

		self.table.exit();

		Ok(())
	}


	/// Parse the parameter list up to and including the closing parenthesis. Parameters are
	/// declared in the current scope, and get their slots once the count is known.
	fn parameters(&mut self) -> Result<(), Error> {
		let mut params = Vec::new();

		if !self.accept(")")? {
			loop {
				if !self.type_name()? {
					return Err(Error::type_name_expected(self.token()));
				}

				let name = self.identifier()?;
				params.push(self.declare(name, Storage::Local(0))?);

				if !self.accept(",")? {
					break;
				}
			}

			self.expect(")")?;
		}

		// The last argument sits right below the return address.
		let count = params.len() as i32;
		for (ix, id) in params.into_iter().enumerate() {
			self.table.get_mut(id).storage = Storage::Local(ix as i32 - count - 1);
		}

		Ok(())
	}


	/// Bind a function to the current code offset, and patch any earlier references.
	fn define(&mut self, function: BindingId) -> Result<(), Error> {
		let pos = self.pos();
		let entry = self.emitter.offset();

		let binding = self.table.get_mut(function);
		if let Storage::Function(Some(_)) = binding.storage {
			return Err(Error::duplicate_definition(binding.name, pos));
		}
		binding.storage = Storage::Function(Some(entry));

		for handle in self.fixups.remove(&function).unwrap_or_default() {
			self.emitter.patch(handle, entry);
		}

		Ok(())
	}


	/// Accept a type name: `int` or `char`, followed by any number of `*`.
	fn type_name(&mut self) -> Result<bool, Error> {
		if !(self.peek("int") || self.peek("char")) {
			return Ok(false);
		}

		self.advance()?;
		while self.accept("*")? { }

		Ok(true)
	}


	/// Consume a declarable name.
	fn identifier(&mut self) -> Result<Symbol, Error> {
		if !self.token().is_identifier() {
			return Err(Error::identifier_expected(self.token()));
		}

		let name = self.intern_token()?;
		self.advance()?;

		Ok(name)
	}


	fn token(&self) -> &Token {
		self.lexer.token()
	}


	fn pos(&self) -> SourcePos {
		self.lexer.token().pos
	}


	fn error(&self, kind: ErrorKind) -> Error {
		Error::new(kind, self.pos())
	}


	fn advance(&mut self) -> Result<Token, Error> {
		Ok(self.lexer.advance()?)
	}


	/// Run an emitter operation, attributing failures to the current position.
	fn emit<T, F>(&mut self, emit: F) -> Result<T, Error>
	where
		F: FnOnce(&mut Emitter) -> Result<T, backend::Error>,
	{
		let pos = self.pos();
		emit(&mut self.emitter).map_err(|error| Error::backend(error, pos))
	}


	/// Point a placeholder to the current code offset.
	fn patch_here(&mut self, handle: PatchHandle) {
		let target = self.emitter.offset();
		self.emitter.patch(handle, target);
	}


	fn declare(&mut self, name: Symbol, storage: Storage) -> Result<BindingId, Error> {
		let pos = self.pos();
		self.table
			.declare(name, storage)
			.map_err(|_| Error::too_many_symbols(pos))
	}


	fn intern(&mut self, text: &str) -> Result<Symbol, Error> {
		let pos = self.pos();
		self.interner
			.get_or_intern(text)
			.map_err(|_| Error::too_many_symbols(pos))
	}


	fn intern_token(&mut self) -> Result<Symbol, Error> {
		let pos = self.pos();
		self.interner
			.get_or_intern(&self.lexer.token().text)
			.map_err(|_| Error::too_many_symbols(pos))
	}


	/// Convert a frame index into a slot operand relative to the current stack top.
	fn frame_slot(&self, index: i32) -> Result<u16, Error> {
		let slot = i32::from(self.emitter.depth()) - index - 1;
		u16::try_from(slot).map_err(|_| self.error(ErrorKind::Backend(backend::Error::StackTooDeep)))
	}
}
