use std::fmt::{self, Display};


/// A human readable position in the source code. Both fields are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePos {
	pub line: u32,
	pub column: u32,
}


impl SourcePos {
	pub fn visit(&mut self, input: u8) {
		if input == b'\n' {
			self.line += 1;
			self.column = 1;
		} else {
			self.column += 1;
		}
	}
}


impl Default for SourcePos {
	fn default() -> Self {
		Self { line: 1, column: 1 }
	}
}


impl Display for SourcePos {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "line {}, column {}", self.line, self.column)
	}
}


/// A cursor for the source code. This is the lexer's single pending character.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
	input: &'a [u8],
	offset: usize,
	pos: SourcePos,
}


impl<'a> Cursor<'a> {
	pub fn pos(&self) -> SourcePos {
		self.pos
	}


	pub fn offset(&self) -> usize {
		self.offset
	}


	pub fn is_eof(&self) -> bool {
		self.offset == self.input.len()
	}


	pub fn peek(&self) -> Option<u8> {
		self.input.get(self.offset).copied()
	}


	/// The input consumed between `start` and the current offset.
	pub fn since(&self, start: usize) -> &'a [u8] {
		&self.input[start .. self.offset]
	}


	pub fn step(&mut self) {
		if self.is_eof() {
			return;
		}

		self.pos.visit(self.input[self.offset]);
		self.offset += 1;
	}


	/// Step while the pending character satisfies the predicate.
	pub fn step_while<P>(&mut self, mut predicate: P)
	where
		P: FnMut(u8) -> bool,
	{
		while self.peek().map_or(false, &mut predicate) {
			self.step();
		}
	}
}


impl<'a> From<&'a [u8]> for Cursor<'a> {
	fn from(input: &'a [u8]) -> Self {
		Self {
			input,
			offset: 0,
			pos: SourcePos::default()
		}
	}
}
