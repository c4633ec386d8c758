mod cursor;
mod error;
mod token;

pub use cursor::{Cursor, SourcePos};
pub use error::{Error, ErrorKind};
pub use token::{CharClass, Token, TokenKind, KEYWORDS};


/// The longest lexeme the tokenizer accepts, in bytes.
pub const MAX_TOKEN_LEN: usize = 255;


/// The tokenizer. Keeps exactly one pending token, and the cursor keeps one pending
/// character. Comments are skipped entirely, and quoted literals are consumed as a single
/// token.
#[derive(Debug)]
pub struct Lexer<'a> {
	cursor: Cursor<'a>,
	token: Token,
}


impl<'a> Lexer<'a> {
	/// Create a lexer, priming the first token.
	pub fn new(cursor: Cursor<'a>) -> Result<Self, Error> {
		let pos = cursor.pos();
		let mut lexer = Self { cursor, token: Token::eof(pos) };
		lexer.advance()?;
		Ok(lexer)
	}


	/// The current token.
	pub fn token(&self) -> &Token {
		&self.token
	}


	pub fn is_eof(&self) -> bool {
		self.token.is_eof()
	}


	/// Consume the current token and load the next one, returning the consumed token.
	/// At end of input, the current token stays as the empty sentinel.
	pub fn advance(&mut self) -> Result<Token, Error> {
		let next = self.read_token()?;
		Ok(std::mem::replace(&mut self.token, next))
	}


	fn read_token(&mut self) -> Result<Token, Error> {
		loop {
			self.cursor.step_while(|c| c.is_ascii_whitespace());

			let start = self.cursor.offset();
			let pos = self.cursor.pos();

			match self.cursor.peek() {
				None => return Ok(Token::eof(pos)),

				// Identifiers, keywords and numbers.
				Some(c) if c.is_word() => self.cursor.step_while(|c| c.is_word()),

				// Operator clusters, such as `==` or `<<`.
				Some(c) if c.is_operator() => self.cursor.step_while(|c| c.is_operator()),

				Some(quote) if quote.is_quote() => self.skip_quoted(quote, pos)?,

				Some(b'/') => {
					self.cursor.step();

					match self.cursor.peek() {
						Some(b'*') => {
							self.cursor.step();
							self.skip_block_comment(pos)?;
							continue;
						}

						Some(b'/') => {
							self.cursor.step_while(|c| c != b'\n');
							continue;
						}

						// A lone slash.
						_ => (),
					}
				}

				// Any other character is a token by itself.
				Some(_) => self.cursor.step(),
			}

			return self.produce(start, pos);
		}
	}


	/// Build the token consumed since `start`.
	fn produce(&self, start: usize, pos: SourcePos) -> Result<Token, Error> {
		let lexeme = self.cursor.since(start);

		if lexeme.len() > MAX_TOKEN_LEN {
			return Err(Error::token_too_long(lexeme.len(), pos));
		}

		let token = Token {
			text: String::from_utf8_lossy(lexeme).into(),
			pos,
		};

		if token.kind() == TokenKind::CharLiteral && token.char_value().is_none() {
			return Err(Error::invalid_char_literal(lexeme, pos));
		}

		Ok(token)
	}


	/// Consume a quoted span, including both quotes. Backslash escapes the next character.
	fn skip_quoted(&mut self, quote: u8, pos: SourcePos) -> Result<(), Error> {
		self.cursor.step();

		loop {
			match self.cursor.peek() {
				None => return Err(Error::unterminated_literal(pos)),

				Some(b'\\') => {
					self.cursor.step();
					self.cursor.step();
				}

				Some(c) if c == quote => {
					self.cursor.step();
					return Ok(());
				}

				Some(_) => self.cursor.step(),
			}
		}
	}


	/// Consume a block comment body, up to and including the closing `*/`.
	fn skip_block_comment(&mut self, pos: SourcePos) -> Result<(), Error> {
		loop {
			match self.cursor.peek() {
				None => return Err(Error::unterminated_comment(pos)),

				Some(b'*') => {
					self.cursor.step();

					if self.cursor.peek() == Some(b'/') {
						self.cursor.step();
						return Ok(());
					}
				}

				Some(_) => self.cursor.step(),
			}
		}
	}
}


/// Iterating a lexer yields the remaining tokens, excluding the end of input sentinel.
impl<'a> Iterator for Lexer<'a> {
	type Item = Result<Token, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.token.is_eof() {
			None
		} else {
			Some(self.advance())
		}
	}
}
