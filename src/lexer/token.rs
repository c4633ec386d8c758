use std::fmt::{self, Display};

use super::SourcePos;


/// Reserved words. These can't be declared as names.
pub const KEYWORDS: &[&str] = &["int", "char", "if", "else", "while", "return"];


/// The lexical class of a token. This is not stored: it is always derived from the
/// token's first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
	/// The empty token, produced at end of input.
	Eof,
	/// Starts with a digit.
	Number,
	/// Starts with a letter or underscore. Includes keywords.
	Word,
	/// A single-quoted literal.
	CharLiteral,
	/// A double-quoted literal.
	StringLiteral,
	/// Operator clusters and single punctuation characters.
	Punctuation,
}


/// A lexical token: the text of the lexeme and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
	pub text: Box<str>,
	pub pos: SourcePos,
}


impl Token {
	/// The end of input sentinel.
	pub fn eof(pos: SourcePos) -> Self {
		Self { text: "".into(), pos }
	}


	pub fn kind(&self) -> TokenKind {
		match self.text.as_bytes().first() {
			None => TokenKind::Eof,
			Some(c) if c.is_ascii_digit() => TokenKind::Number,
			Some(c) if c.is_word() => TokenKind::Word,
			Some(b'\'') => TokenKind::CharLiteral,
			Some(b'"') => TokenKind::StringLiteral,
			Some(_) => TokenKind::Punctuation,
		}
	}


	pub fn is_eof(&self) -> bool {
		self.text.is_empty()
	}


	/// Whether the token's text is exactly the given literal.
	pub fn is(&self, text: &str) -> bool {
		&*self.text == text
	}


	pub fn is_keyword(&self) -> bool {
		KEYWORDS.contains(&&*self.text)
	}


	/// Whether the token may be declared as a name.
	pub fn is_identifier(&self) -> bool {
		self.kind() == TokenKind::Word && !self.is_keyword()
	}


	/// The byte value of a character literal token, if that's what this token is.
	pub fn char_value(&self) -> Option<u8> {
		match self.kind() {
			TokenKind::CharLiteral => decode_char(self.text.as_bytes()),
			_ => None,
		}
	}
}


impl Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.is_eof() {
			write!(f, "end of input")
		} else {
			write!(f, "'{}'", self.text)
		}
	}
}


/// Decode a quoted character literal, including its quotes.
pub fn decode_char(literal: &[u8]) -> Option<u8> {
	let body = literal
		.strip_prefix(b"'")?
		.strip_suffix(b"'")?;

	match body {
		[b'\\', escape] => match escape {
			b'n' => Some(b'\n'),
			b't' => Some(b'\t'),
			b'r' => Some(b'\r'),
			b'0' => Some(0),
			b'\\' | b'\'' | b'"' => Some(*escape),
			_ => None,
		},

		[b'\\'] => None,

		[c] => Some(*c),

		_ => None,
	}
}


/// Helper trait for the character classes the tokenizer cares about.
pub trait CharClass {
	/// Identifiers, keywords and numbers are maximal runs of these.
	fn is_word(&self) -> bool;
	/// Operator clusters are maximal runs of these.
	fn is_operator(&self) -> bool;
	/// Quote characters delimit literal spans.
	fn is_quote(&self) -> bool;
}


impl CharClass for u8 {
	fn is_word(&self) -> bool {
		self.is_ascii_alphanumeric() || *self == b'_'
	}

	fn is_operator(&self) -> bool {
		matches!(self, b'<' | b'=' | b'>' | b'!' | b'&' | b'|')
	}

	fn is_quote(&self) -> bool {
		matches!(self, b'\'' | b'"')
	}
}
