use std::fmt::{self, Display};

use super::{SourcePos, MAX_TOKEN_LEN};


/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
	/// Token exceeds the maximum token length.
	TokenTooLong(usize),
	/// A quoted literal that is never closed.
	UnterminatedLiteral,
	/// A block comment that is never closed.
	UnterminatedComment,
	/// A character literal that doesn't hold exactly one (possibly escaped) character.
	InvalidCharLiteral(Box<str>),
}


impl Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::TokenTooLong(length) => write!(
				f,
				"token too long ({} bytes, at most {} allowed)",
				length,
				MAX_TOKEN_LEN
			),

			Self::UnterminatedLiteral => write!(f, "unterminated literal"),

			Self::UnterminatedComment => write!(f, "unterminated comment"),

			Self::InvalidCharLiteral(literal) => write!(f, "invalid char literal: {}", literal),
		}
	}
}


/// A lexical error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
	pub error: ErrorKind,
	pub pos: SourcePos,
}


impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{} - {}", self.pos, self.error)
	}
}


impl std::error::Error for Error {}


impl Error {
	pub fn token_too_long(length: usize, pos: SourcePos) -> Self {
		Self { error: ErrorKind::TokenTooLong(length), pos }
	}

	pub fn unterminated_literal(pos: SourcePos) -> Self {
		Self { error: ErrorKind::UnterminatedLiteral, pos }
	}

	pub fn unterminated_comment(pos: SourcePos) -> Self {
		Self { error: ErrorKind::UnterminatedComment, pos }
	}

	pub fn invalid_char_literal(literal: &[u8], pos: SourcePos) -> Self {
		Self {
			error: ErrorKind::InvalidCharLiteral(String::from_utf8_lossy(literal).into()),
			pos,
		}
	}
}
