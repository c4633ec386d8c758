use std::fmt::Display as _;

use super::{Error, ErrorKind};
use crate::{
	fmt::Display,
	symbol::Interner,
	term::color,
};


impl<'a> Display<'a> for ErrorKind {
	type Context = &'a Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		match self {
			Self::Lexical(error) => error.fmt(f),

			Self::Backend(error) => error.fmt(f),

			Self::UnexpectedToken(token) => write!(f, "unexpected {}", token),

			Self::ExpectedToken { expected, found } => {
				write!(f, "expected '{}', found {}", expected, found)
			}

			Self::IdentifierExpected(token) => write!(f, "expected identifier, found {}", token),

			Self::TypeNameExpected(token) => write!(f, "expected type name, found {}", token),

			Self::UndeclaredSymbol(symbol) => {
				"undeclared symbol '".fmt(f)?;
				symbol.fmt(f, context)?;
				"'".fmt(f)
			}

			Self::NotAssignable => write!(f, "expression is not assignable"),

			Self::NotIndexable => write!(f, "expression is not indexable"),

			Self::InvalidNumber(literal) => write!(f, "invalid number '{}'", literal),

			Self::ConstantOutOfRange(literal) => write!(f, "constant '{}' out of range", literal),

			Self::DuplicateDefinition(symbol) => {
				"duplicate definition of '".fmt(f)?;
				symbol.fmt(f, context)?;
				"'".fmt(f)
			}

			Self::UndefinedFunction(symbol) => {
				"function '".fmt(f)?;
				symbol.fmt(f, context)?;
				"' is declared but never defined".fmt(f)
			}

			Self::MissingMain => write!(f, "no main function defined"),

			Self::TooManySymbols => write!(f, "too many symbols"),

			Self::DataSegmentFull => write!(f, "data segment full"),
		}
	}
}


impl<'a> Display<'a> for Error {
	type Context = &'a Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		write!(f, "{}: {} - ", color::Fg(color::Red, "Error"), self.pos)?;
		self.kind.fmt(f, context)
	}
}


/// We need this in order to be able to implement std::error::Error.
impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		Display::fmt(self, f, &Interner::new())
	}
}
