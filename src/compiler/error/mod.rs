mod fmt;

use crate::{
	backend,
	lexer::{self, SourcePos, Token},
	symbol::Symbol,
};


/// The kind of compilation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
	/// The tokenizer rejected the input.
	Lexical(lexer::ErrorKind),
	/// The generated code exceeded a resource ceiling.
	Backend(backend::Error),
	/// A token that can't start an expression or a statement.
	UnexpectedToken(Box<str>),
	/// A specific token was required but something else was found.
	ExpectedToken {
		expected: &'static str,
		found: Box<str>,
	},
	/// A name was required, but the token is a keyword or not a word.
	IdentifierExpected(Box<str>),
	/// A declaration must start with `int` or `char`.
	TypeNameExpected(Box<str>),
	/// Usage of a name that has no visible declaration.
	UndeclaredSymbol(Symbol),
	/// Assignment to something that isn't an l-value.
	NotAssignable,
	/// Indexing something that isn't an l-value.
	NotIndexable,
	/// A numeric literal with invalid digits.
	InvalidNumber(Box<str>),
	/// A numeric literal that doesn't fit a word.
	ConstantOutOfRange(Box<str>),
	/// A function body given twice.
	DuplicateDefinition(Symbol),
	/// A function referenced through its prototype, but never defined.
	UndefinedFunction(Symbol),
	/// The unit has no `main` function with a body.
	MissingMain,
	/// Too many identifiers or declarations.
	TooManySymbols,
	/// Globals don't fit the data segment.
	DataSegmentFull,
}


/// A compilation error. Compilation stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
	pub kind: ErrorKind,
	pub pos: SourcePos,
}


impl Error {
	pub fn new(kind: ErrorKind, pos: SourcePos) -> Self {
		Self { kind, pos }
	}


	/// The generated code exceeded a resource ceiling.
	pub fn backend(error: backend::Error, pos: SourcePos) -> Self {
		Self::new(ErrorKind::Backend(error), pos)
	}


	/// A token that can't start an expression or a statement.
	pub fn unexpected_token(token: &Token) -> Self {
		Self::new(ErrorKind::UnexpectedToken(token.to_string().into()), token.pos)
	}


	/// A specific token was required but something else was found.
	pub fn expected_token(expected: &'static str, found: &Token) -> Self {
		Self::new(
			ErrorKind::ExpectedToken {
				expected,
				found: found.to_string().into(),
			},
			found.pos,
		)
	}


	pub fn identifier_expected(token: &Token) -> Self {
		Self::new(ErrorKind::IdentifierExpected(token.to_string().into()), token.pos)
	}


	pub fn type_name_expected(token: &Token) -> Self {
		Self::new(ErrorKind::TypeNameExpected(token.to_string().into()), token.pos)
	}


	pub fn undeclared_symbol(symbol: Symbol, pos: SourcePos) -> Self {
		Self::new(ErrorKind::UndeclaredSymbol(symbol), pos)
	}


	pub fn duplicate_definition(symbol: Symbol, pos: SourcePos) -> Self {
		Self::new(ErrorKind::DuplicateDefinition(symbol), pos)
	}


	pub fn undefined_function(symbol: Symbol, pos: SourcePos) -> Self {
		Self::new(ErrorKind::UndefinedFunction(symbol), pos)
	}


	pub fn missing_main(pos: SourcePos) -> Self {
		Self::new(ErrorKind::MissingMain, pos)
	}


	pub fn too_many_symbols(pos: SourcePos) -> Self {
		Self::new(ErrorKind::TooManySymbols, pos)
	}
}


impl From<lexer::Error> for Error {
	fn from(error: lexer::Error) -> Self {
		Self::new(ErrorKind::Lexical(error.error), error.pos)
	}
}


impl std::error::Error for Error {}
