mod fmt;

use intaglio::{Symbol as SymbolInner, SymbolOverflowError, SymbolTable};


/// A symbol is a reference to an identifier stored in the symbol interner.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Symbol(SymbolInner);


impl From<Symbol> for usize {
	fn from(symbol: Symbol) -> usize {
		symbol.0.id() as usize
	}
}


/// A symbol interner, used to store identifiers.
#[derive(Debug, Default)]
pub struct Interner(SymbolTable);


impl Interner {
	/// Create a new, empty interner.
	pub fn new() -> Self {
		Self::default()
	}


	/// Get the symbol for an identifier, if it has been interned.
	#[cfg(test)]
	pub fn get(&self, value: &str) -> Option<Symbol> {
		self.0
			.check_interned(value)
			.map(Symbol)
	}


	/// Get the symbol for an identifier. The identifier is interned if needed.
	/// Fails only when the interner runs out of symbol ids.
	pub fn get_or_intern(&mut self, value: &str) -> Result<Symbol, SymbolOverflowError> {
		if let Some(symbol) = self.0.check_interned(value) {
			return Ok(Symbol(symbol));
		}

		self.0
			.intern(value.to_owned())
			.map(Symbol)
	}


	/// Resolve the identifier for a symbol.
	pub fn resolve(&self, symbol: Symbol) -> Option<&str> {
		self.0.get(symbol.0)
	}
}
