use std::collections::HashMap;

use crate::{
	fmt::{self, Display},
	symbol::{Interner, Symbol},
};


/// The most bindings a single compilation unit may declare.
pub const MAX_BINDINGS: usize = 0xFFFF;


/// Where a declared name lives, and its address there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Storage {
	/// Byte offset in the flat data segment.
	Global(u16),
	/// Frame slot index relative to the function's stack baseline. Locals are
	/// non-negative, parameters are negative (below the return address at -1).
	Local(i32),
	/// Entry offset in the code buffer. Unknown while the function is only a prototype.
	Function(Option<u16>),
}


/// A declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
	pub name: Symbol,
	pub storage: Storage,
}


/// The index of a binding in the table. Bindings are never removed, so ids stay valid for
/// the whole compilation.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct BindingId(usize);


/// The table can't hold more bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFull;


/// The symbol table: an append-only arena of bindings, and a stack of scopes mapping names
/// to bindings. The bottom scope holds globals and functions.
#[derive(Debug)]
pub struct Table {
	bindings: Vec<Binding>,
	scopes: Vec<HashMap<Symbol, BindingId>>,
}


impl Default for Table {
	fn default() -> Self {
		Self {
			bindings: Vec::new(),
			scopes: vec![HashMap::new()],
		}
	}
}


impl Table {
	pub fn new() -> Self {
		Self::default()
	}


	/// Enter a new empty scope.
	pub fn enter(&mut self) {
		self.scopes.push(HashMap::new());
	}


	/// Exit the current scope, making any names it shadowed visible again.
	/// Panics if only the global scope is left.
	pub fn exit(&mut self) {
		assert!(self.scopes.len() > 1, "attempt to exit the global scope");
		self.scopes.pop();
	}


	/// The number of open scopes, including the global one.
	pub fn scope_depth(&self) -> usize {
		self.scopes.len()
	}


	/// Declare a name in the current scope. A previous declaration of the same name in the
	/// same scope is shadowed.
	pub fn declare(&mut self, name: Symbol, storage: Storage) -> Result<BindingId, TableFull> {
		if self.bindings.len() >= MAX_BINDINGS {
			return Err(TableFull);
		}

		let id = BindingId(self.bindings.len());
		self.bindings.push(Binding { name, storage });

		self.scopes
			.last_mut()
			.expect("empty scope stack")
			.insert(name, id);

		Ok(id)
	}


	/// Find the most recent visible declaration of a name.
	pub fn resolve(&self, name: Symbol) -> Option<BindingId> {
		self.scopes
			.iter()
			.rev()
			.find_map(|scope| scope.get(&name))
			.copied()
	}


	/// Find a declaration of a name in the current scope only.
	pub fn lookup_current(&self, name: Symbol) -> Option<BindingId> {
		self.scopes
			.last()
			.and_then(|scope| scope.get(&name))
			.copied()
	}


	pub fn get(&self, id: BindingId) -> &Binding {
		&self.bindings[id.0]
	}


	pub fn get_mut(&mut self, id: BindingId) -> &mut Binding {
		&mut self.bindings[id.0]
	}


	/// All bindings ever declared, in declaration order.
	pub fn iter(&self) -> impl Iterator<Item = &Binding> {
		self.bindings.iter()
	}
}


impl std::fmt::Display for Storage {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Global(address) => write!(f, "global    {:04x}", address),
			Self::Local(slot) => write!(f, "local     {}", slot),
			Self::Function(Some(entry)) => write!(f, "function  {:04x}", entry),
			Self::Function(None) => write!(f, "prototype ----"),
		}
	}
}


impl<'a> Display<'a> for Table {
	type Context = &'a Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter, context: Self::Context) -> std::fmt::Result {
		for binding in self.iter() {
			writeln!(f, "{}\t{}", binding.storage, fmt::Show(binding.name, context))?;
		}

		Ok(())
	}
}
