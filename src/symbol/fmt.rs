use std::fmt::Display as _;

use super::{Interner, Symbol};
use crate::{
	fmt::Display,
	term::color,
};


/// Printed for symbols that don't belong to the given interner.
const UNKNOWN: &str = "<unknown symbol>";


impl<'a> Display<'a> for Symbol {
	type Context = &'a Interner;

	fn fmt(&self, f: &mut std::fmt::Formatter<'_>, context: Self::Context) -> std::fmt::Result {
		match context.resolve(*self) {
			Some(ident) => color::Fg(color::Green, ident).fmt(f),
			None => UNKNOWN.fmt(f),
		}
	}
}
