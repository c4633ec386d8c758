use std::fmt::Write;

/// A Display-like trait that takes an additional context when formatting.
/// Identifiers are interned, so printing a diagnostic or a symbol table needs the
/// interner at hand.
pub trait Display<'a> {
	/// The format context.
	type Context: 'a;

	fn fmt(&self, f: &mut std::fmt::Formatter<'_>, context: Self::Context) -> std::fmt::Result;
}


impl<'a, T> Display<'a> for &T
where
	T: Display<'a>,
{
	type Context = T::Context;

	fn fmt(&self, f: &mut std::fmt::Formatter<'_>, context: Self::Context) -> std::fmt::Result {
		(*self).fmt(f, context)
	}
}


/// An adapter to use std::fmt::Display with the contextual Display.
#[derive(Debug)]
pub struct Show<T, C>(pub T, pub C);


impl<'a, T, C> std::fmt::Display for Show<T, C>
where
	T: Display<'a, Context = C>,
	C: Copy,
{
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		self.0.fmt(f, self.1)
	}
}


/// Render a contextual Display into a string.
pub fn to_string<'a, T>(value: &T, context: T::Context) -> String
where
	T: Display<'a>,
	T::Context: Copy,
{
	let mut string = String::new();
	write!(string, "{}", Show(value, context))
		.expect("a Display implementation returned an error unexpectedly");
	string
}
