use std::fmt::{self, Debug, Display};

use termion::color as term;
pub use termion::color::{Green, Red, Yellow};


/// Paint the foreground with a given color when formatting the value.
/// Falls back to plain output when colors are disabled.
pub struct Fg<C, T>(pub C, pub T);


impl<C, T> Fg<C, T>
where
	C: term::Color + Copy,
{
	fn paint<F>(&self, f: &mut fmt::Formatter, body: F) -> fmt::Result
	where
		F: FnOnce(&T, &mut fmt::Formatter) -> fmt::Result,
	{
		if !super::colors_enabled() {
			return body(&self.1, f);
		}

		write!(f, "{}", term::Fg(self.0))?;
		body(&self.1, f)?;
		write!(f, "{}", term::Fg(term::Reset))
	}
}


impl<C, T> Debug for Fg<C, T>
where
	C: term::Color + Copy,
	T: Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.paint(f, |value, f| value.fmt(f))
	}
}


impl<C, T> Display for Fg<C, T>
where
	C: term::Color + Copy,
	T: Display,
{
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		self.paint(f, |value, f| value.fmt(f))
	}
}
