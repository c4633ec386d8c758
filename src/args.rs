use std::{ffi::OsString, path::PathBuf};

use clap::{clap_app, crate_authors, crate_version, crate_description};


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Command {
	Help(Box<str>),
	Version(Box<str>),
	Run(Args)
}


#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Args {
	/// The source file. Standard input when absent.
	pub input: Option<PathBuf>,
	/// Where to write the program. Standard output when absent.
	pub output: Option<PathBuf>,
	/// Print the token stream.
	pub print_tokens: bool,
	/// Print the symbol table.
	pub print_symbols: bool,
}


pub fn parse<A, T>(args: A) -> clap::Result<Command>
where
	A: IntoIterator<Item = T>,
	T: Into<OsString> + Clone
{
	let app = clap_app!(
		cucu =>
			(version: crate_version!())
			(author: crate_authors!())
			(about: crate_description!())
			(@arg input: "The source file to compile. Reads standard input if omitted.")
			(@arg output: -o --output +takes_value "Write the program to this file instead of standard output.")
			(@arg tokens: --tokens "Print the token stream")
			(@arg symbols: --symbols "Print the symbol table")
	);

	match app.get_matches_from_safe(args) {
		Ok(matches) => Ok(
			Command::Run(
				Args {
					input: matches.value_of_os("input").map(PathBuf::from),
					output: matches.value_of_os("output").map(PathBuf::from),
					print_tokens: matches.is_present("tokens"),
					print_symbols: matches.is_present("symbols"),
				}
			)
		),

		Err(error) => match error.kind {
			clap::ErrorKind::HelpDisplayed => Ok(
				Command::Help(error.message.into_boxed_str())
			),
			clap::ErrorKind::VersionDisplayed => Ok(
				Command::Version(error.message.into_boxed_str())
			),
			_ => Err(error)
		}
	}
}
