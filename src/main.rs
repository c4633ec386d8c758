mod args;
mod backend;
mod compiler;
mod fmt;
mod lexer;
mod source;
mod symbol;
mod term;

use std::{
	fs::File,
	io::{self, Write},
	path::Path,
};

use term::color;

use args::{Args, Command};
use source::Source;


/// Exit codes.
const SUCCESS: i32 = 0;
const COMPILATION_FAILED: i32 = 1;
const IO_FAILED: i32 = 2;


fn main() -> ! {
	term::detect_colors();

	let command = match args::parse(std::env::args_os()) {
		Ok(command) => command,
		Err(error) => {
			eprint!("{}", error);
			std::process::exit(COMPILATION_FAILED)
		}
	};

	let exit_code = match command {
		Command::Run(args) => match run(args) {
			Ok(code) => code,
			Err(error) => {
				eprintln!("{}: {}", color::Fg(color::Red, "Error"), error);
				IO_FAILED
			}
		},

		Command::Help(msg) | Command::Version(msg) => {
			println!("{}", msg);
			SUCCESS
		},
	};

	std::process::exit(exit_code)
}


fn run(args: Args) -> io::Result<i32> {
	let source = match &args.input {
		Some(path) => Source::from_path(path.as_path()),
		None => Source::from_reader(Path::new("<stdin>"), io::stdin().lock()),
	}?;

	if args.print_tokens {
		print_tokens(&source);
	}

	let mut interner = symbol::Interner::new();

	let compilation = match compiler::compile(&source, &mut interner) {
		Ok(compilation) => compilation,

		Err(error) => {
			eprintln!("{}", fmt::Show(&error, &interner));
			return Ok(COMPILATION_FAILED);
		}
	};

	if args.print_symbols {
		eprintln!("{}", color::Fg(color::Yellow, "--------------------------------------------------"));
		eprint!("{}", fmt::Show(&compilation.symbols, &interner));
		eprintln!("{}", color::Fg(color::Yellow, "--------------------------------------------------"));
	}

	// Nothing reaches the output unless the whole unit compiled.
	match &args.output {
		Some(path) => {
			let mut file = File::create(path)?;
			write!(file, "{}", compilation.program)?;
			file.flush()?;
		}

		None => {
			let stdout = io::stdout();
			let mut stdout = stdout.lock();
			write!(stdout, "{}", compilation.program)?;
			stdout.flush()?;
		}
	}

	Ok(SUCCESS)
}


/// Dump the token stream to stderr, up to the first lexical error.
fn print_tokens(source: &Source) {
	let cursor = lexer::Cursor::from(source.contents.as_ref());

	let lexer = match lexer::Lexer::new(cursor) {
		Ok(lexer) => lexer,
		Err(error) => {
			eprintln!("{}: {}", color::Fg(color::Red, "Error"), error);
			return;
		}
	};

	eprintln!("{}", color::Fg(color::Yellow, "--------------------------------------------------"));

	for token in lexer {
		match token {
			Ok(token) => eprintln!("{}\t{}", token.pos, token),
			Err(error) => {
				eprintln!("{}: {}", color::Fg(color::Red, "Error"), error);
				break;
			}
		}
	}

	eprintln!("{}", color::Fg(color::Yellow, "--------------------------------------------------"));
}
