use std::{io, path::Path};

use assert_matches::assert_matches;

use super::{
	compile,
	scope::{Storage, Table, TableFull, MAX_BINDINGS},
	Compilation,
	Compiler,
	Error,
	ErrorKind,
};
use crate::{
	backend,
	fmt,
	lexer::{self, Cursor, SourcePos},
	source::Source,
	symbol::Interner,
	term,
	tests,
};


fn compile_text(input: &str) -> (Result<Compilation, Error>, Interner) {
	let mut interner = Interner::new();
	let source = Source::from_text("<test>", input);
	let result = compile(&source, &mut interner);

	(result, interner)
}


fn records(input: &str) -> Vec<String> {
	match compile_text(input) {
		(Ok(compilation), _) => compilation.program
			.records()
			.map(Into::into)
			.collect(),

		(Err(error), interner) => panic!("{}", fmt::Show(&error, &interner)),
	}
}


fn error(input: &str) -> Error {
	match compile_text(input) {
		(Ok(compilation), _) => panic!("unexpectedly compiled:\n{}", compilation.program),
		(Err(error), _) => error,
	}
}


fn test_dir<P, F>(path: P, mut check: F) -> io::Result<()>
where
	P: AsRef<Path>,
	F: FnMut(&Result<Compilation, Error>) -> bool,
{
	let mut interner = Interner::new();

	tests::util::test_dir(
		path,
		move |path, file| {
			let source = Source::from_reader(path, file)?;
			let result = compile(&source, &mut interner);

			if !check(&result) {
				match result {
					Ok(compilation) => panic!(
						"{}: unexpectedly compiled\n{}",
						path.display(),
						compilation.program
					),

					Err(error) => panic!("{}: {}", path.display(), fmt::Show(&error, &interner)),
				}
			}

			Ok(())
		}
	)
}


#[test]
fn test_positive() -> io::Result<()> {
	test_dir(
		"src/compiler/tests/data/positive",
		Result::is_ok,
	)
}


#[test]
fn test_negative() -> io::Result<()> {
	test_dir(
		"src/compiler/tests/data/negative",
		Result::is_err,
	)
}


#[test]
fn test_scope_table() {
	let mut interner = Interner::new();
	let x = interner.get_or_intern("x").expect("interner full");
	let mut table = Table::new();

	let global = table.declare(x, Storage::Global(0)).expect("table full");

	table.enter();
	assert_eq!(table.lookup_current(x), None);
	assert_eq!(table.resolve(x), Some(global));

	let local = table.declare(x, Storage::Local(0)).expect("table full");
	assert_eq!(table.resolve(x), Some(local));

	// Redeclaring in the same scope shadows.
	let again = table.declare(x, Storage::Local(1)).expect("table full");
	assert_eq!(table.lookup_current(x), Some(again));

	table.exit();
	assert_eq!(table.resolve(x), Some(global));
	assert_eq!(table.scope_depth(), 1);

	// Bindings outlive their scopes.
	assert_eq!(table.iter().count(), 3);
	assert_eq!(table.get(local).storage, Storage::Local(0));
}


#[test]
fn test_table_full() {
	let mut interner = Interner::new();
	let x = interner.get_or_intern("x").expect("interner full");
	let mut table = Table::new();

	for _ in 0 .. MAX_BINDINGS {
		table.declare(x, Storage::Local(0)).expect("table full");
	}

	assert_matches!(table.declare(x, Storage::Local(0)), Err(TableFull));
	assert_eq!(table.iter().count(), MAX_BINDINGS);
}


#[test]
fn test_too_many_symbols() {
	// Parameters take bindings without emitting code or data.
	let mut input = String::from("int f(int p");
	for _ in 0 .. MAX_BINDINGS {
		input.push_str(", int p");
	}
	input.push_str(") { return 0; }");

	assert_matches!(error(&input).kind, ErrorKind::TooManySymbols);
}


#[test]
fn test_return_sum() {
	assert_eq!(
		records("int main() { return 1 + 2; }"),
		["jmp0008", "A:=0001", "push A ", "A:=0002", "pop B  ", "A:=B+A ", "ret    ", "ret    "]
	);
}


#[test]
fn test_globals() {
	let input = "int a; int b; int c; int main() { c = 5; return b; }";

	assert_eq!(
		records(input),
		[
			"jmp0008",
			"A:=0004", "push A ", "A:=0005", "pop B  ", "M[B]:=A",
			"A:=0002", "A:=M[A]", "ret    ",
			"ret    ",
		]
	);

	let (result, _) = compile_text(input);
	let compilation = result.expect("compilation failed");
	let storages: Vec<Storage> = compilation.symbols
		.iter()
		.map(|binding| binding.storage)
		.collect();

	assert_eq!(
		storages,
		[
			Storage::Global(0),
			Storage::Global(2),
			Storage::Global(4),
			Storage::Function(Some(8)),
		]
	);
}


#[test]
fn test_parameters_and_calls() {
	let input = r#"
		int add(int a, int b) {
			return a + b;
		}

		int main() {
			return add(1, 2);
		}
	"#;

	assert_eq!(
		records(input),
		[
			"jmp0050",
			// add: `a` is the deepest argument, `b` sits right below the return address.
			"sp@0002", "A:=M[A]", "push A ", "sp@0002", "A:=M[A]", "pop B  ", "A:=B+A ",
			"ret    ",
			"ret    ",
			// main
			"A:=0008", "push A ", "A:=0001", "push A ", "A:=0002", "push A ",
			"sp@0002", "A:=M[A]", "call A ", "pop0003",
			"ret    ",
			"ret    ",
		]
	);

	let (result, interner) = compile_text(input);
	let compilation = result.expect("compilation failed");

	let a = interner.get("a").expect("a not interned");
	let b = interner.get("b").expect("b not interned");
	let params: Vec<Storage> = compilation.symbols
		.iter()
		.filter(|binding| binding.name == a || binding.name == b)
		.map(|binding| binding.storage)
		.collect();

	assert_eq!(params, [Storage::Local(-3), Storage::Local(-2)]);
}


#[test]
fn test_if_else() {
	let input = "int main() { int x; if (x) x = 1; else x = 2; return x; }";

	assert_eq!(
		records(input),
		[
			"jmp0008",
			"push A ",
			"sp@0000", "A:=M[A]", "jz 0058",
			"sp@0000", "push A ", "A:=0001", "pop B  ", "M[B]:=A", "jmp0080",
			"sp@0000", "push A ", "A:=0002", "pop B  ", "M[B]:=A",
			"sp@0000", "A:=M[A]", "pop0001", "ret    ",
			"pop0001",
			"ret    ",
		]
	);
}


#[test]
fn test_if_without_else_has_no_jump() {
	assert_eq!(
		records("int main() { if (1) return 2; return 3; }"),
		[
			"jmp0008",
			"A:=0001", "jz 0028",
			"A:=0002", "ret    ",
			"A:=0003", "ret    ",
			"ret    ",
		]
	);
}


#[test]
fn test_while() {
	let input = "int main() { int i = 0; while (i < 3) i = i + 1; return i; }";

	assert_eq!(
		records(input),
		[
			"jmp0008",
			"A:=0000", "push A ",
			// Loop head at 0x18.
			"sp@0000", "A:=M[A]", "push A ", "A:=0003", "pop B  ", "A:=B<A ", "jz 00a8",
			"sp@0000", "push A ",
			"sp@0001", "A:=M[A]", "push A ", "A:=0001", "pop B  ", "A:=B+A ",
			"pop B  ", "M[B]:=A",
			"jmp0018",
			"sp@0000", "A:=M[A]", "pop0001", "ret    ",
			"pop0001",
			"ret    ",
		]
	);
}


#[test]
fn test_declaration_in_untaken_branch() {
	// The branch local is popped inside the branch, so `a` stays at the top either way.
	assert_eq!(
		records("int main() { int a = 7; if (0) int x; return a; }"),
		[
			"jmp0008",
			"A:=0007", "push A ",
			"A:=0000", "jz 0038",
			"push A ", "pop0001",
			"sp@0000", "A:=M[A]", "pop0001", "ret    ",
			"pop0001",
			"ret    ",
		]
	);
}


#[test]
fn test_declaration_in_loop_body() {
	// Each iteration pops its own local before jumping back to the condition.
	assert_eq!(
		records("int main() { int i = 0; while (i < 3) int y = i; return i; }"),
		[
			"jmp0008",
			"A:=0000", "push A ",
			"sp@0000", "A:=M[A]", "push A ", "A:=0003", "pop B  ", "A:=B<A ", "jz 0078",
			"sp@0000", "A:=M[A]", "push A ", "pop0001",
			"jmp0018",
			"sp@0000", "A:=M[A]", "pop0001", "ret    ",
			"pop0001",
			"ret    ",
		]
	);
}


#[test]
fn test_unbraced_bodies_restore_state() {
	let inputs = [
		"if (0) int x;",
		"if (1) int x = 1; else int y = 2;",
		"if (1) ; else char buf[4];",
		"while (0) int z;",
		"while (1) if (0) int x; else { int y; int z; }",
	];

	for input in inputs.iter() {
		let mut interner = Interner::new();
		let mut compiler = Compiler::new(Cursor::from(input.as_bytes()), &mut interner)
			.expect("failed to prime the lexer");

		compiler.statement().expect("statement failed");

		assert_eq!(compiler.emitter.depth(), 0, "{}", input);
		assert_eq!(compiler.table.scope_depth(), 1, "{}", input);
		assert!(compiler.lexer.is_eof());

		// Nothing declared in a body is visible after it.
		for name in ["x", "y", "z", "buf"].iter() {
			if let Some(symbol) = compiler.interner.get(name) {
				assert_eq!(compiler.table.resolve(symbol), None, "{} in {}", name, input);
			}
		}
	}
}


#[test]
fn test_forward_reference() {
	let input = r#"
		int f();

		int main() {
			return f();
		}

		int f() {
			return 7;
		}
	"#;

	assert_eq!(
		records(input),
		[
			"jmp0008",
			"A:=0048", "push A ", "sp@0000", "A:=M[A]", "call A ", "pop0001", "ret    ",
			"ret    ",
			"A:=0007", "ret    ",
			"ret    ",
		]
	);
}


#[test]
fn test_forward_reference_errors() {
	assert_matches!(
		error("int main() { return g(); }"),
		Error { kind: ErrorKind::UndeclaredSymbol(_), pos: SourcePos { line: 1, column: 21 } }
	);

	assert_matches!(
		error("int f(); int main() { return f(); }").kind,
		ErrorKind::UndefinedFunction(_)
	);

	assert_matches!(
		error("int f() { return 0; } int f() { return 1; } int main() { return 0; }").kind,
		ErrorKind::DuplicateDefinition(_)
	);

	// Without a prototype, functions defined later are not visible.
	assert_matches!(
		error("int main() { return f(1, 2); } int f(int a, int b) { return a; }").kind,
		ErrorKind::UndeclaredSymbol(_)
	);

	// A prototype that is never used needs no body.
	assert_matches!(compile_text("int f(int a); int main() { return 0; }"), (Ok(_), _));
}


#[test]
fn test_char_array() {
	let input = "int main() { char buf[3]; buf[1] = 65; return buf[1]; }";

	assert_eq!(
		records(input),
		[
			"jmp0008",
			// Two words of storage, and the pointer to them.
			"push A ", "push A ", "sp@0000", "push A ",
			"sp@0000", "A:=M[A]", "push A ", "A:=0001", "pop B  ", "A:=B+A ",
			"push A ", "A:=0041", "pop B  ", "m[B]:=A",
			"sp@0000", "A:=M[A]", "push A ", "A:=0001", "pop B  ", "A:=B+A ", "A:=m[A]",
			"pop0003", "ret    ",
			"pop0003",
			"ret    ",
		]
	);
}


#[test]
fn test_assignment_is_right_associative() {
	assert_eq!(
		records("int a; int b; int main() { a = b = 3; return a; }"),
		[
			"jmp0008",
			"A:=0000", "push A ",
			"A:=0002", "push A ", "A:=0003", "pop B  ", "M[B]:=A",
			"pop B  ", "M[B]:=A",
			"A:=0000", "A:=M[A]", "ret    ",
			"ret    ",
		]
	);
}


#[test]
fn test_not_assignable() {
	assert_matches!(error("int main() { (1 + 2) = 5; }").kind, ErrorKind::NotAssignable);
	assert_matches!(error("int main() { 1 = 2; }").kind, ErrorKind::NotAssignable);
	assert_matches!(error("int f() { return 0; } int main() { f = 2; }").kind, ErrorKind::NotAssignable);
	assert_matches!(error("int main() { 1[0]; }").kind, ErrorKind::NotIndexable);
}


#[test]
fn test_nested_blocks() {
	let input = "int main() { int x = 1; { int x = 2; { int y = x; } } return x; }";

	assert_eq!(
		records(input),
		[
			"jmp0008",
			"A:=0001", "push A ",
			"A:=0002", "push A ",
			// The inner `x` shadows the outer one.
			"sp@0000", "A:=M[A]", "push A ",
			"pop0001",
			"pop0001",
			// And the outer one is visible again.
			"sp@0000", "A:=M[A]", "pop0001", "ret    ",
			"pop0001",
			"ret    ",
		]
	);

	let (result, _) = compile_text(input);
	let compilation = result.expect("compilation failed");
	assert_eq!(compilation.symbols.scope_depth(), 1);
}


#[test]
fn test_deep_nesting_restores_state() {
	let input = "int x; { int x = 1; { int y; { int z; { int w; { int x = x; } } } } }";
	let mut interner = Interner::new();
	let mut compiler = Compiler::new(Cursor::from(input.as_bytes()), &mut interner)
		.expect("failed to prime the lexer");

	compiler.top_level_declaration().expect("global declaration failed");

	let x = compiler.interner.get("x").expect("x not interned");
	let state = |compiler: &Compiler| (
		compiler.emitter.depth(),
		compiler.table.scope_depth(),
		compiler.table.resolve(x),
	);

	let before = state(&compiler);

	compiler.expect("{").expect("missing block");
	compiler.block().expect("block failed");

	assert_eq!(state(&compiler), before);
	assert_eq!(before.0, 0);
	assert!(compiler.lexer.is_eof());
}


#[test]
fn test_initializer_does_not_see_its_own_name() {
	assert_matches!(
		error("int main() { int x = x; return 0; }").kind,
		ErrorKind::UndeclaredSymbol(_)
	);

	// The outer declaration is used instead.
	assert_eq!(
		records("int x; int main() { int x = x; return x; }"),
		[
			"jmp0008",
			"A:=0000", "A:=M[A]", "push A ",
			"sp@0000", "A:=M[A]", "pop0001", "ret    ",
			"pop0001",
			"ret    ",
		]
	);
}


#[test]
fn test_parameters_are_scoped_to_their_function() {
	assert_matches!(
		error("int f(int a) { return a; } int main() { return a; }").kind,
		ErrorKind::UndeclaredSymbol(_)
	);
}


#[test]
fn test_logical_and() {
	assert_eq!(
		records("int main() { return 1 && 0; }"),
		[
			"jmp0008",
			"A:=0001", "jz 0038",
			"A:=0000", "jz 0038",
			"A:=0001", "jmp0040",
			"A:=0000",
			"ret    ",
			"ret    ",
		]
	);
}


#[test]
fn test_logical_or() {
	assert_eq!(
		records("int main() { return 0 || 1; }"),
		[
			"jmp0008",
			"A:=0000", "jz 0020", "jmp0030",
			"A:=0001", "jz 0040",
			"A:=0001", "jmp0048",
			"A:=0000",
			"ret    ",
			"ret    ",
		]
	);
}


#[test]
fn test_literals() {
	assert_eq!(
		records("int main() { return 'A' + 0xffff + '\\n'; }")[1 .. 4],
		["A:=0041", "push A ", "A:=ffff"]
	);

	assert_matches!(
		error("int main() { return 65536; }").kind,
		ErrorKind::ConstantOutOfRange(literal) if &*literal == "65536"
	);
	assert_matches!(error("int main() { return 0x10000; }").kind, ErrorKind::ConstantOutOfRange(_));
	assert_matches!(error("int main() { return 12abc; }").kind, ErrorKind::InvalidNumber(_));
	assert_matches!(error("int main() { return 0x; }").kind, ErrorKind::InvalidNumber(_));
	assert_matches!(error(r#"int main() { return "text"; }"#).kind, ErrorKind::UnexpectedToken(_));
}


#[test]
fn test_declaration_errors() {
	assert_matches!(error("main() { return 0; }").kind, ErrorKind::TypeNameExpected(_));
	assert_matches!(error("int f(a) { return 0; }").kind, ErrorKind::TypeNameExpected(_));
	assert_matches!(error("int 3;").kind, ErrorKind::IdentifierExpected(_));
	assert_matches!(error("int while;").kind, ErrorKind::IdentifierExpected(_));
	assert_matches!(error("int main() { int return = 1; }").kind, ErrorKind::IdentifierExpected(_));
	assert_matches!(error("int main() { char buf[n]; }").kind, ErrorKind::UnexpectedToken(_));
	assert_matches!(
		error("int main() { char buf[0]; buf[0] = 1; return 0; }"),
		Error { kind: ErrorKind::ConstantOutOfRange(literal), pos: SourcePos { line: 1, column: 23 } }
			if &*literal == "0"
	);
}


#[test]
fn test_expected_token() {
	assert_matches!(
		error("int main() { return 1 }").kind,
		ErrorKind::ExpectedToken { expected: ";", found } if &*found == "'}'"
	);

	assert_matches!(
		error("int main() { return 0;").kind,
		ErrorKind::ExpectedToken { expected: "}", found } if &*found == "end of input"
	);

	assert_matches!(
		error("int main() { if 1 return 0; }").kind,
		ErrorKind::ExpectedToken { expected: "(", .. }
	);
}


#[test]
fn test_missing_main() {
	assert_matches!(error("").kind, ErrorKind::MissingMain);
	assert_matches!(error("int f() { return 0; }").kind, ErrorKind::MissingMain);
	assert_matches!(error("int main();").kind, ErrorKind::MissingMain);
	assert_matches!(error("int main;").kind, ErrorKind::MissingMain);
}


#[test]
fn test_lexical_errors_propagate() {
	assert_matches!(
		error("int main() { /* never closed"),
		Error {
			kind: ErrorKind::Lexical(lexer::ErrorKind::UnterminatedComment),
			pos: SourcePos { line: 1, column: 14 },
		}
	);
}


#[test]
fn test_data_segment_full() {
	let mut input = String::new();
	for ix in 0 .. 0x8000 {
		input.push_str(&format!("int g{};\n", ix));
	}

	let error = error(&input);
	assert_matches!(error.kind, ErrorKind::DataSegmentFull);
	assert_eq!(error.pos.line, 0x8000);
}


#[test]
fn test_backend_errors_have_positions() {
	let mut input = String::from("int main() {\n");
	for _ in 0 .. 0x2000 {
		input.push_str("1;\n");
	}
	input.push_str("}\n");

	assert_matches!(
		error(&input),
		Error { kind: ErrorKind::Backend(backend::Error::CodeBufferFull), pos } if pos.line > 1
	);
}


#[test]
fn test_error_display() {
	term::set_colors(false);

	let (result, interner) = compile_text("int main() { return g(); }");
	let error = result.expect_err("compilation succeeded");

	assert_eq!(
		fmt::to_string(&error, &interner),
		"Error: line 1, column 21 - undeclared symbol 'g'"
	);
}


#[test]
fn test_symbol_dump() {
	term::set_colors(false);

	let (result, interner) = compile_text("int g; int f(); int main() { int x; return 0; }");
	let compilation = result.expect("compilation failed");

	assert_eq!(
		fmt::to_string(&compilation.symbols, &interner),
		"global    0000\tg\nprototype ----\tf\nfunction  0008\tmain\nlocal     0\tx\n"
	);
}
