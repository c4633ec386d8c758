use std::{fs::File, path::Path};


/// A compilation unit's source text.
#[derive(Debug)]
pub struct Source {
	/// The origin path, may be something fictional like `<stdin>`.
	pub path: Box<Path>,
	/// The raw source bytes. The language is ASCII, so no decoding happens here.
	pub contents: Box<[u8]>,
}


impl Source {
	/// Load the source code from a file path.
	pub fn from_path<P>(path: P) -> std::io::Result<Self>
	where
		P: Into<Box<Path>>,
	{
		let path = path.into();
		let file = File::open(&path)?;
		Self::from_reader(path, file)
	}


	/// Load the source code from a std::io::Read.
	/// The path argument may be anything, including fictional paths like `<stdin>`.
	pub fn from_reader<P, R>(path: P, mut reader: R) -> std::io::Result<Self>
	where
		P: Into<Box<Path>>,
		R: std::io::Read,
	{
		let path = path.into();
		let mut contents = Vec::with_capacity(1024);
		reader.read_to_end(&mut contents)?;

		Ok(Self { path, contents: contents.into() })
	}


	/// Build a source from an in-memory string. Mostly useful for tests.
	#[cfg(test)]
	pub fn from_text(path: &str, contents: &str) -> Self {
		Self {
			path: Path::new(path).into(),
			contents: contents.as_bytes().into(),
		}
	}
}
