//! Durable training corpus.
//!
//! The corpus is a JSON Lines file: one tokenized sentence (a JSON array of
//! morphemes) per line, in the order sentences were learned. Appending a
//! sentence never rewrites earlier lines.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::Result;
use crate::io::ensure_parent_dir;
use crate::model::morpheme::Morpheme;

/// Handle on a corpus file.
#[derive(Debug, Clone)]
pub struct CorpusFile {
	path: PathBuf,
}

impl CorpusFile {
	/// Opens the corpus at `path`, creating an empty one (and its parent
	/// directories) if it does not exist.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		if !path.exists() {
			ensure_parent_dir(&path)?;
			File::create(&path)?;
			info!("Created empty corpus {}", path.display());
		}
		Ok(Self { path })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Reads every stored sentence, in file order. Blank lines are skipped.
	pub fn read_sentences(&self) -> Result<Vec<Vec<Morpheme>>> {
		let reader = BufReader::new(File::open(&self.path)?);
		let mut sentences = Vec::new();

		for line in reader.lines() {
			let line = line?;
			if line.trim().is_empty() {
				continue;
			}
			sentences.push(serde_json::from_str(&line)?);
		}

		info!("Read {} sentences from {}", sentences.len(), self.path.display());
		Ok(sentences)
	}

	/// Appends one sentence.
	pub fn append(&mut self, sentence: &[Morpheme]) -> Result<()> {
		self.append_all(std::iter::once(sentence))
	}

	/// Appends several sentences with a single write.
	pub fn append_all<'a, I>(&mut self, sentences: I) -> Result<()>
	where
		I: IntoIterator<Item = &'a [Morpheme]>,
	{
		let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
		let mut writer = BufWriter::new(file);

		let mut count = 0;
		for sentence in sentences {
			serde_json::to_writer(&mut writer, sentence)?;
			writer.write_all(b"\n")?;
			count += 1;
		}
		writer.flush()?;

		debug!("Appended {count} sentences to {}", self.path.display());
		Ok(())
	}

	/// Size of the corpus file in bytes.
	pub fn size(&self) -> Result<u64> {
		Ok(fs::metadata(&self.path)?.len())
	}
}
