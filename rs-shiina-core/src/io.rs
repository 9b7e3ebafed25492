use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Builds an output path based on an input path and a new extension.
///
/// Example:
/// `logs/dialogue.jsonl` + `"bin"` → `logs/dialogue.bin`
pub(crate) fn build_output_path<P: AsRef<Path>>(
	input_path: P,
	output_extension: &str,
) -> io::Result<PathBuf> {
	let input_path = input_path.as_ref();

	let parent = input_path.parent().unwrap_or_else(|| Path::new("."));
	let file_stem = input_path
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Input path has no filename"))?;

	let mut output = PathBuf::from(parent);
	output.push(file_stem);
	output.set_extension(output_extension);

	Ok(output)
}

/// Returns `true` if `derived` exists and was modified no earlier than `source`.
///
/// Any metadata failure counts as out of date.
pub(crate) fn is_up_to_date<P: AsRef<Path>, Q: AsRef<Path>>(derived: P, source: Q) -> bool {
	let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified());

	match (modified(derived.as_ref()), modified(source.as_ref())) {
		(Ok(derived), Ok(source)) => derived >= source,
		_ => false,
	}
}

/// Creates the parent directory of `path` if needed.
pub(crate) fn ensure_parent_dir<P: AsRef<Path>>(path: P) -> io::Result<()> {
	match path.as_ref().parent() {
		Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
		_ => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_build_output_path_swaps_extension() {
		let output = build_output_path("logs/dialogue.jsonl", "bin").unwrap();
		assert_eq!(output, PathBuf::from("logs/dialogue.bin"));
	}

	#[test]
	fn test_missing_file_is_never_up_to_date() {
		let dir = std::env::temp_dir();
		assert!(!is_up_to_date(dir.join("rs-shiina-missing.bin"), dir.join("rs-shiina-missing.jsonl")));
	}
}
