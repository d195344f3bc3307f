/// Input path validation.
///
/// `validate_path` is a plain function with no console I/O. The prompt loop
/// lives in `prompt_for_path`, which takes its reader and writer from the
/// caller so it can be driven from stdin or from a test buffer.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Required extension for DEM input files.
pub const DEM_EXTENSION: &str = "csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Nothing exists at the path.
    NotFound(PathBuf),
    /// A file exists but does not have a `.csv` extension.
    NotCsv(PathBuf),
    /// The prompt ran out of input before a valid path was entered.
    NoInput,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::NotFound(p) => write!(f, "File not found: {}", p.display()),
            PathError::NotCsv(p) => write!(f, "Not a CSV: {}", p.display()),
            PathError::NoInput => write!(f, "No input path provided"),
        }
    }
}

impl std::error::Error for PathError {}

/// Checks that `path` names an existing file with a `.csv` extension.
/// The extension match is case-sensitive: `.CSV` is rejected.
pub fn validate_path(path: &Path) -> Result<PathBuf, PathError> {
    let is_csv = path
        .extension()
        .map(|ext| ext == DEM_EXTENSION)
        .unwrap_or(false);

    if !path.is_file() {
        return Err(PathError::NotFound(path.to_path_buf()));
    }
    if !is_csv {
        return Err(PathError::NotCsv(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

/// Prompts until a valid path is entered or input ends.
pub fn prompt_for_path<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    writeln!(output, "Enter path to csv file as path/to/filename.csv: ")?;
    loop {
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(PathError::NoInput.into());
        }
        let candidate = line.trim();
        writeln!(output, "Filepath: {}", candidate)?;

        match validate_path(Path::new(candidate)) {
            Ok(path) => return Ok(path),
            Err(PathError::NotCsv(_)) => {
                writeln!(output, "Not a CSV.  Please re-enter path to a valid CSV file: ")?;
            }
            Err(_) => {
                writeln!(output, "File not found.  Please re-enter path to CSV file: ")?;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    fn scratch_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("dem_input_{}_{}", std::process::id(), name));
        fs::write(&path, "1\n1\n0\n").expect("temp dir should be writable");
        path
    }

    #[test]
    fn test_existing_csv_is_valid() {
        let path = scratch_file("valid.csv");
        let result = validate_path(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(result, Ok(path));
    }

    #[test]
    fn test_existing_non_csv_is_rejected() {
        let path = scratch_file("grid.txt");
        let result = validate_path(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(result, Err(PathError::NotCsv(path)));
    }

    #[test]
    fn test_uppercase_extension_is_not_csv() {
        let path = scratch_file("upper.CSV");
        let result = validate_path(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(result, Err(PathError::NotCsv(path)));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let path = std::env::temp_dir().join("dem_input_missing_for_sure.csv");
        assert_eq!(validate_path(&path), Err(PathError::NotFound(path.clone())));
    }

    #[test]
    fn test_prompt_retries_until_valid() {
        let good = scratch_file("prompt.csv");
        let bad_ext = scratch_file("prompt.txt");
        let script = format!(
            "nowhere.csv\n{}\n{}\n",
            bad_ext.display(),
            good.display()
        );
        let mut out = Vec::new();
        let result = prompt_for_path(&mut Cursor::new(script), &mut out);
        let _ = fs::remove_file(&good);
        let _ = fs::remove_file(&bad_ext);

        assert_eq!(result.expect("third entry is valid"), good);
        let transcript = String::from_utf8(out).unwrap();
        assert!(transcript.contains("File not found."));
        assert!(transcript.contains("Not a CSV."));
    }

    #[test]
    fn test_prompt_gives_up_at_end_of_input() {
        let mut out = Vec::new();
        let result = prompt_for_path(&mut Cursor::new("missing.csv\n"), &mut out);
        assert!(result.is_err());
    }
}
