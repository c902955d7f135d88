//! Input validation for CLI arguments
//!
//! Environment problems (missing files, unwritable output directories) are
//! caught here, before any processing starts.

use crate::error::{Error, Result};
use std::path::Path;

pub fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::Input(format!(
            "input file '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(Error::Input(format!(
            "path '{}' is not a file",
            path.display()
        )));
    }
    Ok(())
}

pub fn validate_output_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::Environment(format!(
            "output directory '{}' does not exist",
            path.display()
        )));
    }
    if !path.is_dir() {
        return Err(Error::Environment(format!(
            "path '{}' is not a directory",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_input_file_is_rejected() {
        let err = validate_input_file(Path::new("/nope/courses.csv")).unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn directory_is_not_an_input_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_input_file(dir.path()).is_err());
    }

    #[test]
    fn existing_directory_passes() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_output_dir(dir.path()).is_ok());
    }

    #[test]
    fn file_is_not_an_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "").unwrap();
        let err = validate_output_dir(&file).unwrap_err();
        assert!(matches!(err, Error::Environment(_)));
    }
}
