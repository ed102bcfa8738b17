use crate::domain::{Ww3Error, Ww3Result};
use std::fs;
use std::path::Path;

/// Truncates `path` and writes `content` byte for byte.
pub fn write_text_artifact(path: &Path, content: &str) -> Ww3Result<()> {
    fs::write(path, content).map_err(|source| {
        Ww3Error::io_system(
            "IO.TEXT_WRITE",
            format!("failed to write '{}': {}", path.display(), source),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::write_text_artifact;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn rewrites_truncate_previous_content() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("ww3_bounc.nml");

        write_text_artifact(&path, "&BOUND_NML\n  BOUND%MODE = 'WRITE'\n/\n")
            .expect("first write should succeed");
        write_text_artifact(&path, "&BOUND_NML\n/\n").expect("second write should succeed");

        let written = fs::read_to_string(&path).expect("namelist should be readable");
        assert_eq!(written, "&BOUND_NML\n/\n");
    }

    #[test]
    fn content_is_written_without_newline_or_line_ending_changes() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("ww3_grid.nml");
        let text = "&GRID_NML\r\n  GRID%NAME = 'g'\n/\n! end of namelist !";

        write_text_artifact(&path, text).expect("write should succeed");

        assert_eq!(fs::read(&path).expect("file should be readable"), text.as_bytes());
    }

    #[test]
    fn write_into_missing_directory_is_io_error() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("absent").join("ww3_grid.nml");
        let error = write_text_artifact(&path, "&GRID_NML\n/").expect_err("write should fail");
        assert_eq!(error.placeholder(), "IO.TEXT_WRITE");
        assert_eq!(error.exit_code(), 7);
    }
}
