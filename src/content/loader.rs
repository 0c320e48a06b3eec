//! Loader for RON content files at startup.

use ron::Options;
use std::fs;
use std::path::Path;

use crate::movement::resources::MovementTuning;

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

/// Load a single RON struct from a file.
fn load_single_file<T>(path: &Path) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file_name = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: file_name.clone(),
        message: format!("IO error: {}", e),
    })?;

    ron_options()
        .from_str(&contents)
        .map_err(|e| ContentLoadError {
            file: file_name,
            message: format!("Parse error: {}", e),
        })
}

/// Load the movement tuning file. Returns None when the file simply does not
/// exist so callers can fall back to compiled-in defaults.
pub fn load_movement_tuning(
    base_path: &Path,
) -> Result<Option<MovementTuning>, ContentLoadError> {
    let path = base_path.join("movement.ron");
    if !path.exists() {
        return Ok(None);
    }
    load_single_file::<MovementTuning>(&path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let result = load_movement_tuning(Path::new("/nonexistent/data"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = std::env::temp_dir().join("ledgerun_loader_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("movement.ron"), "(run_speed: \"fast\")").unwrap();
        let err = load_movement_tuning(&dir).unwrap_err();
        assert!(err.file.ends_with("movement.ron"));
        assert!(err.message.contains("Parse error"));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = std::env::temp_dir().join("ledgerun_loader_partial");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("movement.ron"), "(run_speed: 200.0)").unwrap();
        let tuning = load_movement_tuning(&dir).unwrap().unwrap();
        assert_eq!(tuning.run_speed, 200.0);
        assert_eq!(tuning.jump_velocity, MovementTuning::default().jump_velocity);
    }
}
