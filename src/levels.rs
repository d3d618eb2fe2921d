use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SokoError;
use crate::level::Level;

/// Error type for reading and writing level collections.
#[derive(Debug, Error)]
pub enum LevelError {
    /// IO error when reading from or writing to a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed batch file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid level content
    #[error("Invalid level {index}: {source}")]
    InvalidLevel { index: usize, source: SokoError },

    /// A record whose level or solution could not be processed
    #[error("Record {title:?}: {source}")]
    Record { title: String, source: SokoError },
}

/// A level with a known solution, as stored in batch files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub title: String,
    pub definition: String,
    pub solution: String,
}

/// Read a JSON array of level records.
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<LevelRecord>, LevelError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Write level records as a JSON array.
pub fn write_records(path: impl AsRef<Path>, records: &[LevelRecord]) -> Result<(), LevelError> {
    let contents = serde_json::to_string(records)?;
    fs::write(path, contents)?;
    Ok(())
}

/// A titled level from an XSB collection.
#[derive(Debug, Clone)]
pub struct NamedLevel {
    pub title: String,
    pub level: Level,
}

/// A collection of Sokoban levels in XSB format.
#[derive(Debug)]
pub struct Levels {
    levels: Vec<NamedLevel>,
}

impl Levels {
    /// Parse XSB-formatted Sokoban levels from a string.
    ///
    /// The XSB format uses:
    /// - Lines starting with `;` as level separators/comments
    /// - Standard Sokoban characters (#, @, $, ., *, +, space)
    /// - Empty lines between levels (optional)
    ///
    /// The last comment before a level becomes its title; untitled levels
    /// are named `Level N`.
    pub fn from_text(contents: &str) -> Result<Self, LevelError> {
        let mut levels = Levels { levels: Vec::new() };
        let mut current_level = String::new();
        let mut title: Option<String> = None;

        for line in contents.lines() {
            if let Some(comment) = line.trim_start().strip_prefix(';') {
                levels.finish(&mut current_level, &mut title)?;
                let comment = comment.trim();
                if !comment.is_empty() {
                    title = Some(comment.to_string());
                }
                continue;
            }

            if line.trim_end_matches('\r').is_empty() {
                levels.finish(&mut current_level, &mut title)?;
                continue;
            }

            current_level.push_str(line.trim_end_matches('\r'));
            current_level.push('\n');
        }

        // Don't forget the last level if file doesn't end with empty line
        levels.finish(&mut current_level, &mut title)?;

        Ok(levels)
    }

    /// Parse XSB-formatted Sokoban levels from a text file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let contents = fs::read_to_string(path)?;
        Self::from_text(&contents)
    }

    fn finish(
        &mut self,
        current_level: &mut String,
        title: &mut Option<String>,
    ) -> Result<(), LevelError> {
        if current_level.is_empty() {
            return Ok(());
        }

        let index = self.levels.len() + 1;
        let level = Level::from_text(current_level.trim_end())
            .map_err(|source| LevelError::InvalidLevel { index, source })?;
        self.levels.push(NamedLevel {
            title: title.take().unwrap_or_else(|| format!("Level {}", index)),
            level,
        });
        current_level.clear();
        Ok(())
    }

    /// Get the nth level (0-indexed).
    pub fn get(&self, index: usize) -> Option<&NamedLevel> {
        self.levels.get(index)
    }

    /// Get the number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the collection holds no levels at all.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_basic() {
        let level1 = "####
# .#
#  ###
#*@  #
#  $ #
#  ###
####";

        let level2 = "######
#    #
# #@ #
# $* #
# .* #
#    #
######";

        let level3 = "  ####
###  ####
#     $ #
# #  #$ #
# . .#@ #
#########";

        let xsb_content = format!(
            "; 1\n\n{}\n\n; Second\n\n{}\n\n{}\n",
            level1, level2, level3
        );

        let levels = Levels::from_text(&xsb_content).unwrap();

        assert_eq!(levels.len(), 3);
        assert_eq!(levels.get(0).unwrap().title, "1");
        assert_eq!(levels.get(1).unwrap().title, "Second");
        assert_eq!(levels.get(2).unwrap().title, "Level 3");

        // Verify levels match the original strings when formatted back
        assert_eq!(levels.get(0).unwrap().level.to_string().trim_end(), level1);
        assert_eq!(levels.get(1).unwrap().level.to_string().trim_end(), level2);
        assert_eq!(levels.get(2).unwrap().level.to_string().trim_end(), level3);
    }

    #[test]
    fn test_from_text_crlf() {
        let levels = Levels::from_text("; Tiny\r\n#####\r\n#@$.#\r\n#####\r\n\r\n").unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(
            levels.get(0).unwrap().level.to_string().trim_end(),
            "#####\n#@$.#\n#####"
        );
    }

    #[test]
    fn test_from_text_empty() {
        let levels = Levels::from_text("; Only comments\n\n; here\n").unwrap();
        assert!(levels.is_empty());
        assert_eq!(levels.len(), 0);
        assert!(levels.get(0).is_none());
    }

    #[test]
    fn test_from_text_invalid_level() {
        let xsb_content = "; 1

####
# .#
#@@  #
####
";

        let result = Levels::from_text(xsb_content);
        assert!(matches!(
            result,
            Err(LevelError::InvalidLevel { index: 1, .. })
        ));
    }

    #[test]
    fn test_from_file_no_file() {
        let result = Levels::from_file("nonexistent_file.xsb");
        assert!(matches!(result, Err(LevelError::Io(_))));
    }

    #[test]
    fn test_records_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.json");
        let contents = serde_json::json!([{
            "title": "Corridor",
            "definition": "#######\n#@ $ .#\n#######",
            "solution": "lrrr",
        }]);
        fs::write(&path, contents.to_string()).unwrap();

        let mut records = read_records(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Corridor");
        assert_eq!(records[0].definition, "#######\n#@ $ .#\n#######");

        records[0].solution = "rrr".to_string();
        let out = dir.path().join("optimized.json");
        write_records(&out, &records).unwrap();
        assert_eq!(read_records(&out).unwrap(), records);
    }

    #[test]
    fn test_records_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels.json");
        fs::write(&path, r#"[{"title":"No definition"}]"#).unwrap();
        assert!(matches!(read_records(&path), Err(LevelError::Json(_))));
    }
}
