use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde_yaml::Value;

/// A retrieved YAML output file with its deserialized content cached
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactFile {
    filename: String,
    content: Value,
}

impl ArtifactFile {
    /// Deserialize raw retrieved bytes into a typed artifact
    pub fn parse(filename: &str, text: &str) -> Result<Self, ArtifactError> {
        let content: Value = serde_yaml::from_str(text)
            .map_err(|err| ArtifactError::Yaml(filename.to_string(), err.to_string()))?;
        Ok(ArtifactFile {
            filename: filename.to_string(),
            content,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    /// Dump the cached content back to a local file
    pub fn dump_file(&self, path: &Path) -> io::Result<()> {
        let text = serde_yaml::to_string(&self.content)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(path, text)
    }
}

/// The primary BigDFT log, with typed accessors over the common fields
#[derive(Debug, Clone, PartialEq)]
pub struct LogArtifact {
    file: ArtifactFile,
}

impl LogArtifact {
    pub fn parse(filename: &str, text: &str) -> Result<Self, ArtifactError> {
        Ok(LogArtifact {
            file: ArtifactFile::parse(filename, text)?,
        })
    }

    pub fn file(&self) -> &ArtifactFile {
        &self.file
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.file.content.get(key)
    }

    /// Total energy in Hartree, when the run got far enough to report one
    pub fn energy(&self) -> Option<f64> {
        self.get("Energy (Hartree)").and_then(Value::as_f64)
    }

    /// Seconds of walltime reported at the end of the log
    pub fn walltime(&self) -> Option<f64> {
        self.get("Walltime since initialization")
            .and_then(Value::as_f64)
    }
}

/// Typed record handed back to the external engine for one retrieved file
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedArtifact {
    Log(LogArtifact),
    File(ArtifactFile),
}

impl ParsedArtifact {
    pub fn filename(&self) -> &str {
        match self {
            ParsedArtifact::Log(log) => log.file().filename(),
            ParsedArtifact::File(file) => file.filename(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ArtifactError {
    Yaml(String, String),
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArtifactError::Yaml(filename, msg) => {
                write!(f, "can't deserialise artifact {filename}: {msg}")
            }
        }
    }
}

impl std::error::Error for ArtifactError {}
