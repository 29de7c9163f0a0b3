use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use flate2::read::MultiGzDecoder;
use reqwest::blocking::Client;

use crate::error::{LeadsError, Result};

/// Something that can produce the full raw text of a leads export.
pub trait DocumentSource {
    fn describe(&self) -> String;
    fn fetch(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_gzip(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("gz"))
            .unwrap_or(false)
    }
}

impl DocumentSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String> {
        let bytes = if self.is_gzip() {
            let file = fs::File::open(&self.path)?;
            let mut bytes = Vec::new();
            MultiGzDecoder::new(file).read_to_end(&mut bytes)?;
            bytes
        } else {
            fs::read(&self.path)?
        };
        Ok(decode_lossy(bytes))
    }
}

// Exports saved as Latin-1 keep their rows; bad bytes become U+FFFD.
fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("source is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpSource {
    http: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }
}

impl DocumentSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .map_err(|err| LeadsError::transport(&self.url, err))?;
        if !response.status().is_success() {
            return Err(LeadsError::transport(
                &self.url,
                format!("unexpected status {}", response.status()),
            ));
        }
        response
            .text()
            .map_err(|err| LeadsError::transport(&self.url, err))
    }
}

#[derive(Debug, Clone)]
pub struct StaticSource {
    label: String,
    text: String,
}

impl StaticSource {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn from_stdin() -> Result<Self> {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        Ok(Self::new("<stdin>", text))
    }
}

impl DocumentSource for StaticSource {
    fn describe(&self) -> String {
        self.label.clone()
    }

    fn fetch(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

/// Resolves a source argument: `http(s)://` URLs, `-` for stdin, otherwise a
/// file path.
pub fn open_source(location: &str) -> Result<Box<dyn DocumentSource>> {
    let trimmed = location.trim();
    let lower = trimmed.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Box::new(HttpSource::new(trimmed)))
    } else if trimmed == "-" {
        Ok(Box::new(StaticSource::from_stdin()?))
    } else {
        Ok(Box::new(FileSource::new(trimmed)))
    }
}
