// ============================================================
// Layer 4: Training Data Loader
// ============================================================
// Default DataLoader implementation.
//
//   Local file       → format from extension (.md / .json)
//   Local directory  → every supported file, sorted by name, merged
//   Remote endpoint  → HTTP GET, format sniffed from the body
//
// Nothing here retries; a failed load is reported once and the
// selector wraps it into a DataAcquisitionError.
//
// Reference: Rust Book §9 (Error Handling)
//            reqwest blocking client documentation

use std::{fs, path::Path, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;

use crate::data::formats::{self, DataFormat};
use crate::domain::data_source::EndpointConfig;
use crate::domain::training_data::TrainingData;
use crate::domain::traits::DataLoader;

/// Loads training data from the filesystem or an HTTP endpoint.
pub struct FileDataLoader {
    endpoint_timeout: Duration,
}

impl FileDataLoader {
    pub fn new(endpoint_timeout: Duration) -> Self {
        Self { endpoint_timeout }
    }

    fn load_file(&self, path: &Path, language: &str) -> Result<TrainingData> {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DataFormat::from_extension)
            .ok_or_else(|| anyhow!("Unsupported training data file '{}'", path.display()))?;

        let content = fs::read_to_string(path)
            .with_context(|| format!("Cannot read '{}'", path.display()))?;

        let data = formats::parse(&content, format, language)
            .with_context(|| format!("Cannot parse '{}'", path.display()))?;

        tracing::debug!("Loaded {} examples from '{}'", data.len(), path.display());
        Ok(data)
    }

    fn load_dir(&self, dir: &Path, language: &str) -> Result<TrainingData> {
        let mut files: Vec<_> = fs::read_dir(dir)
            .with_context(|| format!("Cannot read directory '{}'", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|e| e.to_str())
                        .and_then(DataFormat::from_extension)
                        .is_some()
            })
            .collect();
        files.sort();

        if files.is_empty() {
            bail!("No training data files found in '{}'", dir.display());
        }

        let mut merged = TrainingData::new(language, Vec::new());
        for file in &files {
            merged = merged.merge(self.load_file(file, language)?);
        }
        Ok(merged)
    }
}

impl Default for FileDataLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl DataLoader for FileDataLoader {
    fn load_local(&self, path: &Path, language: &str) -> Result<TrainingData> {
        if !path.exists() {
            bail!("Training data path '{}' does not exist", path.display());
        }

        let data = if path.is_dir() {
            self.load_dir(path, language)?
        } else {
            self.load_file(path, language)?
        };

        tracing::info!("Loaded {} training examples", data.len());
        Ok(data)
    }

    fn load_endpoint(&self, endpoint: &EndpointConfig, language: &str) -> Result<TrainingData> {
        let url = endpoint.request_url()?;

        let client = Client::builder()
            .timeout(self.endpoint_timeout)
            .build()
            .context("Cannot build HTTP client")?;

        let mut request = client.get(url.clone());
        for (name, value) in &endpoint.headers {
            request = request.header(name.as_str(), value.as_str());
        }

        tracing::debug!("Requesting training data from '{}'", endpoint.url);
        let response = request
            .send()
            .with_context(|| format!("Cannot reach training data endpoint '{}'", endpoint.url))?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "Training data endpoint '{}' responded with status {}",
                endpoint.url,
                status
            );
        }

        let body = response
            .text()
            .with_context(|| format!("Cannot read response body from '{}'", endpoint.url))?;

        let data = formats::parse(&body, DataFormat::sniff(&body), language)
            .with_context(|| format!("Malformed training data from '{}'", endpoint.url))?;

        tracing::info!(
            "Loaded {} training examples from endpoint '{}'",
            data.len(),
            endpoint.url
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_single_markdown_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nlu.md");
        fs::write(&path, "## intent:greet\n- hi\n- hello\n").unwrap();

        let data = FileDataLoader::default().load_local(&path, "en").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.language, "en");
    }

    #[test]
    fn test_load_directory_merges_supported_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "## intent:greet\n- hi\n").unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"rasa_nlu_data": {"common_examples": [{"text": "bye", "intent": "goodbye"}]}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let data = FileDataLoader::default().load_local(dir.path(), "de").unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.examples[0].text, "hi");
        assert_eq!(data.examples[1].text, "bye");
        assert_eq!(data.language, "de");
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = FileDataLoader::default()
            .load_local(&dir.path().join("missing.md"), "en")
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(FileDataLoader::default().load_local(dir.path(), "en").is_err());
    }

    #[test]
    fn test_unsupported_extension_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "a,b").unwrap();
        let err = FileDataLoader::default().load_local(&path, "en").unwrap_err();
        assert!(err.to_string().contains("Unsupported"));
    }

    /// Serve one canned HTTP response and hand back the request line.
    fn serve_once(status: &str, body: &'static str) -> (String, std::thread::JoinHandle<String>) {
        use std::io::{BufRead, BufReader, Write};
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let status = status.to_string();

        let handle = std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            // drain headers
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 2 {
                line.clear();
            }
            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();
            request_line
        });

        (addr, handle)
    }

    #[test]
    fn test_load_endpoint_markdown_body() {
        let (addr, server) = serve_once("200 OK", "## intent:greet\n- hi there\n");
        let endpoint = EndpointConfig::new(format!("{addr}/nlu")).with_token("abc");

        let data = FileDataLoader::default().load_endpoint(&endpoint, "en").unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data.examples[0].text, "hi there");

        let request_line = server.join().unwrap();
        assert!(request_line.starts_with("GET /nlu?token=abc "));
    }

    #[test]
    fn test_load_endpoint_error_status() {
        let (addr, server) = serve_once("404 Not Found", "");
        let endpoint = EndpointConfig::new(addr);

        let err = FileDataLoader::default().load_endpoint(&endpoint, "en").unwrap_err();
        assert!(err.to_string().contains("404"));
        server.join().unwrap();
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        // port 9 (discard) on localhost is expected to refuse connections
        let loader = FileDataLoader::new(Duration::from_millis(500));
        let endpoint = EndpointConfig::new("http://127.0.0.1:9/data");
        assert!(loader.load_endpoint(&endpoint, "en").is_err());
    }
}
