// ============================================================
// Layer 1: CLI Commands and Arguments
// ============================================================
// Two subcommands:
//   train  run one training job (optionally inside a worker thread)
//   parse  load a persisted model and classify one utterance
//
// Reference: Rust Book §12 (Building a CLI Program)

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainRequest;
use crate::domain::data_source::{DataSources, EndpointConfig};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train an NLU model
    Train(TrainArgs),

    /// Parse an utterance with a persisted model
    Parse(ParseArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Training configuration file (YAML)
    #[arg(long, short = 'c', default_value = "config.yml")]
    pub config: String,

    /// Training data file or directory; defaults to the config's `data`
    #[arg(long, short = 'd')]
    pub data: Option<PathBuf>,

    /// Fetch training data from this URL instead (takes precedence over --data)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Token sent to the endpoint as the `token` query parameter
    #[arg(long, requires = "endpoint")]
    pub endpoint_token: Option<String>,

    /// Directory to persist the trained model under; omit to skip persisting
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Name of the persisted model directory (default: nlu_<timestamp>)
    #[arg(long)]
    pub fixed_model_name: Option<String>,

    /// Remote storage backend to upload the persisted model to
    #[arg(long)]
    pub storage: Option<String>,

    /// Extra engine parameter, KEY=VALUE; VALUE is read as JSON when possible
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, serde_json::Value)>,

    /// Run training on a separate worker thread
    #[arg(long)]
    pub worker: bool,
}

impl From<TrainArgs> for TrainRequest {
    fn from(a: TrainArgs) -> Self {
        let mut data = DataSources {
            local:    a.data,
            endpoint: None,
        };
        if let Some(url) = a.endpoint {
            let mut endpoint = EndpointConfig::new(url);
            endpoint.token = a.endpoint_token;
            data.endpoint = Some(endpoint);
        }

        TrainRequest {
            config: a.config.into(),
            data,
            output_path: a.out,
            fixed_model_name: a.fixed_model_name,
            storage: a.storage,
            extra: a.params.into_iter().collect(),
        }
    }
}

/// Parse `KEY=VALUE`; values that are not valid JSON become strings.
fn parse_param(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{raw}'"));
    }
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Persisted model directory
    #[arg(long, short = 'm')]
    pub model: PathBuf,

    /// Utterance to classify
    #[arg(long, short = 't')]
    pub text: String,
}
