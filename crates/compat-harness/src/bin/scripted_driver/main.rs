//! Scripted runtime driver
//!
//! Speaks the driver protocol without any runtime build behind it. APIs run
//! against a small record store kept in the scratch config files, so writes
//! made by one invocation are seen, and deletes are missed, by the next.
//! Override files replace the answer for matching APIs, leaving the store
//! untouched.
//!
//! Environment:
//!
//! - `COMPAT_SCRIPTED_RESPONSES` - YAML list of `{name, version?, type, body}` overrides
//! - `COMPAT_SCRIPTED_LOG` - file appended with `<version> <name>` per executed API
//! - `COMPAT_SCRIPTED_STDERR` - text written to stderr after answering
//! - `COMPAT_SCRIPTED_EXIT_CODE` - exit status after answering
//! - `COMPAT_SCRIPTED_DELAY_MS` - pause before answering
//!
//! No tracing subscriber is installed: stdout carries responses and any
//! stderr output fails the command.

use anyhow::{bail, Context, Result};
use compat_core::wire::{self, Response, ResponseRecord, ResponseType, APIS_FLAG, DRIVER_SUBCOMMAND};
use compat_core::{Api, ApiName, RuntimeVersion};
use compat_harness::scratch::{CONFIG_ENV, CONFIG_METADATA_ENV, CONFIG_NEXT_GEN_ENV};
use serde::Deserialize;
use std::env;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;
use store::Store;

mod store;

const RESPONSES_ENV: &str = "COMPAT_SCRIPTED_RESPONSES";
const LOG_ENV: &str = "COMPAT_SCRIPTED_LOG";
const STDERR_ENV: &str = "COMPAT_SCRIPTED_STDERR";
const EXIT_CODE_ENV: &str = "COMPAT_SCRIPTED_EXIT_CODE";
const DELAY_ENV: &str = "COMPAT_SCRIPTED_DELAY_MS";

const CONFIG_ENVS: [&str; 3] = [CONFIG_ENV, CONFIG_NEXT_GEN_ENV, CONFIG_METADATA_ENV];

/// A canned answer replacing what the store would say
#[derive(Debug, Deserialize)]
struct Override {
    name: ApiName,
    #[serde(default)]
    version: Option<RuntimeVersion>,
    #[serde(rename = "type")]
    response_type: ResponseType,
    #[serde(default)]
    body: serde_yaml::Value,
}

impl Override {
    fn matches(&self, api: &Api) -> bool {
        self.name == api.name && self.version.map_or(true, |v| v == api.version)
    }

    fn response(&self) -> Result<Response> {
        Ok(match self.response_type {
            ResponseType::Map => match &self.body {
                serde_yaml::Value::Mapping(map) => Response::Map(map.clone()),
                serde_yaml::Value::Null => Response::Map(Default::default()),
                other => bail!("override for {} has a non-mapping body: {:?}", self.name, other),
            },
            ResponseType::String => Response::String(scalar_text(&self.body)?),
            ResponseType::Error => Response::Error(scalar_text(&self.body)?),
        })
    }
}

fn scalar_text(value: &serde_yaml::Value) -> Result<String> {
    Ok(match value {
        serde_yaml::Value::Null => String::new(),
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        other => serde_yaml::to_string(other)?.trim_end().to_string(),
    })
}

fn load_overrides() -> Result<Vec<Override>> {
    let Ok(path) = env::var(RESPONSES_ENV) else {
        return Ok(Vec::new());
    };
    let content =
        fs::read_to_string(&path).with_context(|| format!("failed to read overrides {}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("invalid overrides in {}", path))
}

fn payload_from_args(args: &[String]) -> Result<&str> {
    match args {
        [subcommand, flag, payload] if subcommand == DRIVER_SUBCOMMAND && flag == APIS_FLAG => {
            Ok(payload.as_str())
        }
        _ => bail!("usage: {} {} <yaml>", DRIVER_SUBCOMMAND, APIS_FLAG),
    }
}

fn missing_config_files() -> Vec<String> {
    CONFIG_ENVS
        .iter()
        .filter(|key| {
            env::var(key)
                .map(|path| !Path::new(&path).is_file())
                .unwrap_or(true)
        })
        .map(|key| key.to_string())
        .collect()
}

fn config_path(key: &str) -> Result<PathBuf> {
    env::var_os(key)
        .map(PathBuf::from)
        .with_context(|| format!("{} is not set", key))
}

fn open_store() -> Result<Store> {
    Store::open(
        config_path(CONFIG_ENV)?,
        config_path(CONFIG_NEXT_GEN_ENV)?,
        config_path(CONFIG_METADATA_ENV)?,
    )
}

fn log_calls(apis: &[Api]) -> Result<()> {
    let Ok(path) = env::var(LOG_ENV) else {
        return Ok(());
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open call log {}", path))?;
    for api in apis {
        writeln!(file, "{} {}", api.version, api.name)?;
    }
    Ok(())
}

fn run(args: &[String]) -> Result<()> {
    let apis = wire::decode_apis(payload_from_args(args)?)?;
    let overrides = load_overrides()?;
    let mut store = open_store()?;
    log_calls(&apis)?;

    if let Some(ms) = env::var(DELAY_ENV).ok().and_then(|ms| ms.trim().parse::<u64>().ok()) {
        thread::sleep(Duration::from_millis(ms));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for api in &apis {
        let response = match overrides.iter().find(|o| o.matches(api)) {
            Some(found) => found.response()?,
            None => store.apply(api)?,
        };
        let line = wire::encode_record(&ResponseRecord::new(api.name, response))?;
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    store.save()
}

fn main() -> ExitCode {
    let missing = missing_config_files();
    if !missing.is_empty() {
        eprintln!("config files not found for: {}", missing.join(", "));
        return ExitCode::from(2);
    }

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        eprintln!("{:#}", e);
        return ExitCode::FAILURE;
    }

    if let Ok(text) = env::var(STDERR_ENV) {
        eprint!("{}", text);
    }

    match env::var(EXIT_CODE_ENV).ok().and_then(|c| c.trim().parse::<u8>().ok()) {
        Some(code) => ExitCode::from(code),
        None => ExitCode::SUCCESS,
    }
}
