//! Wire format exchanged with runtime driver processes
//!
//! A driver is invoked once per command as
//!
//! ```text
//! runtime-test-plugin-<version> test --apis <yaml list of API records>
//! ```
//!
//! and answers with one JSON object per line on stdout:
//!
//! ```text
//! {"name":"GetContext","type":"map","body":{"name":"ctx","target":"kubernetes"}}
//! {"name":"DeleteContext","type":"error","body":"context ctx not found"}
//! ```

use crate::api::{Api, ApiName};
use crate::error::{CoreError, CoreResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::collections::VecDeque;
use std::fmt;
use tracing::trace;

/// Driver subcommand that executes API records
pub const DRIVER_SUBCOMMAND: &str = "test";

/// Driver flag carrying the serialized API records
pub const APIS_FLAG: &str = "--apis";

/// Serialize the API records of one command for the driver
pub fn encode_apis(apis: &[Api]) -> CoreResult<String> {
    serde_yaml::to_string(apis).map_err(CoreError::EncodeRequest)
}

/// Parse a payload produced by [`encode_apis`]
pub fn decode_apis(payload: &str) -> CoreResult<Vec<Api>> {
    serde_yaml::from_str(payload).map_err(CoreError::DecodeRequest)
}

/// Declared kind of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    String,
    Map,
    Error,
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseType::String => write!(f, "string"),
            ResponseType::Map => write!(f, "map"),
            ResponseType::Error => write!(f, "error"),
        }
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    String(String),
    Map(Mapping),
    Error(String),
}

impl Response {
    pub fn response_type(&self) -> ResponseType {
        match self {
            Response::String(_) => ResponseType::String,
            Response::Map(_) => ResponseType::Map,
            Response::Error(_) => ResponseType::Error,
        }
    }
}

/// One response emitted by a driver for one executed API
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseRecord {
    pub name: ApiName,
    pub response: Response,
}

impl ResponseRecord {
    pub fn new(name: ApiName, response: Response) -> Self {
        Self { name, response }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawRecord {
    name: String,
    #[serde(rename = "type")]
    response_type: ResponseType,
    #[serde(default)]
    body: serde_json::Value,
}

/// Render one record as a single JSON line (without the trailing newline)
pub fn encode_record(record: &ResponseRecord) -> CoreResult<String> {
    let encode_err = |source| CoreError::EncodeRecord {
        api: record.name,
        source,
    };

    let body = match &record.response {
        Response::String(s) | Response::Error(s) => serde_json::Value::String(s.clone()),
        Response::Map(map) => serde_json::to_value(map).map_err(encode_err)?,
    };
    let raw = RawRecord {
        name: record.name.to_string(),
        response_type: record.response.response_type(),
        body,
    };
    serde_json::to_string(&raw).map_err(encode_err)
}

/// Responses of one driver invocation, grouped by API name in emission order
#[derive(Debug, Default, Clone)]
pub struct ParsedResponses {
    records: IndexMap<ApiName, VecDeque<ResponseRecord>>,
}

impl ParsedResponses {
    /// Pop the next unconsumed response for `name`
    pub fn take(&mut self, name: ApiName) -> Option<ResponseRecord> {
        self.records.get_mut(&name).and_then(VecDeque::pop_front)
    }

    /// Unconsumed responses for `name`
    pub fn get(&self, name: ApiName) -> impl Iterator<Item = &ResponseRecord> + '_ {
        self.records.get(&name).into_iter().flatten()
    }

    /// Total number of unconsumed responses
    pub fn len(&self) -> usize {
        self.records.values().map(VecDeque::len).sum()
    }

    /// APIs that still have unconsumed responses, in first-seen order
    pub fn remaining(&self) -> Vec<ApiName> {
        self.records
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, record: ResponseRecord) {
        self.records.entry(record.name).or_default().push_back(record);
    }
}

/// Parse a driver's stdout into response records keyed by API name
///
/// Blank lines are ignored; every other line must be a well-formed record.
pub fn parse_stdout(stdout: &str) -> CoreResult<ParsedResponses> {
    let mut parsed = ParsedResponses::default();

    for (index, line) in stdout.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let raw: RawRecord =
            serde_json::from_str(line).map_err(|source| CoreError::MalformedRecord {
                line: line_no,
                source,
            })?;
        let record = decode_record(raw, line_no)?;
        trace!("Parsed {} response for {}", record.response.response_type(), record.name);
        parsed.push(record);
    }

    Ok(parsed)
}

fn decode_record(raw: RawRecord, line: usize) -> CoreResult<ResponseRecord> {
    let invalid = |reason: String| CoreError::InvalidRecord {
        line,
        api: raw.name.clone(),
        reason,
    };

    let name: ApiName = raw
        .name
        .parse()
        .map_err(|_| invalid("unknown API name".to_string()))?;

    let response = match raw.response_type {
        ResponseType::String | ResponseType::Error => {
            let text = match &raw.body {
                serde_json::Value::String(s) => s.clone(),
                serde_json::Value::Null => String::new(),
                other => return Err(invalid(format!("expected a string body, got {}", other))),
            };
            if raw.response_type == ResponseType::Error {
                Response::Error(text)
            } else {
                Response::String(text)
            }
        }
        ResponseType::Map => {
            let value = serde_yaml::to_value(&raw.body).map_err(|e| invalid(e.to_string()))?;
            match value {
                serde_yaml::Value::Mapping(map) => Response::Map(map),
                serde_yaml::Value::Null => Response::Map(Mapping::new()),
                other => return Err(invalid(format!("expected a map body, got {:?}", other))),
            }
        }
    };

    Ok(ResponseRecord::new(name, response))
}
