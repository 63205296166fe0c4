#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use cristie::errors::{CristieError, CristieResult, TransportError};
use cristie::licmgr::{CommandOutput, CommandRunner};
use cristie::portal::{ByteStream, HttpResponse, HttpTransport};

pub const CODE: &str = "ABCD1234-EFGH5678-IJKL9012-MNOP3456";

pub const CATALOG_JSON: &str = r#"{
    "cbmr": {
        "latest": [{"installs": [{"product":"CBMR","platform":"Linux","version":"1.2","url":"https://x/cbmr-1.2.rpm"}]}],
        "archived": []
    }
}"#;

/// Replays scripted outputs and records every invocation.
#[derive(Default)]
pub struct FakeRunner {
    outputs: Mutex<VecDeque<CommandOutput>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeRunner {
    pub fn new(outputs: Vec<CommandOutput>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn flags(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|args| args.get(2).cloned())
            .collect()
    }
}

impl CommandRunner for &FakeRunner {
    async fn run(&self, _program: &Path, args: &[String]) -> CristieResult<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());
        self.outputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CristieError::LicenseManagerError {
                stage: "test",
                exit_code: None,
                detail: "no scripted output left".to_string(),
            })
    }
}

/// An existing file standing in for the licmgr executable.
pub fn fake_licmgr() -> tempfile::NamedTempFile {
    tempfile::NamedTempFile::new().unwrap()
}

/// In-memory portal.
pub struct FakeTransport {
    pub login: Result<HttpResponse, TransportError>,
    pub list: Result<HttpResponse, TransportError>,
    pub chunks: Vec<Result<Vec<u8>, TransportError>>,
    pub requests: Mutex<Vec<String>>,
    pub bearer: Mutex<Option<String>>,
}

impl FakeTransport {
    pub fn new(catalog_json: &str, body: &[u8]) -> Self {
        Self {
            login: Ok(json_response(200, r#"{"token": "tok-123"}"#)),
            list: Ok(json_response(200, catalog_json)),
            chunks: body.chunks(4).map(|c| Ok(c.to_vec())).collect(),
            requests: Mutex::new(Vec::new()),
            bearer: Mutex::new(None),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn json_response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: body.as_bytes().to_vec(),
    }
}

pub struct FakeStream {
    chunks: VecDeque<Result<Vec<u8>, TransportError>>,
}

impl ByteStream for FakeStream {
    async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        match self.chunks.pop_front() {
            Some(Ok(chunk)) => Ok(Some(chunk)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

impl HttpTransport for &FakeTransport {
    type Stream = FakeStream;

    async fn post_json(
        &self,
        url: &str,
        _body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(format!("POST {url}"));
        self.login.clone()
    }

    async fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(format!("GET {url}"));
        *self.bearer.lock().unwrap() = bearer.map(str::to_string);
        self.list.clone()
    }

    async fn get_stream(&self, url: &str) -> Result<FakeStream, TransportError> {
        self.requests.lock().unwrap().push(format!("STREAM {url}"));
        Ok(FakeStream {
            chunks: self.chunks.clone().into(),
        })
    }
}
