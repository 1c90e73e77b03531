use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use lumiere_reconstruction::{EngineConfig, ReconstructionEngine};
use lumiere_session::Session;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`, or to stdout when absent.
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = match output_path {
            Some(path) => Output::create(path)?,
            None => Output::stdout(),
        };
        output.write_json(value)?;
        if let Output::File { path, .. } = &output {
            tracing::info!(path = %path.display(), "report written");
        }
        Ok(())
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    fn create(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    fn target(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_owned(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let target = self.target();
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {target}"))?;
        writeln!(&mut *self).with_context(|| format!("Failed to write JSON to {target}"))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {target}"))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(what: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open {what}: {}", path.display()))?;
    serde_json::from_reader(io::BufReader::new(file))
        .with_context(|| format!("Failed to parse {what} as JSON: {}", path.display()))
}

/// Reads the engine configuration and builds a validated engine from it.
pub fn load_engine<P>(path: P) -> anyhow::Result<ReconstructionEngine>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let config: EngineConfig = read_json_file("engine config", path)?;
    let engine = ReconstructionEngine::new(config)
        .with_context(|| format!("Invalid configuration: {}", path.display()))?;
    Ok(engine)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SessionsFile {
    List(Vec<Value>),
    Wrapped { sessions: Vec<Value> },
}

/// Reads session documents from a JSON array or a `{"sessions": [...]}` object.
pub fn read_sessions_file<P>(path: P) -> anyhow::Result<Vec<Session>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let documents = match read_json_file("sessions file", path)? {
        SessionsFile::List(documents) | SessionsFile::Wrapped { sessions: documents } => documents,
    };
    let total = documents.len();
    let sessions = parse_sessions(documents);
    tracing::info!(
        path = %path.display(),
        loaded = sessions.len(),
        skipped = total - sessions.len(),
        "loaded sessions"
    );
    Ok(sessions)
}

/// Parses session documents one by one.
///
/// Documents that are not sessions at all (no `session_id`, not an object)
/// are skipped with a warning rather than failing the whole batch.
fn parse_sessions(documents: Vec<Value>) -> Vec<Session> {
    documents
        .into_iter()
        .enumerate()
        .filter_map(|(index, document)| {
            serde_json::from_value::<Session>(document)
                .inspect_err(|error| tracing::warn!(index, %error, "skipping session document"))
                .ok()
        })
        .collect()
}

/// Removes sessions recorded with the client's debug mode on.
pub fn exclude_debug_sessions(mut sessions: Vec<Session>) -> Vec<Session> {
    let total = sessions.len();
    sessions.retain(|session| !session.is_debug());
    tracing::info!(
        excluded = total - sessions.len(),
        kept = sessions.len(),
        "excluded debug sessions"
    );
    sessions
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sessions_file_shapes() {
        let list: SessionsFile = serde_json::from_value(json!([{"session_id": "a"}])).unwrap();
        let wrapped: SessionsFile =
            serde_json::from_value(json!({"sessions": [{"session_id": "a"}]})).unwrap();
        for file in [list, wrapped] {
            let (SessionsFile::List(documents) | SessionsFile::Wrapped { sessions: documents }) =
                file;
            assert_eq!(parse_sessions(documents).len(), 1);
        }
    }

    #[test]
    fn test_parse_sessions_skips_non_sessions() {
        let sessions = parse_sessions(vec![
            json!({"session_id": "a", "group": 1}),
            json!("not a session"),
            json!({"group": 2}),
            json!({"session_id": "b"}),
        ]);
        let ids = sessions
            .iter()
            .map(|session| session.session_id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_exclude_debug_sessions() {
        let sessions = parse_sessions(vec![
            json!({"session_id": "a", "debug_mode": true}),
            json!({"session_id": "b", "debug_mode": false}),
            json!({"session_id": "c"}),
        ]);
        let kept = exclude_debug_sessions(sessions);
        let ids = kept
            .iter()
            .map(|session| session.session_id().as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["b", "c"]);
    }
}
