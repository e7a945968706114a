use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};
use stackfall_engine::{Action, SessionConfig};

/// Pretty-prints `value` as JSON into `path`, or to stdout without one.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
{
    let (mut writer, target): (Box<dyn Write>, String) = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            (Box::new(BufWriter::new(file)), path.display().to_string())
        }
        None => (Box::new(io::stdout().lock()), "stdout".to_owned()),
    };

    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(writer))
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write JSON to {target}"))
}

fn read_json<T>(kind: &str, path: &Path) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {kind} file: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {kind} file: {}", path.display()))
}

/// Reads a session config from a JSON file. Missing keys take their defaults.
pub fn read_config_file(path: &Path) -> anyhow::Result<SessionConfig> {
    read_json("session config", path)
}

/// Reads an action script: single-character codes, whitespace ignored.
pub fn read_script_file(path: &Path) -> anyhow::Result<Vec<Action>> {
    let script = fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    Action::parse_script(&script)
        .with_context(|| format!("Failed to parse script file: {}", path.display()))
}
