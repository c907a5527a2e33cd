use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Opt-in JSON-lines trace of a composite run: one event per line plus
/// saturating counters summarized at the end. Never on by default; enabled
/// through `Stamper::trace_log`.
#[derive(Clone)]
pub struct TraceLog {
    inner: Arc<Mutex<TraceState>>,
}

struct TraceState {
    writer: BufWriter<File>,
    counters: BTreeMap<String, u64>,
}

impl TraceLog {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(TraceState {
                writer: BufWriter::new(file),
                counters: BTreeMap::new(),
            })),
        })
    }

    pub(crate) fn event(&self, kind: &str, fields: &[(&str, String)]) {
        if let Ok(mut state) = self.inner.lock() {
            let mut json = format!("{{\"type\":\"{}\"", json_escape(kind));
            for (key, value) in fields {
                json.push_str(&format!(
                    ",\"{}\":\"{}\"",
                    json_escape(key),
                    json_escape(value)
                ));
            }
            json.push('}');
            let _ = writeln!(state.writer, "{json}");
        }
    }

    pub(crate) fn increment(&self, key: &str, amount: u64) {
        if let Ok(mut state) = self.inner.lock() {
            let entry = state.counters.entry(key.to_string()).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
    }

    pub(crate) fn emit_summary(&self, context: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let counters = std::mem::take(&mut state.counters);
            let mut counts = String::from("{");
            for (idx, (key, value)) in counters.iter().enumerate() {
                if idx > 0 {
                    counts.push(',');
                }
                counts.push_str(&format!("\"{}\":{}", json_escape(key), value));
            }
            counts.push('}');
            let _ = writeln!(
                state.writer,
                "{{\"type\":\"summary\",\"context\":\"{}\",\"counts\":{}}}",
                json_escape(context),
                counts
            );
        }
    }

    pub fn flush(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = state.writer.flush();
        }
    }
}

fn json_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_and_summary_are_json_lines() {
        let dir = std::env::temp_dir().join("stampwork-trace-test");
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("trace.jsonl");
        let log = TraceLog::new(&path).expect("create");
        log.event("field", &[("kind", "text".to_string())]);
        log.increment("pages.stamped", 3);
        log.increment("pages.stamped", 2);
        log.emit_summary("composite");
        log.flush();

        let body = std::fs::read_to_string(&path).expect("read");
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"type\":\"field\""));
        assert!(lines[1].contains("\"pages.stamped\":5"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn escape_handles_quotes_and_newlines() {
        assert_eq!(json_escape("a\"b\nc"), "a\\\"b\\nc");
    }
}
