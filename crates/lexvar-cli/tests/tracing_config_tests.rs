use super::*;
use std::io;
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn captured_output(format: LogFormat) -> String {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = build_subscriber(format, EnvFilter::new("info"), move || writer.clone());
    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(block = "decl", "renamed declaration");
        tracing::debug!("filtered out");
    });
    buffer.contents()
}

#[test]
fn test_text_format_uses_given_writer() {
    let output = captured_output(LogFormat::Text);
    assert!(output.contains("renamed declaration"), "{output}");
    assert!(!output.contains("filtered out"));
}

#[test]
fn test_json_format_uses_given_writer() {
    let output = captured_output(LogFormat::Json);
    let line = output.lines().next().unwrap();
    let event: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(event["fields"]["message"], "renamed declaration");
    assert_eq!(event["fields"]["block"], "decl");
}

#[test]
fn test_tree_format_uses_given_writer() {
    let output = captured_output(LogFormat::Tree);
    assert!(output.contains("renamed declaration"), "{output}");
}

#[test]
fn test_format_names() {
    assert_eq!(LogFormat::parse("TREE"), LogFormat::Tree);
    assert_eq!(LogFormat::parse("json"), LogFormat::Json);
    assert_eq!(LogFormat::parse("anything"), LogFormat::Text);
}
