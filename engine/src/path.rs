//! Field paths for diagnostics.
//!
//! Paths render in the dotted form callers read in reports:
//! `axes.affect.readings[0].window_id`. Keys that would be ambiguous in that
//! form are bracket-quoted (`windows["w.1"].end`). The payload root renders
//! as `$`.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.into()));
        next
    }

    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(index));
        next
    }

    /// Convert a JSON Pointer (RFC 6901) into a field path.
    ///
    /// A pointer token such as `0` is ambiguous on its own, so the pointer is
    /// walked against `instance`: a token addressing an array becomes an
    /// index, anything else a key.
    pub fn from_pointer(pointer: &str, instance: &Value) -> Self {
        let mut path = Self::root();
        let mut current = Some(instance);

        for raw in pointer.split('/').skip(1) {
            let token = raw.replace("~1", "/").replace("~0", "~");
            match current {
                Some(Value::Array(items)) => match token.parse::<usize>() {
                    Ok(index) => {
                        current = items.get(index);
                        path.segments.push(Segment::Index(index));
                    }
                    Err(_) => {
                        current = None;
                        path.segments.push(Segment::Key(token));
                    }
                },
                Some(Value::Object(map)) => {
                    current = map.get(&token);
                    path.segments.push(Segment::Key(token));
                }
                _ => {
                    current = None;
                    path.segments.push(Segment::Key(token));
                }
            }
        }

        path
    }
}

fn needs_quoting(key: &str) -> bool {
    key.is_empty()
        || key
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"') || c.is_whitespace())
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Index(index) => write!(f, "[{index}]")?,
                Segment::Key(key) if needs_quoting(key) => write!(f, "[{key:?}]")?,
                Segment::Key(key) if i == 0 => f.write_str(key)?,
                Segment::Key(key) => write!(f, ".{key}")?,
            }
        }
        Ok(())
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
