//! Flattened record tree with explicit end-of-children markers

use crate::core::{CheckError, DebugRecord, Result};

/// Forward-only cursor over a unit's records in document order
#[derive(Debug, Clone, Default)]
pub struct RecordStream {
    records: Vec<DebugRecord>,
    position: usize,
}

impl RecordStream {
    pub fn new(records: Vec<DebugRecord>) -> Self {
        Self {
            records,
            position: 0,
        }
    }

    /// Next record, or None once the stream is exhausted
    pub fn next_record(&mut self) -> Option<DebugRecord> {
        let record = self.records.get(self.position).cloned()?;
        self.position += 1;
        Some(record)
    }

    /// Consume the subtree of `record`, which must be the record just returned
    pub fn skip_children(&mut self, record: &DebugRecord) -> Result<()> {
        if !record.has_children() {
            return Ok(());
        }

        let mut depth = 1usize;
        while depth > 0 {
            match self.next_record() {
                Some(DebugRecord::EndOfChildren) => depth -= 1,
                Some(child) if child.has_children() => depth += 1,
                Some(_) => {}
                None => {
                    return Err(CheckError::TruncatedRecords {
                        context: format!("children of {}", record_kind(record)),
                    }
                    .into())
                }
            }
        }
        Ok(())
    }
}

fn record_kind(record: &DebugRecord) -> String {
    match record {
        DebugRecord::Subprogram(s) => format!(
            "subprogram {}",
            s.name.as_deref().unwrap_or("<anonymous>")
        ),
        DebugRecord::LexicalBlock(_) => "lexical block".to_string(),
        DebugRecord::Variable(v) => {
            format!("variable {}", v.name.as_deref().unwrap_or("<anonymous>"))
        }
        DebugRecord::Other { tag, .. } => tag.to_string(),
        DebugRecord::EndOfChildren => "end of children".to_string(),
    }
}
