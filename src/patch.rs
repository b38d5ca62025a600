//! Span-based source edits.
//!
//! Rewrites are recorded as `(start, end, text)` replacements against the
//! original program text and applied in one go, so everything outside the
//! rewritten spans (comments, formatting) is kept byte-for-byte.

use crate::diagnostics::{CompilerError, ERR_OVERLAPPING_EDITS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: u32,
    pub end: u32,
    pub text: String,
    seq: usize,
}

#[derive(Debug, Default, Clone)]
pub struct SourcePatch {
    edits: Vec<Edit>,
}

impl SourcePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, start: u32, end: u32, text: impl Into<String>) {
        let seq = self.edits.len();
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
            seq,
        });
    }

    pub fn insert(&mut self, pos: u32, text: impl Into<String>) {
        self.replace(pos, pos, text);
    }

    /// Apply every edit to `source`. Insertions at the same offset keep the
    /// order they were recorded in.
    pub fn apply(&self, source: &str) -> Result<String, CompilerError> {
        let mut ordered: Vec<&Edit> = self.edits.iter().collect();
        ordered.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)).then(a.seq.cmp(&b.seq)));

        let mut out = String::with_capacity(source.len());
        let mut cursor = 0usize;
        for edit in ordered {
            let (start, end) = (edit.start as usize, edit.end as usize);
            if start < cursor || end > source.len() || start > end {
                return Err(CompilerError::new(
                    ERR_OVERLAPPING_EDITS,
                    &format!("Edit {}..{} overlaps a previous edit", start, end),
                    "",
                    0,
                    0,
                ));
            }
            out.push_str(&source[cursor..start]);
            out.push_str(&edit.text);
            cursor = end;
        }
        out.push_str(&source[cursor..]);
        Ok(out)
    }
}
