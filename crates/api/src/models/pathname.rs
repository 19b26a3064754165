use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered path segments addressing one documented entity.
///
/// Every segment but the last keeps the punctuation that joins it to the next
/// one: `/` after directories, `.` for ordinary containment and `#` for
/// instance members of a class. Concatenating the segments therefore yields
/// the familiar namepath, e.g. `./dir/file.Class#method`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash, JsonSchema)]
#[serde(transparent)]
pub struct Pathname(Vec<String>);

impl Pathname {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Split a namepath string back into segments.
    ///
    /// A segment ends after `/`, or after a `.`/`#` that is not part of a
    /// leading `./` or `../`:
    /// `"../dir/file.Class#method"` → `["../", "dir/", "file.", "Class#", "method"]`.
    pub fn parse(namepath: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = namepath.chars().peekable();

        while let Some(c) = chars.next() {
            current.push(c);
            let boundary = match c {
                '/' => true,
                '.' | '#' => !matches!(chars.peek(), Some('.') | Some('/')),
                _ => false,
            };
            if boundary {
                segments.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        Self(segments)
    }

    /// Every segmentation `namepath` could have been built from.
    ///
    /// A file stem may itself contain dots (`index.d.ts` has the stem
    /// `index.d`), so the first dotted segments after the last directory can
    /// belong to one file segment. The plain [`parse`](Self::parse) comes
    /// first, then progressively longer merged stems.
    pub fn parse_alternatives(namepath: &str) -> Vec<Self> {
        let plain = Self::parse(namepath);
        let file_start = plain
            .0
            .iter()
            .rposition(|segment| segment.ends_with('/'))
            .map_or(0, |i| i + 1);

        let mut alternatives = vec![plain.clone()];
        let mut stem = String::new();
        for (offset, segment) in plain.0[file_start..].iter().enumerate() {
            if !segment.ends_with('.') {
                break;
            }
            stem.push_str(segment);
            let merged_until = file_start + offset + 1;
            if offset == 0 || merged_until == plain.0.len() {
                continue;
            }
            let mut segments = plain.0[..file_start].to_vec();
            segments.push(stem.clone());
            segments.extend_from_slice(&plain.0[merged_until..]);
            alternatives.push(Self(segments));
        }
        alternatives
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn into_segments(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Pathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            f.write_str(segment)?;
        }
        Ok(())
    }
}
