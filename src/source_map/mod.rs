//! Position maps tracing generated code back to its original sources.
//!
//! A [`PositionMap`] is the in-memory form of a v3 source map. Lines and
//! columns are 0-based throughout, matching the interchange format. Entries
//! are kept sorted by generated position so lookups can binary search.
//!
//! Maps produced by naive string-rewriting tools frequently carry unnamed
//! (`null`) sources; those are kept as `None` until
//! [`PositionMap::normalize_unnamed_sources`] assigns them a path.

pub mod builder;
pub mod merge;
pub mod vlq;

use crate::errors::SourceMapError;
use serde::{Deserialize, Serialize};

pub use builder::PositionMapBuilder;
pub use merge::{merge, merge_maps};

/// A 0-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Original side of a mapping, expressed as indices into the owning map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Original {
    pub source: u32,
    pub position: Position,
    pub name: Option<u32>,
}

/// A single mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    pub generated: Position,
    pub original: Option<Original>,
}

/// Result of resolving a generated position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalPosition<'a> {
    /// `None` when the mapping points at an unnamed source
    pub source: Option<&'a str>,
    pub line: u32,
    pub column: u32,
    pub name: Option<&'a str>,
}

/// Serialized v3 source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources: Vec<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

/// Mapping table from generated positions to original positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    file: Option<String>,
    sources: Vec<Option<String>>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    mappings: Vec<Mapping>,
}

impl PositionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(
        file: Option<String>,
        sources: Vec<Option<String>>,
        sources_content: Vec<Option<String>>,
        names: Vec<String>,
        mut mappings: Vec<Mapping>,
    ) -> Self {
        mappings.sort_by_key(|m| m.generated);
        Self {
            file,
            sources,
            sources_content,
            names,
            mappings,
        }
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn sources(&self) -> &[Option<String>] {
        &self.sources
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn mappings(&self) -> &[Mapping] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn source(&self, index: u32) -> Option<&str> {
        self.sources.get(index as usize)?.as_deref()
    }

    pub fn name(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    /// Resolve a generated position to its original position.
    ///
    /// Uses greatest-lower-bound matching restricted to the same generated
    /// line: the entry with the largest generated column not exceeding
    /// `column` wins. Returns `None` when the line has no such entry or the
    /// entry carries no original position.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition<'_>> {
        let needle = Position::new(line, column);
        let upper = self.mappings.partition_point(|m| m.generated <= needle);
        let mapping = self.mappings.get(upper.checked_sub(1)?)?;
        if mapping.generated.line != line {
            return None;
        }
        let original = mapping.original?;
        Some(OriginalPosition {
            source: self.source(original.source),
            line: original.position.line,
            column: original.position.column,
            name: original.name.and_then(|idx| self.name(idx)),
        })
    }

    /// Embedded content for `source`, if the map carries it.
    pub fn source_content_for(&self, source: &str) -> Option<&str> {
        self.sources
            .iter()
            .position(|s| s.as_deref() == Some(source))
            .and_then(|idx| self.sources_content.get(idx))
            .and_then(|content| content.as_deref())
    }

    /// Every named source that has embedded content.
    pub fn sources_with_content(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sources
            .iter()
            .zip(self.sources_content.iter())
            .filter_map(|(source, content)| Some((source.as_deref()?, content.as_deref()?)))
    }

    /// Replace every unnamed source with `path`.
    pub fn normalize_unnamed_sources(&mut self, path: &str) {
        for source in self.sources.iter_mut().filter(|s| s.is_none()) {
            *source = Some(path.to_string());
        }
    }

    pub fn has_unnamed_sources(&self) -> bool {
        self.sources.iter().any(Option::is_none)
    }

    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    pub fn to_json(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(&self.to_raw())?)
    }

    pub fn from_raw(raw: RawSourceMap) -> Result<Self, SourceMapError> {
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }

        let sources: Vec<Option<String>> = match raw.source_root.as_deref() {
            Some(root) if !root.is_empty() => raw
                .sources
                .into_iter()
                .map(|s| s.map(|s| join_source_root(root, &s)))
                .collect(),
            _ => raw.sources,
        };

        let mut sources_content = raw.sources_content.unwrap_or_default();
        sources_content.resize(sources.len(), None);

        let mappings = decode_mappings(&raw.mappings, sources.len(), raw.names.len())?;
        Ok(Self::from_parts(
            raw.file,
            sources,
            sources_content,
            raw.names,
            mappings,
        ))
    }

    pub fn to_raw(&self) -> RawSourceMap {
        let sources_content = self
            .sources_content
            .iter()
            .any(Option::is_some)
            .then(|| self.sources_content.clone());

        RawSourceMap {
            version: 3,
            file: self.file.clone(),
            source_root: None,
            sources: self.sources.clone(),
            sources_content,
            names: self.names.clone(),
            mappings: encode_mappings(&self.mappings),
        }
    }
}

fn join_source_root(root: &str, source: &str) -> String {
    if source.starts_with('/') || source.contains("://") {
        return source.to_string();
    }
    format!("{}/{}", root.trim_end_matches('/'), source)
}

fn checked_index(value: i64, len: usize, kind: &'static str) -> Result<u32, SourceMapError> {
    if value < 0 || value as usize >= len {
        return Err(SourceMapError::IndexOutOfRange { kind, index: value });
    }
    Ok(value as u32)
}

fn non_negative(value: i64, what: &'static str) -> Result<u32, SourceMapError> {
    u32::try_from(value).map_err(|_| SourceMapError::NegativeValue(what))
}

fn decode_mappings(
    encoded: &str,
    source_count: usize,
    name_count: usize,
) -> Result<Vec<Mapping>, SourceMapError> {
    let mut mappings = Vec::new();
    let mut source: i64 = 0;
    let mut original_line: i64 = 0;
    let mut original_column: i64 = 0;
    let mut name: i64 = 0;

    for (line, group) in encoded.split(';').enumerate() {
        let mut generated_column: i64 = 0;

        for segment in group.split(',').filter(|s| !s.is_empty()) {
            let fields = vlq::decode_segment(segment)?;
            if !matches!(fields.len(), 1 | 4 | 5) {
                return Err(SourceMapError::InvalidSegment(fields.len()));
            }

            generated_column += fields[0];
            let generated = Position::new(
                line as u32,
                non_negative(generated_column, "generated column")?,
            );

            let original = if fields.len() >= 4 {
                source += fields[1];
                original_line += fields[2];
                original_column += fields[3];
                let name_index = if fields.len() == 5 {
                    name += fields[4];
                    Some(checked_index(name, name_count, "name")?)
                } else {
                    None
                };
                Some(Original {
                    source: checked_index(source, source_count, "source")?,
                    position: Position::new(
                        non_negative(original_line, "original line")?,
                        non_negative(original_column, "original column")?,
                    ),
                    name: name_index,
                })
            } else {
                None
            };

            mappings.push(Mapping {
                generated,
                original,
            });
        }
    }

    Ok(mappings)
}

fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut out = String::new();
    let mut line = 0;
    let mut first_in_line = true;
    let mut previous_column: i64 = 0;
    let mut previous_source: i64 = 0;
    let mut previous_line: i64 = 0;
    let mut previous_original_column: i64 = 0;
    let mut previous_name: i64 = 0;

    for mapping in mappings {
        while line < mapping.generated.line {
            out.push(';');
            line += 1;
            previous_column = 0;
            first_in_line = true;
        }
        if !first_in_line {
            out.push(',');
        }
        first_in_line = false;

        let column = i64::from(mapping.generated.column);
        vlq::encode(column - previous_column, &mut out);
        previous_column = column;

        if let Some(original) = mapping.original {
            let source = i64::from(original.source);
            let original_line = i64::from(original.position.line);
            let original_column = i64::from(original.position.column);
            vlq::encode(source - previous_source, &mut out);
            vlq::encode(original_line - previous_line, &mut out);
            vlq::encode(original_column - previous_original_column, &mut out);
            previous_source = source;
            previous_line = original_line;
            previous_original_column = original_column;

            if let Some(name) = original.name {
                let name = i64::from(name);
                vlq::encode(name - previous_name, &mut out);
                previous_name = name;
            }
        }
    }

    out
}
