//! Incremental construction of [`PositionMap`]s.

use super::{Mapping, Original, Position, PositionMap};
use std::collections::HashMap;

/// Builder that interns sources and names while mappings are added.
///
/// # Example
///
/// ```rust
/// use transpipe::source_map::{Position, PositionMapBuilder};
///
/// let mut builder = PositionMapBuilder::new();
/// builder.add_mapping(Position::new(0, 4), Some(("src/a.ts", Position::new(0, 0))), None);
/// builder.set_source_content("src/a.ts", "let a = 1;");
/// let map = builder.build();
///
/// assert_eq!(map.original_position_for(0, 6).unwrap().source, Some("src/a.ts"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionMapBuilder {
    file: Option<String>,
    sources: Vec<Option<String>>,
    source_index: HashMap<String, u32>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
    name_index: HashMap<String, u32>,
    mappings: Vec<Mapping>,
}

impl PositionMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Intern `source`, returning its index.
    pub fn add_source(&mut self, source: &str) -> u32 {
        if let Some(&idx) = self.source_index.get(source) {
            return idx;
        }
        let idx = self.sources.len() as u32;
        self.sources.push(Some(source.to_string()));
        self.sources_content.push(None);
        self.source_index.insert(source.to_string(), idx);
        idx
    }

    fn add_name(&mut self, name: &str) -> u32 {
        if let Some(&idx) = self.name_index.get(name) {
            return idx;
        }
        let idx = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_index.insert(name.to_string(), idx);
        idx
    }

    /// Add a mapping. `original` is `None` for generated-only segments, in
    /// which case `name` is ignored.
    pub fn add_mapping(
        &mut self,
        generated: Position,
        original: Option<(&str, Position)>,
        name: Option<&str>,
    ) -> &mut Self {
        let original = match original {
            Some((source, position)) => {
                let source = self.add_source(source);
                let name = name.map(|n| self.add_name(n));
                Some(Original {
                    source,
                    position,
                    name,
                })
            }
            None => None,
        };
        self.mappings.push(Mapping {
            generated,
            original,
        });
        self
    }

    /// Embed the text of `source`, registering the source if needed.
    pub fn set_source_content(&mut self, source: &str, content: impl Into<String>) -> &mut Self {
        let idx = self.add_source(source) as usize;
        self.sources_content[idx] = Some(content.into());
        self
    }

    pub fn mapping_count(&self) -> usize {
        self.mappings.len()
    }

    pub fn build(self) -> PositionMap {
        PositionMap::from_parts(
            self.file,
            self.sources,
            self.sources_content,
            self.names,
            self.mappings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sources_and_names_are_interned() {
        let mut builder = PositionMapBuilder::new();
        builder
            .add_mapping(Position::new(0, 0), Some(("a.js", Position::new(0, 0))), Some("x"))
            .add_mapping(Position::new(0, 5), Some(("b.js", Position::new(3, 1))), Some("x"))
            .add_mapping(Position::new(1, 0), Some(("a.js", Position::new(1, 0))), None);
        let map = builder.build();

        assert_eq!(
            map.sources(),
            &[Some("a.js".to_string()), Some("b.js".to_string())]
        );
        assert_eq!(map.names(), &["x".to_string()]);
        assert_eq!(map.mappings()[2].original.unwrap().source, 0);
    }

    #[test]
    fn test_build_sorts_by_generated_position() {
        let mut builder = PositionMapBuilder::new();
        builder
            .add_mapping(Position::new(2, 0), Some(("a.js", Position::new(2, 0))), None)
            .add_mapping(Position::new(0, 9), Some(("a.js", Position::new(0, 9))), None)
            .add_mapping(Position::new(0, 1), Some(("a.js", Position::new(0, 1))), None);
        let map = builder.build();

        let generated: Vec<_> = map.mappings().iter().map(|m| m.generated).collect();
        assert_eq!(
            generated,
            vec![Position::new(0, 1), Position::new(0, 9), Position::new(2, 0)]
        );
    }

    #[test]
    fn test_source_content_without_mappings_is_kept() {
        let mut builder = PositionMapBuilder::new().with_file("out.js");
        builder.set_source_content("orphan.scss", "a { color: red }");
        let map = builder.build();

        assert_eq!(map.file(), Some("out.js"));
        assert_eq!(map.source_content_for("orphan.scss"), Some("a { color: red }"));
        assert!(map.is_empty());
    }
}
