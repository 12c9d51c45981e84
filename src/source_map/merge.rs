//! Composition of chained position maps.
//!
//! Each content transform that rewrites code produces a map from its output
//! back to its input. Merging that map (`newer`, gen→mid) into the map
//! accumulated so far (`older`, mid→orig) yields a single gen→orig map.

use super::{PositionMap, PositionMapBuilder};

/// Compose `older` and `newer`. An absent side is the identity element.
///
/// ```rust
/// use transpipe::source_map::{merge, PositionMap};
///
/// let map = PositionMap::new();
/// assert_eq!(merge(None, Some(map.clone())), Some(map.clone()));
/// assert_eq!(merge(Some(map.clone()), None), Some(map));
/// assert_eq!(merge(None, None), None);
/// ```
pub fn merge(older: Option<PositionMap>, newer: Option<PositionMap>) -> Option<PositionMap> {
    match (older, newer) {
        (None, newer) => newer,
        (older, None) => older,
        (Some(older), Some(newer)) => Some(merge_maps(&older, &newer)),
    }
}

/// Compose two present maps.
///
/// Every `newer` entry with an original position is looked up in `older`
/// (its original coordinate is a generated coordinate of `older`). Entries
/// `older` cannot attribute to a named source are dropped. Embedded source
/// content from both maps is carried over; on identical keys the `older`
/// content wins.
pub fn merge_maps(older: &PositionMap, newer: &PositionMap) -> PositionMap {
    let mut builder = match newer.file() {
        Some(file) => PositionMapBuilder::new().with_file(file),
        None => PositionMapBuilder::new(),
    };

    for mapping in newer.mappings() {
        let Some(original) = mapping.original else {
            continue;
        };
        let Some(resolved) =
            older.original_position_for(original.position.line, original.position.column)
        else {
            continue;
        };
        let Some(source) = resolved.source else {
            continue;
        };

        builder.add_mapping(
            mapping.generated,
            Some((source, super::Position::new(resolved.line, resolved.column))),
            resolved.name,
        );
    }

    for map in [newer, older] {
        for (source, content) in map.sources_with_content() {
            builder.set_source_content(source, content);
        }
    }

    builder.build()
}
