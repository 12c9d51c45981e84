//! Turning a parse failure into a located, framed [`Diagnostic`].
//!
//! The failure position is reported against the code that was parsed. When a
//! position map is available the position is traced back to the original
//! source, whose text comes either from the map's embedded content or from
//! disk under the project root. If neither yields text, the frame falls back
//! to the generated code and is marked best-effort.

use super::code_frame::{self, FrameOptions};
use super::highlight::Dialect;
use super::{Diagnostic, DiagnosticKind, FrameLocation, FrameOrigin, Warning};
use crate::formatting::Painter;
use crate::parse::ParseFailure;
use crate::source_map::PositionMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

static POSITION_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\(.*\)$").unwrap());

/// Drop a trailing parenthesized suffix such as `(3:7)`.
pub fn clean_message(message: &str) -> String {
    POSITION_SUFFIX.replace(message, "").into_owned()
}

enum Resolved {
    Generated,
    Original {
        source: String,
        text: String,
        location: FrameLocation,
    },
    BestEffort {
        source: String,
    },
}

/// Lexically resolve `.` and `..` segments without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// `source` joined onto `root_dir`, or `None` when it escapes the root.
fn within_root(root_dir: &Path, source: &str) -> Option<PathBuf> {
    let root = normalize(root_dir);
    let joined = normalize(&root.join(source));
    let inside = joined.strip_prefix(&root).ok()?;
    if inside.components().any(|c| matches!(c, Component::ParentDir)) {
        return None;
    }
    Some(joined)
}

async fn read_existing(path: &Path) -> Option<String> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => tokio::fs::read_to_string(path).await.ok(),
        _ => None,
    }
}

async fn resolve(
    failure: &ParseFailure,
    map: Option<&PositionMap>,
    root_dir: &Path,
) -> Resolved {
    let Some(map) = map else {
        return Resolved::Generated;
    };
    let Some(original) = map.original_position_for(failure.line.saturating_sub(1), failure.column)
    else {
        return Resolved::Generated;
    };
    let Some(source) = original.source else {
        return Resolved::Generated;
    };

    let location = FrameLocation::new(original.line + 1, original.column + 1);
    if let Some(text) = map.source_content_for(source) {
        return Resolved::Original {
            source: source.to_string(),
            text: text.to_string(),
            location,
        };
    }

    let text = match within_root(root_dir, source) {
        Some(path) => read_existing(&path).await,
        None => {
            tracing::debug!(source, "original source lies outside the project root");
            None
        }
    };
    match text {
        Some(text) => Resolved::Original {
            source: source.to_string(),
            text,
            location,
        },
        None => {
            tracing::debug!(source, "original source not found, framing generated code");
            Resolved::BestEffort {
                source: source.to_string(),
            }
        }
    }
}

/// Build the parse diagnostic for `failure` in `code`.
pub async fn locate(
    failure: &ParseFailure,
    code: &str,
    map: Option<&PositionMap>,
    file_path: &Path,
    root_dir: &Path,
    options: &FrameOptions,
) -> Diagnostic {
    let frame_message = clean_message(&failure.message);
    let generated = FrameLocation::new(failure.line, failure.column + 1);

    let (origin, source, text, location, warnings) = match resolve(failure, map, root_dir).await {
        Resolved::Generated => (FrameOrigin::Generated, None, code.to_string(), generated, vec![]),
        Resolved::Original {
            source,
            text,
            location,
        } => (FrameOrigin::Original, Some(source), text, location, vec![]),
        Resolved::BestEffort { source } => (
            FrameOrigin::BestEffort,
            None,
            code.to_string(),
            generated,
            vec![Warning::OriginalSourceUnavailable { source }],
        ),
    };

    let dialect = Dialect::from_path(source.as_deref().map(Path::new).unwrap_or(file_path));
    let header = format!(
        "Failed to parse \"{}\"\nA loader may be needed to turn this kind of file into JavaScript.\n\n",
        file_path.display()
    );
    let notice = if origin == FrameOrigin::BestEffort {
        "The original file could not be located. The frame below points into transformed code and may not be accurate.\n\n"
    } else {
        ""
    };

    let plain_frame = code_frame::render(
        &text,
        location,
        Some(&frame_message),
        options,
        &Painter::plain(),
        None,
    );
    let painter = Painter::new(options.color.with_env_overrides());
    let painted_frame = code_frame::render(
        &text,
        location,
        Some(&frame_message),
        options,
        &painter,
        Some(dialect),
    );

    Diagnostic {
        kind: DiagnosticKind::Parse,
        message: format!("{}{}{}", header, notice, plain_frame),
        frame: Some(format!(
            "{}{}{}",
            painter.error(&header),
            painter.warning(notice),
            painted_frame
        )),
        location: Some(location),
        origin,
        source,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatting::ColorMode;
    use crate::source_map::{Position, PositionMapBuilder};
    use tempfile::TempDir;

    fn options() -> FrameOptions {
        FrameOptions {
            color: ColorMode::Never,
            ..FrameOptions::default()
        }
    }

    fn failure(line: u32, column: u32) -> ParseFailure {
        ParseFailure {
            message: "Unexpected token (2:4)".to_string(),
            line,
            column,
        }
    }

    fn map_to(source: &str, content: Option<&str>) -> PositionMap {
        let mut builder = PositionMapBuilder::new();
        builder.add_mapping(Position::new(1, 0), Some((source, Position::new(4, 2))), None);
        if let Some(content) = content {
            builder.set_source_content(source, content);
        }
        builder.build()
    }

    #[test]
    fn test_clean_message() {
        assert_eq!(clean_message("Unexpected token (2:4)"), "Unexpected token");
        assert_eq!(clean_message("Unexpected token"), "Unexpected token");
    }

    #[tokio::test]
    async fn test_no_map_frames_generated_code() {
        let code = "let a = 1;\nlet = 2;\n";
        let diagnostic = locate(
            &failure(2, 4),
            code,
            None,
            Path::new("src/a.js"),
            Path::new("/nonexistent"),
            &options(),
        )
        .await;

        assert_eq!(diagnostic.kind, DiagnosticKind::Parse);
        assert_eq!(diagnostic.origin, FrameOrigin::Generated);
        assert_eq!(diagnostic.location, Some(FrameLocation { line: 2, column: 5 }));
        assert!(diagnostic.message.contains("\"src/a.js\""));
        assert!(diagnostic.message.contains("> 2 | let = 2;"));
        assert!(diagnostic.message.contains("^ Unexpected token\n"));
        assert!(diagnostic.original_location_found());
    }

    #[tokio::test]
    async fn test_embedded_content_is_framed() {
        let original = "a\nb\nc\nd\n  ?? broken\nf";
        let map = map_to("src/a.ts", Some(original));
        let diagnostic = locate(
            &failure(2, 0),
            "x\ny\n",
            Some(&map),
            Path::new("src/a.ts"),
            Path::new("/nonexistent"),
            &options(),
        )
        .await;

        assert_eq!(diagnostic.origin, FrameOrigin::Original);
        assert_eq!(diagnostic.source.as_deref(), Some("src/a.ts"));
        assert_eq!(diagnostic.location, Some(FrameLocation { line: 5, column: 3 }));
        assert!(diagnostic.message.contains("> 5 |   ?? broken"));
        assert!(diagnostic.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_source_read_from_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/b.ts"), "1\n2\n3\n4\nfive\n").unwrap();
        let map = map_to("src/b.ts", None);

        let diagnostic = locate(
            &failure(2, 0),
            "x\ny\n",
            Some(&map),
            Path::new("src/b.ts"),
            dir.path(),
            &options(),
        )
        .await;

        assert_eq!(diagnostic.origin, FrameOrigin::Original);
        assert!(diagnostic.message.contains("> 5 | five"));
    }

    #[tokio::test]
    async fn test_missing_original_is_best_effort() {
        let map = map_to("src/gone.ts", None);
        let diagnostic = locate(
            &failure(2, 0),
            "x\ny\n",
            Some(&map),
            Path::new("src/gone.ts"),
            Path::new("/nonexistent"),
            &options(),
        )
        .await;

        assert_eq!(diagnostic.origin, FrameOrigin::BestEffort);
        assert!(!diagnostic.original_location_found());
        assert_eq!(diagnostic.location, Some(FrameLocation { line: 2, column: 1 }));
        assert!(diagnostic.message.contains("could not be located"));
        assert!(diagnostic.message.contains("> 2 | y"));
        assert_eq!(
            diagnostic.warnings,
            vec![Warning::OriginalSourceUnavailable {
                source: "src/gone.ts".into()
            }]
        );
    }

    #[test]
    fn test_within_root_rejects_escaping_sources() {
        let root = Path::new("/project");
        assert_eq!(
            within_root(root, "src/../src/a.ts"),
            Some(PathBuf::from("/project/src/a.ts"))
        );
        assert_eq!(
            within_root(root, "/project/lib/b.ts"),
            Some(PathBuf::from("/project/lib/b.ts"))
        );
        assert_eq!(within_root(root, "../secret.ts"), None);
        assert_eq!(within_root(root, "src/../../secret.ts"), None);
        assert_eq!(within_root(root, "/etc/passwd"), None);
        assert_eq!(within_root(Path::new("."), "../secret.ts"), None);
        assert_eq!(
            within_root(Path::new("."), "src/a.ts"),
            Some(PathBuf::from("src/a.ts"))
        );
    }

    #[tokio::test]
    async fn test_source_outside_root_is_not_read() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("project");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(dir.path().join("secret.ts"), "1\n2\n3\n4\nsecret\n").unwrap();
        let map = map_to("../secret.ts", None);

        let diagnostic = locate(
            &failure(2, 0),
            "x\ny\n",
            Some(&map),
            Path::new("src/a.ts"),
            &root,
            &options(),
        )
        .await;

        assert_eq!(diagnostic.origin, FrameOrigin::BestEffort);
        assert!(!diagnostic.message.contains("> 5 | secret"));
        assert!(diagnostic.message.contains("> 2 | y"));
    }

    #[tokio::test]
    async fn test_unmapped_position_frames_generated_code() {
        let map = map_to("src/a.ts", Some("orig"));
        // line 1 (0-based 0) has no mappings
        let diagnostic = locate(
            &failure(1, 3),
            "abcdef\n",
            Some(&map),
            Path::new("src/a.ts"),
            Path::new("/nonexistent"),
            &options(),
        )
        .await;
        assert_eq!(diagnostic.origin, FrameOrigin::Generated);
        assert_eq!(diagnostic.location, Some(FrameLocation { line: 1, column: 4 }));
    }
}
