// ABOUTME: Change-entry records and the strict parser for the Plastic SCM wire format.
// ABOUTME: Parses lines shaped like `CH "/Content/Textures" DIR#br:/main;changeset:140`.

use crate::error::ParseError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// `ACTION "PATH" TYPE#METADATA`, single spaces, ASCII word tokens.
static CHANGE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([A-Za-z0-9_]+) "([^"]+)" ([A-Za-z0-9_]+)#(.+)$"#)
        .expect("change entry pattern is valid")
});

/// Action code classifying a change.
///
/// Variant order is the dispatch priority order; unrecognized codes sort last.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionCode {
    Added,
    Changed,
    Deleted,
    Renamed,
    Moved,
    /// Any code outside the recognized set. Kept in grouping data, never rendered.
    Other(String),
}

impl ActionCode {
    /// Recognized codes in dispatch priority order.
    pub const RECOGNIZED: [ActionCode; 5] = [
        ActionCode::Added,
        ActionCode::Changed,
        ActionCode::Deleted,
        ActionCode::Renamed,
        ActionCode::Moved,
    ];

    pub fn from_code(code: &str) -> Self {
        match code {
            "AD" => ActionCode::Added,
            "CH" => ActionCode::Changed,
            "DE" => ActionCode::Deleted,
            "RE" => ActionCode::Renamed,
            "MV" => ActionCode::Moved,
            other => ActionCode::Other(other.to_string()),
        }
    }

    /// The two-letter wire code.
    pub fn code(&self) -> &str {
        match self {
            ActionCode::Added => "AD",
            ActionCode::Changed => "CH",
            ActionCode::Deleted => "DE",
            ActionCode::Renamed => "RE",
            ActionCode::Moved => "MV",
            ActionCode::Other(code) => code,
        }
    }

    /// Human-readable label, `None` for unrecognized codes.
    pub fn label(&self) -> Option<&'static str> {
        match self {
            ActionCode::Added => Some("Added"),
            ActionCode::Changed => Some("Changed"),
            ActionCode::Deleted => Some("Deleted"),
            ActionCode::Renamed => Some("Renamed"),
            ActionCode::Moved => Some("Moved"),
            ActionCode::Other(_) => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, ActionCode::Other(_))
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Kind of object a change applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Dir,
    File,
    Other(String),
}

impl ObjectType {
    pub fn from_token(token: &str) -> Self {
        match token {
            "DIR" => ObjectType::Dir,
            "FILE" => ObjectType::File,
            other => ObjectType::Other(other.to_string()),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, ObjectType::Dir)
    }

    /// Folder glyph for directories, document glyph for everything else.
    pub fn glyph(&self) -> &'static str {
        if self.is_dir() {
            "📁"
        } else {
            "📝"
        }
    }
}

/// One parsed change entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub action: ActionCode,
    pub path: String,
    pub object_type: ObjectType,
    /// Everything after `#`, e.g. `br:/main;changeset:140@rep:X`.
    pub metadata: String,
}

impl ChangeRecord {
    /// Parse one raw change entry. No partial matches, no recovery.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let caps = CHANGE_ENTRY.captures(raw).ok_or_else(|| ParseError {
            line: raw.to_string(),
        })?;

        Ok(Self {
            action: ActionCode::from_code(&caps[1]),
            path: caps[2].to_string(),
            object_type: ObjectType::from_token(&caps[3]),
            metadata: caps[4].to_string(),
        })
    }
}

/// Parse every entry, logging and skipping the ones that fail.
pub fn parse_entries<I, S>(raw_entries: I) -> Vec<ChangeRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_entries
        .into_iter()
        .filter_map(|raw| match ChangeRecord::parse(raw.as_ref()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(entry = %e.line, "Could not parse change entry, skipping");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directory_change() {
        let record =
            ChangeRecord::parse(r#"CH "/Content/Textures" DIR#br:/main;changeset:140@rep:X"#)
                .unwrap();
        assert_eq!(record.action, ActionCode::Changed);
        assert_eq!(record.path, "/Content/Textures");
        assert_eq!(record.object_type, ObjectType::Dir);
        assert_eq!(record.metadata, "br:/main;changeset:140@rep:X");
    }

    #[test]
    fn test_parse_keeps_spaces_in_path() {
        let record = ChangeRecord::parse(r#"AD "/Content/My Level.umap" FILE#br:/main"#).unwrap();
        assert_eq!(record.path, "/Content/My Level.umap");
        assert_eq!(record.object_type, ObjectType::File);
    }

    #[test]
    fn test_parse_unknown_codes_are_preserved() {
        let record = ChangeRecord::parse(r#"ZZ "/a" LINK#x"#).unwrap();
        assert_eq!(record.action, ActionCode::Other("ZZ".to_string()));
        assert_eq!(record.object_type, ObjectType::Other("LINK".to_string()));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in [
            "garbage line",
            "",
            r#"CH "/a" DIR"#,
            r#"CH "/a" DIR#"#,
            r#"CH  "/a" DIR#meta"#,
            r#"CH "/a"  DIR#meta"#,
            r#"CH /a DIR#meta"#,
            r#"CH "" DIR#meta"#,
            r#"CH "/a"b" DIR#meta"#,
            r#"C-H "/a" DIR#meta"#,
            "CH \"/a\" DIR#meta\nmore",
        ] {
            let err = ChangeRecord::parse(raw).unwrap_err();
            assert_eq!(err.line, raw);
        }
    }

    #[test]
    fn test_parse_metadata_may_contain_hashes() {
        let record = ChangeRecord::parse(r#"MV "/b" FILE#a#b#c"#).unwrap();
        assert_eq!(record.metadata, "a#b#c");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = r#"DE "/old/file.txt" FILE#cs:9"#;
        assert_eq!(ChangeRecord::parse(raw), ChangeRecord::parse(raw));
    }

    #[test]
    fn test_parse_entries_skips_failures() {
        let records = parse_entries([
            r#"AD "/a" FILE#m"#,
            "garbage line",
            r#"CH "/b" DIR#m"#,
        ]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, "/a");
        assert_eq!(records[1].path, "/b");
    }

    #[test]
    fn test_action_code_round_trip() {
        for code in ["AD", "CH", "DE", "RE", "MV", "ZZ"] {
            assert_eq!(ActionCode::from_code(code).code(), code);
        }
        assert!(ActionCode::RECOGNIZED.iter().all(ActionCode::is_recognized));
        assert!(!ActionCode::from_code("ZZ").is_recognized());
    }

    #[test]
    fn test_action_code_priority_order() {
        let mut codes = vec![
            ActionCode::Other("AA".to_string()),
            ActionCode::Moved,
            ActionCode::Added,
            ActionCode::Deleted,
        ];
        codes.sort();
        assert_eq!(
            codes,
            vec![
                ActionCode::Added,
                ActionCode::Deleted,
                ActionCode::Moved,
                ActionCode::Other("AA".to_string()),
            ]
        );
    }

    #[test]
    fn test_object_type_glyph() {
        assert_eq!(ObjectType::Dir.glyph(), "📁");
        assert_eq!(ObjectType::File.glyph(), "📝");
        assert_eq!(ObjectType::Other("LINK".to_string()).glyph(), "📝");
    }
}
