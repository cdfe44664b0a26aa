//! The line-oriented ACL document.
//!
//! The store is a human-editable text file. Every line is classified once on
//! parse and keeps its original text, so mutations that touch one row render
//! every other line byte-for-byte as it was read.

use ldap_acl_core::{AclEntry, Permission, PrincipalKind, ServerRecord};

use crate::error::{Result, StoreError};
use crate::traits::{RecordOutcome, UpsertOutcome};

/// Prefix of the single server-identity line.
pub const SERVER_PREFIX: &str = "Server:";

/// Placeholder written when the probe resolved no addresses or host name.
pub const UNRESOLVED: &str = "N/A";

/// Comment line that heads the server section.
pub const SERVER_BANNER: &str = "# --------- Server Information ---------";

const FILE_BANNER: [&str; 3] = [
    "# ======================================================",
    "# LDAP Configuration File",
    "# ======================================================",
];

const ACL_HEADER: [&str; 4] = [
    "# --------- Access Control List ---------",
    "# Columns: name,type,permission",
    "# type: U= user, G= group",
    "# permission: A = Admin, O = Operator",
];

/// A classified line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Blank(String),
    Comment(String),
    Server(String),
    Entry(Row),
    /// Anything else. Kept on entry-level mutations, dropped by a clear.
    Other(String),
}

impl Line {
    fn classify(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Line::Blank(raw.to_string())
        } else if is_comment(trimmed) {
            Line::Comment(raw.to_string())
        } else if is_server(trimmed) {
            Line::Server(raw.to_string())
        } else {
            match Row::parse(raw) {
                Some(row) => Line::Entry(row),
                None => Line::Other(raw.to_string()),
            }
        }
    }

    fn text(&self) -> &str {
        match self {
            Line::Blank(s) | Line::Comment(s) | Line::Server(s) | Line::Other(s) => s,
            Line::Entry(row) => &row.raw,
        }
    }
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#')
}

fn is_server(trimmed: &str) -> bool {
    trimmed.starts_with(SERVER_PREFIX)
}

/// A parsed `name,kind,permission[,extra...]` row.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Row {
    raw: String,
    fields: Vec<String>,
    kind: PrincipalKind,
    permission: Permission,
}

impl Row {
    fn parse(raw: &str) -> Option<Self> {
        let fields: Vec<String> = raw.split(',').map(str::to_string).collect();
        if fields.len() < 3 {
            return None;
        }
        let kind = fields[1].trim().parse().ok()?;
        let permission = fields[2].trim().parse().ok()?;
        Some(Self {
            raw: raw.to_string(),
            fields,
            kind,
            permission,
        })
    }

    fn name(&self) -> &str {
        &self.fields[0]
    }

    fn matches(&self, name: &str, kind: PrincipalKind) -> bool {
        self.kind == kind && self.name() == name
    }

    /// Rewrites only the permission column; trailing columns survive.
    fn set_permission(&mut self, permission: Permission) {
        self.permission = permission;
        self.fields[2] = permission.code().to_string();
        self.raw = self.fields.join(",");
    }

    fn to_entry(&self) -> AclEntry {
        AclEntry::new(self.name(), self.kind, self.permission)
    }
}

/// The whole store, as an ordered list of classified lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AclDocument {
    lines: Vec<Line>,
}

impl AclDocument {
    /// A fresh document: banner, server line, blank line, ACL header.
    pub fn with_server(record: &ServerRecord) -> Self {
        let mut lines: Vec<Line> = FILE_BANNER
            .iter()
            .map(|s| Line::Comment(s.to_string()))
            .collect();
        lines.push(Line::Blank(String::new()));
        lines.push(Line::Comment(SERVER_BANNER.to_string()));
        lines.push(Line::Server(render_server_line(record)));
        lines.push(Line::Blank(String::new()));
        lines.extend(ACL_HEADER.iter().map(|s| Line::Comment(s.to_string())));
        Self { lines }
    }

    /// Parses stored text. Never fails: unrecognised lines are kept as-is.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(Line::classify).collect(),
        }
    }

    /// Renders the document with a `\n` after every line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line.text());
            out.push('\n');
        }
        out
    }

    /// Iterates the raw text of every line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(Line::text)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Server header
    // ─────────────────────────────────────────────────────────────────────────

    /// Whether a `Server:` line is present at all.
    pub fn has_server_line(&self) -> bool {
        self.lines.iter().any(|l| matches!(l, Line::Server(_)))
    }

    /// The first `Server:` line, parsed. `None` if absent or unparsable.
    pub fn server_record(&self) -> Option<ServerRecord> {
        self.lines.iter().find_map(|l| match l {
            Line::Server(raw) => Some(parse_server_line(raw)),
            _ => None,
        })?
    }

    /// Sets the server line, replacing the first one in place.
    pub fn set_server(&mut self, record: &ServerRecord) -> RecordOutcome {
        let rendered = render_server_line(record);

        if let Some(line) = self.lines.iter_mut().find(|l| matches!(l, Line::Server(_))) {
            if line.text().trim() == rendered {
                return RecordOutcome::Unchanged;
            }
            *line = Line::Server(rendered);
            return RecordOutcome::Updated;
        }

        let at = self
            .lines
            .iter()
            .position(|l| matches!(l, Line::Comment(s) if s.trim() == SERVER_BANNER))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.lines.insert(at, Line::Server(rendered));
        RecordOutcome::Updated
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entries
    // ─────────────────────────────────────────────────────────────────────────

    /// First matching row's permission. Exact, case-sensitive name match.
    pub fn lookup(&self, name: &str, kind: PrincipalKind) -> Option<Permission> {
        self.rows().find(|r| r.matches(name, kind)).map(|r| r.permission)
    }

    /// Updates the first matching row in place, or appends a new one.
    pub fn upsert(&mut self, entry: &AclEntry) -> Result<UpsertOutcome> {
        validate_name(&entry.name)?;

        for line in &mut self.lines {
            if let Line::Entry(row) = line {
                if row.matches(&entry.name, entry.kind) {
                    if row.permission == entry.permission {
                        return Ok(UpsertOutcome::Unchanged);
                    }
                    let previous = row.permission;
                    row.set_permission(entry.permission);
                    return Ok(UpsertOutcome::Updated { previous });
                }
            }
        }

        match Line::classify(&entry.to_string()) {
            line @ Line::Entry(_) => self.lines.push(line),
            _ => return Err(StoreError::InvalidName(entry.name.clone())),
        }
        Ok(UpsertOutcome::Inserted)
    }

    /// Keeps blank, comment and server lines. Returns how many lines went.
    pub fn clear_entries(&mut self) -> usize {
        let before = self.lines.len();
        self.lines
            .retain(|l| matches!(l, Line::Blank(_) | Line::Comment(_) | Line::Server(_)));
        before - self.lines.len()
    }

    /// All recognised rows, in file order.
    pub fn entries(&self) -> Vec<AclEntry> {
        self.rows().map(Row::to_entry).collect()
    }

    fn rows(&self) -> impl Iterator<Item = &Row> {
        self.lines.iter().filter_map(|l| match l {
            Line::Entry(row) => Some(row),
            _ => None,
        })
    }
}

/// Names are a single column: no separators, no line breaks, and nothing
/// that would read back as a blank, comment or server line.
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || is_comment(trimmed)
        || is_server(trimmed)
        || name.contains([',', '\r', '\n'])
    {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// `Server: IPs=<a, b>, HostName=<host>`
pub fn render_server_line(record: &ServerRecord) -> String {
    let ips = if record.resolved_addresses.is_empty() {
        UNRESOLVED.to_string()
    } else {
        record.resolved_addresses.join(", ")
    };
    let host = if record.host_name.is_empty() {
        UNRESOLVED
    } else {
        record.host_name.as_str()
    };
    format!("{SERVER_PREFIX} IPs={ips}, HostName={host}")
}

/// Inverse of [`render_server_line`]. Accepts the legacy `HostMame=` key.
pub fn parse_server_line(raw: &str) -> Option<ServerRecord> {
    let rest = raw.trim().strip_prefix(SERVER_PREFIX)?.trim_start();
    let rest = rest.strip_prefix("IPs=")?;

    let host_at = rest.rfind("HostName=").or_else(|| rest.rfind("HostMame="));
    let (ips, host) = match host_at {
        Some(i) => (&rest[..i], rest[i + "HostName=".len()..].trim()),
        None => (rest, ""),
    };

    let resolved_addresses = ips
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty() && *a != UNRESOLVED)
        .map(str::to_string)
        .collect();
    let host_name = if host == UNRESOLVED { "" } else { host };

    Some(ServerRecord::new(resolved_addresses, host_name))
}
