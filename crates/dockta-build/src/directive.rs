//! Structured Dockerfile instructions and their text rendering.
//!
//! The generator builds a `Vec<Directive>` in a fixed order and renders it
//! in a single pass, so ordering can be tested without matching on
//! formatted text.

use std::fmt;

/// Sentinel comment marking the start of the dockta-managed region.
pub const MARKER: &str = "# dockta";

/// A file copied into the image: `COPY <src> <dest>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPair {
    pub src: String,
    pub dest: String,
}

impl CopyPair {
    pub fn new(src: &str, dest: &str) -> Self {
        Self {
            src: src.to_owned(),
            dest: dest.to_owned(),
        }
    }

    /// Copy a project file to the same relative path in the image.
    pub fn same(path: &str) -> Self {
        Self::new(path, path)
    }
}

/// One Dockerfile instruction prior to rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Human-readable comment; may span several lines.
    Comment(String),
    From(String),
    User(String),
    /// Shell steps chained with `&&` in a single layer.
    Run(Vec<String>),
    /// `name = value` pairs set in one layer.
    Env(Vec<(String, String)>),
    Workdir(String),
    Copy(CopyPair),
    Cmd(String),
    /// The `# dockta` sentinel.
    Marker,
}

impl Directive {
    pub fn comment(text: &str) -> Self {
        Self::Comment(text.to_owned())
    }

    pub fn run(step: impl Into<String>) -> Self {
        Self::Run(vec![step.into()])
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comment(text) => {
                let lines: Vec<String> = text.lines().map(|l| format!("# {l}")).collect();
                write!(f, "{}", lines.join("\n"))
            }
            Self::From(image) => write!(f, "FROM {image}"),
            Self::User(user) => write!(f, "USER {user}"),
            Self::Run(steps) => write!(f, "RUN {}", steps.join(" \\\n && ")),
            Self::Env(pairs) => {
                let pairs: Vec<String> = pairs
                    .iter()
                    .map(|(key, value)| format!("{key}=\"{}\"", escape_env_value(value)))
                    .collect();
                write!(f, "ENV {}", pairs.join(" \\\n    "))
            }
            Self::Workdir(dir) => write!(f, "WORKDIR {dir}"),
            Self::Copy(pair) => write!(f, "COPY {} {}", pair.src, pair.dest),
            Self::Cmd(command) => write!(f, "CMD {command}"),
            Self::Marker => write!(f, "{MARKER}"),
        }
    }
}

/// Escape backslashes, then double quotes, so a value can sit inside
/// `"..."` in an `ENV` line.
pub fn escape_env_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render directives to Dockerfile text.
///
/// Each directive ends with a newline. A comment that is not the first
/// directive is preceded by a blank line, so without comments the output
/// has no blank lines at all.
pub fn render(directives: &[Directive]) -> String {
    let mut out = String::new();
    for (index, directive) in directives.iter().enumerate() {
        if index > 0 && directive.is_comment() {
            out.push('\n');
        }
        out.push_str(&directive.to_string());
        out.push('\n');
    }
    out
}
