//! Install-descriptor text parsing.
//!
//! Parsing is tolerant: unknown flags are skipped, version suffixes are
//! dropped, and quoting is honoured only for grouping.

use serde::{Deserialize, Serialize};
use std::fmt;

const NODE_MANAGERS: &[&str] = &["npm", "pnpm", "yarn", "bun"];
const PYTHON_MANAGERS: &[&str] = &["pip", "pip3", "pipx", "uv", "poetry"];
const PYTHON_INTERPRETERS: &[&str] = &["python", "python3", "py"];
const PACKAGE_RUNNERS: &[&str] = &["npx", "pnpx", "bunx", "uvx"];
const CONTAINER_ENGINES: &[&str] = &["docker", "podman"];
const INSTALL_VERBS: &[&str] = &["install", "i", "add"];
const PYTHON_VERSION_MARKERS: &[char] = &['=', '<', '>', '!', '~', '[', ';'];

/// Package ecosystem detected from an install descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ecosystem {
    /// npm-compatible packages, run through the node package runner.
    Node,
    /// PyPI packages, run through the python package runner.
    Python,
}

impl Ecosystem {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Python => "python",
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Package identifier extracted from an install descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    /// Returns the package name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Canonical shape of an install descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedDescriptor {
    /// A package-manager install naming a package in an ecosystem.
    Parsed {
        /// Detected ecosystem.
        ecosystem: Ecosystem,
        /// Extracted package.
        package: PackageName,
    },
    /// A command that is already the run invocation.
    Explicit {
        /// Executable command.
        command: String,
        /// Arguments, verbatim.
        args: Vec<String>,
    },
    /// A container-engine `run` command.
    Container {
        /// Container engine executable.
        command: String,
        /// Everything after the engine token.
        args: Vec<String>,
    },
    /// A package-manager install form that names no extractable package.
    Unresolvable,
}

/// Returns whether `token` names a known container engine.
#[must_use]
pub fn is_container_engine(token: &str) -> bool {
    CONTAINER_ENGINES.contains(&token.to_ascii_lowercase().as_str())
}

/// Parses install-descriptor text.
///
/// Returns `None` when the text matches no known form.
#[must_use]
pub fn parse_install_text(text: &str) -> Option<ParsedDescriptor> {
    let tokens = split_command_line(text);
    let (first, rest) = tokens.split_first()?;
    let program = first.to_ascii_lowercase();

    if PACKAGE_RUNNERS.contains(&program.as_str()) {
        return Some(ParsedDescriptor::Explicit {
            command: first.clone(),
            args: rest.to_vec(),
        });
    }

    if CONTAINER_ENGINES.contains(&program.as_str()) {
        return parse_container(first, rest);
    }

    let ecosystem = detect_ecosystem(&program, rest)?;
    let verb_index = rest
        .iter()
        .position(|token| INSTALL_VERBS.contains(&token.to_ascii_lowercase().as_str()))?;
    let operands = rest.get(verb_index + 1..).unwrap_or_default();

    Some(
        extract_package(operands, ecosystem).map_or(ParsedDescriptor::Unresolvable, |package| {
            ParsedDescriptor::Parsed { ecosystem, package }
        }),
    )
}

/// Parses a dedicated container command such as `docker run -i image`.
///
/// Unlike [`parse_install_text`], any leading engine token is accepted so
/// that catalogues listing e.g. `docker compose run` still resolve.
#[must_use]
pub(crate) fn parse_container_text(text: &str) -> Option<ParsedDescriptor> {
    let tokens = split_command_line(text);
    let (first, rest) = tokens.split_first()?;
    if rest.is_empty() {
        return None;
    }
    Some(ParsedDescriptor::Container {
        command: first.clone(),
        args: rest.to_vec(),
    })
}

fn parse_container(engine: &str, rest: &[String]) -> Option<ParsedDescriptor> {
    let subcommand = rest.first()?;
    if !subcommand.eq_ignore_ascii_case("run") {
        return None;
    }
    Some(ParsedDescriptor::Container {
        command: engine.to_owned(),
        args: rest.to_vec(),
    })
}

fn detect_ecosystem(program: &str, rest: &[String]) -> Option<Ecosystem> {
    if NODE_MANAGERS.contains(&program) {
        return Some(Ecosystem::Node);
    }
    if PYTHON_MANAGERS.contains(&program) {
        return Some(Ecosystem::Python);
    }
    let runs_pip_module = rest
        .windows(2)
        .any(|pair| matches!(pair, [flag, module] if flag == "-m" && module.starts_with("pip")));
    (PYTHON_INTERPRETERS.contains(&program) && runs_pip_module).then_some(Ecosystem::Python)
}

/// Extracts the package from the operands following the install verb.
///
/// A scoped `@scope/name` operand wins; otherwise the last non-flag operand
/// is used.
fn extract_package(operands: &[String], ecosystem: Ecosystem) -> Option<PackageName> {
    let candidates: Vec<&str> = operands
        .iter()
        .map(String::as_str)
        .filter(|operand| !operand.starts_with('-'))
        .collect();

    let chosen = candidates
        .iter()
        .copied()
        .find_map(scoped_name)
        .or_else(|| {
            candidates
                .last()
                .map(|bare| strip_version(bare, ecosystem))
        })?;

    is_package_identifier(&chosen).then_some(PackageName(chosen))
}

fn scoped_name(operand: &str) -> Option<String> {
    let unscoped = operand.strip_prefix('@')?;
    let (scope, remainder) = unscoped.split_once('/')?;
    let name = remainder.split('@').next().unwrap_or_default();
    if scope.is_empty() || name.is_empty() {
        return None;
    }
    Some(format!("@{scope}/{name}"))
}

fn strip_version(operand: &str, ecosystem: Ecosystem) -> String {
    let without_version = match ecosystem {
        Ecosystem::Node => operand.split('@').next().unwrap_or_default(),
        Ecosystem::Python => operand
            .split(PYTHON_VERSION_MARKERS)
            .next()
            .unwrap_or_default(),
    };
    without_version.to_owned()
}

fn is_package_identifier(value: &str) -> bool {
    !value.is_empty()
        && value.chars().any(|character| character.is_ascii_alphanumeric())
        && value.chars().all(|character| {
            character.is_ascii_alphanumeric() || matches!(character, '-' | '_' | '.' | '@' | '/')
        })
}

/// Splits descriptor text on whitespace, keeping quoted groups together.
///
/// Quotes group but are not kept. An unterminated quote runs to the end of
/// the input.
#[must_use]
pub fn split_command_line(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes: Option<char> = None;

    for character in input.chars() {
        match (in_quotes, character) {
            (Some(quote_char), _) if character == quote_char => in_quotes = None,
            (Some(_), _) => current.push(character),
            (None, '"' | '\'') => in_quotes = Some(character),
            (None, _) if character.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (None, _) => current.push(character),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
