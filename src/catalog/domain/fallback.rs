//! Built-in catalogue used when no source can be read and nothing is cached.

use super::{CatalogEntry, CatalogId, Requirements};

const SERVERS_REPOSITORY: &str = "https://github.com/modelcontextprotocol/servers";
const SERVERS_TREE: &str = "https://github.com/modelcontextprotocol/servers/tree/main/src";

struct FallbackSpec {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    version: &'static str,
    author: &'static str,
    path: &'static str,
    category: &'static str,
    tags: &'static [&'static str],
    install_command: &'static str,
    node: Option<&'static str>,
    python: Option<&'static str>,
}

const FALLBACK_SERVERS: &[FallbackSpec] = &[
    FallbackSpec {
        id: "filesystem-server",
        name: "Filesystem Server",
        description: "Access and manipulate files and directories on the local filesystem",
        version: "1.0.0",
        author: "MCP Team",
        path: "filesystem",
        category: "File System",
        tags: &["filesystem", "files", "directories"],
        install_command: "npm install @modelcontextprotocol/server-filesystem",
        node: Some(">=18.0.0"),
        python: None,
    },
    FallbackSpec {
        id: "github-server",
        name: "GitHub Server",
        description: "Interact with GitHub repositories, issues, and pull requests",
        version: "2.1.0",
        author: "GitHub",
        path: "github",
        category: "Development",
        tags: &["github", "git", "repositories", "issues"],
        install_command: "npm install @modelcontextprotocol/server-github",
        node: Some(">=16.0.0"),
        python: None,
    },
    FallbackSpec {
        id: "sqlite-server",
        name: "SQLite Server",
        description: "Query and manipulate SQLite databases",
        version: "1.2.3",
        author: "Database Team",
        path: "sqlite",
        category: "Database",
        tags: &["sqlite", "database", "sql", "query"],
        install_command: "npm install @modelcontextprotocol/server-sqlite",
        node: Some(">=18.0.0"),
        python: None,
    },
    FallbackSpec {
        id: "web-search-server",
        name: "Web Search Server",
        description: "Search the web using various search engines",
        version: "0.9.1",
        author: "Search Team",
        path: "web-search",
        category: "Search",
        tags: &["web", "search", "internet", "query"],
        install_command: "pip install mcp-server-web-search",
        node: None,
        python: Some(">=3.8"),
    },
    FallbackSpec {
        id: "docker-server",
        name: "Docker Server",
        description: "Manage Docker containers and images",
        version: "1.5.0",
        author: "DevOps Team",
        path: "docker",
        category: "DevOps",
        tags: &["docker", "containers", "images", "deployment"],
        install_command: "npm install @modelcontextprotocol/server-docker",
        node: Some(">=18.0.0"),
        python: None,
    },
    FallbackSpec {
        id: "calendar-server",
        name: "Calendar Server",
        description: "Access and manage calendar events and schedules",
        version: "2.0.0",
        author: "Productivity Team",
        path: "calendar",
        category: "Productivity",
        tags: &["calendar", "events", "scheduling", "time"],
        install_command: "pip install mcp-server-calendar",
        node: None,
        python: Some(">=3.9"),
    },
];

/// Returns the built-in fallback catalogue.
#[must_use]
pub fn builtin_entries() -> Vec<CatalogEntry> {
    FALLBACK_SERVERS.iter().filter_map(to_entry).collect()
}

fn to_entry(spec: &FallbackSpec) -> Option<CatalogEntry> {
    let id = CatalogId::new(spec.id).ok()?;
    let mut requirements = Requirements::new();
    if let Some(node) = spec.node {
        requirements = requirements.with_node(node);
    }
    if let Some(python) = spec.python {
        requirements = requirements.with_python(python);
    }

    Some(
        CatalogEntry::new(id, spec.name)
            .with_description(spec.description)
            .with_version(spec.version)
            .with_author(spec.author)
            .with_homepage(format!("{SERVERS_TREE}/{}", spec.path))
            .with_repository(SERVERS_REPOSITORY)
            .with_category(spec.category)
            .with_tags(spec.tags.iter().copied())
            .with_install_command(spec.install_command)
            .with_requirements(requirements),
    )
}
