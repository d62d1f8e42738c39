//! Launch-configuration synthesis tests.

use crate::catalog::domain::{CatalogEntry, CatalogId, ExplicitLaunch, builtin_entries};
use crate::launch::{
    domain::{LaunchConfiguration, MANUAL_CONFIGURATION_COMMAND, SynthesisError},
    services::InstallDescriptorSynthesizer,
};
use rstest::{fixture, rstest};
use serde_json::json;
use std::collections::BTreeMap;

#[fixture]
fn synthesizer() -> InstallDescriptorSynthesizer {
    InstallDescriptorSynthesizer::default()
}

fn entry(id: &str) -> CatalogEntry {
    CatalogEntry::new(CatalogId::new(id).expect("valid id"), id)
}

fn no_env() -> BTreeMap<String, String> {
    BTreeMap::new()
}

#[rstest]
#[case("npm install mcp-weather", "npx", "mcp-weather")]
#[case("npm install @scope/server-notes", "npx", "@scope/server-notes")]
#[case("pip install mcp-server-time", "uvx", "mcp-server-time")]
#[case("pip install mcp-server-fetch", "uvx", "mcp-server-fetch")]
fn package_installs_run_through_the_ecosystem_runner(
    synthesizer: InstallDescriptorSynthesizer,
    #[case] descriptor: &str,
    #[case] runner: &str,
    #[case] package: &str,
) {
    let config = synthesizer
        .synthesize(&entry("pkg").with_install_command(descriptor), &no_env())
        .expect("synthesis should succeed");

    assert_eq!(config, LaunchConfiguration::new(runner, vec![package.to_owned()]));
}

#[rstest]
fn filesystem_server_produces_the_stdio_store_entry(synthesizer: InstallDescriptorSynthesizer) {
    let entry = CatalogEntry::new(
        CatalogId::new("filesystem-server").expect("valid id"),
        "Filesystem Server",
    )
    .with_install_command("npm install @modelcontextprotocol/server-filesystem");

    let config = synthesizer
        .synthesize(&entry, &no_env())
        .expect("synthesis should succeed");

    assert_eq!(
        config.to_store_value(),
        json!({
            "command": "npx",
            "args": ["@modelcontextprotocol/server-filesystem"],
            "type": "stdio"
        })
    );
}

#[rstest]
fn explicit_launch_wins_and_receives_substitution(synthesizer: InstallDescriptorSynthesizer) {
    let entry = entry("figma")
        .with_install_command("npm install ignored-package")
        .with_explicit_launch(ExplicitLaunch::new(
            "npx",
            ["-y".to_owned(), "figma-developer-mcp".to_owned(), "--figma-api-key=YOUR-KEY".to_owned()],
        ));
    let resolved = BTreeMap::from([("FIGMA_API_KEY".to_owned(), "fk".to_owned())]);

    let config = synthesizer
        .synthesize(&entry, &resolved)
        .expect("synthesis should succeed");

    assert_eq!(config.command(), "npx");
    assert_eq!(config.args(), ["-y", "figma-developer-mcp", "--figma-api-key=fk"]);
    assert_eq!(config.env().get("FIGMA_API_KEY").map(String::as_str), Some("fk"));
}

#[rstest]
#[case("docker run -i --rm mcp/postgres", "docker")]
#[case("podman run -i --rm mcp/postgres", "podman")]
fn container_commands_run_under_the_named_engine(
    synthesizer: InstallDescriptorSynthesizer,
    #[case] descriptor: &str,
    #[case] engine: &str,
) {
    let entry = entry("postgres").with_docker_command(descriptor);

    let config = synthesizer
        .synthesize(&entry, &no_env())
        .expect("synthesis should succeed");

    assert_eq!(config.command(), engine);
    assert_eq!(config.args(), ["run", "-i", "--rm", "mcp/postgres"]);
    assert!(config.env().is_empty());
}

#[rstest]
fn install_text_keeps_the_named_engine() {
    let synthesizer = InstallDescriptorSynthesizer::default().with_container_engine("docker");
    let entry = entry("postgres").with_install_command("podman run -i --rm ghcr.io/x/y");

    let config = synthesizer
        .synthesize(&entry, &no_env())
        .expect("synthesis should succeed");

    assert_eq!(config.command(), "podman");
    assert_eq!(config.args(), ["run", "-i", "--rm", "ghcr.io/x/y"]);
}

#[rstest]
fn configured_engine_stands_in_for_unknown_engine_tokens() {
    let synthesizer = InstallDescriptorSynthesizer::default().with_container_engine("podman");
    let entry = entry("postgres").with_docker_command("nerdctl run -i mcp/postgres");

    let config = synthesizer
        .synthesize(&entry, &no_env())
        .expect("synthesis should succeed");

    assert_eq!(config.command(), "podman");
    assert_eq!(config.args(), ["run", "-i", "mcp/postgres"]);
}

#[rstest]
fn unrecognised_descriptor_with_link_becomes_manual_sentinel(
    synthesizer: InstallDescriptorSynthesizer,
) {
    let entry = entry("custom")
        .with_install_command("git clone https://example.com/custom.git")
        .with_repository("https://example.com/custom");

    let config = synthesizer
        .synthesize(&entry, &no_env())
        .expect("sentinel expected");

    assert!(config.is_manual_sentinel());
    assert_eq!(config.command(), MANUAL_CONFIGURATION_COMMAND);
    assert_eq!(config.args(), ["https://example.com/custom"]);
}

#[rstest]
fn nothing_to_go_on_is_insufficient(synthesizer: InstallDescriptorSynthesizer) {
    let result = synthesizer.synthesize(&entry("bare"), &no_env());

    assert_eq!(
        result,
        Err(SynthesisError::InsufficientDescriptor(
            CatalogId::new("bare").expect("valid id")
        ))
    );
}

#[rstest]
fn install_form_without_package_is_unresolvable(synthesizer: InstallDescriptorSynthesizer) {
    let result = synthesizer.synthesize(
        &entry("broken")
            .with_install_command("npm install")
            .with_homepage("https://example.com"),
        &no_env(),
    );

    assert!(matches!(
        result,
        Err(SynthesisError::UnresolvableDescriptor { ref descriptor, .. }) if descriptor == "npm install"
    ));
}

#[rstest]
fn every_builtin_entry_synthesises(synthesizer: InstallDescriptorSynthesizer) {
    for entry in builtin_entries() {
        let config = synthesizer
            .synthesize(&entry, &no_env())
            .expect("built-in entries should synthesise");
        assert!(!config.is_manual_sentinel(), "{} fell back", entry.id());
    }
}

#[rstest]
fn synthesis_is_deterministic(synthesizer: InstallDescriptorSynthesizer) {
    let entry = entry("weather").with_install_command("npm install mcp-weather");
    let resolved = BTreeMap::from([("UNITS".to_owned(), "metric".to_owned())]);

    assert_eq!(
        synthesizer.synthesize(&entry, &resolved),
        synthesizer.synthesize(&entry, &resolved)
    );
}
