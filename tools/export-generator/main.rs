use clap::Parser;
use flowform::extract::MASK_SENTINEL;
use rand::rngs::ThreadRng;
use rand::seq::IndexedRandom;
use rand::{Rng, rng};
use serde_json::{Value, json};
use std::fs;

/// A CLI tool to generate synthetic DaVinci exports for the converter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_export.json")]
    output: String,

    /// Number of flows to generate
    #[arg(long, default_value_t = 10)]
    flows: usize,

    /// Number of connector instances to generate
    #[arg(long, default_value_t = 8)]
    connectors: usize,

    /// Maximum number of nodes per flow
    #[arg(long, default_value_t = 12)]
    max_nodes: usize,

    /// Probability that a node points at a connector missing from the export
    #[arg(long, default_value_t = 0.1)]
    dangling: f64,
}

/// Display names are drawn from a small pool on purpose, so collisions are common.
const CONNECTOR_NAMES: &[(&str, &str)] = &[
    ("HTTP", "httpConnector"),
    ("Functions", "functionsConnector"),
    ("PingOne", "pingOneSSOConnector"),
    ("Error", "errorConnector"),
];
const FLOW_NAMES: &[&str] = &["Login", "Registration", "Password Reset", "MFA"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rng();

    if !(0.0..=1.0).contains(&cli.dangling) {
        eprintln!("Error: --dangling ({}) must be between 0 and 1", cli.dangling);
        std::process::exit(1);
    }

    println!(
        "Generating export ({} flows, {} connectors)...",
        cli.flows, cli.connectors
    );

    let connectors = generate_connectors(&mut rng, cli.connectors);
    let connector_ids: Vec<String> = connectors
        .iter()
        .filter_map(|c| c["id"].as_str().map(str::to_string))
        .collect();
    let flows: Vec<Value> = (0..cli.flows)
        .map(|i| generate_flow(&mut rng, i, &connector_ids, cli.max_nodes, cli.dangling))
        .collect();
    let flow_ids: Vec<String> = flows
        .iter()
        .filter_map(|f| f["flowId"].as_str().map(str::to_string))
        .collect();
    let variables = generate_variables(&mut rng);
    let applications = generate_applications(&mut rng, &flow_ids);

    let export = json!({
        "variables": variables,
        "connectors": connectors,
        "flows": flows,
        "applications": applications,
    });
    fs::write(&cli.output, serde_json::to_string_pretty(&export)?)?;

    println!("Successfully generated and saved export to '{}'", cli.output);
    Ok(())
}

fn hex_id(rng: &mut ThreadRng) -> String {
    format!("{:016x}", rng.random::<u64>())
}

fn generate_connectors(rng: &mut ThreadRng, count: usize) -> Vec<Value> {
    let connectors: Vec<Value> = (0..count)
        .map(|_| {
            let (name, connector_id) = *CONNECTOR_NAMES.choose(rng).unwrap_or(&CONNECTOR_NAMES[0]);
            let secret = if rng.random_bool(0.5) {
                MASK_SENTINEL.to_string()
            } else {
                hex_id(rng)
            };
            json!({
                "id": hex_id(rng),
                "name": name,
                "connectorId": connector_id,
                "properties": {
                    "clientId": {"type": "string", "value": hex_id(rng)},
                    "clientSecret": {"type": "string", "value": secret},
                    "baseUrl": {"type": "string", "value": "https://${tenant}.example.com"},
                    "timeout": {"type": "number", "value": rng.random_range(1..60)},
                }
            })
        })
        .collect();
    println!("-> Generated {} connector instance(s).", connectors.len());
    connectors
}

fn generate_flow(
    rng: &mut ThreadRng,
    index: usize,
    connector_ids: &[String],
    max_nodes: usize,
    dangling: f64,
) -> Value {
    let node_count = rng.random_range(1..=max_nodes.max(1));
    let nodes: Vec<Value> = (0..node_count)
        .map(|n| {
            let connection = if connector_ids.is_empty() || rng.random_bool(dangling) {
                hex_id(rng)
            } else {
                connector_ids[rng.random_range(0..connector_ids.len())].clone()
            };
            json!({
                "data": {
                    "id": format!("node{:03}", n),
                    "nodeType": "CONNECTION",
                    "connectionId": connection,
                    "capabilityName": "customHtmlMessage",
                    "properties": {"message": {"value": format!("Step {}", n)}}
                },
                "position": {"x": rng.random_range(0..1000), "y": rng.random_range(0..1000)}
            })
        })
        .collect();
    let edges: Vec<Value> = (1..node_count)
        .map(|n| {
            json!({"data": {
                "id": format!("edge{:03}", n),
                "source": format!("node{:03}", n - 1),
                "target": format!("node{:03}", n)
            }})
        })
        .collect();

    let name = FLOW_NAMES[index % FLOW_NAMES.len()];
    let mut flow = json!({
        "flowId": hex_id(rng),
        "name": name,
        "currentVersion": rng.random_range(1..20),
        "settings": {"logLevel": 2, "useCSP": rng.random_bool(0.5), "unsupportedKey": true},
        "graphData": {"elements": {"nodes": nodes, "edges": edges}}
    });
    // Some flows carry only one of the two enabled signals.
    let enabled = rng.random_bool(0.7);
    if rng.random_bool(0.8) {
        flow["flowStatus"] = json!(if enabled { "enabled" } else { "disabled" });
    }
    if rng.random_bool(0.5) {
        flow["enabled"] = json!(enabled);
    }
    flow
}

fn generate_variables(rng: &mut ThreadRng) -> Vec<Value> {
    let variables = vec![
        json!({
            "id": hex_id(rng),
            "name": "retries##SK##company",
            "context": "company",
            "dataType": "number",
            "mutable": true,
            "value": rng.random_range(0..5)
        }),
        json!({
            "id": hex_id(rng),
            "name": "apiToken##SK##company",
            "context": "company",
            "dataType": "secret",
            "mutable": false,
            "value": MASK_SENTINEL
        }),
    ];
    println!("-> Generated {} variable(s).", variables.len());
    variables
}

fn generate_applications(rng: &mut ThreadRng, flow_ids: &[String]) -> Vec<Value> {
    let policy_flows: Vec<Value> = flow_ids
        .iter()
        .take(2)
        .map(|id| json!({"flowId": id, "versionId": -1, "weight": 50}))
        .collect();
    let applications = vec![json!({
        "appId": hex_id(rng),
        "name": "Portal",
        "apiKey": {"enabled": true, "value": MASK_SENTINEL},
        "oauth": {
            "enabled": true,
            "values": {
                "clientSecret": MASK_SENTINEL,
                "redirectUris": ["https://portal.example.com/callback"],
                "allowedGrants": ["authorizationCode"]
            }
        },
        "policies": [{
            "policyId": hex_id(rng),
            "name": "Default",
            "status": "enabled",
            "policyFlows": policy_flows
        }]
    })];
    println!("-> Generated {} application(s).", applications.len());
    applications
}
