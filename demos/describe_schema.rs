// Describe schema example for confdef
//
// Resolves the REST proxy schema from an optional properties file and prints
// every setting with its value and where it came from, then the Markdown
// reference for the schema.
//
// Run with: cargo run --example describe_schema [-- path/to/kafka-rest.properties]

use confdef::presets::kafka_rest::{self, KafkaRestConfig};
use confdef::{generate_docs, DocsConfig, Importance};

fn main() -> confdef::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let resolver = KafkaRestConfig::resolver()?.with_env_prefix(kafka_rest::ENV_PREFIX);
    let resolved = match std::env::args().nth(1) {
        Some(path) => resolver.resolve_file(path)?,
        None => resolver.resolve(&confdef::RawSettings::new())?,
    };
    let config = KafkaRestConfig::from_resolved(resolved)?;

    println!("{:<32} {:<8} {:<8} {:<12} VALUE", "NAME", "TYPE", "IMPORT.", "SOURCE");
    for row in config.describe() {
        println!(
            "{:<32} {:<8} {:<8} {:<12} {}",
            row.name,
            row.setting_type,
            row.importance,
            format!("{:?}", row.source),
            row.value
        );
    }

    if !config.unknown_keys().is_empty() {
        println!("\nIgnored unknown settings:");
        for (key, value) in config.unknown_keys().iter() {
            println!("  {key} = {value}");
        }
    }

    println!();
    println!(
        "{}",
        generate_docs(
            config.schema(),
            DocsConfig::new()
                .with_title("Kafka REST Proxy")
                .sort_by_importance()
                .min_importance(Importance::Medium),
        )
    );

    Ok(())
}
