use rowforge_core::SchemaArtifact;
use schemars::schema_for;

fn main() {
    let schema = schema_for!(SchemaArtifact);
    match serde_json::to_string_pretty(&schema) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize json schema: {err}"),
    }
}
