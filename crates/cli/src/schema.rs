use declscope_api::Entity;

pub fn schema_json() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(Vec<Entity>);
    serde_json::to_string_pretty(&schema)
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", schema_json()?);
    Ok(())
}
