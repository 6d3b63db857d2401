use std::env;
use std::error::Error;

use knvectis::{
    demo_hunters, forest_engine, init_tracing, knowledge_demo, KnvectisConfig, ObjectRef,
};
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    let config = match env::args().nth(1) {
        Some(path) => KnvectisConfig::from_file(path)?,
        None => KnvectisConfig::default(),
    };
    init_tracing(&config.logging);

    let (forest, root) = knowledge_demo()?;
    let mut engine = forest_engine(&config)?;
    for hunter in demo_hunters() {
        engine.add_hunter(hunter);
    }

    let mode = config.traversal.to_traversal_mode()?;
    let start = ObjectRef::new(&forest, root).ok_or("demo root missing from forest")?;
    let mut hunt = engine.run(start, mode)?;
    for found in hunt.by_ref() {
        match found {
            Ok(found) => println!("{}", serde_json::to_string(&found.summary())?),
            Err(err) if err.is_fatal() => return Err(err.into()),
            Err(err) => warn!(error = %err, "hunter_failure_skipped"),
        }
    }

    let stats = hunt.stats();
    info!(
        visited = stats.visited,
        matches = stats.matches,
        failures = stats.failures,
        "demo_summary"
    );
    Ok(())
}
