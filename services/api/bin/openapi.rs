//! Writes the relay's OpenAPI document.
//!
//! Usage: `openapi [OUTPUT]`, defaulting to `openapi.json`.

use callrelay_api::router::ApiDoc;
use utoipa::OpenApi;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());

    std::fs::write(&output, ApiDoc::openapi().to_pretty_json()?)?;
    println!("OpenAPI document written to {}", output);
    Ok(())
}
