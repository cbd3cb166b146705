//! Print the HRM OpenAPI document as JSON.
//!
//! Usage:
//!   cargo run -p hrm-api --bin generate-openapi > openapi.json

use hrm_api::ApiDoc;

fn main() {
    match ApiDoc::to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI spec: {}", e);
            std::process::exit(1);
        }
    }
}
