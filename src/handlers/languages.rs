//! Languages handler: prints the supported-language listing.

use anyhow::Result;

use runbox::bridge::ExecutionBridge;
use runbox::config::Config;
use runbox::transport::HttpTransport;

pub async fn run(json: bool) -> Result<()> {
    let cfg = Config::load();
    let transport = HttpTransport::from_config(&cfg)?;
    let bridge = ExecutionBridge::new(transport);

    let langs = bridge.list_languages().await;
    if json {
        let entries: Vec<serde_json::Value> = langs
            .iter()
            .map(|l| {
                serde_json::json!({
                    "id": l.id,
                    "display_name": l.display_name,
                    "runtime": l.runtime_name,
                    "version": l.runtime_version,
                    "extension": l.file_extension,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for l in langs {
        println!(
            "{:<12} {:<12} {} {}",
            l.id, l.display_name, l.runtime_name, l.runtime_version
        );
    }
    Ok(())
}
