use crate::output::{Output, OutputFormat};
use color_eyre::eyre::Result;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use serde_json::json;
use watchlist_models::Platform;
use watchlist_sites::descriptor_for;

pub fn run_platforms(output: &Output) -> Result<()> {
    match output.format() {
        OutputFormat::Human => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_header(vec!["Platform", "Name", "Domains", "Watchlist URL"]);
            for platform in Platform::ALL {
                let descriptor = descriptor_for(platform);
                table.add_row(vec![
                    platform.display_name().to_string(),
                    platform.slug().to_string(),
                    descriptor.domains.join(", "),
                    descriptor.watchlist_url.to_string(),
                ]);
            }
            output.info(table.to_string());
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let platforms: Vec<_> = Platform::ALL
                .iter()
                .map(|platform| {
                    json!({
                        "name": platform.slug(),
                        "display_name": platform.display_name(),
                        "domains": descriptor_for(*platform).domains,
                        "watchlist_url": descriptor_for(*platform).watchlist_url,
                    })
                })
                .collect();
            output.json(&serde_json::Value::Array(platforms));
        }
    }
    Ok(())
}
