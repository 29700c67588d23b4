use vetro::{BulkLayout, BulkRequest, BulkTable, Resolution, Vetro};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let api_key = std::env::var("VETRO_API_KEY")?;
    let client = Vetro::builder(api_key).build()?;

    // Walk a whole year in bounded windows and stitch the pages, then pivot
    // into one sub-table per asset.
    let req = BulkRequest::new("market/price_usd_close")
        .assets(["BTC", "ETH"])
        .since("2024-01-01")
        .until("2025-01-01")
        .resolution(Resolution::OneDay)
        .paginate(true);

    match client.fetch_bulk_table(&req, BulkLayout::ByAsset).await? {
        BulkTable::Grouped(tables) => {
            for (asset, table) in &tables {
                println!(
                    "{asset}: {} rows, columns {:?}",
                    table.height(),
                    table.columns()
                );
            }
        }
        BulkTable::Wide(_) => unreachable!("by-asset layout returns a mapping"),
    }

    Ok(())
}
