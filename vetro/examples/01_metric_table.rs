use vetro::{MetricRequest, Resolution, Vetro};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // 1. Build a client from an API key in the environment.
    let api_key = std::env::var("VETRO_API_KEY")?;
    let client = Vetro::builder(api_key).build()?;

    // 2. Ask for the last 30 daily closes of one metric.
    let req = MetricRequest::new("market/price_usd_close", "BTC")
        .resolution(Resolution::OneDay)
        .limit(30);

    // 3. Reshape the response into a one-column table indexed by time.
    let table = client.fetch_metric_table(&req).await?;
    println!(
        "{} rows x {} cols: {:?}",
        table.height(),
        table.width(),
        table.columns()
    );
    for (ts, value) in table
        .index()
        .iter()
        .zip(table.column("price_usd_close").unwrap_or(&[]))
    {
        println!("{ts}  {value:?}");
    }

    Ok(())
}
