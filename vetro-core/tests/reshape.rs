use chrono::{DateTime, Utc};
use serde_json::json;

use vetro_core::{BulkTable, bulk_from_payload, bulk_to_table, single_series_to_table};
use vetro_types::{BulkLayout, BulkResponse, Payload, VetroError};

fn ts(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

fn bulk_response(value: serde_json::Value) -> BulkResponse {
    bulk_from_payload(&Payload::Json(value)).unwrap()
}

/// Two assets at t=100, one at t=200: the reference scenario.
fn two_asset_response() -> BulkResponse {
    bulk_response(json!({
        "data": [
            {"t": 100, "bulk": [{"a": "BTC", "v": 1.0}, {"a": "ETH", "v": 2.0}]},
            {"t": 200, "bulk": [{"a": "BTC", "v": 3.0}]},
        ]
    }))
}

#[test]
fn wide_layout_reference_scenario() {
    let table = match bulk_to_table(&two_asset_response(), BulkLayout::Wide).unwrap() {
        BulkTable::Wide(t) => t,
        BulkTable::Grouped(_) => panic!("wide layout produced a mapping"),
    };

    assert_eq!(table.index(), &[ts(100), ts(200)]);
    assert_eq!(table.columns(), &["BTC".to_string(), "ETH".to_string()]);
    assert_eq!(table.column("BTC").unwrap(), &[Some(1.0), Some(3.0)]);
    assert_eq!(table.column("ETH").unwrap(), &[Some(2.0), None]);
}

#[test]
fn by_asset_layout_reference_scenario() {
    let tables = bulk_to_table(&two_asset_response(), BulkLayout::ByAsset).unwrap();
    let tables = tables.as_grouped().unwrap();

    assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["BTC", "ETH"]);

    let btc = &tables["BTC"];
    assert_eq!(btc.index(), &[ts(100), ts(200)]);
    assert_eq!(btc.columns(), &["value".to_string()]);
    assert_eq!(btc.column("value").unwrap(), &[Some(1.0), Some(3.0)]);

    let eth = &tables["ETH"];
    assert_eq!(eth.index(), &[ts(100), ts(200)]);
    assert_eq!(eth.columns(), &["value".to_string()]);
    assert_eq!(eth.column("value").unwrap(), &[Some(2.0), None]);
}

#[test]
fn by_series_key_layout_mirrors_by_asset() {
    let tables = bulk_to_table(&two_asset_response(), BulkLayout::BySeriesKey).unwrap();
    let tables = tables.as_grouped().unwrap();

    assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["value"]);
    let table = &tables["value"];
    assert_eq!(table.columns(), &["BTC".to_string(), "ETH".to_string()]);
    assert_eq!(table.column("BTC").unwrap(), &[Some(1.0), Some(3.0)]);
    assert_eq!(table.column("ETH").unwrap(), &[Some(2.0), None]);
}

#[test]
fn wide_column_count_equals_distinct_pairs() {
    let response = bulk_response(json!({
        "data": [
            {"t": 100, "bulk": [
                {"a": "BTC", "c": "USD", "v": 1.0},
                {"a": "BTC", "c": "EUR", "v": 2.0},
                {"a": "ETH", "c": "USD", "v": 3.0},
            ]},
            {"t": 200, "bulk": [{"a": "BTC", "c": "USD", "v": 4.0}]},
        ]
    }));
    let table = bulk_to_table(&response, BulkLayout::Wide).unwrap();
    let table = table.as_wide().unwrap();

    assert_eq!(table.width(), 3);
    assert_eq!(
        table.columns(),
        &[
            "BTC_c_EUR".to_string(),
            "BTC_c_USD".to_string(),
            "ETH_c_USD".to_string(),
        ]
    );
}

#[test]
fn grouped_layouts_share_identical_column_sets() {
    let response = bulk_response(json!({
        "data": [
            {"t": 100, "bulk": [
                {"a": "BTC", "c": "USD", "v": 1.0},
                {"a": "ETH", "c": "EUR", "v": 2.0},
            ]},
        ]
    }));

    for layout in [BulkLayout::ByAsset, BulkLayout::BySeriesKey] {
        let tables = bulk_to_table(&response, layout).unwrap();
        let tables = tables.as_grouped().unwrap();
        let mut column_sets = tables.values().map(vetro_core::Table::columns);
        let first = column_sets.next().unwrap();
        for columns in column_sets {
            assert_eq!(columns, first, "{layout:?}");
        }
    }
}

#[test]
fn null_asset_uses_the_none_label() {
    let response = bulk_response(json!({
        "data": [
            {"t": 100, "bulk": [{"v": 1.0, "c": "USD"}, {"a": "BTC", "c": "USD", "v": 2.0}]},
        ]
    }));

    let tables = bulk_to_table(&response, BulkLayout::ByAsset).unwrap();
    let tables = tables.as_grouped().unwrap();
    assert_eq!(tables.keys().collect::<Vec<_>>(), vec!["BTC", "None"]);

    let tables = bulk_to_table(&response, BulkLayout::BySeriesKey).unwrap();
    let tables = tables.as_grouped().unwrap();
    assert_eq!(
        tables["c_USD"].columns(),
        &["BTC".to_string(), "None".to_string()]
    );
}

#[test]
fn wide_null_asset_names_columns_from_the_key_alone() {
    let response = bulk_response(json!({
        "data": [{"t": 100, "bulk": [{"v": 1.0, "c": "USD"}, {"v": 2.0}]}]
    }));
    let table = bulk_to_table(&response, BulkLayout::Wide).unwrap();
    let table = table.as_wide().unwrap();
    assert_eq!(table.columns(), &["c_USD".to_string(), "value".to_string()]);
}

#[test]
fn wide_duplicate_keys_resolve_last_processed_wins() {
    // Two distinct identities collapsing to the same derived column at the
    // same instant: not an error, the later-processed record is kept.
    let response = bulk_response(json!({
        "data": [{"t": 100, "bulk": [
            {"a": "BTC", "c": "USD", "v": 1.0},
            {"BTC": "c_USD", "v": 7.0},
        ]}]
    }));
    let table = bulk_to_table(&response, BulkLayout::Wide).unwrap();
    let table = table.as_wide().unwrap();

    assert_eq!(table.columns(), &["BTC_c_USD".to_string()]);
    assert_eq!(table.column("BTC_c_USD").unwrap(), &[Some(7.0)]);
}

#[test]
fn empty_data_yields_empty_table_or_mapping() {
    for value in [json!({"data": []}), json!({"status": "ok"})] {
        let response = bulk_response(value);

        let wide = bulk_to_table(&response, BulkLayout::Wide).unwrap();
        assert!(wide.as_wide().unwrap().is_empty());

        for layout in [BulkLayout::ByAsset, BulkLayout::BySeriesKey] {
            let grouped = bulk_to_table(&response, layout).unwrap();
            assert!(grouped.as_grouped().unwrap().is_empty());
        }
    }
}

#[test]
fn single_series_scalar_json_reference_scenario() {
    let payload = Payload::Json(json!([{"t": 100, "v": 5.0}, {"t": 200, "v": 6.0}]));
    let table = single_series_to_table(&payload, "market/price_usd_close").unwrap();

    assert_eq!(table.index(), &[ts(100), ts(200)]);
    assert_eq!(table.columns(), &["price_usd_close".to_string()]);
    assert_eq!(
        table.column("price_usd_close").unwrap(),
        &[Some(5.0), Some(6.0)]
    );
}

#[test]
fn single_series_path_without_separator_names_the_column_value() {
    let payload = Payload::Json(json!([{"t": 100, "v": 5.0}]));
    let table = single_series_to_table(&payload, "sopr").unwrap();
    assert_eq!(table.columns(), &["value".to_string()]);
}

#[test]
fn single_series_nested_json_takes_columns_from_o() {
    let payload = Payload::Json(json!([
        {"t": 100, "o": {"open": 1.0, "close": 2.0}},
        {"t": 200, "o": {"open": 3.0, "close": 4.0, "volume": 5.0}},
    ]));
    let table = single_series_to_table(&payload, "market/ohlc").unwrap();

    assert_eq!(table.index(), &[ts(100), ts(200)]);
    assert_eq!(
        table.columns(),
        &["close".to_string(), "open".to_string(), "volume".to_string()]
    );
    assert_eq!(table.column("volume").unwrap(), &[None, Some(5.0)]);
}

#[test]
fn single_series_null_values_are_missing_cells() {
    let payload = Payload::Json(json!([{"t": 100, "v": null}, {"t": 200, "v": 1.0}]));
    let table = single_series_to_table(&payload, "m/x").unwrap();
    assert_eq!(table.column("x").unwrap(), &[None, Some(1.0)]);
}

#[test]
fn single_series_empty_input_is_an_empty_table() {
    let table = single_series_to_table(&Payload::Json(json!([])), "m/x").unwrap();
    assert!(table.is_empty());
    let table = single_series_to_table(&Payload::Text(String::new()), "m/x").unwrap();
    assert!(table.is_empty());
}

#[test]
fn single_series_rejects_unrecognized_shapes() {
    for value in [
        json!({"t": 100}),
        json!([{"v": 5.0}]),
        json!([{"t": 100}]),
        json!([{"t": 100, "o": 3.0}]),
        json!([42]),
    ] {
        let err = single_series_to_table(&Payload::Json(value), "m/x").unwrap_err();
        assert!(matches!(err, VetroError::Format(_)));
    }
}

#[test]
fn csv_single_column_is_renamed_from_the_path() {
    let text = "t,v\n100,5.0\n200,6.0\n";
    let table = single_series_to_table(&Payload::Text(text.to_string()), "market/price_usd_close")
        .unwrap();

    assert_eq!(table.index(), &[ts(100), ts(200)]);
    assert_eq!(table.columns(), &["price_usd_close".to_string()]);
    assert_eq!(
        table.column("price_usd_close").unwrap(),
        &[Some(5.0), Some(6.0)]
    );
}

#[test]
fn csv_multi_column_keeps_the_export_headers() {
    let text = "timestamp,age_0d_1d,age_1d_1w\n100,0.5,0.3\n200,0.6,\n";
    let table = single_series_to_table(&Payload::Text(text.to_string()), "supply/hodl").unwrap();

    assert_eq!(
        table.columns(),
        &["age_0d_1d".to_string(), "age_1d_1w".to_string()]
    );
    assert_eq!(table.column("age_1d_1w").unwrap(), &[Some(0.3), None]);
}

#[test]
fn csv_accepts_date_strings_in_the_time_column() {
    let text = "t,v\n1970-01-02,1.0\n1970/01/03,2.0\n";
    let table = single_series_to_table(&Payload::Text(text.to_string()), "m/x").unwrap();
    assert_eq!(table.index(), &[ts(86_400), ts(2 * 86_400)]);
}

#[test]
fn csv_without_a_time_column_is_a_format_error() {
    let text = "a,b\n1,2\n";
    assert!(matches!(
        single_series_to_table(&Payload::Text(text.to_string()), "m/x").unwrap_err(),
        VetroError::Format(_)
    ));
}

#[test]
fn csv_non_numeric_cell_is_a_format_error() {
    let text = "t,v\n100,abc\n";
    let err = single_series_to_table(&Payload::Text(text.to_string()), "m/x").unwrap_err();
    match err {
        VetroError::Format(msg) => assert!(msg.contains("abc"), "{msg}"),
        other => panic!("expected a format error, got {other:?}"),
    }
}
