use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use shardbox_partition::{
    partition, read_combined, write_shards, CombinedDataset, MonthKey, PartitionError,
};
use std::io::Write;
use std::path::Path;

fn dataset(details: Vec<Value>) -> CombinedDataset {
    CombinedDataset {
        details,
        summary: json!({ "total_amount": 1234.5 })
            .as_object()
            .unwrap()
            .clone(),
        extra: Map::new(),
    }
}

fn source() -> &'static Path {
    Path::new("data/combined-2025.json.gz")
}

#[test]
fn groups_records_by_calendar_month() {
    let result = partition(
        &dataset(vec![
            json!({ "id": 1, "date": "2024-03-15" }),
            json!({ "id": 2, "date": "2024-03-01" }),
            json!({ "id": 3, "date": "2024-04-02" }),
        ]),
        source(),
    );

    assert_eq!(result.shards.len(), 2);
    assert_eq!(result.skipped, 0);

    let march = &result.shards[&MonthKey {
        year: 2024,
        month: 3,
    }];
    assert_eq!(march.total_records, 2);

    let april = &result.shards[&MonthKey {
        year: 2024,
        month: 4,
    }];
    assert_eq!(april.total_records, 1);
}

#[test]
fn partition_is_complete_and_disjoint() {
    // Ten resolvable records plus two unresolvable ones
    let mut details: Vec<Value> = (1..=10)
        .map(|id| json!({ "id": id, "date": format!("2024-{:02}-10", (id % 3) + 1) }))
        .collect();
    details.push(json!({ "id": 11 }));
    details.push(json!({ "id": 12, "date": "March 15, 2024" }));

    let result = partition(&dataset(details), source());

    assert_eq!(result.skipped, 2);
    assert_eq!(result.total_records(), 10);

    // Every resolvable record lands in exactly one shard
    let mut seen: Vec<i64> = result
        .shards
        .values()
        .flat_map(|shard| shard.details.iter())
        .map(|record| record["id"].as_i64().unwrap())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (1..=10).collect::<Vec<_>>());
}

#[test]
fn shards_are_self_consistent() {
    let result = partition(
        &dataset(vec![
            json!({ "id": 1, "date": "2024-03-15" }),
            json!({ "id": 2, "invoice_date": "15.03.2024" }),
            json!({ "id": 3, "create_date": "2024-03-20 08:00:00" }),
            json!({ "id": 4, "date": "15/04/2024" }),
        ]),
        source(),
    );

    for (key, shard) in &result.shards {
        assert_eq!(shard.year, key.year);
        assert_eq!(shard.month, key.month);
        assert_eq!(shard.total_records, shard.details.len());
        assert_eq!(shard.metadata.record_count, shard.details.len());
        for record in &shard.details {
            let date = shardbox_partition::date::resolve(record).unwrap();
            assert_eq!(MonthKey::from(date), *key);
        }
    }
}

#[test]
fn record_order_is_preserved_within_a_group() {
    let result = partition(
        &dataset(vec![
            json!({ "id": 10, "date": "2024-03-31" }),
            json!({ "id": 20, "date": "2024-03-01" }),
            json!({ "id": 30, "date": "2024-03-15" }),
        ]),
        source(),
    );

    let march = &result.shards[&MonthKey {
        year: 2024,
        month: 3,
    }];
    let ids: Vec<i64> = march
        .details
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![10, 20, 30]);
}

#[test]
fn months_iterate_in_first_seen_order() {
    let result = partition(
        &dataset(vec![
            json!({ "id": 1, "date": "2024-06-01" }),
            json!({ "id": 2, "date": "2024-01-01" }),
            json!({ "id": 3, "date": "2024-06-02" }),
            json!({ "id": 4, "date": "2023-12-31" }),
        ]),
        source(),
    );

    let order: Vec<String> = result.shards.keys().map(|k| k.to_string()).collect();
    assert_eq!(order, vec!["2024-06", "2024-01", "2023-12"]);
}

#[test]
fn malformed_records_are_skipped_not_fatal() {
    let result = partition(
        &dataset(vec![
            json!({ "id": 1, "date": "2024-03-15" }),
            json!("not an object"),
            json!(42),
            json!({ "id": 2, "date": "2024-03-16" }),
        ]),
        source(),
    );

    assert_eq!(result.skipped, 2);
    assert_eq!(result.total_records(), 2);
}

#[test]
fn empty_details_yield_zero_shards() {
    let result = partition(&dataset(vec![]), source());
    assert!(result.shards.is_empty());
    assert_eq!(result.skipped, 0);
}

#[test]
fn summary_and_source_are_stamped_into_every_shard() {
    let result = partition(
        &dataset(vec![
            json!({ "id": 1, "date": "2024-03-15" }),
            json!({ "id": 2, "date": "2024-04-15" }),
        ]),
        source(),
    );

    for shard in result.shards.values() {
        assert_eq!(shard.summary["total_amount"], json!(1234.5));
        assert_eq!(shard.metadata.source, "data/combined-2025.json.gz");
    }
}

#[test]
fn write_then_read_shard_tree() {
    let dir = tempfile::tempdir().unwrap();
    let result = partition(
        &dataset(vec![
            json!({ "id": 1, "date": "2024-03-15" }),
            json!({ "id": 2, "date": "2024-03-16" }),
            json!({ "id": 3, "date": "2025-01-02" }),
        ]),
        source(),
    );

    let written = write_shards(&result.shards, dir.path()).unwrap();
    assert_eq!(written.len(), 2);
    assert!(dir.path().join("2024").join("03.json.gz").exists());
    assert!(dir.path().join("2025").join("01.json.gz").exists());

    // Shard files are valid gzip JSON with the invariants intact
    for shard_file in written {
        let file = std::fs::File::open(&shard_file.path).unwrap();
        let decoder = flate2::read::GzDecoder::new(file);
        let shard: shardbox_partition::MonthShard =
            serde_json::from_reader(decoder).unwrap();
        assert_eq!(shard.key(), shard_file.key);
        assert_eq!(shard.total_records, shard.details.len());
        assert!(shard_file.bytes > 0);
    }
}

#[test]
fn read_combined_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("combined.json.gz");

    let document = json!({
        "details": [
            { "id": 1, "date": "2024-03-15" },
            { "id": 2, "date": "2024-04-01" },
        ],
        "summary": { "total_amount": 99.0 },
        "exported_by": "erp-client",
    });
    let mut encoder = GzEncoder::new(
        std::fs::File::create(&path).unwrap(),
        Compression::default(),
    );
    encoder
        .write_all(document.to_string().as_bytes())
        .unwrap();
    encoder.finish().unwrap();

    let dataset = read_combined(&path).unwrap();
    assert_eq!(dataset.details.len(), 2);
    assert_eq!(dataset.summary["total_amount"], json!(99.0));
    assert_eq!(dataset.extra["exported_by"], json!("erp-client"));
}

#[test]
fn missing_input_is_fatal_with_a_clear_diagnostic() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json.gz");

    let result = read_combined(&missing);
    assert!(matches!(result, Err(PartitionError::InputMissing(_))));
}
