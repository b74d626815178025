mod fixture;

use fixture::gemm_database;
use pretty_assertions::assert_eq;
use tunedb::DefaultsAggregator;
use tunedb::config::{TuneDbConfig, defaults::DefaultsStrategy};

// The global configuration can only be set once per process, so everything touching it
// lives in this single test.
#[test_log::test]
fn aggregator_uses_global_configuration() {
    let mut config = TuneDbConfig::default();
    config.defaults.strategy = DefaultsStrategy::SmallestBest;
    config.defaults.sentinels.device_type = "Any".to_string();
    TuneDbConfig::set(config);

    let aggregator = DefaultsAggregator::new();
    let defaults = aggregator.compute_configured(&gemm_database()).unwrap();
    let smallest = aggregator.compute(&gemm_database(), false).unwrap();

    assert_eq!(defaults, smallest);
    assert_eq!(TuneDbConfig::get().defaults.strategy, DefaultsStrategy::SmallestBest);
    assert!(defaults.tier2.iter().all(|record| record.device_type == "Any"));

    let path = std::env::temp_dir().join(format!("tunedb-{}.toml", std::process::id()));
    TuneDbConfig::save_default(&path).unwrap();
    let saved = TuneDbConfig::from_file_path(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(saved.defaults.strategy, DefaultsStrategy::SmallestBest);
    assert_eq!(saved.defaults.sentinels.device_type, "Any");
}
