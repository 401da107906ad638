//! Scrapes racing the writer must only ever see whole commits.

use prometheus::core::Collector;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use udco2s_exporter::{SampleStore, SensorCollector, SensorSample};

/// Every committed sample satisfies these relations, so a reader can tell a
/// torn mix of two commits from a real one.
fn sample_for(i: u32) -> SensorSample {
    SensorSample {
        co2_ppm: i,
        humidity_pct: f64::from(i) + 0.5,
        temperature_c: f64::from(i) * 2.0 + 0.25,
        last_success_epoch: i64::from(i) + 1_700_000_000,
    }
}

fn is_whole(sample: &SensorSample) -> bool {
    *sample == SensorSample::default() || *sample == sample_for(sample.co2_ppm)
}

#[test]
fn readers_never_observe_torn_samples() {
    let store = Arc::new(SampleStore::new());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 1..=50_000 {
                store.commit(sample_for(i));
            }
            done.store(true, Ordering::Release);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0u64;
                let mut last_co2 = 0;
                while !done.load(Ordering::Acquire) {
                    let sample = store.sample();
                    assert!(is_whole(&sample), "torn read: {sample:?}");
                    assert!(sample.co2_ppm >= last_co2, "sample went backwards");
                    last_co2 = sample.co2_ppm;
                    observed += 1;
                }
                observed
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(store.sample(), sample_for(50_000));
}

#[test]
fn collector_scrapes_are_consistent_during_updates() {
    let store = Arc::new(SampleStore::new());
    let collector = SensorCollector::new(Arc::clone(&store)).unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            for i in 1..=20_000 {
                store.commit(sample_for(i));
            }
            done.store(true, Ordering::Release);
        })
    };

    let gauge = |families: &[prometheus::proto::MetricFamily], name: &str| {
        families
            .iter()
            .find(|f| f.get_name() == name)
            .map(|f| f.get_metric()[0].get_gauge().get_value())
            .unwrap()
    };

    while !done.load(Ordering::Acquire) {
        let families = collector.collect();
        let observed = SensorSample {
            co2_ppm: gauge(&families, "CO2") as u32,
            humidity_pct: gauge(&families, "HUM"),
            temperature_c: gauge(&families, "TEMP"),
            last_success_epoch: gauge(&families, "last") as i64,
        };
        assert!(is_whole(&observed), "torn scrape: {observed:?}");
    }
    writer.join().unwrap();
}
