//! Concurrency test: parallel exchanges through the gateway stay independent.

use std::time::{Duration, Instant};

use serde_json::Value;

mod common;

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let backend = common::spawn_backend(common::echo_router()).await;
    let gateway = common::spawn_gateway(backend).await;

    let concurrency = 16;
    let requests_per_task = 20;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let base = gateway.url("/files");
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for n in 0..requests_per_task {
                let query = format!("owner=user{}&n={}", task, n);
                let req_start = Instant::now();
                let res = client
                    .get(format!("{}?{}", base, query))
                    .send()
                    .await
                    .expect("Gateway unreachable");
                assert!(res.status().is_success());

                let echoed: Value = res.json().await.unwrap();
                assert_eq!(echoed["query"], query, "response belongs to another request");
                latencies.push(req_start.elapsed());
            }
            latencies
        }));
    }

    let mut all_latencies: Vec<Duration> = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    assert_eq!(all_latencies.len(), total_requests);

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Gateway Load Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", total_requests as f64 / duration.as_secs_f64());
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("----------------------------\n");
}
