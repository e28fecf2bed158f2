//! Concurrency behavior of the async path under load.

use std::net::SocketAddr;
use std::time::Duration;

use inventory_gateway::config::GatewayConfig;
use inventory_gateway::http::HttpServer;
use inventory_gateway::lifecycle::Shutdown;

mod common;

#[tokio::test]
async fn test_async_path_queues_under_concurrent_load() {
    let backend_addr: SocketAddr = "127.0.0.1:29581".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29582".parse().unwrap();

    common::start_programmable_inventory(backend_addr, move || async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        (200, "In stock: 3".to_string())
    })
    .await;

    let mut config = GatewayConfig::default();
    config.listener.bind_address = proxy_addr.to_string();
    config.inventory.base_url = format!("http://{}/api/inventory", backend_addr);
    // A small pool and a queue wide enough for the whole burst: slots
    // queue rather than reject, and a generous limit keeps waiting
    // requests from timing out.
    config.worker_pool.size = 3;
    config.worker_pool.queue_capacity = 64;
    config.time_limiter.duration_ms = 5000;

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let listener = tokio::net::TcpListener::bind(proxy_addr).await.unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(300)).await;

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let mut tasks = Vec::new();
    for n in 0..30 {
        let client = client.clone();
        let url = format!("http://{}/api/products/p{}/async", proxy_addr, n);
        tasks.push(tokio::spawn(async move {
            client.get(&url).send().await.unwrap().text().await.unwrap()
        }));
    }

    for task in tasks {
        let body = task.await.unwrap();
        assert_eq!(body, "In stock: 3", "every queued call must succeed");
    }

    shutdown.trigger();
}
