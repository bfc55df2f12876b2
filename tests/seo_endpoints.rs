//! SEO endpoints served by a live server.

use std::sync::Arc;
use std::time::Duration;

use brightpane::{Shutdown, SiteConfig};
use tokio::net::TcpListener;

mod common;
use common::{knowledge, test_server, FixtureStore};

#[tokio::test]
async fn test_robots_and_sitemap_over_http() {
    let mut config = SiteConfig::default();
    config.site.base_url = "https://brightpane.example".to_string();
    config.site.service_areas = vec!["Bristol".to_string(), "Chew Magna".to_string()];
    config.seo.last_modified = Some("2026-10-19".to_string());

    let (_, server) = test_server(config, Arc::new(FixtureStore::new(knowledge())));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client
        .get(format!("http://{}/robots.txt", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let robots = res.text().await.unwrap();
    assert!(robots.contains("Disallow: /api/"));
    assert!(robots.contains("Sitemap: https://brightpane.example/sitemap.xml"));

    let res = client
        .get(format!("http://{}/sitemap.xml", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/xml"));
    let sitemap = res.text().await.unwrap();
    assert!(sitemap.starts_with("<?xml"));
    assert!(sitemap.contains("<loc>https://brightpane.example/</loc>"));
    assert!(sitemap.contains("<loc>https://brightpane.example/areas/chew-magna</loc>"));
    // Seven default pages plus two areas
    assert_eq!(sitemap.matches("<url>").count(), 9);
    assert_eq!(sitemap.matches("<lastmod>2026-10-19</lastmod>").count(), 9);

    let health: serde_json::Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    drop(client);
    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}
