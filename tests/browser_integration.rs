//! End-to-end integration test driving a real Chrome instance through the
//! full Outline Builder -> Reducer -> Differ -> Action Resolver chain
//! (spec §8 scenarios S1-S3).
//!
//! Requires Chrome/Chromium installed. Run with:
//!   cargo test --test browser_integration -- --nocapture

use outline_agent::browser::{resolver, BrowserSession};
use outline_agent::config::BrowseConfig;
use outline_agent::outline::RoleTable;

fn test_config() -> BrowseConfig {
    let mut cfg = BrowseConfig::resolve().expect("default config should resolve");
    cfg.headless = true;
    cfg
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn navigate_and_read_outline_example_com() {
    let cfg = test_config();
    let session = match BrowserSession::launch(&cfg).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping: could not launch Chrome ({e})");
            return;
        }
    };

    session.navigate("https://example.com").await.expect("navigate should succeed");

    let roles = RoleTable::default();
    let (outline, handles) = session.take_outline(&roles).await.expect("outline should build");

    assert!(outline.contains("heading") || outline.contains("link"), "outline should contain page content:\n{outline}");
    assert!(!handles.is_empty(), "example.com should expose at least one referenceable element");

    let url = session.current_url().await.expect("current_url should succeed");
    assert!(url.contains("example.com"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn click_resolves_a_known_reference_and_moves_the_viewport() {
    let cfg = test_config();
    let session = match BrowserSession::launch(&cfg).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping: could not launch Chrome ({e})");
            return;
        }
    };

    session.navigate("https://example.com").await.expect("navigate should succeed");
    let roles = RoleTable::default();
    let (_outline, handles) = session.take_outline(&roles).await.expect("outline should build");

    let Some(reference) = handles.known_refs().next() else {
        eprintln!("Skipping: no referenceable elements on example.com");
        return;
    };

    let point = resolver::click(session.page(), &handles, &reference).await.expect("click should resolve a real element");
    assert!(point.x >= 0.0 && point.y >= 0.0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unknown_reference_surfaces_as_unknown_ref_error() {
    let cfg = test_config();
    let session = match BrowserSession::launch(&cfg).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Skipping: could not launch Chrome ({e})");
            return;
        }
    };

    session.navigate("https://example.com").await.expect("navigate should succeed");
    let roles = RoleTable::default();
    let (_outline, handles) = session.take_outline(&roles).await.expect("outline should build");

    let err = resolver::click(session.page(), &handles, "e99999").await.expect_err("a reference nothing produced should fail");
    assert!(matches!(err, outline_agent::error::AgentError::UnknownRef(_)));
}
