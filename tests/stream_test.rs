//! Integration tests for the range-aware video route.

mod common;

use common::{patterned_bytes, TestHarness};

#[tokio::test]
async fn full_file_without_range() {
    let (h, addr) = TestHarness::with_server().await;
    let data = patterned_bytes(20_000);
    h.write_file("Alien/alien.mp4", &data);

    let resp = reqwest::get(format!("http://{addr}/video/Alien/alien.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let headers = resp.headers();
    assert_eq!(headers["content-type"], "video/mp4");
    assert_eq!(headers["accept-ranges"], "bytes");
    assert_eq!(headers["content-length"], "20000");
    assert!(headers.get("content-range").is_none());

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), data.as_slice());
}

#[tokio::test]
async fn open_ended_range() {
    let (h, addr) = TestHarness::with_server().await;
    let data = patterned_bytes(1000);
    h.write_file("clip.mp4", &data);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/__bare__/clip.mp4"))
        .header("Range", "bytes=100-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 100-999/1000");
    assert_eq!(resp.headers()["content-length"], "900");
    assert_eq!(resp.headers()["accept-ranges"], "bytes");

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.as_ref(), &data[100..]);
}

#[tokio::test]
async fn closed_range_spanning_several_chunks() {
    let (h, addr) = TestHarness::with_server().await;
    let data = patterned_bytes(50_000);
    h.write_file("Metropolis/metropolis.mkv", &data);

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/Metropolis/metropolis.mkv"))
        .header("Range", "bytes=1000-30999")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-type"], "video/x-matroska");
    assert_eq!(resp.headers()["content-range"], "bytes 1000-30999/50000");

    let body = resp.bytes().await.unwrap();
    assert_eq!(body.len(), 30_000);
    assert_eq!(body.as_ref(), &data[1000..31_000]);
}

#[tokio::test]
async fn end_beyond_file_is_clamped() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_file("clip.mp4", patterned_bytes(1000));

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/__bare__/clip.mp4"))
        .header("Range", "bytes=0-99999")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 206);
    assert_eq!(resp.headers()["content-range"], "bytes 0-999/1000");
    assert_eq!(resp.bytes().await.unwrap().len(), 1000);
}

#[tokio::test]
async fn malformed_range_serves_full_file() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_file("clip.mp4", patterned_bytes(1000));
    let client = reqwest::Client::new();

    for bad in ["bytes=abc-", "bytes=-200", "bytes=0-10,20-30", "lines=1-2"] {
        let resp = client
            .get(format!("http://{addr}/video/__bare__/clip.mp4"))
            .header("Range", bad)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "range {bad:?}");
        assert_eq!(resp.headers()["content-length"], "1000");
        assert_eq!(resp.bytes().await.unwrap().len(), 1000);
    }
}

#[tokio::test]
async fn start_past_end_is_416() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_file("clip.mp4", patterned_bytes(1000));

    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/video/__bare__/clip.mp4"))
        .header("Range", "bytes=1000-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
    assert_eq!(resp.headers()["content-range"], "bytes */1000");
    assert!(resp.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_file() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_file("empty.webm", b"");
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/video/__bare__/empty.webm"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()["content-length"], "0");
    assert_eq!(resp.headers()["content-type"], "video/webm");

    let resp = client
        .get(format!("http://{addr}/video/__bare__/empty.webm"))
        .header("Range", "bytes=0-")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 416);
}

#[tokio::test]
async fn missing_video_is_404() {
    let (_h, addr) = TestHarness::with_server().await;

    for url in ["video/__bare__/nope.mp4", "video/NoFolder/nope.mp4"] {
        let resp = reqwest::get(format!("http://{addr}/{url}")).await.unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(resp.text().await.unwrap(), "Video not found");
    }
}

#[tokio::test]
async fn traversal_is_rejected() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_file("clip.mp4", b"x");

    for url in ["video/__bare__/..%2Fclip.mp4", "video/.hidden/clip.mp4"] {
        let resp = reqwest::get(format!("http://{addr}/{url}")).await.unwrap();
        assert_eq!(resp.status(), 400, "{url}");
    }
}

#[tokio::test]
async fn file_removed_after_scan_is_404() {
    let (h, addr) = TestHarness::with_server().await;
    let path = h.write_file("gone.mp4", b"data");

    let catalog: Vec<serde_json::Value> = reqwest::get(format!("http://{addr}/api/movies"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(catalog.len(), 1);

    std::fs::remove_file(path).unwrap();
    let resp = reqwest::get(format!("http://{addr}/video/__bare__/gone.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn concurrent_ranges_of_same_file() {
    let (h, addr) = TestHarness::with_server().await;
    let data = patterned_bytes(100_000);
    h.write_file("shared.mp4", &data);
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..8u64 {
        let client = client.clone();
        let url = format!("http://{addr}/video/__bare__/shared.mp4");
        let start = i * 10_000;
        let end = start + 9_999;
        tasks.push(tokio::spawn(async move {
            let body = client
                .get(url)
                .header("Range", format!("bytes={start}-{end}"))
                .send()
                .await
                .unwrap()
                .bytes()
                .await
                .unwrap();
            (start as usize, body)
        }));
    }

    for task in tasks {
        let (start, body) = task.await.unwrap();
        assert_eq!(body.as_ref(), &data[start..start + 10_000]);
    }
}

#[cfg(target_os = "linux")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn client_disconnect_releases_file_handle() {
    use std::time::Duration;

    let (h, addr) = TestHarness::with_server().await;
    // Larger than loopback socket buffers so the stream cannot finish on its own.
    let path = h.write_file("big.mp4", vec![0u8; 32 * 1024 * 1024]);
    let path = path.canonicalize().unwrap();

    let open_handles = || {
        std::fs::read_dir("/proc/self/fd")
            .unwrap()
            .filter_map(|e| std::fs::read_link(e.ok()?.path()).ok())
            .filter(|target| *target == path)
            .count()
    };

    let mut resp = reqwest::get(format!("http://{addr}/video/__bare__/big.mp4"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.chunk().await.unwrap().is_some());
    assert_eq!(open_handles(), 1);
    drop(resp);

    let mut released = false;
    for _ in 0..100 {
        if open_handles() == 0 {
            released = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(released, "file handle still open after client disconnect");
}
