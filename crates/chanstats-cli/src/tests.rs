use super::*;

use std::path::Path;

use chanstats_core::{AppConfig, DateStyle, VideoRecord};
use chanstats_report::ReportOptions;
use chanstats_youtube::YoutubeClient;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn test_config(dir: &Path) -> AppConfig {
    AppConfig {
        youtube_api_key: Some("k".to_string()),
        channel_id: Some("UC1".to_string()),
        max_results: 20,
        retention_days: 5,
        dataset_path: dir.join("video_stats.csv"),
        report_path: dir.join("index.html"),
        report_title: "Daily".to_string(),
        report_timestamp: false,
        report_date_style: DateStyle::Iso,
        request_timeout_secs: 5,
        user_agent: "chanstats-test/0.1".to_string(),
        log_level: "info".to_string(),
    }
}

fn test_client(server: &MockServer) -> YoutubeClient {
    YoutubeClient::with_base_url("k", 5, "chanstats-test/0.1", &server.uri()).unwrap()
}

fn rec(views: u64, collected_at: NaiveDate) -> VideoRecord {
    VideoRecord {
        title: "A".to_string(),
        published_at: date(2024, 1, 1),
        view_count: views,
        like_count: 0,
        comment_count: 0,
        collected_at,
    }
}

#[test]
fn parses_collect_command() {
    let cli = Cli::try_parse_from(["chanstats", "collect"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Collect { dry_run: false })
    ));
}

#[test]
fn parses_collect_dry_run() {
    let cli = Cli::try_parse_from(["chanstats", "collect", "--dry-run"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Collect { dry_run: true })));
}

#[test]
fn parses_report_command() {
    let cli = Cli::try_parse_from(["chanstats", "report"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Report { stdout: false })));
}

#[test]
fn parses_report_stdout() {
    let cli = Cli::try_parse_from(["chanstats", "report", "--stdout"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Report { stdout: true })));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["chanstats"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn unknown_command_is_rejected() {
    assert!(Cli::try_parse_from(["chanstats", "serve"]).is_err());
}

async fn mount_channel_with_two_videos(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "contentDetails": { "relatedPlaylists": { "uploads": "UU1" } } }]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "contentDetails": { "videoId": "b" } },
                { "contentDetails": { "videoId": "a" } }
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {
                    "id": "a",
                    "snippet": { "title": "A", "publishedAt": "2024-01-07T09:00:00Z" },
                    "statistics": { "viewCount": "50", "likeCount": "5", "commentCount": "1" }
                },
                {
                    "id": "b",
                    "snippet": { "title": "B", "publishedAt": "2024-01-10T03:00:00Z" },
                    "statistics": { "viewCount": "10" }
                }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_snapshot_stamps_collection_date_in_playlist_order() {
    let server = MockServer::start().await;
    mount_channel_with_two_videos(&server).await;
    let client = test_client(&server);

    let today = date(2024, 1, 10);
    let records = collect::fetch_snapshot(&client, "UC1", 20, today).await.unwrap();

    let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["B", "A"]);
    assert!(records.iter().all(|r| r.collected_at == today));
    assert_eq!(records[0].like_count, 0);
}

#[tokio::test]
async fn run_collect_writes_snapshot_without_same_day_upload() {
    let server = MockServer::start().await;
    mount_channel_with_two_videos(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let today = date(2024, 1, 10);
    collect::run_collect(&config, &test_client(&server), today, false)
        .await
        .unwrap();

    let stored = chanstats_dataset::load(&config.dataset_path).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "A");
    assert_eq!(stored[0].view_count, 50);
    assert_eq!(stored[0].collected_at, today);
}

#[tokio::test]
async fn run_collect_dry_run_does_not_create_dataset() {
    let server = MockServer::start().await;
    mount_channel_with_two_videos(&server).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    collect::run_collect(&config, &test_client(&server), date(2024, 1, 10), true)
        .await
        .unwrap();

    assert!(!config.dataset_path.exists());
}

#[tokio::test]
async fn run_collect_leaves_dataset_untouched_when_statistics_fetch_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "contentDetails": { "relatedPlaylists": { "uploads": "UU1" } } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "contentDetails": { "videoId": "a" } }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "The request cannot be completed because you have exceeded your quota." }
        })))
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    chanstats_dataset::save(&config.dataset_path, &[rec(80, date(2024, 1, 9))]).unwrap();
    let before = std::fs::read(&config.dataset_path).unwrap();

    let result = collect::run_collect(&config, &test_client(&server), date(2024, 1, 10), false).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("exceeded your quota"), "got: {err}");
    assert_eq!(std::fs::read(&config.dataset_path).unwrap(), before);
    assert!(!dir.path().join("video_stats.csv.tmp").exists());
}

#[tokio::test]
async fn run_collect_requires_channel_id() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        channel_id: None,
        ..test_config(dir.path())
    };

    let result = collect::run_collect(&config, &test_client(&server), date(2024, 1, 10), false).await;

    let err = result.unwrap_err().to_string();
    assert!(err.contains("CHANSTATS_CHANNEL_ID"), "got: {err}");
    assert!(!config.dataset_path.exists());
}

#[test]
fn build_client_requires_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        youtube_api_key: None,
        ..test_config(dir.path())
    };

    let err = collect::build_client(&config).err().unwrap().to_string();
    assert!(err.contains("YOUTUBE_API_KEY"), "got: {err}");
}

#[tokio::test]
async fn failed_fetch_surfaces_api_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "API key not valid." }
        })))
        .mount(&server)
        .await;
    let client = test_client(&server);

    let result = collect::fetch_snapshot(&client, "UC1", 20, date(2024, 1, 10)).await;
    let err = result.unwrap_err().to_string();
    assert!(err.contains("API key not valid"), "got: {err}");
}

#[test]
fn build_report_compares_with_previous_day() {
    let records = vec![rec(80, date(2024, 1, 9)), rec(100, date(2024, 1, 10))];
    let options = ReportOptions {
        title: "Daily".to_string(),
        generated_at: None,
        date_style: DateStyle::Iso,
    };

    let html = report::build_report(&records, &options).unwrap();
    assert!(html.contains("<td>100</td><td>20</td>"));
}

#[test]
fn build_report_rejects_empty_dataset() {
    let options = ReportOptions {
        title: "Daily".to_string(),
        generated_at: None,
        date_style: DateStyle::Iso,
    };
    assert!(report::build_report(&[], &options).is_err());
}

#[test]
fn run_report_writes_html_to_configured_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let records = vec![rec(80, date(2024, 1, 9)), rec(100, date(2024, 1, 10))];
    chanstats_dataset::save(&config.dataset_path, &records).unwrap();

    report::run_report(&config, false).unwrap();

    let html = std::fs::read_to_string(&config.report_path).unwrap();
    assert!(html.contains("<td>100</td><td>20</td>"));
    assert!(!html.contains("生成日時"));
}

#[test]
fn run_report_on_missing_dataset_hints_at_collect() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let err = report::run_report(&config, false).unwrap_err().to_string();

    assert!(err.contains("run `chanstats collect` first"), "got: {err}");
    assert!(!config.report_path.exists());
}
