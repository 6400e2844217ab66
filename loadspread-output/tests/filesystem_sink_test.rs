use loadspread_config::{ReportConfig, ReportFormat};
use loadspread_output::{Chart, FilesystemSink, OutputError, ReportContext, ReportSink};
use tempfile::TempDir;

fn config_in(dir: &TempDir, format: ReportFormat) -> ReportConfig {
    ReportConfig {
        directory: dir.path().join("reports").to_string_lossy().to_string(),
        format,
        ..ReportConfig::default()
    }
}

fn distribution_chart() -> Chart {
    Chart::distribution(
        "Load Distribution Among Servers",
        vec![("1".to_string(), 34), ("2".to_string(), 33), ("3".to_string(), 33)],
    )
}

#[tokio::test]
async fn test_distribution_chart_written_as_svg() {
    let dir = TempDir::new().unwrap();
    let sink = FilesystemSink::distribution(&config_in(&dir, ReportFormat::Svg));

    let receipt = sink
        .deliver(&distribution_chart(), &ReportContext::new())
        .await
        .unwrap();

    assert!(receipt.path.ends_with("reports/distribution.svg"));
    let content = tokio::fs::read_to_string(&receipt.path).await.unwrap();
    assert!(content.contains("<svg"));
    assert_eq!(receipt.size_bytes, content.len() as u64);
}

#[tokio::test]
async fn test_series_writes_one_file_per_round() {
    let dir = TempDir::new().unwrap();
    let sink = FilesystemSink::series(&config_in(&dir, ReportFormat::Json));

    let mut points = Vec::new();
    for (servers, load) in [(2u32, 50.0), (3, 33.3), (4, 25.0)] {
        points.push((servers, load));
        let chart = Chart::load_curve(format!("Average Server Load for N = {}", servers), points.clone());
        let context = ReportContext::new().with_variable("servers", servers);
        sink.deliver(&chart, &context).await.unwrap();
    }

    let reports = dir.path().join("reports");
    for servers in 2..=4 {
        assert!(reports.join(format!("scaling_{}.json", servers)).exists());
    }

    let last: serde_json::Value =
        serde_json::from_slice(&std::fs::read(reports.join("scaling_4.json")).unwrap()).unwrap();
    assert_eq!(last["data"]["points"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_redelivery_overwrites() {
    let dir = TempDir::new().unwrap();
    let sink = FilesystemSink::distribution(&config_in(&dir, ReportFormat::Csv));

    sink.deliver(&distribution_chart(), &ReportContext::new())
        .await
        .unwrap();
    let smaller = Chart::distribution("again", vec![("9".to_string(), 1)]);
    let receipt = sink.deliver(&smaller, &ReportContext::new()).await.unwrap();

    let content = std::fs::read_to_string(receipt.path).unwrap();
    assert_eq!(content, "server,count\n9,1\n");
}

#[tokio::test]
async fn test_unwritable_destination_reports_filesystem_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let config = ReportConfig {
        directory: blocker.to_string_lossy().to_string(),
        ..ReportConfig::default()
    };
    let sink = FilesystemSink::distribution(&config);

    let result = sink.deliver(&distribution_chart(), &ReportContext::new()).await;
    assert!(matches!(result, Err(OutputError::Filesystem { .. })));
}

#[tokio::test]
async fn test_empty_chart_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, ReportFormat::Svg);
    let sink = FilesystemSink::distribution(&config);

    let result = sink
        .deliver(&Chart::distribution("empty", Vec::new()), &ReportContext::new())
        .await;

    assert!(matches!(result, Err(OutputError::EmptyChart(_))));
    assert!(!dir.path().join("reports").exists());
}
