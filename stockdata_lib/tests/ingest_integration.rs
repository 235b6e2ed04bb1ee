//! End-to-end ingestion tests: wiremock provider, in-memory SQLite store.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use serde_json::{json, Value};
use stockdata_lib::alphavantage_api::Client;
use stockdata_lib::{Db, ErrorKind, IngestError, Ingestor, ParseError, PriceFilter};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to set up an ingestor against a mock provider and an empty store.
async fn setup_ingestor() -> (Ingestor, MockServer, Arc<Mutex<Db>>) {
    let db = Db::open_in_memory().expect("open db");
    db.init().expect("init db");
    let db = Arc::new(Mutex::new(db));

    let mock_server = MockServer::start().await;
    let client = Client::with_base_url(&mock_server.uri(), Some("test-key".to_string()))
        .expect("create client");

    (Ingestor::new(client, db.clone()), mock_server, db)
}

async fn mount_series(server: &MockServer, ticker: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "TIME_SERIES_DAILY"))
        .and(query_param("symbol", ticker))
        .and(query_param("apikey", "test-key"))
        .and(query_param("datatype", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn acme_payload() -> Value {
    json!({
        "Time Series (Daily)": {
            "2024-01-02": {"4. close": "101.50"},
            "2024-01-01": {"4. close": "100.00"}
        }
    })
}

fn row_count(db: &Arc<Mutex<Db>>) -> i64 {
    db.lock().unwrap().count_prices(None).unwrap()
}

#[tokio::test]
async fn test_acme_two_rows_persisted() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", acme_payload()).await;

    let summary = ingestor.ingest("ACME").await.unwrap();
    assert_eq!(summary.ticker.as_str(), "ACME");
    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.message(), "Stock data inserted successfully.");

    let rows = db.lock().unwrap().query_prices(&PriceFilter::default()).unwrap();
    let got: Vec<(String, NaiveDate, f64)> = rows
        .into_iter()
        .map(|r| (r.ticker, r.date, r.close))
        .collect();
    assert_eq!(
        got,
        vec![
            ("ACME".to_string(), NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 101.5),
            ("ACME".to_string(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 100.0),
        ]
    );
}

#[tokio::test]
async fn test_k_entries_persist_k_rows() {
    let (ingestor, server, db) = setup_ingestor().await;

    let mut series = serde_json::Map::new();
    for day in (1..=20).rev() {
        series.insert(
            format!("2024-03-{:02}", day),
            json!({"4. close": format!("{}.25", 100 + day)}),
        );
    }
    mount_series(&server, "IBM", json!({"Time Series (Daily)": series})).await;

    let summary = ingestor.ingest("IBM").await.unwrap();
    assert_eq!(summary.rows_written, 20);
    assert_eq!(db.lock().unwrap().count_prices(Some("IBM")).unwrap(), 20);
}

#[tokio::test]
async fn test_empty_series_succeeds_with_zero_rows() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", json!({"Time Series (Daily)": {}})).await;

    let summary = ingestor.ingest("ACME").await.unwrap();
    assert_eq!(summary.rows_written, 0);
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_missing_series_key_is_parse_failure() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(
        &server,
        "ACME",
        json!({"Note": "Thank you for using Alpha Vantage!"}),
    )
    .await;

    let err = ingestor.ingest("ACME").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(matches!(
        err,
        IngestError::Parse(ParseError::MissingSeriesKey { notice: Some(_) })
    ));
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_one_bad_close_persists_nothing() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(
        &server,
        "ACME",
        json!({
            "Time Series (Daily)": {
                "2024-01-03": {"4. close": "102.00"},
                "2024-01-02": {"4. close": "not-a-number"},
                "2024-01-01": {"4. close": "100.00"}
            }
        }),
    )
    .await;

    let err = ingestor.ingest("ACME").await.unwrap_err();
    match err {
        IngestError::Parse(ParseError::MalformedRecord { ref date, .. }) => {
            assert_eq!(date, "2024-01-02")
        }
        other => panic!("expected MalformedRecord, got {:?}", other),
    }
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_provider_error_status_persists_nothing() {
    let (ingestor, server, db) = setup_ingestor().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = ingestor.ingest("ACME").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderUnavailable);
    assert!(matches!(err, IngestError::Provider(_)));
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_non_json_success_body_is_parse_failure() {
    let (ingestor, server, db) = setup_ingestor().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("timestamp,open,high,low,close\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = ingestor.ingest("ACME").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert!(matches!(
        err,
        IngestError::Provider(stockdata_lib::alphavantage_api::Error::InvalidJson(_))
    ));
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_json_array_success_body_is_parse_failure() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", json!([])).await;

    let err = ingestor.ingest("ACME").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseFailure);
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_missing_api_key_is_auth_failure() {
    let db = Db::open_in_memory().unwrap();
    db.init().unwrap();
    let db = Arc::new(Mutex::new(db));
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::with_base_url(&server.uri(), None).unwrap();
    let ingestor = Ingestor::new(client, db.clone());

    let err = ingestor.ingest("ACME").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ProviderAuth);
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_empty_ticker_makes_no_request() {
    let (ingestor, server, db) = setup_ingestor().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = ingestor.ingest("   ").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_storage_failure_mid_batch_rolls_back() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", acme_payload()).await;

    db.lock()
        .unwrap()
        .conn()
        .execute_batch(
            "CREATE TRIGGER fail_second_row BEFORE INSERT ON stocks
             WHEN NEW.date = '2024-01-01'
             BEGIN SELECT RAISE(ABORT, 'disk full'); END;",
        )
        .unwrap();

    let err = ingestor.ingest("ACME").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageFailure);
    assert!(err.to_string().contains("disk full"));
    assert_eq!(row_count(&db), 0);
}

#[tokio::test]
async fn test_repeat_ingestion_duplicates_rows() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", acme_payload()).await;

    assert_eq!(ingestor.ingest("ACME").await.unwrap().rows_written, 2);
    assert_eq!(ingestor.ingest("ACME").await.unwrap().rows_written, 2);

    // Append-only: the second run adds a second copy of each day.
    assert_eq!(db.lock().unwrap().count_prices(Some("ACME")).unwrap(), 4);
}

#[tokio::test]
async fn test_one_request_per_ingestion() {
    let (ingestor, server, _db) = setup_ingestor().await;
    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(acme_payload()))
        .expect(3)
        .mount(&server)
        .await;

    for _ in 0..3 {
        ingestor.ingest("ACME").await.unwrap();
    }
}

#[tokio::test]
async fn test_concurrent_ingestions_of_same_ticker_both_append() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", acme_payload()).await;

    let ingestor = Arc::new(ingestor);
    let a = tokio::spawn({
        let ingestor = Arc::clone(&ingestor);
        async move { ingestor.ingest("ACME").await }
    });
    let b = tokio::spawn({
        let ingestor = Arc::clone(&ingestor);
        async move { ingestor.ingest("ACME").await }
    });

    assert_eq!(a.await.unwrap().unwrap().rows_written, 2);
    assert_eq!(b.await.unwrap().unwrap().rows_written, 2);
    assert_eq!(row_count(&db), 4);
}

#[tokio::test]
async fn test_ticker_is_trimmed_before_request() {
    let (ingestor, server, db) = setup_ingestor().await;
    mount_series(&server, "ACME", acme_payload()).await;

    let summary = ingestor.ingest("  ACME ").await.unwrap();
    assert_eq!(summary.ticker.as_str(), "ACME");
    assert_eq!(db.lock().unwrap().count_prices(Some("ACME")).unwrap(), 2);
}
