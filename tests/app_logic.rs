//! Integration tests for the screen controllers.
//!
//! Each test drives a controller against a wiremock backend with a pinned
//! MockClock, the same way the desktop shell does: load, edit, submit and
//! react to the returned effect.

use std::{sync::Arc, time::Duration};

use amcham_directory::{
    CarouselMode, Clock, DirectoryApiClient, Effect, Language, MediaScreen, MemberScreen, MockClock,
    PictureUpdate, ProfileField, ProfileScreen, Rating, ReviewStage, ScreenContext, ScreenError,
    Session, StatisticsScreen, Text, Upload, localize,
    config::{CarouselConfig, NetworkConfig, TimingConfig},
    models::DayOfWeek,
    schedule::{HoursScreen, TimeField},
};
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn clock() -> MockClock {
    MockClock::new(Utc.with_ymd_and_hms(2024, 3, 7, 10, 0, 0).unwrap())
}

fn ctx_with(server: &MockServer, session: Option<Session>, clock: MockClock) -> ScreenContext {
    let api = DirectoryApiClient::new(server.uri(), &NetworkConfig::default()).unwrap();
    ScreenContext::new(api, session, Arc::new(clock), TimingConfig::default())
}

fn ctx(server: &MockServer) -> ScreenContext {
    let session = Session {
        token: "tok".into(),
        expires_at: None,
    };
    ctx_with(server, Some(session), clock())
}

async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_account(server: &MockServer, company_id: Option<i64>) {
    mount_json(
        server,
        "GET",
        "/auth/me",
        200,
        json!({ "id": 12, "email": "owner@acme.sn", "companyId": company_id }),
    )
    .await;
}

fn company_json() -> Value {
    json!({
        "id": 7,
        "name": "Acme Industries",
        "sector": "Energy",
        "description": "Solar panels and storage for homes and small businesses in West Africa.",
        "country": "Senegal",
        "address": "12 Avenue Pasteur, Dakar",
        "email": "contact@acme.sn",
        "telephone": "+221 33 123 45 67",
        "webLink": "https://acme.sn",
        "countryAmchamId": 1,
        "pictures": ["https://cdn.acme.sn/a.png", "https://cdn.acme.sn/b.png"],
        "updatedAt": "2024-03-01T09:00:00Z"
    })
}

fn rating_json(first_name: &str, score: u8) -> Value {
    json!({
        "firstName": first_name,
        "lastName": "Diop",
        "score": score,
        "comment": "Reliable partner",
        "companyId": 7
    })
}

// ==================== Session handling ====================

/// Without a token nothing is requested and the screen asks for a login.
#[tokio::test]
async fn test_missing_session_redirects_without_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = ctx_with(&mock_server, None, clock());
    let mut screen = MediaScreen::new(Language::En);
    let effect = screen.load(&ctx).await;

    assert_eq!(screen.status.error, Some(ScreenError::NotAuthenticated));
    assert_eq!(
        effect,
        Some(Effect::RedirectToLogin {
            after: Duration::from_millis(2000)
        })
    );
}

#[tokio::test]
async fn test_expired_session_is_rejected_locally() {
    let mock_server = MockServer::start().await;
    let clock = clock();
    let session = Session {
        token: "tok".into(),
        expires_at: Some(clock.now_utc() - ChronoDuration::minutes(1)),
    };

    let ctx = ctx_with(&mock_server, Some(session), clock);
    let mut screen = HoursScreen::new(Language::Fr);
    let effect = screen.load(&ctx).await;

    assert_eq!(screen.status.error, Some(ScreenError::NotAuthenticated));
    assert!(matches!(effect, Some(Effect::RedirectToLogin { .. })));
}

/// A 401 from the backend ends the session.
#[tokio::test]
async fn test_unauthorized_redirects_to_login() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "GET", "/auth/me", 401, json!({})).await;

    let ctx = ctx(&mock_server);
    let mut screen = ProfileScreen::new(Language::En);
    mount_json(&mock_server, "GET", "/sectors", 200, json!([])).await;
    mount_json(&mock_server, "GET", "/countries", 200, json!([])).await;

    let effect = screen.load(&ctx).await;
    assert_eq!(screen.status.error, Some(ScreenError::SessionExpired));
    assert!(matches!(effect, Some(Effect::RedirectToLogin { .. })));
    assert!(!screen.status.loading);
}

/// An account without a company is terminal: no retry, no redirect.
#[tokio::test]
async fn test_account_without_company() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, None).await;

    let ctx = ctx(&mock_server);
    let mut screen = HoursScreen::new(Language::En);
    let effect = screen.load(&ctx).await;

    assert_eq!(effect, None);
    let err = screen.status.error.clone().unwrap();
    assert_eq!(err, ScreenError::NoCompany);
    assert!(!err.is_retryable());
    assert_eq!(err.localized(Language::En), localize(Language::En, Text::NoCompany));
}

// ==================== Statistics ====================

async fn mount_statistics(server: &MockServer, failing: usize, expect: Option<u64>) {
    let endpoints = [
        (
            "/companies/views/company/7",
            json!({ "total": 1520, "thisWeek": 40, "lastWeek": 32, "weeklyEvolution": 25.0 }),
        ),
        (
            "/companies/contacts/total/7",
            json!({ "total": 9, "weeklyEvolution": -12.5 }),
        ),
        (
            "/companies/views/company/7/weekly-daily",
            json!([{ "date": "2024-03-04", "count": 3 }, { "date": "2024-03-05", "count": 5 }]),
        ),
        (
            "/companies/contacts/7/circular-stats",
            json!({ "today": 1, "lastWeek": 2, "lastMonth": 3, "currentYear": 4 }),
        ),
        ("/companies/7", company_json()),
    ];
    for (i, (route, body)) in endpoints.into_iter().enumerate() {
        // The company lookup is not one of the counted statistics.
        let status = if i < failing && i < 4 { 500 } else { 200 };
        let mut mock = Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body));
        if let Some(n) = expect {
            mock = mock.expect(n);
        }
        mock.mount(server).await;
    }
}

/// Three failed statistics still render the dashboard.
#[tokio::test]
async fn test_statistics_partial_failure_renders() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_statistics(&mock_server, 3, None).await;

    let ctx = ctx(&mock_server);
    let mut screen = StatisticsScreen::new(Language::En);
    screen.load(&ctx).await;

    assert!(screen.error.is_none());
    assert_eq!(screen.data().available(), 1);
    assert!(screen.data().timeline.is_some());

    let metrics = screen.metrics();
    assert_eq!(metrics[0].value, "0");
    assert_eq!(metrics[0].growth, "+0.0%");
    assert_eq!(screen.pie_chart().total(), 10);
}

#[tokio::test]
async fn test_statistics_total_failure_reports_error() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_statistics(&mock_server, 4, None).await;

    let ctx = ctx(&mock_server);
    let mut screen = StatisticsScreen::new(Language::En);
    let effect = screen.load(&ctx).await;

    assert_eq!(effect, None);
    assert_eq!(
        screen.error,
        Some(ScreenError::Unavailable(Text::StatsLoadError))
    );
    assert!(screen.error.as_ref().unwrap().is_retryable());
}

/// Switching language re-renders from the cache without another request.
#[tokio::test]
async fn test_language_switch_uses_cache() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 12, "companyId": 7 })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_statistics(&mock_server, 0, Some(1)).await;

    let ctx = ctx(&mock_server);
    let mut screen = StatisticsScreen::new(Language::Fr);
    screen.load(&ctx).await;
    let french = screen.metrics();
    assert_eq!(french[0].value, "1\u{202F}520");

    screen.set_language(Language::En);
    let english = screen.metrics();
    assert_eq!(english[0].title, localize(Language::En, Text::ProfileViews));
    assert_eq!(english[0].value, "1,520");
    assert_eq!(english[1].growth, "-12.5%");
    assert!(!english[1].positive);
    assert_ne!(
        french[0].title, english[0].title,
        "titles should follow the language"
    );
    assert_eq!(screen.line_chart().values, vec![3.0, 5.0]);
}

#[tokio::test]
async fn test_statistics_export_writes_csv() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_statistics(&mock_server, 0, None).await;

    let ctx = ctx(&mock_server);
    let mut screen = StatisticsScreen::new(Language::En);
    screen.load(&ctx).await;

    let dir = tempfile::tempdir().unwrap();
    let file = screen
        .export_csv(dir.path(), ctx.clock.as_ref())
        .await
        .unwrap();

    assert_eq!(
        file.file_name().unwrap().to_str().unwrap(),
        "profile_views_7_20240307_100000.csv"
    );
    let contents = std::fs::read_to_string(file).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines, vec!["date,count", "2024-03-04,3", "2024-03-05,5"]);
}

// ==================== Profile ====================

async fn mount_profile(server: &MockServer) {
    mount_account(server, Some(7)).await;
    mount_json(
        server,
        "GET",
        "/sectors",
        200,
        json!([{ "id": 2, "nameFr": "Énergie", "nameEn": "Energy" }]),
    )
    .await;
    mount_json(
        server,
        "GET",
        "/countries",
        200,
        json!([{ "id": 5, "name": "Senegal", "icon": "🇸🇳" }]),
    )
    .await;
    mount_json(server, "GET", "/companies/7", 200, company_json()).await;
}

#[tokio::test]
async fn test_profile_binds_reference_data() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server).await;

    let ctx = ctx(&mock_server);
    let mut screen = ProfileScreen::new(Language::Fr);
    screen.load(&ctx).await;

    assert!(screen.status.error.is_none());
    assert_eq!(screen.form().sector_id, Some(2));
    assert_eq!(screen.form().country_id, Some(5));
    assert_eq!(screen.sector_name(2), "Énergie");
    assert_eq!(screen.country_icon(5), "🇸🇳");
    assert!(screen.is_valid());
}

/// The description needs 50 characters.
#[tokio::test]
async fn test_profile_description_length_boundary() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server).await;

    let ctx = ctx(&mock_server);
    let mut screen = ProfileScreen::new(Language::En);
    screen.load(&ctx).await;

    screen.set_text(ProfileField::Description, "a".repeat(49));
    assert_eq!(screen.prepare_save().unwrap_err(), ScreenError::Invalid);
    assert!(screen.field_error(ProfileField::Description).is_some());
    assert!(!screen.status.saving);

    screen.set_text(ProfileField::Description, "a".repeat(50));
    let (id, update) = screen.prepare_save().unwrap();
    assert_eq!(id, 7);
    assert_eq!(update.description.len(), 50);
    assert!(screen.status.saving);
}

#[tokio::test]
async fn test_profile_submit_success_schedules_notice() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/companies/7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = ctx(&mock_server);
    let mut screen = ProfileScreen::new(Language::En);
    screen.load(&ctx).await;
    screen.set_text(ProfileField::CompanyName, "Acme Solar");

    let effect = screen.submit(&ctx).await;
    assert_eq!(
        effect,
        Some(Effect::ClearNotice {
            after: Duration::from_millis(3000)
        })
    );
    assert_eq!(screen.status.success, Some(Text::ProfileSaveSuccess));

    screen.clear_notice();
    assert_eq!(screen.status.success, None);
}

#[tokio::test]
async fn test_profile_save_failure_keeps_form_editable() {
    let mock_server = MockServer::start().await;
    mount_profile(&mock_server).await;
    Mock::given(method("PUT"))
        .and(path("/companies/7"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let ctx = ctx(&mock_server);
    let mut screen = ProfileScreen::new(Language::En);
    screen.load(&ctx).await;
    screen.set_text(ProfileField::CompanyName, "Acme Solar Renamed");

    let effect = screen.submit(&ctx).await;
    assert_eq!(effect, None);
    assert!(matches!(
        screen.status.error,
        Some(ScreenError::Save { message: Text::ProfileSaveError, .. })
    ));
    assert_eq!(
        screen.status.error_message(Language::En).as_deref(),
        Some("Database unavailable")
    );
    assert!(!screen.status.saving);
    assert_eq!(screen.status.success, None);
    assert_eq!(
        screen.form().text(ProfileField::CompanyName),
        "Acme Solar Renamed"
    );

    // Still editable: a second attempt reaches the backend again.
    screen.submit(&ctx).await;
    assert!(matches!(screen.status.error, Some(ScreenError::Save { .. })));
}

// ==================== Opening hours ====================

#[tokio::test]
async fn test_hours_save_sends_null_times_for_closed_days() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_json(&mock_server, "GET", "/companies/7", 200, company_json()).await;
    mount_json(
        &mock_server,
        "GET",
        "/companies/7/schedule",
        200,
        json!([{ "dayOfWeek": "MONDAY", "openingTime": "08:00", "closingTime": "17:00" }]),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/companies/7/schedule"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = ctx(&mock_server);
    let mut screen = HoursScreen::new(Language::En);
    screen.load(&ctx).await;
    assert_eq!(screen.form().day(DayOfWeek::Monday).opening, "08:00");

    screen.toggle(DayOfWeek::Friday);
    let effect = screen.submit(&ctx).await;
    assert!(matches!(effect, Some(Effect::ClearNotice { .. })));

    let requests = mock_server.received_requests().await.unwrap();
    let put = requests
        .iter()
        .find(|r| r.method.as_str() == "PUT")
        .unwrap();
    let body: Vec<Value> = serde_json::from_slice(&put.body).unwrap();
    assert_eq!(body.len(), 7);
    assert_eq!(body[0]["openingTime"], "08:00");
    for closed in [4, 5, 6] {
        assert_eq!(body[closed]["openingTime"], Value::Null);
        assert_eq!(body[closed]["closingTime"], Value::Null);
        assert_eq!(body[closed]["closed"], true);
    }
}

#[tokio::test]
async fn test_hours_invalid_time_blocks_save() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_json(&mock_server, "GET", "/companies/7", 200, company_json()).await;
    mount_json(&mock_server, "GET", "/companies/7/schedule", 200, json!([])).await;
    Mock::given(method("PUT"))
        .and(path("/companies/7/schedule"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let ctx = ctx(&mock_server);
    let mut screen = HoursScreen::new(Language::En);
    screen.load(&ctx).await;

    screen.set_time(DayOfWeek::Tuesday, TimeField::Closing, "25:00");
    assert_eq!(screen.submit(&ctx).await, None);
    assert_eq!(screen.status.error, Some(ScreenError::Invalid));
    assert!(
        screen
            .errors()
            .get((DayOfWeek::Tuesday, TimeField::Closing))
            .is_some()
    );
}

// ==================== Media ====================

/// Stored pictures are never re-sent; only new files are appended.
#[tokio::test]
async fn test_media_save_appends_only_new_files() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_json(&mock_server, "GET", "/companies/7", 200, company_json()).await;

    let ctx = ctx(&mock_server);
    let mut screen = MediaScreen::new(Language::En);
    screen.load(&ctx).await;
    assert_eq!(screen.photos().len(), 2);

    screen.add_photo(Upload::new("terrace.jpg", vec![1, 2, 3]));
    assert_eq!(screen.pending_count(), 1);

    let (id, update) = screen.prepare_save().unwrap();
    assert_eq!(id, 7);
    match update.pictures {
        PictureUpdate::Append(files) => {
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].file_name, "terrace.jpg");
        }
        PictureUpdate::Keep => panic!("expected the new photo to be appended"),
    }
}

#[tokio::test]
async fn test_media_invalid_video_blocks_save() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_json(&mock_server, "GET", "/companies/7", 200, company_json()).await;

    let ctx = ctx(&mock_server);
    let mut screen = MediaScreen::new(Language::En);
    screen.load(&ctx).await;

    screen.set_video_url("https://example.com/clip.mp4");
    assert_eq!(screen.prepare_save().unwrap_err(), ScreenError::Invalid);

    screen.set_video_url("https://www.youtube.com/watch?v=abc123&t=10");
    assert_eq!(
        screen.embed_url().as_deref(),
        Some("https://www.youtube.com/embed/abc123")
    );
    let (_, update) = screen.prepare_save().unwrap();
    assert_eq!(update.pictures, PictureUpdate::Keep);
}

/// Teardown resolves an in-flight load to nothing.
#[tokio::test]
async fn test_teardown_cancels_in_flight_load() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "id": 12, "companyId": 7 }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let ctx = ctx(&mock_server);
    let screen = MediaScreen::new(Language::En);
    let pending = screen.lifecycle().guard(MediaScreen::fetch(ctx.clone()));
    screen.teardown();

    let result = tokio::time::timeout(Duration::from_secs(1), pending)
        .await
        .expect("cancelled load should resolve immediately");
    assert!(result.is_none());
}

// ==================== Member page ====================

async fn mount_member(server: &MockServer, ratings: Value) {
    mount_json(server, "GET", "/companies/7", 200, company_json()).await;
    mount_json(server, "GET", "/companies/7/schedule", 500, json!({})).await;
    mount_json(server, "GET", "/companies/7/ratings", 200, ratings).await;
    mount_json(
        server,
        "GET",
        "/companies/7/similar",
        200,
        json!([
            { "id": 7, "name": "Acme Industries" },
            { "id": 8, "name": "Baobab" },
            { "id": 9, "name": "Cauri" },
            { "id": 10, "name": "Dune" },
            { "id": 11, "name": "Eko" }
        ]),
    )
    .await;
}

fn member_screen() -> MemberScreen {
    MemberScreen::new(Language::En, Some(7), &CarouselConfig::default(), 1280.0)
}

#[tokio::test]
async fn test_member_loads_with_partial_failures() {
    let mock_server = MockServer::start().await;
    let ratings: Vec<Value> = ["Awa", "Binta", "Coumba", "Dieynaba"]
        .iter()
        .map(|name| rating_json(name, 4))
        .collect();
    mount_member(&mock_server, json!(ratings)).await;

    let ctx = ctx(&mock_server);
    let mut screen = member_screen();
    screen.load(&ctx).await;

    assert!(screen.status.error.is_none());
    // Schedule failed: every day reads as closed.
    assert!(screen.formatted_hours().iter().all(|(_, hours)| hours == "Closed"));
    let similar: Vec<i64> = screen.similar().iter().map(|c| c.id).collect();
    assert_eq!(similar, vec![8, 9, 10]);

    assert_eq!(screen.carousel().mode(), CarouselMode::Looping);
    assert_eq!(screen.carousel().visible().len(), 3);
    assert_eq!(screen.average_rating(), 4.0);
    assert_eq!(screen.review_count_label(), "4 reviews");
    assert_eq!(screen.website_url().as_deref(), Some("https://acme.sn"));
}

#[tokio::test]
async fn test_member_without_ratings_shows_placeholder() {
    let mock_server = MockServer::start().await;
    mount_member(&mock_server, json!([])).await;

    let ctx = ctx(&mock_server);
    let mut screen = member_screen();
    screen.load(&ctx).await;

    assert!(screen.ratings().is_empty());
    assert_eq!(screen.carousel().items(), &[Rating::placeholder()]);
    assert_eq!(screen.carousel().mode(), CarouselMode::Small);
    assert!(!screen.carousel().is_armed());
    assert_eq!(screen.review_count_label(), "0 review");
}

#[tokio::test]
async fn test_member_not_found() {
    let mock_server = MockServer::start().await;
    mount_json(&mock_server, "GET", "/companies/404", 404, json!({})).await;

    let ctx = ctx(&mock_server);
    let mut screen = MemberScreen::new(Language::En, Some(404), &CarouselConfig::default(), 800.0);
    let effect = screen.load(&ctx).await;

    assert_eq!(effect, None);
    assert_eq!(screen.status.error, Some(ScreenError::NotFound));
    assert!(screen.company().is_none());
}

/// Without an explicit id the page shows the operator's own company.
#[tokio::test]
async fn test_member_resolves_own_company() {
    let mock_server = MockServer::start().await;
    mount_account(&mock_server, Some(7)).await;
    mount_member(&mock_server, json!([rating_json("Awa", 5)])).await;

    let ctx = ctx(&mock_server);
    let mut screen = MemberScreen::new(Language::En, None, &CarouselConfig::default(), 1280.0);
    screen.load(&ctx).await;

    assert_eq!(screen.company_id(), Some(7));
    assert_eq!(screen.initial(), Some('A'));
}

#[tokio::test]
async fn test_review_submission_flow() {
    let mock_server = MockServer::start().await;
    mount_member(&mock_server, json!([])).await;
    Mock::given(method("POST"))
        .and(path("/ratings"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let ctx = ctx(&mock_server);
    let mut screen = member_screen();
    screen.load(&ctx).await;

    screen.open_review();
    screen.review_mut().first_name = "Awa".into();
    screen.review_mut().last_name = "Diop".into();
    screen.review_mut().comment = "A".into();
    screen.set_score(4);

    // One-character comment is not enough.
    assert_eq!(screen.submit_review(&ctx).await, None);
    assert_eq!(screen.review_stage(), ReviewStage::Editing);
    assert!(screen.review_error().is_some());

    screen.review_mut().comment = "Great".into();
    let effect = screen.submit_review(&ctx).await;
    assert!(matches!(effect, Some(Effect::ClearNotice { .. })));
    assert_eq!(screen.review_stage(), ReviewStage::Sent);

    screen.clear_notice();
    assert_eq!(screen.review_stage(), ReviewStage::Closed);
}
