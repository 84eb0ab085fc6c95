use std::{collections::HashMap, fmt, fs::File, net::SocketAddr};

use anyhow::Context;
use cabreport::{
    config::AppConfig,
    db::init_pool,
    error::AppError,
    models::{
        date_range::DateRange,
        trip::{NewTrip, TripStatus},
        user::{User, UserRole},
    },
    services::report::RateRecord,
    state::AppState,
};
use chrono::NaiveDate;
use cucumber::{given, then, when, World as _};
use tempfile::TempDir;

#[derive(Debug, cucumber::World, Default)]
struct AppWorld {
    state: Option<TestState>,
    users: HashMap<String, User>,
    report: Option<Vec<RateRecord>>,
    previous_report: Option<Vec<RateRecord>>,
    error: Option<AppError>,
}

impl AppWorld {
    fn app_state(&self) -> &AppState {
        self.state
            .as_ref()
            .expect("state must be initialised first")
            .app()
    }

    fn user(&self, name: &str) -> &User {
        self.users
            .get(name)
            .unwrap_or_else(|| panic!("user {name:?} must be created first"))
    }

    async fn run_report(&mut self, start: &str, end: &str) {
        self.report = None;
        self.error = None;
        let outcome = match DateRange::from_strings(start, end) {
            Ok(range) => self.app_state().reports.rates_for(&range).await,
            Err(err) => Err(err),
        };
        match outcome {
            Ok(records) => self.report = Some(records),
            Err(err) => self.error = Some(err),
        }
    }
}

struct TestState {
    app: AppState,
    _root: TempDir,
}

impl fmt::Debug for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestState").finish()
    }
}

impl TestState {
    async fn new() -> anyhow::Result<Self> {
        let root = TempDir::new().context("create temp dir for bdd world")?;

        let db_path = root.path().join("bdd.sqlite");
        File::create(&db_path)?;
        let database_url = format!("sqlite://{}", db_path.to_string_lossy());

        let config = AppConfig {
            database_url: database_url.clone(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            seed_demo: false,
        };

        let db = init_pool(&config.database_url).await?;
        sqlx::migrate!("./migrations").run(&db).await?;

        let app = AppState::new(config, db);
        Ok(Self { app, _root: root })
    }

    fn app(&self) -> &AppState {
        &self.app
    }
}

#[given("a fresh trip ledger")]
async fn given_fresh_ledger(world: &mut AppWorld) {
    world.state = Some(TestState::new().await.expect("state"));
    world.users.clear();
    world.report = None;
    world.previous_report = None;
    world.error = None;
}

#[given("the demo ledger is seeded")]
async fn given_demo_ledger(world: &mut AppWorld) {
    world
        .app_state()
        .ledger
        .seed_demo()
        .await
        .expect("seed demo ledger");
}

#[given(regex = r#"^a (client|driver) "([^"]+)" who is (banned|not banned)$"#)]
async fn given_participant(world: &mut AppWorld, role: String, name: String, flag: String) {
    let role = match role.as_str() {
        "client" => UserRole::Client,
        "driver" => UserRole::Driver,
        other => panic!("unknown role {other:?}"),
    };
    let banned = flag == "banned";
    let user = world
        .app_state()
        .ledger
        .insert_user(role, banned)
        .await
        .expect("insert user");
    world.users.insert(name, user);
}

#[given(
    regex = r#"^a trip on "([^"]+)" from client "([^"]+)" to driver "([^"]+)" with status "([^"]+)"$"#
)]
async fn given_trip(
    world: &mut AppWorld,
    day: String,
    client: String,
    driver: String,
    status: String,
) {
    let request_at =
        NaiveDate::parse_from_str(&day, "%Y-%m-%d").expect("trip day must be a calendar date");
    let status = TripStatus::parse(&status).unwrap_or_else(|| panic!("unknown status {status:?}"));
    let new = NewTrip {
        client_id: world.user(&client).id,
        driver_id: world.user(&driver).id,
        city_id: 1,
        status,
        request_at,
    };
    world
        .app_state()
        .ledger
        .insert_trip(new)
        .await
        .expect("insert trip");
}

#[when(regex = r#"^I request cancellation rates from "([^"]+)" to "([^"]+)"$"#)]
async fn when_request_rates(world: &mut AppWorld, start: String, end: String) {
    world.run_report(&start, &end).await;
}

#[when(regex = r#"^I request cancellation rates from "([^"]+)" to "([^"]+)" twice$"#)]
async fn when_request_rates_twice(world: &mut AppWorld, start: String, end: String) {
    world.run_report(&start, &end).await;
    world.previous_report = world.report.take();
    world.run_report(&start, &end).await;
}

#[then(regex = r"^the report has (\d+) rows?$")]
async fn then_report_has_rows(world: &mut AppWorld, expected: usize) {
    let report = world.report.as_ref().expect("report expected");
    assert_eq!(report.len(), expected);
}

#[then(regex = r#"^row (\d+) is day "([^"]+)" with rate (\d+\.\d+)$"#)]
async fn then_row_is(world: &mut AppWorld, row: usize, day: String, rate: f64) {
    let report = world.report.as_ref().expect("report expected");
    let record = report
        .get(row - 1)
        .unwrap_or_else(|| panic!("report has no row {row}"));
    let day = NaiveDate::parse_from_str(&day, "%Y-%m-%d").expect("expected day must parse");
    assert_eq!(record.day, day);
    assert!(
        (record.cancellation_rate - rate).abs() < 1e-9,
        "row {row} has rate {}, expected {rate}",
        record.cancellation_rate
    );
}

#[then("the report is empty")]
async fn then_report_is_empty(world: &mut AppWorld) {
    let report = world.report.as_ref().expect("report expected");
    assert!(report.is_empty(), "expected empty report, got {report:?}");
}

#[then(regex = r#"^the request is rejected with "([^"]+)"$"#)]
async fn then_request_rejected(world: &mut AppWorld, message: String) {
    assert!(world.report.is_none(), "no report expected on rejection");
    let err = world.error.as_ref().expect("error expected");
    assert_eq!(err.to_string(), message);
}

#[then("both reports are identical")]
async fn then_reports_identical(world: &mut AppWorld) {
    let first = world.previous_report.as_ref().expect("first report expected");
    let second = world.report.as_ref().expect("second report expected");
    assert_eq!(first, second);
}

#[tokio::main]
async fn main() {
    AppWorld::cucumber()
        .fail_on_skipped()
        .with_default_cli()
        .run("tests/features")
        .await;
}
