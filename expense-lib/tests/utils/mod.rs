use std::sync::Arc;

use async_trait::async_trait;
use rstest::*;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

use expense_repo::expense_repo::ExpenseRepo;
use expense_repo::user_repo::{NewUser, User, UserRepo};
use expense_repo::HealthCheck;

macro_rules! build_app {
    ($repos:ident) => {{
        let (user_repo, expense_repo, health_check) = $repos;
        let app = App::new()
            .wrap(expense_lib::tracing::create_middleware())
            .configure(expense_lib::app_config_func(
                user_repo,
                expense_repo,
                health_check,
            ));
        tracing::info!("Built app");
        app
    }};
}

#[allow(unused_macros)]
macro_rules! signup {
    (&$service:ident, $new_user:expr) => {{
        let request = TestRequest::post()
            .uri("/users/signup")
            .set_json(&$new_user)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            response.status(),
            StatusCode::CREATED,
            "Got {} response when signing up",
            response.status()
        );
        let user: User = test::read_body_json(response).await;
        user
    }};
}

#[allow(unused_macros)]
macro_rules! create_expense {
    (&$service:ident, $source:expr, $request:expr) => {{
        let request = TestRequest::post()
            .uri(format!("/expenses/{}", $source).as_str())
            .set_json(&$request)
            .to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(
            response.status(),
            StatusCode::CREATED,
            "Got {} response when creating expense",
            response.status()
        );
        let expense: Expense = test::read_body_json(response).await;
        expense
    }};
}

#[allow(unused_macros)]
macro_rules! get_json {
    (&$service:ident, $uri:expr $(,)?) => {{
        let uri: &str = $uri;
        let request = TestRequest::get().uri(uri).to_request();
        let response = test::call_service(&$service, request).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {}", uri);
        let body: Value = test::read_body_json(response).await;
        body
    }};
}

#[allow(dead_code)]
pub fn unique_new_user() -> NewUser {
    let id = Uuid::new_v4();
    NewUser::new(format!("user-{}", id), format!("{}@example.com", id))
}

#[allow(dead_code)]
pub struct TestUser {
    pub user: User,
    repo: Arc<dyn UserRepo>,
}

#[allow(dead_code)]
impl TestUser {
    pub async fn new(user_repo: &Arc<dyn UserRepo>) -> TestUser {
        let user = user_repo.create_user(unique_new_user()).await.unwrap();
        info!(user_id = user.user_id, "Created user");
        TestUser {
            user,
            repo: user_repo.clone(),
        }
    }

    pub fn id(&self) -> i32 {
        self.user.user_id
    }
}

#[allow(dead_code)]
/// Health check standing in for a database that cannot be reached.
pub struct FailingHealthCheck;

#[async_trait]
impl HealthCheck for FailingHealthCheck {
    async fn check(&self) -> bool {
        false
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> (Arc<dyn UserRepo>, Arc<dyn ExpenseRepo>, Arc<dyn HealthCheck>) {
    expense_repo::mem_repo::create_repos()
}
