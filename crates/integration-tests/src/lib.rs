//! Integration tests for the Facet checkout.
//!
//! Each test drives a real [`CheckoutController`] over a real
//! [`MarketplaceClient`] against a [`wiremock`] server standing in for the
//! marketplace API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p facet-integration-tests
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use facet_core::{ProductId, RawPrice};
use facet_storefront::api::MarketplaceClient;
use facet_storefront::checkout::{CheckoutController, CheckoutDeps};
use facet_storefront::config::ApiConfig;
use facet_storefront::services::{CartLine, CheckoutView, MemoryCart, Route, StaticIdentity};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Something the controller asked the view to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Navigate(Route),
    ScrollToTop,
    Alert(String),
    Confirm(String),
}

/// View that records every call and answers confirmations with a fixed value.
#[derive(Debug)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    confirm_answer: AtomicBool,
}

impl RecordingView {
    #[must_use]
    pub fn new(confirm_answer: bool) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            confirm_answer: AtomicBool::new(confirm_answer),
        }
    }

    pub fn set_confirm_answer(&self, answer: bool) {
        self.confirm_answer.store(answer, Ordering::SeqCst);
    }

    #[must_use]
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn navigations(&self) -> Vec<Route> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Navigate(route) => Some(route),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl CheckoutView for RecordingView {
    fn navigate(&self, route: Route) {
        self.record(ViewEvent::Navigate(route));
    }

    fn scroll_to_top(&self) {
        self.record(ViewEvent::ScrollToTop);
    }

    fn alert(&self, message: &str) {
        self.record(ViewEvent::Alert(message.to_owned()));
    }

    fn confirm(&self, prompt: &str) -> bool {
        self.record(ViewEvent::Confirm(prompt.to_owned()));
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

/// A checkout session wired to a mock marketplace API.
pub struct TestContext {
    pub server: MockServer,
    pub controller: CheckoutController,
    pub cart: Arc<MemoryCart>,
    pub view: Arc<RecordingView>,
}

impl TestContext {
    /// Start a mock API and a controller over `lines`, signed in as
    /// `jane@facet.shop`.
    pub async fn new(lines: Vec<CartLine>) -> Self {
        Self::with_identity(
            lines,
            StaticIdentity {
                user_email: Some("jane@facet.shop".to_owned()),
                cached_email: None,
            },
        )
        .await
    }

    /// Like [`TestContext::new`] with an explicit identity.
    ///
    /// # Panics
    ///
    /// Panics if the mock server URI is not a valid URL.
    #[allow(clippy::unwrap_used)]
    pub async fn with_identity(lines: Vec<CartLine>, identity: StaticIdentity) -> Self {
        let server = MockServer::start().await;
        let client = Arc::new(
            MarketplaceClient::new(&ApiConfig {
                base_url: Url::parse(&server.uri()).unwrap(),
                token: None,
                timeout: Duration::from_secs(5),
            })
            .unwrap(),
        );
        let cart = Arc::new(MemoryCart::new(lines));
        let view = Arc::new(RecordingView::new(true));

        let controller = CheckoutController::new(CheckoutDeps {
            addresses: client.clone(),
            orders: client,
            cart: cart.clone(),
            identity: Arc::new(identity),
            view: view.clone(),
        });

        Self {
            server,
            controller,
            cart,
            view,
        }
    }

    /// Serve `body` from `GET /api/addresses`.
    pub async fn serve_addresses(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/addresses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every order request the mock API received.
    ///
    /// # Panics
    ///
    /// Panics if request recording is disabled or a body is not JSON.
    #[allow(clippy::unwrap_used)]
    pub async fn order_requests(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/api/orders/")
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}

/// A cart line with a currency-formatted price.
#[must_use]
pub fn cart_line(id: i64, name: &str, price: &str, quantity: u32) -> CartLine {
    CartLine {
        product_ref: ProductId::new(id),
        display_name: name.to_owned(),
        unit_price: RawPrice::from(price),
        quantity,
        image_ref: None,
    }
}

/// A saved address as the API returns it.
#[must_use]
pub fn address_json(id: i64, name: &str, is_default: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "phone": "555-0100",
        "line1": format!("{id} Gem St"),
        "city": "Chicago",
        "country": "United State",
        "type": "HOME",
        "is_default": is_default
    })
}
