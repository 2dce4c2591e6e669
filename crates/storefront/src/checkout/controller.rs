//! Checkout controller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use facet_core::{AddressId, PaymentMethod};
use tokio::sync::RwLock;
use tracing::instrument;

use super::card::CardDetails;
use super::error::{CheckoutError, ValidationError};
use super::form::AddressForm;
use super::payload::{build_order_request, contact_email};
use super::pricing::Totals;
use super::state::{
    CheckoutSnapshot, CheckoutState, CheckoutStep, OrderConfirmation, Phase, ReviewSummary,
};
use crate::api::{Address, AddressApi, OrderApi};
use crate::error::{add_breadcrumb, report_api_error};
use crate::services::{CartSource, CheckoutView, Identity, Route};

const DELETE_ADDRESS_PROMPT: &str = "Are you sure you want to delete this address?";
const LOAD_ADDRESSES_FAILED: &str = "Could not load your saved addresses. Please try again.";
const SAVE_ADDRESS_FAILED: &str = "Could not save the address. Please try again.";
const DELETE_ADDRESS_FAILED: &str = "Could not delete the address. Please try again.";
const PLACE_ORDER_FAILED: &str = "Failed to place order. Please try again.";

/// Collaborators injected into the controller.
#[derive(Clone)]
pub struct CheckoutDeps {
    pub addresses: Arc<dyn AddressApi>,
    pub orders: Arc<dyn OrderApi>,
    pub cart: Arc<dyn CartSource>,
    pub identity: Arc<dyn Identity>,
    pub view: Arc<dyn CheckoutView>,
}

/// How [`CheckoutController::mount`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// Addresses are loaded and the address step is showing.
    Ready,
    /// The cart was empty; the shopper was sent back to it.
    RedirectedToCart,
}

/// Drives one checkout session.
///
/// Cheap to clone; clones share the same session. State is only ever locked
/// between awaits, so rendering (via [`CheckoutController::snapshot`]) never
/// waits on the network.
///
/// Two guards protect the session:
///
/// - only one order submission may be outstanding at a time; a second
///   [`CheckoutController::place_order`] fails with
///   [`CheckoutError::SubmissionInFlight`] without sending anything
/// - after [`CheckoutController::abandon`], responses that arrive late are
///   dropped and the operation fails with [`CheckoutError::Abandoned`]
#[derive(Clone)]
pub struct CheckoutController {
    inner: Arc<Inner>,
}

struct Inner {
    deps: CheckoutDeps,
    state: RwLock<CheckoutState>,
    submitting: AtomicBool,
    pending: AtomicUsize,
    alive: AtomicBool,
}

/// Held while an order request is outstanding.
struct SubmitGuard<'a>(&'a AtomicBool);

impl<'a> SubmitGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Counts an outstanding request towards the loading indicator.
struct LoadingGuard<'a>(&'a AtomicUsize);

impl<'a> LoadingGuard<'a> {
    fn start(pending: &'a AtomicUsize) -> Self {
        pending.fetch_add(1, Ordering::AcqRel);
        Self(pending)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl CheckoutController {
    /// Create a controller for a fresh checkout session.
    #[must_use]
    pub fn new(deps: CheckoutDeps) -> Self {
        Self {
            inner: Arc::new(Inner {
                deps,
                state: RwLock::new(CheckoutState::default()),
                submitting: AtomicBool::new(false),
                pending: AtomicUsize::new(0),
                alive: AtomicBool::new(true),
            }),
        }
    }

    /// Open checkout.
    ///
    /// With an empty cart the shopper is sent to the cart page and the
    /// session ends. Otherwise saved addresses are loaded and the default
    /// one (or the first) is preselected.
    ///
    /// # Errors
    ///
    /// Returns an error if the address list could not be loaded. The shopper
    /// has already been alerted.
    #[instrument(skip(self))]
    pub async fn mount(&self) -> Result<MountOutcome, CheckoutError> {
        if self.inner.deps.cart.is_empty() {
            tracing::info!("Checkout opened with an empty cart, redirecting");
            self.inner.alive.store(false, Ordering::Release);
            self.inner.state.write().await.discard(Phase::Abandoned);
            self.inner.deps.view.navigate(Route::Cart);
            return Ok(MountOutcome::RedirectedToCart);
        }

        add_breadcrumb("checkout", "Checkout started", None);
        self.refresh_addresses().await?;
        Ok(MountOutcome::Ready)
    }

    /// Reload saved addresses.
    ///
    /// Keeps the current selection if it is still listed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (the shopper is alerted) or the
    /// session ended meanwhile.
    #[instrument(skip(self))]
    pub async fn refresh_addresses(&self) -> Result<usize, CheckoutError> {
        self.check_open().await?;

        let result = {
            let _loading = LoadingGuard::start(&self.inner.pending);
            self.inner.deps.addresses.list_addresses().await
        };
        self.ensure_alive()?;

        match result {
            Ok(addresses) => {
                let count = addresses.len();
                let mut state = self.inner.state.write().await;
                self.ensure_open(&state)?;
                state.addresses = addresses;
                state.reconcile_selection();
                tracing::info!(
                    count,
                    selected = ?state.selected_address_id,
                    "Loaded saved addresses"
                );
                Ok(count)
            }
            Err(e) => {
                report_api_error("Loading addresses", &e);
                self.inner
                    .deps
                    .view
                    .alert(&e.user_message(LOAD_ADDRESSES_FAILED));
                Err(e.into())
            }
        }
    }

    /// Current state, totals and loading flag for rendering.
    pub async fn snapshot(&self) -> CheckoutSnapshot {
        let mut state = self.inner.state.read().await.clone();
        if state.phase == Phase::Active && self.inner.submitting.load(Ordering::Acquire) {
            state.phase = Phase::Submitting;
        }
        CheckoutSnapshot {
            state,
            totals: self.totals(),
            loading: self.is_loading(),
        }
    }

    /// Totals for the current cart.
    #[must_use]
    pub fn totals(&self) -> Totals {
        Totals::for_lines(&self.inner.deps.cart.lines())
    }

    /// Whether any request is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.pending.load(Ordering::Acquire) > 0
    }

    /// Whether the session has not been abandoned.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    /// Select a saved address for shipping and billing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnknownAddress`] if the address is not loaded.
    #[instrument(skip(self))]
    pub async fn select_address(&self, id: AddressId) -> Result<(), CheckoutError> {
        let mut state = self.inner.state.write().await;
        self.ensure_open(&state)?;
        let selected = state.select_address(id);
        drop(state);

        selected.map_err(|e| self.surface(e))
    }

    /// Select a payment method.
    ///
    /// Card details are dropped when switching to a method that does not
    /// collect them.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has ended.
    #[instrument(skip(self))]
    pub async fn select_payment(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        let mut state = self.inner.state.write().await;
        self.ensure_open(&state)?;
        state.selected_payment = Some(method);
        if !method.collects_card_details() {
            state.card_details = None;
        }
        Ok(())
    }

    /// Store card details entered on the payment step.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has ended.
    pub async fn set_card_details(&self, details: CardDetails) -> Result<(), CheckoutError> {
        let mut state = self.inner.state.write().await;
        self.ensure_open(&state)?;
        state.card_details = Some(details);
        Ok(())
    }

    /// Continue to the next step.
    ///
    /// The address step needs a selected address and the payment step a
    /// selected payment method. At the review step nothing changes.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] (the shopper is alerted) when the
    /// current step is incomplete.
    #[instrument(skip(self))]
    pub async fn advance(&self) -> Result<CheckoutStep, CheckoutError> {
        let mut state = self.inner.state.write().await;
        self.ensure_open(&state)?;
        let current = state.step;
        let moved = state.advance();
        drop(state);

        match moved.map_err(|e| self.surface(e))? {
            Some(step) => {
                tracing::info!(step = step.number(), "Advanced checkout step");
                let number = step.number().to_string();
                add_breadcrumb(
                    "checkout",
                    &format!("Advanced to {}", step.title()),
                    Some(&[("step", number.as_str())]),
                );
                self.inner.deps.view.scroll_to_top();
                Ok(step)
            }
            None => Ok(current),
        }
    }

    /// Go back to an earlier step. Requests for later steps are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session has ended.
    #[instrument(skip(self))]
    pub async fn go_to_step(&self, step: CheckoutStep) -> Result<CheckoutStep, CheckoutError> {
        let mut state = self.inner.state.write().await;
        self.ensure_open(&state)?;
        Ok(state.go_back_to(step))
    }

    /// Save a new address from the form and select it.
    ///
    /// The form is cleared on success and kept on failure.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for an incomplete form (nothing is sent)
    /// or the API error if saving failed. The shopper is alerted either way.
    #[instrument(skip(self, form))]
    pub async fn create_address(&self, form: &mut AddressForm) -> Result<Address, CheckoutError> {
        self.check_open().await?;
        let input = form.validate().map_err(|e| self.surface(e))?;

        let result = {
            let _loading = LoadingGuard::start(&self.inner.pending);
            self.inner.deps.addresses.create_address(&input).await
        };
        self.ensure_alive()?;

        match result {
            Ok(address) => {
                let mut state = self.inner.state.write().await;
                self.ensure_open(&state)?;
                state.addresses.push(address.clone());
                state.selected_address_id = Some(address.id.clone());
                drop(state);

                *form = AddressForm::default();
                tracing::info!(address_id = %address.id, "Saved new address");
                add_breadcrumb("checkout", "Saved new address", None);
                Ok(address)
            }
            Err(e) => {
                report_api_error("Saving address", &e);
                self.inner.deps.view.alert(&e.user_message(SAVE_ADDRESS_FAILED));
                Err(e.into())
            }
        }
    }

    /// Delete a saved address after the shopper confirms.
    ///
    /// Returns `false` if the shopper declined. If the deleted address was
    /// selected, the first remaining one is selected instead.
    ///
    /// # Errors
    ///
    /// Returns the API error (the shopper is alerted) if deletion failed.
    #[instrument(skip(self))]
    pub async fn delete_address(&self, id: AddressId) -> Result<bool, CheckoutError> {
        self.check_open().await?;
        if !self.inner.deps.view.confirm(DELETE_ADDRESS_PROMPT) {
            tracing::debug!("Address deletion declined");
            return Ok(false);
        }

        let result = {
            let _loading = LoadingGuard::start(&self.inner.pending);
            self.inner.deps.addresses.delete_address(&id).await
        };
        self.ensure_alive()?;

        match result {
            Ok(()) => {
                let mut state = self.inner.state.write().await;
                self.ensure_open(&state)?;
                state.remove_address(&id);
                tracing::info!(selected = ?state.selected_address_id, "Deleted address");
                Ok(true)
            }
            Err(e) => {
                report_api_error("Deleting address", &e);
                self.inner
                    .deps
                    .view
                    .alert(&e.user_message(DELETE_ADDRESS_FAILED));
                Err(e.into())
            }
        }
    }

    /// What the review step shows.
    pub async fn review_summary(&self) -> ReviewSummary {
        let state = self.inner.state.read().await;
        let lines = self.inner.deps.cart.lines();
        ReviewSummary {
            address: state.selected_address().cloned(),
            payment: state.selected_payment,
            card: state
                .card_details
                .as_ref()
                .and_then(CardDetails::masked_number),
            totals: Totals::for_lines(&lines),
            lines,
        }
    }

    /// Place the order from the review step.
    ///
    /// On success the cart is cleared, the session ends, and the shopper is
    /// sent to the confirmation page. On failure the session stays on the
    /// review step so the shopper can retry.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInFlight`] if a submission is outstanding
    /// - [`CheckoutError::AlreadySubmitted`] if this session placed its order
    /// - a [`ValidationError`] if not at the review step or no address is selected
    /// - [`CheckoutError::OrderFailed`] if the order API failed (the shopper is alerted)
    /// - [`CheckoutError::Abandoned`] if the shopper left before the response
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<OrderConfirmation, CheckoutError> {
        let Some(_submitting) = SubmitGuard::acquire(&self.inner.submitting) else {
            tracing::debug!("Ignoring duplicate order submission");
            return Err(CheckoutError::SubmissionInFlight);
        };

        let state = self.inner.state.read().await;
        self.ensure_open(&state)?;
        let prepared = if state.step == CheckoutStep::Review {
            state
                .selected_address()
                .map(|address| {
                    build_order_request(
                        address,
                        state.selected_payment,
                        contact_email(self.inner.deps.identity.as_ref()),
                    )
                })
                .ok_or(ValidationError::MissingAddress)
        } else {
            Err(ValidationError::NotAtReview)
        };
        drop(state);

        let request = prepared.map_err(|e| self.surface(e))?;
        let totals = self.totals();

        tracing::info!(
            payment_method = %request.payment_method,
            grand_total = %totals.grand_total,
            "Placing order"
        );
        add_breadcrumb(
            "checkout",
            "Placing order",
            Some(&[("payment_method", request.payment_method.as_str())]),
        );

        let result = {
            let _loading = LoadingGuard::start(&self.inner.pending);
            self.inner.deps.orders.place_order(&request).await
        };
        self.ensure_alive()?;

        match result {
            Ok(placed) => {
                self.inner.state.write().await.discard(Phase::Submitted);
                self.inner.deps.cart.clear();

                let confirmation = OrderConfirmation {
                    order_id: placed.order_id,
                    totals,
                };
                match &confirmation.order_id {
                    Some(order_id) => tracing::info!(%order_id, "Order placed"),
                    None => tracing::warn!("Order placed but the response carried no order id"),
                }
                add_breadcrumb("checkout", "Order placed", None);

                self.inner
                    .deps
                    .view
                    .navigate(Route::OrderConfirmation(confirmation.clone()));
                Ok(confirmation)
            }
            Err(source) => {
                report_api_error("Placing order", &source);
                let message = source.user_message(PLACE_ORDER_FAILED);
                self.inner.deps.view.alert(&message);
                Err(CheckoutError::OrderFailed { message, source })
            }
        }
    }

    /// End the session because the shopper left checkout.
    ///
    /// Entered data is discarded and responses still in flight are ignored
    /// when they arrive.
    #[instrument(skip(self))]
    pub async fn abandon(&self) {
        if !self.inner.alive.swap(false, Ordering::AcqRel) {
            return;
        }
        let mut state = self.inner.state.write().await;
        if state.phase != Phase::Submitted {
            state.discard(Phase::Abandoned);
        }
        tracing::info!("Checkout abandoned");
    }

    async fn check_open(&self) -> Result<(), CheckoutError> {
        let state = self.inner.state.read().await;
        self.ensure_open(&state)
    }

    fn ensure_open(&self, state: &CheckoutState) -> Result<(), CheckoutError> {
        if !self.is_alive() || state.phase == Phase::Abandoned {
            return Err(CheckoutError::Abandoned);
        }
        if state.phase == Phase::Submitted {
            return Err(CheckoutError::AlreadySubmitted);
        }
        Ok(())
    }

    fn ensure_alive(&self) -> Result<(), CheckoutError> {
        if self.is_alive() {
            Ok(())
        } else {
            tracing::debug!("Dropping response for abandoned checkout");
            Err(CheckoutError::Abandoned)
        }
    }

    /// Alert the shopper about a validation failure.
    fn surface(&self, err: ValidationError) -> CheckoutError {
        tracing::debug!(reason = %err, "Checkout validation failed");
        self.inner.deps.view.alert(&err.to_string());
        err.into()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::AtomicI64;

    use async_trait::async_trait;
    use facet_core::{AddressType, OrderId, ProductId, RawPrice};
    use secrecy::SecretString;
    use tokio::sync::{Notify, Semaphore};

    use super::*;
    use crate::api::{AddressInput, ApiError, OrderRequest, PlacedOrder};
    use crate::services::{CartLine, MemoryCart, StaticIdentity};

    struct FakeBackend {
        addresses: Mutex<Vec<Address>>,
        orders: Mutex<Vec<OrderRequest>>,
        fail_next: Mutex<Option<ApiError>>,
        list_calls: AtomicUsize,
        next_id: AtomicI64,
        list_gate: Semaphore,
        list_entered: Notify,
        order_gate: Semaphore,
        order_entered: Notify,
    }

    impl FakeBackend {
        fn new(addresses: Vec<Address>) -> Self {
            Self {
                addresses: Mutex::new(addresses),
                orders: Mutex::new(Vec::new()),
                fail_next: Mutex::new(None),
                list_calls: AtomicUsize::new(0),
                next_id: AtomicI64::new(100),
                list_gate: Semaphore::new(1),
                list_entered: Notify::new(),
                order_gate: Semaphore::new(1),
                order_entered: Notify::new(),
            }
        }

        fn fail_next(&self, err: ApiError) {
            *self.fail_next.lock().unwrap() = Some(err);
        }

        fn take_failure(&self) -> Result<(), ApiError> {
            self.fail_next.lock().unwrap().take().map_or(Ok(()), Err)
        }

        fn order_count(&self) -> usize {
            self.orders.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl AddressApi for FakeBackend {
        async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.list_entered.notify_one();
            let _permit = self.list_gate.acquire().await.unwrap();
            self.take_failure()?;
            Ok(self.addresses.lock().unwrap().clone())
        }

        async fn create_address(&self, input: &AddressInput) -> Result<Address, ApiError> {
            self.take_failure()?;
            let address = Address {
                id: AddressId::from(self.next_id.fetch_add(1, Ordering::SeqCst)),
                name: input.name.clone(),
                phone: input.phone.clone(),
                line1: input.line1.clone(),
                city: input.city.name().to_string(),
                country: input.country.clone(),
                address_type: input.address_type,
                is_default: input.is_default,
            };
            self.addresses.lock().unwrap().push(address.clone());
            Ok(address)
        }

        async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError> {
            self.take_failure()?;
            self.addresses.lock().unwrap().retain(|a| &a.id != id);
            Ok(())
        }
    }

    #[async_trait]
    impl OrderApi for FakeBackend {
        async fn place_order(&self, request: &OrderRequest) -> Result<PlacedOrder, ApiError> {
            self.orders.lock().unwrap().push(request.clone());
            self.order_entered.notify_one();
            let _permit = self.order_gate.acquire().await.unwrap();
            self.take_failure()?;
            Ok(PlacedOrder {
                order_id: Some(OrderId::new("ORD-1001")),
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum ViewEvent {
        Navigate(Route),
        ScrollToTop,
        Alert(String),
        Confirm(String),
    }

    struct RecordingView {
        events: Mutex<Vec<ViewEvent>>,
        confirm_answer: AtomicBool,
    }

    impl RecordingView {
        fn events(&self) -> Vec<ViewEvent> {
            self.events.lock().unwrap().clone()
        }

        fn alerts(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::Alert(message) => Some(message),
                    _ => None,
                })
                .collect()
        }

        fn navigations(&self) -> Vec<Route> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    ViewEvent::Navigate(route) => Some(route),
                    _ => None,
                })
                .collect()
        }
    }

    impl CheckoutView for RecordingView {
        fn navigate(&self, route: Route) {
            self.events.lock().unwrap().push(ViewEvent::Navigate(route));
        }

        fn scroll_to_top(&self) {
            self.events.lock().unwrap().push(ViewEvent::ScrollToTop);
        }

        fn alert(&self, message: &str) {
            self.events
                .lock()
                .unwrap()
                .push(ViewEvent::Alert(message.to_string()));
        }

        fn confirm(&self, prompt: &str) -> bool {
            self.events
                .lock()
                .unwrap()
                .push(ViewEvent::Confirm(prompt.to_string()));
            self.confirm_answer.load(Ordering::SeqCst)
        }
    }

    struct Harness {
        controller: CheckoutController,
        backend: Arc<FakeBackend>,
        cart: Arc<MemoryCart>,
        view: Arc<RecordingView>,
    }

    fn address(id: i64, is_default: bool) -> Address {
        Address {
            id: AddressId::from(id),
            name: "Jane Mary Doe".to_string(),
            phone: "555-0100".to_string(),
            line1: format!("{id} Gem St"),
            city: "Chicago".to_string(),
            country: "United State".to_string(),
            address_type: AddressType::Home,
            is_default,
        }
    }

    fn ring() -> CartLine {
        CartLine {
            product_ref: ProductId::new(7),
            display_name: "Diamond Ring".to_string(),
            unit_price: RawPrice::from("$1,200.00"),
            quantity: 2,
            image_ref: None,
        }
    }

    fn harness(lines: Vec<CartLine>, addresses: Vec<Address>) -> Harness {
        let backend = Arc::new(FakeBackend::new(addresses));
        let cart = Arc::new(MemoryCart::new(lines));
        let view = Arc::new(RecordingView {
            events: Mutex::new(Vec::new()),
            confirm_answer: AtomicBool::new(true),
        });
        let controller = CheckoutController::new(CheckoutDeps {
            addresses: backend.clone(),
            orders: backend.clone(),
            cart: cart.clone(),
            identity: Arc::new(StaticIdentity {
                user_email: Some("jane@facet.shop".to_string()),
                cached_email: None,
            }),
            view: view.clone(),
        });
        Harness {
            controller,
            backend,
            cart,
            view,
        }
    }

    async fn at_review(h: &Harness) {
        assert_eq!(h.controller.mount().await.unwrap(), MountOutcome::Ready);
        h.controller.advance().await.unwrap();
        h.controller.select_payment(PaymentMethod::Cod).await.unwrap();
        h.controller.advance().await.unwrap();
    }

    fn unavailable() -> ApiError {
        ApiError::Status {
            status: 503,
            message: None,
        }
    }

    #[tokio::test]
    async fn test_empty_cart_redirects_without_loading() {
        let h = harness(vec![], vec![address(1, true)]);

        let outcome = h.controller.mount().await.unwrap();

        assert_eq!(outcome, MountOutcome::RedirectedToCart);
        assert_eq!(h.view.navigations(), vec![Route::Cart]);
        assert_eq!(h.backend.list_calls.load(Ordering::SeqCst), 0);
        assert!(!h.controller.is_alive());
        assert!(matches!(
            h.controller.advance().await,
            Err(CheckoutError::Abandoned)
        ));
    }

    #[tokio::test]
    async fn test_mount_preselects_default_address() {
        let h = harness(vec![ring()], vec![address(1, false), address(2, true)]);

        h.controller.mount().await.unwrap();

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.state.step, CheckoutStep::Address);
        assert_eq!(snapshot.state.addresses.len(), 2);
        assert_eq!(snapshot.state.selected_address_id, Some(AddressId::from(2)));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_mount_alerts_when_addresses_fail() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.backend.fail_next(unavailable());

        let err = h.controller.mount().await.unwrap_err();

        assert!(matches!(err, CheckoutError::Api(ApiError::Status { status: 503, .. })));
        assert_eq!(h.view.alerts(), vec![LOAD_ADDRESSES_FAILED.to_string()]);
        assert!(h.controller.snapshot().await.state.addresses.is_empty());
    }

    #[tokio::test]
    async fn test_advance_requires_address() {
        let h = harness(vec![ring()], vec![]);
        h.controller.mount().await.unwrap();

        let err = h.controller.advance().await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingAddress)
        ));
        assert_eq!(
            h.view.alerts(),
            vec!["Please select a shipping address".to_string()]
        );
        assert_eq!(h.controller.snapshot().await.state.step, CheckoutStep::Address);
    }

    #[tokio::test]
    async fn test_advance_requires_payment_and_stops_at_review() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.controller.mount().await.unwrap();

        assert_eq!(h.controller.advance().await.unwrap(), CheckoutStep::Payment);
        assert!(matches!(
            h.controller.advance().await,
            Err(CheckoutError::Validation(ValidationError::MissingPayment))
        ));

        h.controller.select_payment(PaymentMethod::Klarna).await.unwrap();
        assert_eq!(h.controller.advance().await.unwrap(), CheckoutStep::Review);
        assert_eq!(h.controller.advance().await.unwrap(), CheckoutStep::Review);

        let scrolls = h
            .view
            .events()
            .into_iter()
            .filter(|e| *e == ViewEvent::ScrollToTop)
            .count();
        assert_eq!(scrolls, 2);
        assert_eq!(h.backend.order_count(), 0);
    }

    #[tokio::test]
    async fn test_go_to_step_only_moves_back() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.controller.mount().await.unwrap();
        h.controller.advance().await.unwrap();

        assert_eq!(
            h.controller.go_to_step(CheckoutStep::Review).await.unwrap(),
            CheckoutStep::Payment
        );
        assert_eq!(
            h.controller.go_to_step(CheckoutStep::Address).await.unwrap(),
            CheckoutStep::Address
        );
    }

    #[tokio::test]
    async fn test_create_address_selects_it_and_clears_form() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.controller.mount().await.unwrap();

        let mut form = AddressForm {
            name: "Ada Lovelace".to_string(),
            phone: "555-0199".to_string(),
            line1: "9 Opal Ave".to_string(),
            city: "Miami".to_string(),
            ..AddressForm::default()
        };
        let created = h.controller.create_address(&mut form).await.unwrap();

        assert_eq!(created.id, AddressId::from(100));
        assert_eq!(created.country, "United State");
        assert_eq!(form, AddressForm::default());
        let state = h.controller.snapshot().await.state;
        assert_eq!(state.addresses.len(), 2);
        assert_eq!(state.selected_address_id, Some(created.id));
    }

    #[tokio::test]
    async fn test_invalid_form_is_not_sent() {
        let h = harness(vec![ring()], vec![]);
        h.controller.mount().await.unwrap();

        let mut form = AddressForm {
            name: "Ada Lovelace".to_string(),
            line1: "9 Opal Ave".to_string(),
            city: "Miami".to_string(),
            ..AddressForm::default()
        };
        let err = h.controller.create_address(&mut form).await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::MissingField("phone number"))
        ));
        assert_eq!(form.name, "Ada Lovelace");
        assert!(h.backend.addresses.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form_and_alerts_api_message() {
        let h = harness(vec![ring()], vec![]);
        h.controller.mount().await.unwrap();
        h.backend.fail_next(ApiError::Status {
            status: 422,
            message: Some("phone: invalid number".to_string()),
        });

        let mut form = AddressForm {
            name: "Ada Lovelace".to_string(),
            phone: "x".to_string(),
            line1: "9 Opal Ave".to_string(),
            city: "Miami".to_string(),
            ..AddressForm::default()
        };
        assert!(h.controller.create_address(&mut form).await.is_err());

        assert_eq!(form.phone, "x");
        assert_eq!(h.view.alerts(), vec!["phone: invalid number".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let h = harness(vec![ring()], vec![address(1, false), address(2, true)]);
        h.controller.mount().await.unwrap();

        h.view.confirm_answer.store(false, Ordering::SeqCst);
        assert!(!h.controller.delete_address(AddressId::from(2)).await.unwrap());
        assert_eq!(h.backend.addresses.lock().unwrap().len(), 2);

        h.view.confirm_answer.store(true, Ordering::SeqCst);
        assert!(h.controller.delete_address(AddressId::from(2)).await.unwrap());

        let state = h.controller.snapshot().await.state;
        assert_eq!(state.addresses.len(), 1);
        assert_eq!(state.selected_address_id, Some(AddressId::from(1)));
        assert!(
            h.view
                .events()
                .contains(&ViewEvent::Confirm(DELETE_ADDRESS_PROMPT.to_string()))
        );
    }

    #[tokio::test]
    async fn test_place_order_requires_review_step() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.controller.mount().await.unwrap();

        let err = h.controller.place_order().await.unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Validation(ValidationError::NotAtReview)
        ));
        assert_eq!(h.backend.order_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_order_clears_cart_and_navigates() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        at_review(&h).await;
        let expected_totals = h.controller.totals();

        let confirmation = h.controller.place_order().await.unwrap();

        assert_eq!(confirmation.order_id, Some(OrderId::new("ORD-1001")));
        assert_eq!(confirmation.totals, expected_totals);
        assert!(h.cart.is_empty());
        assert_eq!(
            h.view.navigations(),
            vec![Route::OrderConfirmation(confirmation)]
        );

        let request = h.backend.orders.lock().unwrap().first().cloned().unwrap();
        assert_eq!(request.payment_method, "cod");
        assert_eq!(request.shipping_address.email.as_deref(), Some("jane@facet.shop"));

        let state = h.controller.snapshot().await.state;
        assert_eq!(state.phase, Phase::Submitted);
        assert!(state.addresses.is_empty());

        assert!(matches!(
            h.controller.place_order().await,
            Err(CheckoutError::AlreadySubmitted)
        ));
        assert_eq!(h.backend.order_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_order_stays_on_review() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        at_review(&h).await;
        h.backend.fail_next(ApiError::Rejected {
            message: Some("Item out of stock".to_string()),
        });

        let err = h.controller.place_order().await.unwrap_err();

        assert!(matches!(
            &err,
            CheckoutError::OrderFailed { message, .. } if message == "Item out of stock"
        ));
        assert_eq!(h.view.alerts(), vec!["Item out of stock".to_string()]);
        assert!(!h.cart.is_empty());
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.state.step, CheckoutStep::Review);
        assert_eq!(snapshot.state.phase, Phase::Active);

        h.controller.place_order().await.unwrap();
        assert_eq!(h.backend.order_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_order_without_message_uses_fallback() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        at_review(&h).await;
        h.backend.fail_next(unavailable());

        assert!(h.controller.place_order().await.is_err());
        assert_eq!(h.view.alerts(), vec![PLACE_ORDER_FAILED.to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_submit_sends_one_order() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        at_review(&h).await;
        h.backend.order_gate.try_acquire().unwrap().forget();

        let first = tokio::spawn({
            let controller = h.controller.clone();
            async move { controller.place_order().await }
        });
        h.backend.order_entered.notified().await;

        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.state.phase, Phase::Submitting);
        assert!(snapshot.loading);
        assert!(matches!(
            h.controller.place_order().await,
            Err(CheckoutError::SubmissionInFlight)
        ));

        h.backend.order_gate.add_permits(1);
        first.await.unwrap().unwrap();

        assert_eq!(h.backend.order_count(), 1);
        assert!(h.view.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_abandon_drops_late_address_response() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.backend.list_gate.try_acquire().unwrap().forget();

        let mount = tokio::spawn({
            let controller = h.controller.clone();
            async move { controller.mount().await }
        });
        h.backend.list_entered.notified().await;
        assert!(h.controller.is_loading());

        h.controller.abandon().await;
        h.backend.list_gate.add_permits(1);

        assert!(matches!(
            mount.await.unwrap(),
            Err(CheckoutError::Abandoned)
        ));
        let snapshot = h.controller.snapshot().await;
        assert_eq!(snapshot.state.phase, Phase::Abandoned);
        assert!(snapshot.state.addresses.is_empty());
        assert!(!snapshot.loading);
        assert!(h.view.events().is_empty());
    }

    #[tokio::test]
    async fn test_abandon_during_submission_skips_navigation() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        at_review(&h).await;
        h.backend.order_gate.try_acquire().unwrap().forget();

        let submit = tokio::spawn({
            let controller = h.controller.clone();
            async move { controller.place_order().await }
        });
        h.backend.order_entered.notified().await;

        h.controller.abandon().await;
        h.backend.order_gate.add_permits(1);

        assert!(matches!(
            submit.await.unwrap(),
            Err(CheckoutError::Abandoned)
        ));
        assert!(h.view.navigations().is_empty());
        assert!(!h.cart.is_empty());
    }

    #[tokio::test]
    async fn test_card_details_follow_payment_method() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.controller.mount().await.unwrap();

        h.controller.select_payment(PaymentMethod::Card).await.unwrap();
        h.controller
            .set_card_details(CardDetails {
                number: SecretString::from("4242 4242 4242 4242"),
                holder_name: "Jane Doe".to_string(),
                expiry: "12/29".to_string(),
                cvv: SecretString::from("123"),
            })
            .await
            .unwrap();

        let summary = h.controller.review_summary().await;
        assert_eq!(summary.card.as_deref(), Some("•••• 4242"));
        assert_eq!(summary.address.map(|a| a.id), Some(AddressId::from(1)));
        assert_eq!(summary.lines.len(), 1);

        h.controller.select_payment(PaymentMethod::Paypal).await.unwrap();
        assert_eq!(h.controller.review_summary().await.card, None);
    }

    #[tokio::test]
    async fn test_select_unknown_address_is_rejected() {
        let h = harness(vec![ring()], vec![address(1, true)]);
        h.controller.mount().await.unwrap();

        assert!(matches!(
            h.controller.select_address(AddressId::from(42)).await,
            Err(CheckoutError::Validation(ValidationError::UnknownAddress(_)))
        ));
        assert_eq!(
            h.controller.snapshot().await.state.selected_address_id,
            Some(AddressId::from(1))
        );
    }
}
