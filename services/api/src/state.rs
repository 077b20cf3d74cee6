//! Application state shared across handlers

use axum::extract::FromRef;
use common::session::SessionManager;
use std::sync::Arc;

use crate::{
    catalog::ProductCatalog,
    contact::{ContactNotifier, ContactService},
    dashboard::DashboardService,
    repositories::Stores,
    revalidation::RevalidationBus,
    reviews::ReviewService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionManager,
    pub catalog: ProductCatalog,
    pub reviews: ReviewService,
    pub dashboard: DashboardService,
    pub contact: ContactService,
}

impl AppState {
    pub fn new(
        sessions: SessionManager,
        stores: Stores,
        revalidation: RevalidationBus,
        notifier: Arc<dyn ContactNotifier>,
    ) -> Self {
        Self {
            sessions,
            catalog: ProductCatalog::new(
                stores.products.clone(),
                stores.categories,
                revalidation.clone(),
            ),
            reviews: ReviewService::new(
                stores.reviews.clone(),
                stores.products.clone(),
                revalidation,
            ),
            dashboard: DashboardService::new(stores.products, stores.reviews, stores.sellers),
            contact: ContactService::new(stores.contacts, notifier),
        }
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}
