use crate::store::OrderStore;

#[derive(Clone)]
pub struct AppState {
    pub store: OrderStore,
}

impl AppState {
    pub fn new(store: OrderStore) -> Self {
        Self { store }
    }
}
