use promopal_db::Catalog;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}
