use std::sync::Arc;

use chrono::NaiveDate;
use lovenest_store::{MessageStore, PhotoCatalog};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub messages: Box<dyn MessageStore>,
    pub photos: PhotoCatalog,
    /// Day the relationship started; `days_together` counts from its midnight.
    pub start_date: NaiveDate,
}
