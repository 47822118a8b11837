pub mod controller;
pub mod loader;
pub mod view;

pub use crate::domain::model::{LatLng, LoadReport, LoadStatus, Place, Selection, Store, StoreId};
pub use crate::domain::ports::{ConfigProvider, FeedSource, MapEvent, MapOptions, MapProvider};
pub use crate::utils::error::Result;
