//! Service layer: data sources and the pure transformations between them.

pub mod areas;
pub mod color;
pub mod error;
pub mod join;
pub mod overview;

pub use areas::{AreaService, AreaSource, HttpAreaClient};
pub use color::{color_for, fill_color, DEFAULT_COLOR};
pub use error::{ServiceError, ServiceResult};
pub use join::join_overview;
pub use overview::{reduce_overview, HttpOverviewFetcher, OverviewSource};
