pub mod explorer;
pub mod fetcher;
pub mod filter;
pub mod normalize;
pub mod projection;
pub mod scene;
pub mod store;
pub mod tooltip;

pub use crate::domain::model::{Film, ProjectedPoint, Starship, TooltipPlacement};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;
