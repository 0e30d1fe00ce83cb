mod ground_target;
mod prefilter;
mod visibility_engine;
mod visibility_window;

pub use ground_target::GroundTarget;
pub use prefilter::{FilterRejection, FilterReport, VisibilityFilter};
pub use visibility_engine::{
    GeometryError, VisibilityConfig, VisibilityEngine, VisibilityError, elevation_deg, is_visible,
};
pub use visibility_window::VisibilityWindow;
