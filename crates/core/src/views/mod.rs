//! Dashboard views: selection handling, load generations and the active snapshot.

mod view_model;
mod view_service;


pub use view_model::{
    ApplyStatus, LoadOutcome, LoadRequest, LoadTicket, LoadedYears, Mode, Selection, ViewEvent,
    ViewState,
};
pub use view_service::DashboardView;
