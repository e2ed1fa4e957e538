// Application state for HTTP handlers
use crate::application::panel_service::PanelService;

#[derive(Clone)]
pub struct AppState {
    pub panel_service: PanelService,
}
