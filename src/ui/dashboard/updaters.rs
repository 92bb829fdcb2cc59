//! Dashboard state update logic
//!
//! Contains all methods for updating dashboard state from events and request results

use super::state::DashboardState;
use crate::chart::ChartState;
use crate::panel::PanelUpdate;

impl DashboardState {
    /// Advance the animation tick and move queued events into the activity log.
    pub fn update(&mut self) {
        self.tick += 1;

        while let Some(event) = self.pending_events.pop_front() {
            self.add_to_activity_log(event);
        }
    }

    /// Applies the result of a background request.
    ///
    /// Returns `true` when the panel should be refreshed next.
    pub fn apply_update(&mut self, update: PanelUpdate) -> bool {
        match update {
            PanelUpdate::Refreshed(refresh) => {
                self.panel.apply_refresh(refresh);
                false
            }
            PanelUpdate::RefreshFailed(reason) => {
                self.panel
                    .set_fallback(format!("Comments unavailable: {}", reason));
                false
            }
            PanelUpdate::CommentPosted => true,
            PanelUpdate::ChartLoaded(tables) => {
                self.chart = ChartState::Loaded(tables);
                false
            }
            PanelUpdate::ChartFailed(reason) => {
                self.chart = ChartState::Failed(reason);
                false
            }
        }
    }
}
