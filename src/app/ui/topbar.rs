// src/app/ui/topbar.rs
use eframe::egui as eg;

use crate::app::prefs::{POSTER_W_MAX, POSTER_W_MIN};
use crate::catalog::ViewMode;

impl crate::app::MovieApp {
    // ---------- TOP BAR ----------
    pub(crate) fn ui_render_topbar(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            // Search
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.state.search_term)
                    .hint_text("Search through thousands of movies")
                    .desired_width(320.0),
            );
            if resp.changed() {
                self.on_search_edited();
            }

            // Modes only make sense while browsing
            if self.state.modes_visible() {
                ui.separator();
                let mut picked = None;
                for mode in [ViewMode::Latest, ViewMode::Upcoming] {
                    if ui
                        .selectable_label(self.state.mode == mode, mode.label())
                        .clicked()
                    {
                        picked = Some(mode);
                    }
                }
                if let Some(mode) = picked {
                    self.set_mode(mode);
                }
            }

            ui.separator();

            // Poster size
            ui.label("Poster:");
            if ui
                .add(
                    eg::Slider::new(&mut self.poster_width_ui, POSTER_W_MIN..=POSTER_W_MAX)
                        .suffix(" px"),
                )
                .changed()
            {
                self.mark_dirty();
            }
        });
    }
}
