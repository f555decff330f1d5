// src/app/ui/mod.rs
pub mod grid;
pub mod topbar;
pub mod trending;

use eframe::egui as eg;

impl crate::app::MovieApp {
    pub(crate) fn ui_render_main(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        ui.vertical_centered(|ui| {
            ui.add_space(12.0);
            ui.heading("Find Movies You'll Enjoy Without the Hassle");
            ui.add_space(8.0);
        });

        self.ui_render_topbar(ui);
        ui.add_space(6.0);

        if !self.state.trending.is_empty() {
            self.ui_render_trending(ui, ctx);
            ui.add_space(6.0);
        }

        ui.separator();
        ui.heading("All Movies");
        ui.add_space(4.0);

        // spinner, error, or grid; never more than one
        if self.state.is_loading {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.add(eg::Spinner::new().size(24.0));
            });
        } else if let Some(msg) = &self.state.error_message {
            ui.colored_label(ui.visuals().error_fg_color, msg.as_str());
        } else {
            self.ui_render_grid(ui, ctx);
        }
    }
}
