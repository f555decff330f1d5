// src/app/ui/trending.rs
use eframe::egui as eg;

const THUMB_W: f32 = 72.0;

impl crate::app::MovieApp {
    pub(crate) fn ui_render_trending(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        ui.heading("Trending Movies");
        ui.add_space(4.0);

        let entries: Vec<(usize, String, String)> = self
            .state
            .trending
            .iter()
            .enumerate()
            .map(|(i, t)| (i + 1, t.search_term.clone(), t.poster_url.clone()))
            .collect();

        let mut uploads_left = super::super::MAX_UPLOADS_PER_FRAME;

        eg::ScrollArea::horizontal()
            .id_source("trending_strip")
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    for (rank, term, url) in entries {
                        ui.label(eg::RichText::new(rank.to_string()).size(36.0).strong());

                        let size = eg::vec2(THUMB_W, THUMB_W * 1.5);
                        let tex = if url.is_empty() {
                            None
                        } else {
                            let key = self.request_poster(&url);
                            self.poster_texture(ctx, &key, &mut uploads_left)
                        };
                        match tex {
                            Some(tex) => {
                                ui.add(eg::Image::new((tex.id(), size)).rounding(6.0))
                                    .on_hover_text(term.as_str());
                            }
                            None => {
                                let (rect, resp) = ui.allocate_exact_size(size, eg::Sense::hover());
                                ui.painter().rect_filled(rect, 6.0, eg::Color32::from_gray(40));
                                resp.on_hover_text(term.as_str());
                            }
                        }
                        ui.add_space(12.0);
                    }
                });
            });
    }
}
