// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::catalog::MovieSummary;

pub const H_SPACING: f32 = 4.0;
pub const V_SPACING: f32 = 10.0;

/// "7.4 • ta • 2024", with N/A for anything the catalog left out.
pub fn card_meta_line(movie: &MovieSummary) -> String {
    let rating = movie
        .vote_average
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "N/A".into());
    let lang = if movie.original_language.is_empty() {
        "N/A".to_string()
    } else {
        movie.original_language.clone()
    };
    let year = movie
        .release_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".into());
    format!("★ {rating} • {lang} • {year}")
}

impl crate::app::MovieApp {
    pub(crate) fn ui_render_grid(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        let card_w: f32 = self.poster_width_ui;
        let text_h: f32 = 48.0;
        let card_h: f32 = card_w * 1.5 + text_h;

        let base = self.cfg.image_base_url.clone();
        let cards: Vec<(String, String, Option<String>)> = self
            .state
            .movies
            .iter()
            .map(|m| (m.title.clone(), card_meta_line(m), m.poster_url(&base)))
            .collect();

        if cards.is_empty() {
            ui.label(eg::RichText::new("No movies found.").weak());
            return;
        }

        let mut uploads_left = super::super::MAX_UPLOADS_PER_FRAME;

        eg::ScrollArea::vertical()
            .id_source("movie_grid")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                let avail = ui.available_width();
                let cols = ((avail + H_SPACING) / (card_w + H_SPACING))
                    .floor()
                    .max(1.0) as usize;

                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);

                    for (col, (title, meta, url)) in cards.into_iter().enumerate() {
                        if col > 0 && col % cols == 0 {
                            ui.end_row();
                        }

                        let tex = url.and_then(|u| {
                            let key = self.request_poster(&u);
                            self.poster_texture(ctx, &key, &mut uploads_left)
                        });

                        ui.allocate_ui_with_layout(
                            eg::vec2(card_w, card_h),
                            eg::Layout::top_down(eg::Align::Min),
                            |ui| {
                                ui.set_min_size(eg::vec2(card_w, card_h));
                                let rect = ui.max_rect();

                                let poster_rect = eg::Rect::from_min_max(
                                    rect.min,
                                    eg::pos2(rect.min.x + card_w, rect.min.y + card_w * 1.5),
                                );
                                let text_rect = eg::Rect::from_min_max(
                                    eg::pos2(rect.min.x, poster_rect.max.y),
                                    rect.max,
                                );

                                // Poster
                                if let Some(tex) = &tex {
                                    ui.painter().image(
                                        tex.id(),
                                        poster_rect,
                                        eg::Rect::from_min_max(
                                            eg::pos2(0.0, 0.0),
                                            eg::pos2(1.0, 1.0),
                                        ),
                                        eg::Color32::WHITE,
                                    );
                                } else {
                                    ui.painter().rect_filled(
                                        poster_rect,
                                        6.0,
                                        eg::Color32::from_gray(40),
                                    );
                                }

                                ui.allocate_ui_at_rect(text_rect, |ui| {
                                    ui.add(
                                        eg::Label::new(
                                            eg::RichText::new(title).size(14.0).strong(),
                                        )
                                        .truncate(),
                                    );
                                    ui.label(eg::RichText::new(meta).size(12.0).weak());
                                });
                            },
                        );
                    }

                    ui.end_row();
                });
            });
    }
}
