//! A single zoomable, exportable image tile.

use crate::error::{Error, Result};
use crate::export;
use crate::filter::FilterMode;
use crate::handle::ImageHandle;
use crate::view::{TileMode, ViewState, ViewTransform};
use eframe::egui;
use image::RgbaImage;
use std::sync::Arc;

/// Browser `deltaY` for one line-unit wheel notch, in pixels.
pub const LINE_DELTA_PIXELS: f32 = 100.0;

/// Converts a wheel event to a browser-style `deltaY` (positive scrolls down).
///
/// `page_height` scales page-unit events.
#[must_use]
pub fn wheel_delta_y(event: &egui::Event, page_height: f32) -> Option<f32> {
    let egui::Event::MouseWheel { unit, delta, .. } = event else {
        return None;
    };
    // egui scrolls positive upwards
    let pixels = match unit {
        egui::MouseWheelUnit::Point => delta.y,
        egui::MouseWheelUnit::Line => delta.y * LINE_DELTA_PIXELS,
        egui::MouseWheelUnit::Page => delta.y * page_height,
    };
    Some(-pixels)
}

/// Decoding progress of a tile's image.
#[derive(Debug, Clone)]
pub enum Decode {
    Pending,
    Ready(Arc<RgbaImage>),
    Failed(String),
}

/// What the tile wants the gallery to do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileAction {
    None,
    Export,
}

pub struct ViewerTile {
    handle: ImageHandle,
    decode: Decode,
    view: ViewState,
    /// Transform currently drawn; trails `view` while animating.
    shown: ViewTransform,
    /// Size of the unzoomed image rect from the last layout.
    display_size: Option<egui::Vec2>,
    texture: Option<(FilterMode, egui::TextureHandle)>,
}

impl ViewerTile {
    #[must_use]
    pub fn new(handle: ImageHandle) -> Self {
        Self {
            handle,
            decode: Decode::Pending,
            view: ViewState::new(),
            shown: ViewTransform::IDENTITY,
            display_size: None,
            texture: None,
        }
    }

    #[must_use]
    pub fn handle(&self) -> &ImageHandle {
        &self.handle
    }

    #[must_use]
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    #[must_use]
    pub fn decode_state(&self) -> &Decode {
        &self.decode
    }

    /// Decodes the handle if that has not been attempted yet.
    pub fn ensure_decoded(&mut self) {
        if !matches!(self.decode, Decode::Pending) {
            return;
        }
        self.decode = match self.handle.decode() {
            Ok(img) => {
                tracing::debug!(
                    name = self.handle.name(),
                    width = img.width(),
                    height = img.height(),
                    "decoded"
                );
                Decode::Ready(img)
            }
            Err(e) => {
                tracing::warn!("{e}");
                Decode::Failed(e.to_string())
            }
        };
    }

    /// Renders the committed view for export.
    ///
    /// Uses the view state rather than the eased transform being drawn, so
    /// an export during the transition shows where the view is settling.
    pub fn render_export(&self, filter: FilterMode) -> Result<RgbaImage> {
        let Decode::Ready(img) = &self.decode else {
            return Err(Error::NotDecoded);
        };
        let transform = self.view.transform();
        Ok(export::render_view(img, filter, transform, self.display_size))
    }

    fn texture(&mut self, ctx: &egui::Context, filter: FilterMode) -> Option<egui::TextureHandle> {
        let Decode::Ready(img) = &self.decode else {
            return None;
        };
        if let Some((mode, tex)) = &self.texture {
            if *mode == filter {
                return Some(tex.clone());
            }
        }

        // the previous filter's texture is freed when replaced
        let filtered = filter.apply(img);
        let size = [filtered.width() as usize, filtered.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, filtered.as_raw());
        let tex = ctx.load_texture(
            format!("tile-{}", self.handle.name()),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        self.texture = Some((filter, tex.clone()));
        Some(tex)
    }

    /// Routes this frame's pointer and wheel input into the view state.
    fn handle_input(&mut self, ui: &egui::Ui, rect: egui::Rect, response: &egui::Response) {
        if response.hovered() {
            let deltas: Vec<f32> = ui.input(|i| {
                i.events
                    .iter()
                    .filter_map(|e| wheel_delta_y(e, rect.height()))
                    .collect()
            });
            for delta in deltas {
                self.view.wheel(delta);
            }
            // smoothed scrolling trails the wheel events by a few frames, so
            // clear it on every hovered frame or the gallery scrolls as well
            ui.ctx().input_mut(|i| {
                i.raw_scroll_delta = egui::Vec2::ZERO;
                i.smooth_scroll_delta = egui::Vec2::ZERO;
            });
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or_else(|| response.interact_pointer_pos()) {
                self.view.pointer_down(pos);
            }
        }
        if self.view.drag().is_some() {
            let hover = ui.input(|i| i.pointer.hover_pos());
            match hover {
                Some(pos) if rect.contains(pos) => self.view.pointer_move(pos),
                _ => self.view.pointer_leave(),
            }
        }
        if response.drag_stopped() {
            self.view.pointer_up();
        }
    }

    /// Draws the tile and its export button.
    pub fn show(&mut self, ui: &mut egui::Ui, filter: FilterMode, size: egui::Vec2) -> TileAction {
        self.ensure_decoded();
        let mut action = TileAction::None;

        ui.vertical(|ui| {
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
            self.handle_input(ui, rect, &response);

            match self.view.mode() {
                TileMode::Dragging => ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing),
                TileMode::Zoomed if response.hovered() => {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
                }
                _ => {}
            }

            let painter = ui.painter_at(rect);
            painter.rect_filled(rect, 6.0, ui.visuals().extreme_bg_color);

            match self.texture(ui.ctx(), filter) {
                Some(tex) => {
                    let display = fit_rect(rect, tex.size_vec2());
                    self.display_size = Some(display.size());

                    let target = self.view.transform();
                    if self.view.mode() == TileMode::Dragging {
                        self.shown = target;
                    } else {
                        let dt = ui.input(|i| i.stable_dt);
                        if self.shown.approach(target, dt) {
                            ui.ctx().request_repaint();
                        }
                    }

                    painter.image(
                        tex.id(),
                        self.shown.place(display),
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
                None => {
                    let text = match &self.decode {
                        Decode::Failed(_) => "No se pudo mostrar la imagen",
                        _ => "Cargando…",
                    };
                    painter.text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::proportional(14.0),
                        ui.visuals().weak_text_color(),
                    );
                }
            }

            ui.horizontal(|ui| {
                ui.set_max_width(size.x);
                ui.label(egui::RichText::new(self.handle.name()).small());
                if ui.button("Descargar vista").clicked() {
                    action = TileAction::Export;
                }
            });
        });

        action
    }
}

/// Largest rect with the image's aspect ratio centred inside `outer`.
#[must_use]
pub fn fit_rect(outer: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return outer;
    }
    let ratio = (outer.width() / image_size.x).min(outer.height() / image_size.y);
    egui::Rect::from_center_size(outer.center(), image_size * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_handle(name: &str) -> ImageHandle {
        let img = RgbaImage::from_pixel(4, 2, Rgba([1, 2, 3, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        ImageHandle::from_bytes(name, out.into_inner())
    }

    #[test]
    fn export_before_decode_is_refused() {
        let tile = ViewerTile::new(png_handle("a.png"));
        assert!(matches!(tile.render_export(FilterMode::Normal), Err(Error::NotDecoded)));
    }

    #[test]
    fn broken_tile_refuses_export() {
        let mut tile = ViewerTile::new(ImageHandle::from_bytes("bad.png", vec![0u8; 8]));
        tile.ensure_decoded();
        assert!(matches!(tile.decode_state(), Decode::Failed(_)));
        assert!(matches!(tile.render_export(FilterMode::Sepia), Err(Error::NotDecoded)));
    }

    #[test]
    fn decoded_tile_exports_natural_size() {
        let mut tile = ViewerTile::new(png_handle("a.png"));
        tile.ensure_decoded();
        let raster = tile.render_export(FilterMode::Normal).unwrap();
        assert_eq!(raster.dimensions(), (4, 2));
        assert_eq!(*raster.get_pixel(3, 1), Rgba([1, 2, 3, 255]));
    }

    fn wheel(unit: egui::MouseWheelUnit, y: f32) -> egui::Event {
        egui::Event::MouseWheel {
            unit,
            delta: vec2(0.0, y),
            modifiers: egui::Modifiers::NONE,
        }
    }

    #[test]
    fn wheel_deltas_use_browser_convention() {
        let up_notch = wheel(egui::MouseWheelUnit::Line, 1.0);
        assert_eq!(wheel_delta_y(&up_notch, 240.0), Some(-LINE_DELTA_PIXELS));

        let down_points = wheel(egui::MouseWheelUnit::Point, -30.0);
        assert_eq!(wheel_delta_y(&down_points, 240.0), Some(30.0));

        let page = wheel(egui::MouseWheelUnit::Page, -1.0);
        assert_eq!(wheel_delta_y(&page, 240.0), Some(240.0));

        assert_eq!(wheel_delta_y(&egui::Event::PointerGone, 240.0), None);
    }

    #[test]
    fn one_line_notch_zooms_like_a_browser_notch() {
        let mut view = ViewState::new();
        let delta = wheel_delta_y(&wheel(egui::MouseWheelUnit::Line, 1.0), 240.0).unwrap();
        view.wheel(delta);
        assert!((view.scale() - 1.15).abs() < 1e-5);
    }

    #[test]
    fn export_uses_committed_view_before_it_is_drawn() {
        let src = RgbaImage::from_fn(12, 12, |x, y| Rgba([(x * 20) as u8, (y * 20) as u8, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        src.write_to(&mut out, ImageFormat::Png).unwrap();
        let mut tile = ViewerTile::new(ImageHandle::from_bytes("grad.png", out.into_inner()));
        tile.ensure_decoded();
        tile.view_mut().wheel(-2000.0);

        // nothing has been drawn, so the eased transform is still the identity
        assert_eq!(tile.shown, ViewTransform::IDENTITY);
        let raster = tile.render_export(FilterMode::Normal).unwrap();
        let expected = export::render_view(&src, FilterMode::Normal, tile.view().transform(), None);
        assert_eq!(raster, expected);
        assert_ne!(raster, src);
    }

    #[test]
    fn fit_rect_keeps_aspect() {
        let outer = egui::Rect::from_min_size(pos2(0.0, 0.0), vec2(300.0, 300.0));
        let fitted = fit_rect(outer, vec2(600.0, 300.0));
        assert_eq!(fitted.size(), vec2(300.0, 150.0));
        assert_eq!(fitted.center(), outer.center());
    }
}
