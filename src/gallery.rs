//! The gallery: uploaded images, the global filter and one tile per image.

use crate::config::Config;
use crate::filter::FilterMode;
use crate::handle::{expand_paths, ImageHandle};
use crate::tile::{TileAction, ViewerTile};
use eframe::egui;
use std::path::{Path, PathBuf};

pub const EMPTY_MESSAGE: &str = "No has subido ninguna imagen.";

/// Result of the most recent export, shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Failed(String),
}

pub struct Gallery {
    tiles: Vec<ViewerTile>,
    filter: FilterMode,
    export_dir: PathBuf,
    export_file_name: String,
    tile_size: f32,
    last_export: Option<ExportStatus>,
    scroll_offset: egui::Vec2,
}

impl Gallery {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            tiles: Vec::new(),
            filter: FilterMode::default(),
            export_dir: config.export_dir.clone(),
            export_file_name: config.export_file_name.clone(),
            tile_size: config.tile_size,
            last_export: None,
            scroll_offset: egui::Vec2::ZERO,
        }
    }

    #[must_use]
    pub fn tiles(&self) -> &[ViewerTile] {
        &self.tiles
    }

    pub fn tile_mut(&mut self, index: usize) -> Option<&mut ViewerTile> {
        self.tiles.get_mut(index)
    }

    #[must_use]
    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    #[must_use]
    pub fn last_export(&self) -> Option<&ExportStatus> {
        self.last_export.as_ref()
    }

    /// Scroll position of the tile grid after the last frame.
    #[must_use]
    pub fn scroll_offset(&self) -> egui::Vec2 {
        self.scroll_offset
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Replaces the whole image set, one tile per handle, in order.
    ///
    /// Previous tiles are dropped here, along with their pixels and textures.
    pub fn upload(&mut self, handles: Vec<ImageHandle>) {
        let released = self.tiles.len();
        let bytes: usize = handles.iter().map(ImageHandle::len).sum();
        self.tiles.clear();
        self.scroll_offset = egui::Vec2::ZERO;
        self.tiles.extend(handles.into_iter().map(ViewerTile::new));
        tracing::info!(loaded = self.tiles.len(), bytes, released, "new upload batch");
    }

    /// Reads and uploads files; directories are expanded to their images.
    pub fn upload_paths(&mut self, paths: &[PathBuf]) {
        let handles = expand_paths(paths)
            .iter()
            .map(|p| ImageHandle::from_path_lossy(p))
            .collect();
        self.upload(handles);
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        if self.filter != mode {
            tracing::info!(?mode, "filter changed");
            self.filter = mode;
        }
    }

    /// Exports tile `index` to the configured file.
    ///
    /// Exporting a tile whose image is not decoded does nothing.
    pub fn export_tile(&mut self, index: usize) -> Option<&ExportStatus> {
        let tile = self.tiles.get(index)?;
        let Ok(raster) = tile.render_export(self.filter) else {
            tracing::debug!(index, "export ignored, image not decoded");
            return None;
        };
        let saved = crate::export::save_png(&raster, &self.export_dir, &self.export_file_name);
        let status = match saved {
            Ok(path) => ExportStatus::Saved(path),
            Err(e) => {
                tracing::warn!("export failed: {e}");
                ExportStatus::Failed(e.to_string())
            }
        };
        self.last_export = Some(status);
        self.last_export.as_ref()
    }

    #[must_use]
    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Draws the filter bar.
    pub fn show_filters(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Filtros:");
            for mode in FilterMode::ALL {
                if ui.selectable_label(self.filter == mode, mode.label()).clicked() {
                    self.set_filter(mode);
                }
            }
        });
    }

    /// Draws the empty-state message or one tile per image.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        if self.tiles.is_empty() {
            ui.centered_and_justified(|ui| ui.label(EMPTY_MESSAGE));
            return;
        }

        let size = egui::vec2(self.tile_size, self.tile_size * 0.75);
        let mut export = None;
        let output = egui::ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for (index, tile) in self.tiles.iter_mut().enumerate() {
                    ui.push_id(index, |ui| {
                        if tile.show(ui, self.filter, size) == TileAction::Export {
                            export = Some(index);
                        }
                    });
                }
            });
        });
        self.scroll_offset = output.state.offset;

        if let Some(index) = export {
            self.export_tile(index);
        }
    }
}
