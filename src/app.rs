//! Top-level window.

use crate::config::Config;
use crate::gallery::{ExportStatus, Gallery};
use crate::handle::{ImageHandle, IMAGE_EXTENSIONS};
use eframe::egui;

pub const APP_TITLE: &str = "Visor de Imágenes";

pub struct ViewerApp {
    gallery: Gallery,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let mut gallery = Gallery::new(&config);
        if !config.initial_paths.is_empty() {
            gallery.upload_paths(&config.initial_paths);
        }
        Self { gallery }
    }

    fn pick_files(&mut self) {
        // the extension filter is only a hint, any file may be chosen
        let picked = rfd::FileDialog::new()
            .set_title("Subir imágenes")
            .add_filter("Imágenes", IMAGE_EXTENSIONS)
            .add_filter("Todos", &["*"])
            .pick_files();
        match picked {
            Some(paths) if !paths.is_empty() => self.gallery.upload_paths(&paths),
            _ => tracing::debug!("file picker cancelled"),
        }
    }

    fn take_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return;
        }
        let handles = dropped
            .into_iter()
            .map(|file| match (file.path, file.bytes) {
                (Some(path), _) => ImageHandle::from_path_lossy(&path),
                (None, Some(bytes)) => ImageHandle::from_bytes(file.name, bytes),
                (None, None) => ImageHandle::from_bytes(file.name, Vec::new()),
            })
            .collect();
        self.gallery.upload(handles);
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.take_dropped_files(ctx);

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(APP_TITLE);
                ui.add_space(12.0);
                if ui.button("Abrir imágenes…").clicked() {
                    self.pick_files();
                }
            });
            ui.add_space(4.0);
            self.gallery.show_filters(ui);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.gallery.last_export() {
                    Some(ExportStatus::Saved(path)) => {
                        ui.label(format!("Guardado en {}", path.display()));
                    }
                    Some(ExportStatus::Failed(err)) => {
                        ui.colored_label(egui::Color32::RED, format!("Error al exportar: {err}"));
                    }
                    None => {
                        let dir = self.gallery.export_dir().display();
                        ui.weak(format!("Las descargas se guardan en {dir}"));
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak("© 2025 Proyecto Visor de Imágenes");
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.gallery.show(ui);
        });
    }
}
